use std::{env, fmt::Display, ops::RangeInclusive, str::FromStr};

/// Settings read from the environment (and `.env`) at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pool_size: u32,
    pub auth: AuthConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub hash_cost: u32,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    Missing(&'static str),
    #[error("environment variable `{name}` has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        Ok(Config {
            host: vars.or("HOST", "127.0.0.1"),
            port: vars.parsed("PORT", 8000)?,
            database_url: vars.required("DATABASE_URL")?,
            pool_size: vars.ranged("DATABASE_POOL_SIZE", 10, 1..=256)?,
            auth: AuthConfig {
                jwt_secret: vars.required("JWT_SECRET")?,
                token_ttl_hours: vars.ranged("TOKEN_TTL_HOURS", 24, 1..=24 * 365)?,
                hash_cost: vars.ranged("BCRYPT_COST", 10, 4..=31)?,
            },
            ai: AiConfig {
                api_key: vars.get("GEMINI_API_KEY"),
                model: vars.or("GEMINI_MODEL", "gemini-2.0-flash"),
                base_url: vars.or(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
                timeout_secs: vars.ranged("AI_TIMEOUT_SECS", 30, 1..=600)?,
            },
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    // Blank values count as unset
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }

    fn ranged<T>(&self, name: &'static str, default: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd + Display,
    {
        let value = self.parsed(name, default)?;
        if !range.contains(&value) {
            return Err(ConfigError::Invalid {
                name,
                value: value.to_string(),
            });
        }

        Ok(value)
    }
}
