use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Identity carried inside a login token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 keys derived from the server secret, plus the token lifetime
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> TokenKeys {
        TokenKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs a token for the user, valid for the configured lifetime
    pub fn issue(&self, id: i32, username: &str, email: &str) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            id,
            username: username.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Checks signature and expiry and returns the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        Ok(decode::<Claims>(token, &self.decoding, &Validation::default())?.claims)
    }
}
