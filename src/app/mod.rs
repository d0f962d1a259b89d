use std::{collections::BTreeMap, num::ParseIntError, sync::Arc};

use actix_web::{error::BlockingError, http::StatusCode, web, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;

use crate::{
    ai::IdeaClient,
    auth::token::TokenKeys,
    config::Config,
    database::{pg::PgStore, Store, StoreError},
};

/** Shared handles every request works with, built once in `main` */
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
    pub ideas: Arc<IdeaClient>,
    pub hash_cost: u32,
}

impl AppState {
    pub fn new(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
        let store = PgStore::connect(&config.database_url, config.pool_size)?;

        Ok(AppState {
            store: Arc::new(store),
            tokens: Arc::new(TokenKeys::new(
                &config.auth.jwt_secret,
                chrono::Duration::hours(config.auth.token_ttl_hours),
            )),
            ideas: Arc::new(IdeaClient::new(&config.ai)?),
            hash_cost: config.auth.hash_cost,
        })
    }

    /// Runs a blocking store call on the thread pool
    pub async fn with_store<F, R, E>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&dyn Store) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        let store = self.store.clone();
        web::block(move || f(store.as_ref())).await?.map_err(Into::into)
    }
}

/// Validation messages keyed by field name
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }
}

/** Holds the errors we will used during request processing */
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: &'static str,
        errors: FieldErrors,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    UnauthorizedError,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    InternalServerError(&'static str),
}

impl AppError {
    /// `map_err` adapter turning schema failures into a 400
    pub fn invalid(message: &'static str) -> impl FnOnce(FieldErrors) -> AppError {
        move |errors| AppError::Validation { message, errors }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthorizedError => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { message, errors } => json!({ "message": message, "err": errors }),
            other => json!({ "message": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Record not found"),
            StoreError::UniqueViolation(_) => AppError::BadRequest(String::from("Record already exists")),
            StoreError::ForeignKeyViolation(_) => AppError::NotFound("Referenced record not found"),
            other => {
                log::error!("store failure: {}", other);
                AppError::InternalServerError("Internal server error")
            }
        }
    }
}
impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        log::error!("blocking task failed: {}", err);
        AppError::InternalServerError("Internal server error")
    }
}
impl From<ParseIntError> for AppError {
    fn from(_: ParseIntError) -> Self {
        AppError::BadRequest(String::from("Id must be a number"))
    }
}
impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        log::error!("password hashing failed: {}", err);
        AppError::InternalServerError("Internal server error")
    }
}
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        log::error!("token signing failed: {}", err);
        AppError::InternalServerError("Internal server error")
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;

    use super::AppState;
    use crate::{
        ai::IdeaClient,
        auth::{password::hash_password, token::TokenKeys},
        config::AiConfig,
        database::{
            memory::MemoryStore,
            models::user::{NewUser, User},
            Store,
        },
    };

    pub const PASSWORD: &str = "secret";

    /// State over an empty [`MemoryStore`] with an unreachable AI upstream
    pub fn app_state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());

        (app_state_over(store.clone()), store)
    }

    pub fn app_state_over(store: Arc<dyn Store>) -> AppState {
        let ideas = IdeaClient::new(&AiConfig {
            api_key: Some(String::from("test-key")),
            model: String::from("gemini-2.0-flash"),
            base_url: String::from("http://127.0.0.1:9"),
            timeout_secs: 2,
        })
        .unwrap();

        AppState {
            store,
            tokens: Arc::new(TokenKeys::new("test-secret", chrono::Duration::hours(1))),
            ideas: Arc::new(ideas),
            hash_cost: 4,
        }
    }

    /// Registers a user with [`PASSWORD`] and returns it with a bearer token
    pub fn seed_user(app_state: &AppState, username: &str, email: &str) -> (User, String) {
        let user = app_state
            .store
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: hash_password(PASSWORD, 4).unwrap(),
            })
            .unwrap();
        let token = app_state
            .tokens
            .issue(user.id, &user.username, &user.email)
            .unwrap();

        (user, token)
    }

    pub fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }
}
