use actix_web::{put, web::Data, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{bearer_auth_validator, AuthUser},
};

/// Pipe for refreshing a token for a server specified duration
/// - url: `{domain}/api/v1/token/refresh`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer <token>` with a token that has not expired yet
///
/// # Response
/// ## Ok
/// - a new `token` carrying the user's current username and email
/// ## Error
/// - Unauthorized (bad token or the user no longer exists)
/// - Internal server error
#[put("/token/refresh", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn refresh_token(AuthUser(claims): AuthUser, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let user_id = claims.id;
    let user = app_state
        .with_store(move |store| store.find_user_by_id(user_id))
        .await?
        .ok_or(AppError::UnauthorizedError)?;

    let token = app_state.tokens.issue(user.id, &user.username, &user.email)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Token refreshed",
        "token": token,
    })))
}
