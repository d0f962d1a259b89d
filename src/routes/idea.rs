use actix_web::{post, web::Data, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{bearer_auth_validator, AuthUser},
};

/// Pipe for asking the generative model for blog ideas
/// - url: `{domain}/api/v1/blog/ideas`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer <token>`
///
/// # Response
/// ## Ok
/// ```text
/// {
///     "message": "Blog ideas generated successfully",
///     "ideas": [{ "title": "...", "summary": "..." }]
/// }
/// ```
/// ## Error
/// - Unauthorized
/// - Internal server error (upstream failed or nothing could be parsed)
#[post("/blog/ideas", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn generate_ideas(AuthUser(user): AuthUser, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let ideas = app_state.ideas.blog_ideas().await.map_err(|err| {
        log::error!("idea generation for user {} failed: {}", user.id, err);
        AppError::InternalServerError("Failed to generate AI blog ideas")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Blog ideas generated successfully",
        "ideas": ideas,
    })))
}
