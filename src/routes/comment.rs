use actix_web::{post, web::Data, HttpRequest, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use chrono::Utc;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{bearer_auth_validator, AuthUser},
    database::models::comment::NewComment,
    routes::blog::blog_id,
    validation::CommentInput,
};

/// Pipe for creating a comment
/// - url: `{domain}/api/v1/blog/{id}/comment`
///
/// # HTTP request requirements
/// - `{id}` of the blog as a parameter
/// ## header
/// - `Authorization: Bearer <token>`
/// ## body
/// - json containing a non empty `content`
///
/// # Example
/// ```ignore
/// let request = actix_web::test::TestRequest::post()
///     .uri("/api/v1/blog/7/comment")
///     .insert_header(("Authorization", "Bearer <token>"))
///     .set_payload(r#"{ "content": "Nice post" }"#)
///     .to_request();
/// ```
///
/// # Response
/// ## Created
/// - the stored comment
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Not found (no such blog)
/// - Internal server error
#[post("/blog/{id}/comment", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn create_comment(
    AuthUser(user): AuthUser,
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog_id = blog_id(&req)?;
    let input = CommentInput::parse(&req_body).map_err(AppError::invalid("Comment validation error"))?;

    app_state
        .with_store(move |store| store.find_blog(blog_id))
        .await?
        .ok_or(AppError::NotFound("Blog not found"))?;

    let new_comment = NewComment {
        content: input.content,
        blog_id,
        author_id: user.id,
        created_at: Utc::now().naive_utc(),
    };
    let comment = app_state
        .with_store(move |store| store.create_comment(new_comment))
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Comment added successfully",
        "comment": comment,
    })))
}
