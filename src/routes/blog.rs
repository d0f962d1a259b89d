use actix_web::{delete, get, post, put, web::Data, HttpRequest, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use chrono::Utc;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{bearer_auth_validator, policy::authorize_owner, AuthUser},
    database::{
        models::{
            blog::{BlogChanges, NewBlog},
            like::Like,
        },
        Store, StoreError,
    },
    validation::BlogInput,
};

pub(crate) fn blog_id(req: &HttpRequest) -> Result<i32, AppError> {
    Ok(req.match_info().query("id").parse::<i32>()?)
}

/// Pipe for creating a new blog
/// - url: `{domain}/api/v1/blog`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer <token>`
/// ## body
/// - title: [String] - at least 3 characters
/// - content: [String] - body of the blog
/// - imgUrl: [String] (optional) - cover image
///
/// # Response
/// ## Created
/// ```text
/// {
///     "message": "Blog added successfully",
///     "blog": {
///         "id": 73,
///         "title": "Blog title",
///         "content": "Blog body",
///         "imgUrl": null,
///         "authorId": 12,
///         "createdAt": "2025-08-04T09:22:30.664361"
///     }
/// }
/// ```
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Internal server error
#[post("/blog", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn create_blog(
    AuthUser(user): AuthUser,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = BlogInput::parse(&req_body).map_err(AppError::invalid("Blog validation error"))?;

    let new_blog = NewBlog {
        title: input.title,
        content: input.content,
        img_url: input.img_url,
        author_id: user.id,
        created_at: Utc::now().naive_utc(),
    };
    let blog = app_state
        .with_store(move |store| store.create_blog(new_blog))
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Blog added successfully",
        "blog": blog,
    })))
}

/// Pipe for editing a blog, only its author may do so
/// - url: `{domain}/api/v1/blog/{id}`
///
/// # HTTP request requirements
/// - `{id}` as a parameter
/// ## header
/// - `Authorization: Bearer <token>`
/// ## body
/// - same fields as [create_blog]; an absent `imgUrl` keeps the current image
///
/// # Response
/// ## Ok
/// - the updated blog
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Forbidden
/// - Not found
/// - Internal server error
#[put("/blog/{id}", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn edit_blog(
    AuthUser(user): AuthUser,
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog_id = blog_id(&req)?;
    let input = BlogInput::parse(&req_body).map_err(AppError::invalid("Blog validation error"))?;

    let blog = app_state
        .with_store(move |store| store.find_blog(blog_id))
        .await?
        .ok_or(AppError::NotFound("Blog not found"))?;
    authorize_owner(&blog, &user)?;

    let changes = BlogChanges {
        title: input.title,
        content: input.content,
        img_url: input.img_url,
    };
    let blog = app_state
        .with_store(move |store| store.update_blog(blog_id, changes))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Blog updated successfully",
        "blog": blog,
    })))
}

/// Pipe for deleting a blog together with its comments and likes
/// - url: `{domain}/api/v1/blog/{id}`
///
/// # Response
/// ## Ok
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Forbidden
/// - Not found
/// - Internal server error
#[delete("/blog/{id}", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn delete_blog(
    AuthUser(user): AuthUser,
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog_id = blog_id(&req)?;

    let blog = app_state
        .with_store(move |store| store.find_blog(blog_id))
        .await?
        .ok_or(AppError::NotFound("Blog not found"))?;
    authorize_owner(&blog, &user)?;

    // gone already if a concurrent delete won
    let deleted = app_state
        .with_store(move |store| store.delete_blog(blog_id))
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Blog not found"));
    }
    log::info!("blog {} deleted by user {}", blog_id, user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Blog deleted successfully" })))
}

/// Pipe for listing every blog, newest first, with author, comments and likes
/// - url: `{domain}/api/v1/blogs`
#[get("/blogs")]
pub async fn list_blogs(app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let blogs = app_state.with_store(|store| store.list_blogs()).await?;

    Ok(HttpResponse::Ok().json(json!({ "blogs": blogs })))
}

/// Pipe for getting one blog with author, comments (and their authors) and likes
/// - url: `{domain}/api/v1/blog/{id}`
///
/// # Response
/// ## Ok
/// ## Error
/// - Bad request (id is not a number)
/// - Not found
/// - Internal server error
#[get("/blog/{id}")]
pub async fn get_blog(req: HttpRequest, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let blog_id = blog_id(&req)?;

    let blog = app_state
        .with_store(move |store| store.find_blog_details(blog_id))
        .await?
        .ok_or(AppError::NotFound("Blog not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "blog": blog })))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked(Like),
    Unliked,
}

/// Flips the like of `author_id` on `blog_id`.
///
/// Concurrent toggles resolve against the `(author_id, blog_id)` key: losing
/// an insert race means the pair is liked, losing a delete race means it is not.
pub fn toggle_like(store: &dyn Store, author_id: i32, blog_id: i32) -> Result<LikeToggle, StoreError> {
    if store.find_like(author_id, blog_id)?.is_some() {
        store.delete_like(author_id, blog_id)?;
        return Ok(LikeToggle::Unliked);
    }

    let like = Like { author_id, blog_id };
    match store.create_like(like) {
        Ok(like) => Ok(LikeToggle::Liked(like)),
        Err(StoreError::UniqueViolation(_)) => Ok(LikeToggle::Liked(like)),
        Err(err) => Err(err),
    }
}

/// Pipe for liking or unliking a blog: if the user hasn't liked it yet the
/// like is created, otherwise it is removed
/// - url: `{domain}/api/v1/blog/{id}/like`
///
/// # HTTP request requirements
/// - `{id}` as a parameter
/// ## header
/// - `Authorization: Bearer <token>`
///
/// # Response
/// ## Created
/// - `"Post liked"` and the like
/// ## Ok
/// - `"Post unliked"`
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Not found
/// - Internal server error
#[post("/blog/{id}/like", wrap = "HttpAuthentication::bearer(bearer_auth_validator)")]
pub async fn like_blog(
    AuthUser(user): AuthUser,
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog_id = blog_id(&req)?;

    app_state
        .with_store(move |store| store.find_blog(blog_id))
        .await?
        .ok_or(AppError::NotFound("Blog not found"))?;

    let author_id = user.id;
    let toggled = app_state
        .with_store(move |store| toggle_like(store, author_id, blog_id))
        .await?;

    Ok(match toggled {
        LikeToggle::Liked(like) => HttpResponse::Created().json(json!({
            "message": "Post liked",
            "like": like,
        })),
        LikeToggle::Unliked => HttpResponse::Ok().json(json!({ "message": "Post unliked" })),
    })
}
