use actix_web::{
    post,
    web::{self, Data},
    HttpResponse,
};
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::password::{hash_password, verify_password},
    database::{models::user::NewUser, StoreError},
    validation::{LoginInput, SignupInput},
};

const DUPLICATE_EMAIL: &str = "User already exists with this email";

/// Pipe for creating an user
/// - url: `{domain}/api/v1/signup`
///
/// # HTTP request requirements
/// ## body
/// - json containing `username` (4 to 20 characters), `email` and `password`
///   (at least 3 characters)
///
/// # Example
/// ```ignore
/// let data = r#"{ "username": "alice1", "email": "a@x.com", "password": "secret" }"#;
/// let request = actix_web::test::TestRequest::post()
///     .uri("/api/v1/signup")
///     .set_payload(data)
///     .to_request();
/// ```
///
/// # Response
/// ## Created
/// - the new user, without its password
/// ## Error
/// - Bad request (invalid fields or email already registered)
/// - Internal server error
#[post("/signup")]
pub async fn signup(req_body: String, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let input = SignupInput::parse(&req_body).map_err(AppError::invalid("Signup validation error"))?;

    let email = input.email.clone();
    let existing = app_state
        .with_store(move |store| store.find_user_by_email(&email))
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest(String::from(DUPLICATE_EMAIL)));
    }

    let cost = app_state.hash_cost;
    let password = input.password;
    let hashed = web::block(move || hash_password(&password, cost)).await??;

    let new_user = NewUser {
        username: input.username,
        email: input.email,
        password: hashed,
    };
    // a concurrent signup may still win the unique index
    let user = app_state
        .with_store(move |store| {
            store.create_user(new_user).map_err(|err| match err {
                StoreError::UniqueViolation(_) => AppError::BadRequest(String::from(DUPLICATE_EMAIL)),
                other => other.into(),
            })
        })
        .await?;
    log::info!("user {} signed up", user.id);

    Ok(HttpResponse::Created().json(json!({
        "message": "User successfully created",
        "user": user,
    })))
}

/// Pipe for logging in as user
/// - url: `{domain}/api/v1/login`
///
/// # HTTP request requirements
/// ## body
/// - json containing `email` and `password`
///
/// # Response
/// ## Ok
/// - `token` to send back as `Authorization: Bearer <token>`, and the user
/// ## Error
/// - Bad request
/// - Unauthorized (wrong password)
/// - Not found (unknown email)
/// - Internal server error
#[post("/login")]
pub async fn login(req_body: String, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let input = LoginInput::parse(&req_body).map_err(AppError::invalid("Login validation error"))?;

    let email = input.email;
    let user = app_state
        .with_store(move |store| store.find_user_by_email(&email))
        .await?
        .ok_or(AppError::NotFound("No user exists with this email"))?;

    let password = input.password;
    let hash = user.password.clone();
    if !web::block(move || verify_password(&password, &hash)).await?? {
        return Err(AppError::UnauthorizedError);
    }

    let token = app_state.tokens.issue(user.id, &user.username, &user.email)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token,
        "user": user,
    })))
}
