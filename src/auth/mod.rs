pub mod password;
pub mod policy;
pub mod token;

use actix_web::{
    dev::{Payload, ServiceRequest},
    web::Data,
    FromRequest, HttpMessage, HttpRequest,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures::future::{ready, Ready};

use crate::app::{AppError, AppState};
use token::Claims;

/// Gate for routes that need a logged in user.
///
/// Rejects the request with 401 unless the bearer token verifies, otherwise
/// stores its [`Claims`] in the request extensions for [`AuthUser`].
pub async fn bearer_auth_validator(
    req: ServiceRequest,
    creds: BearerAuth,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let verified = req
        .app_data::<Data<AppState>>()
        .map(|app_state| app_state.tokens.verify(creds.token()));
    let Some(verified) = verified else {
        log::error!("bearer validator mounted without application state");
        return Err((AppError::InternalServerError("Internal server error").into(), req));
    };

    match verified {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(err) => {
            log::debug!("rejected bearer token: {}", err);
            Err((AppError::UnauthorizedError.into(), req))
        }
    }
}

/// Identity of the caller, as attached by [`bearer_auth_validator`]
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<AuthUser, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .map(AuthUser)
                .ok_or(AppError::UnauthorizedError),
        )
    }
}
