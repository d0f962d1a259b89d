use super::token::Claims;
use crate::app::AppError;

/// Resources that belong to exactly one user
pub trait Owned {
    fn owner_id(&self) -> i32;
}

impl Owned for crate::database::models::blog::Blog {
    fn owner_id(&self) -> i32 {
        self.author_id
    }
}

/// Allows mutation only when the actor created the resource
pub fn authorize_owner<R: Owned>(resource: &R, actor: &Claims) -> Result<(), AppError> {
    if resource.owner_id() != actor.id {
        return Err(AppError::Forbidden("You are not the author of this blog"));
    }

    Ok(())
}
