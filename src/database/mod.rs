pub mod models;
pub mod pg;
#[cfg(test)]
pub mod memory;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use models::{
    blog::{Blog, BlogChanges, BlogDetails, NewBlog},
    comment::{Comment, NewComment},
    like::Like,
    user::{NewUser, User},
};

/** Failure of a persistence call */
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    #[error("database connection failed: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => StoreError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniqueViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                StoreError::ForeignKeyViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                StoreError::Connection(info.message().to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StoreError::Connection(err.to_string())
    }
}

/// Typed CRUD over users, blogs, comments and likes.
///
/// Every call is a single statement (or a read-only batch) and blocks the
/// calling thread, so handlers run them through [`crate::app::AppState::with_store`].
pub trait Store: Send + Sync {
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, StoreError>;
    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, StoreError>;
    fn find_blog_details(&self, blog_id: i32) -> Result<Option<BlogDetails>, StoreError>;
    /// All blogs, newest first
    fn list_blogs(&self) -> Result<Vec<BlogDetails>, StoreError>;
    /// Fails with [`StoreError::NotFound`] when the blog disappeared
    fn update_blog(&self, blog_id: i32, changes: BlogChanges) -> Result<Blog, StoreError>;
    /// Returns whether a row was removed
    fn delete_blog(&self, blog_id: i32) -> Result<bool, StoreError>;

    fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError>;

    fn find_like(&self, author_id: i32, blog_id: i32) -> Result<Option<Like>, StoreError>;
    /// Fails with [`StoreError::UniqueViolation`] if the pair already exists
    fn create_like(&self, like: Like) -> Result<Like, StoreError>;
    /// Returns whether a row was removed
    fn delete_like(&self, author_id: i32, blog_id: i32) -> Result<bool, StoreError>;
}
