use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    PgConnection,
};

use super::{
    models::{
        blog::{Blog, BlogChanges, BlogDetails, NewBlog},
        comment::{Comment, NewComment},
        like::Like,
        user::{NewUser, User},
    },
    Store, StoreError,
};

type PgPool = Pool<ConnectionManager<PgConnection>>;
type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// [`Store`] backed by a postgres connection pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Builds the pool and opens its first connections.
    ///
    /// # Example
    /// ```ignore
    /// let store = PgStore::connect("postgres://localhost/blogspace", 10)?;
    /// ```
    pub fn connect(database_url: &str, max_size: u32) -> Result<PgStore, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder().max_size(max_size).build(manager)?;

        Ok(PgStore { pool })
    }

    fn conn(&self) -> Result<PgPooledConnection, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl Store for PgStore {
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.conn()?;
        Ok(User::create(&mut conn, &new_user)?)
    }

    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn()?;
        Ok(User::find_by_id(&mut conn, user_id)?)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn()?;
        Ok(User::find_by_email(&mut conn, email)?)
    }

    fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, StoreError> {
        let mut conn = self.conn()?;
        Ok(Blog::create(&mut conn, &new_blog)?)
    }

    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, StoreError> {
        let mut conn = self.conn()?;
        Ok(Blog::find_by_id(&mut conn, blog_id)?)
    }

    fn find_blog_details(&self, blog_id: i32) -> Result<Option<BlogDetails>, StoreError> {
        let mut conn = self.conn()?;
        Ok(Blog::find_details(&mut conn, blog_id)?)
    }

    fn list_blogs(&self) -> Result<Vec<BlogDetails>, StoreError> {
        let mut conn = self.conn()?;
        Ok(Blog::list_details(&mut conn)?)
    }

    fn update_blog(&self, blog_id: i32, changes: BlogChanges) -> Result<Blog, StoreError> {
        let mut conn = self.conn()?;
        Ok(Blog::update(&mut conn, blog_id, &changes)?)
    }

    fn delete_blog(&self, blog_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        Ok(Blog::delete_by_id(&mut conn, blog_id)? > 0)
    }

    fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.conn()?;
        Ok(Comment::create(&mut conn, &new_comment)?)
    }

    fn find_like(&self, author_id: i32, blog_id: i32) -> Result<Option<Like>, StoreError> {
        let mut conn = self.conn()?;
        Ok(Like::find(&mut conn, author_id, blog_id)?)
    }

    fn create_like(&self, like: Like) -> Result<Like, StoreError> {
        let mut conn = self.conn()?;
        Ok(Like::create(&mut conn, &like)?)
    }

    fn delete_like(&self, author_id: i32, blog_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        Ok(Like::delete(&mut conn, author_id, blog_id)?)
    }
}
