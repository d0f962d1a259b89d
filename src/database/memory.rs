use std::sync::{Mutex, MutexGuard};

use super::{
    models::{
        blog::{Blog, BlogChanges, BlogDetails, NewBlog},
        comment::{Comment, CommentDetails, NewComment},
        like::Like,
        user::{AuthorSummary, CommentAuthor, NewUser, User},
    },
    Store, StoreError,
};

/// In-process [`Store`] mirroring the postgres constraints, used by handler tests
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default, Clone)]
struct Tables {
    users: Vec<User>,
    blogs: Vec<Blog>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn details(&self, blog: &Blog) -> Result<BlogDetails, StoreError> {
        let author = self
            .users
            .iter()
            .find(|user| user.id == blog.author_id)
            .ok_or(StoreError::NotFound)?;
        let mut comments = Vec::new();
        for comment in self.comments.iter().filter(|c| c.blog_id == blog.id) {
            let comment_author = self
                .users
                .iter()
                .find(|user| user.id == comment.author_id)
                .ok_or(StoreError::NotFound)?;
            comments.push(CommentDetails {
                comment: comment.clone(),
                author: CommentAuthor::from(comment_author),
            });
        }

        Ok(BlogDetails {
            blog: blog.clone(),
            author: AuthorSummary::from(author),
            comments,
            likes: self
                .likes
                .iter()
                .filter(|like| like.blog_id == blog.id)
                .copied()
                .collect(),
        })
    }
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    /// Independent copy of the current rows
    pub fn snapshot(&self) -> MemoryStore {
        MemoryStore {
            tables: Mutex::new(self.tables().clone()),
        }
    }
}

/// Serves lookups from a snapshot while writes go to the live store, which
/// reproduces a concurrent request committing between a check and a write.
pub struct LaggingReads {
    pub live: MemoryStore,
    snapshot: MemoryStore,
}

impl LaggingReads {
    pub fn new(live: MemoryStore) -> LaggingReads {
        LaggingReads {
            snapshot: live.snapshot(),
            live,
        }
    }
}

impl Store for LaggingReads {
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.live.create_user(new_user)
    }

    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        self.snapshot.find_user_by_id(user_id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.snapshot.find_user_by_email(email)
    }

    fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, StoreError> {
        self.live.create_blog(new_blog)
    }

    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, StoreError> {
        self.snapshot.find_blog(blog_id)
    }

    fn find_blog_details(&self, blog_id: i32) -> Result<Option<BlogDetails>, StoreError> {
        self.snapshot.find_blog_details(blog_id)
    }

    fn list_blogs(&self) -> Result<Vec<BlogDetails>, StoreError> {
        self.snapshot.list_blogs()
    }

    fn update_blog(&self, blog_id: i32, changes: BlogChanges) -> Result<Blog, StoreError> {
        self.live.update_blog(blog_id, changes)
    }

    fn delete_blog(&self, blog_id: i32) -> Result<bool, StoreError> {
        self.live.delete_blog(blog_id)
    }

    fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        self.live.create_comment(new_comment)
    }

    fn find_like(&self, author_id: i32, blog_id: i32) -> Result<Option<Like>, StoreError> {
        self.snapshot.find_like(author_id, blog_id)
    }

    fn create_like(&self, like: Like) -> Result<Like, StoreError> {
        self.live.create_like(like)
    }

    fn delete_like(&self, author_id: i32, blog_id: i32) -> Result<bool, StoreError> {
        self.live.delete_like(author_id, blog_id)
    }
}

impl Store for MemoryStore {
    fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|user| user.email == new_user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        let user = User {
            id: tables.next_id(),
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|user| user.id == user_id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|user| user.email == email).cloned())
    }

    fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, StoreError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|user| user.id == new_blog.author_id) {
            return Err(StoreError::ForeignKeyViolation("blogs_author_id_fkey".to_string()));
        }
        let blog = Blog {
            id: tables.next_id(),
            title: new_blog.title,
            content: new_blog.content,
            img_url: new_blog.img_url,
            author_id: new_blog.author_id,
            created_at: new_blog.created_at,
        };
        tables.blogs.push(blog.clone());

        Ok(blog)
    }

    fn find_blog(&self, blog_id: i32) -> Result<Option<Blog>, StoreError> {
        Ok(self.tables().blogs.iter().find(|blog| blog.id == blog_id).cloned())
    }

    fn find_blog_details(&self, blog_id: i32) -> Result<Option<BlogDetails>, StoreError> {
        let tables = self.tables();
        match tables.blogs.iter().find(|blog| blog.id == blog_id) {
            Some(blog) => Ok(Some(tables.details(blog)?)),
            None => Ok(None),
        }
    }

    fn list_blogs(&self) -> Result<Vec<BlogDetails>, StoreError> {
        let tables = self.tables();
        let mut blogs: Vec<&Blog> = tables.blogs.iter().collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        blogs.into_iter().map(|blog| tables.details(blog)).collect()
    }

    fn update_blog(&self, blog_id: i32, changes: BlogChanges) -> Result<Blog, StoreError> {
        let mut tables = self.tables();
        let blog = tables
            .blogs
            .iter_mut()
            .find(|blog| blog.id == blog_id)
            .ok_or(StoreError::NotFound)?;
        changes.apply(blog);

        Ok(blog.clone())
    }

    fn delete_blog(&self, blog_id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.blogs.len();
        tables.blogs.retain(|blog| blog.id != blog_id);
        tables.comments.retain(|comment| comment.blog_id != blog_id);
        tables.likes.retain(|like| like.blog_id != blog_id);

        Ok(tables.blogs.len() < before)
    }

    fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        let mut tables = self.tables();
        if !tables.blogs.iter().any(|blog| blog.id == new_comment.blog_id) {
            return Err(StoreError::ForeignKeyViolation("comments_blog_id_fkey".to_string()));
        }
        let comment = Comment {
            id: tables.next_id(),
            content: new_comment.content,
            blog_id: new_comment.blog_id,
            author_id: new_comment.author_id,
            created_at: new_comment.created_at,
        };
        tables.comments.push(comment.clone());

        Ok(comment)
    }

    fn find_like(&self, author_id: i32, blog_id: i32) -> Result<Option<Like>, StoreError> {
        Ok(self
            .tables()
            .likes
            .iter()
            .find(|like| like.author_id == author_id && like.blog_id == blog_id)
            .copied())
    }

    fn create_like(&self, like: Like) -> Result<Like, StoreError> {
        let mut tables = self.tables();
        if tables.likes.contains(&like) {
            return Err(StoreError::UniqueViolation("likes_pkey".to_string()));
        }
        if !tables.blogs.iter().any(|blog| blog.id == like.blog_id) {
            return Err(StoreError::ForeignKeyViolation("likes_blog_id_fkey".to_string()));
        }
        tables.likes.push(like);

        Ok(like)
    }

    fn delete_like(&self, author_id: i32, blog_id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.likes.len();
        tables
            .likes
            .retain(|like| !(like.author_id == author_id && like.blog_id == blog_id));

        Ok(tables.likes.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: String::from("alice1"),
            email: email.to_string(),
            password: String::from("hash"),
        }
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::default();
        store.create_user(new_user("a@x.com")).unwrap();

        let second = store.create_user(new_user("a@x.com"));
        assert!(matches!(second, Err(StoreError::UniqueViolation(_))));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_like_pair_is_unique_and_cascades() {
        let store = MemoryStore::default();
        let user = store.create_user(new_user("a@x.com")).unwrap();
        let blog = store
            .create_blog(NewBlog {
                title: String::from("First"),
                content: String::from("Body"),
                img_url: None,
                author_id: user.id,
                created_at: Utc::now().naive_utc(),
            })
            .unwrap();
        let like = Like {
            author_id: user.id,
            blog_id: blog.id,
        };

        store.create_like(like).unwrap();
        assert!(matches!(store.create_like(like), Err(StoreError::UniqueViolation(_))));

        assert!(store.delete_blog(blog.id).unwrap());
        assert_eq!(store.find_like(user.id, blog.id).unwrap(), None);
    }

    #[test]
    fn test_lagging_reads_miss_later_writes() {
        let store = LaggingReads::new(MemoryStore::default());
        store.create_user(new_user("a@x.com")).unwrap();

        assert_eq!(store.find_user_by_email("a@x.com").unwrap(), None);
        assert!(store.live.find_user_by_email("a@x.com").unwrap().is_some());
        assert!(matches!(
            store.create_user(new_user("a@x.com")),
            Err(StoreError::UniqueViolation(_))
        ));
    }
}
