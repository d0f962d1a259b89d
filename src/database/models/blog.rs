use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use super::{
    comment::{Comment, CommentDetails},
    like::Like,
    user::{AuthorSummary, CommentAuthor},
};
use crate::schema::{blogs, comments, likes, users};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = blogs)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub img_url: Option<String>,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blogs)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub img_url: Option<String>,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

/// Fields replaced by an edit. A `None` image keeps the stored one.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = blogs)]
pub struct BlogChanges {
    pub title: String,
    pub content: String,
    pub img_url: Option<String>,
}

/// A blog together with its author, comments and likes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogDetails {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: AuthorSummary,
    pub comments: Vec<CommentDetails>,
    pub likes: Vec<Like>,
}

impl BlogChanges {
    pub fn apply(self, blog: &mut Blog) {
        blog.title = self.title;
        blog.content = self.content;
        if self.img_url.is_some() {
            blog.img_url = self.img_url;
        }
    }
}

impl Blog {
    pub fn create(conn: &mut PgConnection, new_blog: &NewBlog) -> QueryResult<Blog> {
        diesel::insert_into(blogs::table)
            .values(new_blog)
            .returning(Blog::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, blog_id: i32) -> QueryResult<Option<Blog>> {
        blogs::table
            .find(blog_id)
            .select(Blog::as_select())
            .first(conn)
            .optional()
    }

    pub fn update(conn: &mut PgConnection, blog_id: i32, changes: &BlogChanges) -> QueryResult<Blog> {
        diesel::update(blogs::table.find(blog_id))
            .set(changes)
            .returning(Blog::as_returning())
            .get_result(conn)
    }

    /** Deletes a blog, comments and likes on it are removed by the foreign keys */
    pub fn delete_by_id(conn: &mut PgConnection, blog_id: i32) -> QueryResult<usize> {
        diesel::delete(blogs::table.find(blog_id)).execute(conn)
    }

    /// Every blog with its relations, newest first
    pub fn list_details(conn: &mut PgConnection) -> QueryResult<Vec<BlogDetails>> {
        let rows = blogs::table
            .inner_join(users::table)
            .order((blogs::created_at.desc(), blogs::id.desc()))
            .select((Blog::as_select(), AuthorSummary::as_select()))
            .load::<(Blog, AuthorSummary)>(conn)?;

        Self::attach_relations(conn, rows)
    }

    pub fn find_details(conn: &mut PgConnection, blog_id: i32) -> QueryResult<Option<BlogDetails>> {
        let row = blogs::table
            .inner_join(users::table)
            .filter(blogs::id.eq(blog_id))
            .select((Blog::as_select(), AuthorSummary::as_select()))
            .first::<(Blog, AuthorSummary)>(conn)
            .optional()?;

        match row {
            Some(row) => Ok(Self::attach_relations(conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn attach_relations(
        conn: &mut PgConnection,
        rows: Vec<(Blog, AuthorSummary)>,
    ) -> QueryResult<Vec<BlogDetails>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|(blog, _)| blog.id).collect();

        let mut comments_by_blog: HashMap<i32, Vec<CommentDetails>> = HashMap::new();
        let found_comments = comments::table
            .inner_join(users::table)
            .filter(comments::blog_id.eq_any(ids.clone()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((Comment::as_select(), CommentAuthor::as_select()))
            .load::<(Comment, CommentAuthor)>(conn)?;
        for (comment, author) in found_comments {
            comments_by_blog
                .entry(comment.blog_id)
                .or_default()
                .push(CommentDetails { comment, author });
        }

        let mut likes_by_blog: HashMap<i32, Vec<Like>> = HashMap::new();
        let found_likes = likes::table
            .filter(likes::blog_id.eq_any(ids))
            .select(Like::as_select())
            .load::<Like>(conn)?;
        for like in found_likes {
            likes_by_blog.entry(like.blog_id).or_default().push(like);
        }

        Ok(rows
            .into_iter()
            .map(|(blog, author)| BlogDetails {
                comments: comments_by_blog.remove(&blog.id).unwrap_or_default(),
                likes: likes_by_blog.remove(&blog.id).unwrap_or_default(),
                blog,
                author,
            })
            .collect())
    }
}
