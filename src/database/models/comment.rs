use chrono::NaiveDateTime;
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use super::user::CommentAuthor;
use crate::schema::comments;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = comments)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub blog_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub content: String,
    pub blog_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentDetails {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: CommentAuthor,
}

impl Comment {
    /** Creates a comment on the blog specified */
    pub fn create(conn: &mut PgConnection, new_comment: &NewComment) -> QueryResult<Comment> {
        diesel::insert_into(comments::table)
            .values(new_comment)
            .returning(Comment::as_returning())
            .get_result(conn)
    }
}
