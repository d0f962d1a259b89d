use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use crate::schema::likes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Insertable, Queryable, Selectable, Serialize)]
#[diesel(table_name = likes)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub author_id: i32,
    pub blog_id: i32,
}

impl Like {
    pub fn create(conn: &mut PgConnection, like: &Like) -> QueryResult<Like> {
        diesel::insert_into(likes::table)
            .values(like)
            .returning(Like::as_returning())
            .get_result(conn)
    }

    pub fn find(conn: &mut PgConnection, author: i32, blog: i32) -> QueryResult<Option<Like>> {
        likes::table
            .find((author, blog))
            .select(Like::as_select())
            .first(conn)
            .optional()
    }

    /// Returns whether a row was actually removed
    pub fn delete(conn: &mut PgConnection, author: i32, blog: i32) -> QueryResult<bool> {
        let removed = diesel::delete(
            likes::table
                .filter(likes::author_id.eq(author))
                .filter(likes::blog_id.eq(blog)),
        )
        .execute(conn)?;

        Ok(removed > 0)
    }
}
