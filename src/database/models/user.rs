use crate::schema::users;
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    ///bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Author projection embedded in blog listings
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
pub struct AuthorSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// Author projection embedded in comments
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
pub struct CommentAuthor {
    pub id: i32,
    pub username: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<&User> for CommentAuthor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl User {
    /// Pushes a new user row and returns it with its generated id.
    ///
    /// The password must already be hashed, see [`crate::auth::password`].
    pub fn create(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(conn)
    }

    /** Returns an user with the id specified */
    pub fn find_by_id(conn: &mut PgConnection, user_id: i32) -> QueryResult<Option<User>> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    /// Returns the user registered with `email`, `None` if there is none.
    ///
    /// # Example
    /// ```ignore
    /// match User::find_by_email(&mut conn, "a@x.com")? {
    ///     Some(user) => println!("{:?}", user),
    ///     None => println!("No user found"),
    /// }
    /// ```
    pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }
}
