table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        password -> Varchar,
    }
}

table! {
    blogs (id) {
        id -> Int4,
        title -> Varchar,
        content -> Text,
        img_url -> Nullable<Varchar>,
        author_id -> Int4,
        created_at -> Timestamp,
    }
}

table! {
    comments (id) {
        id -> Int4,
        content -> Text,
        blog_id -> Int4,
        author_id -> Int4,
        created_at -> Timestamp,
    }
}

table! {
    likes (author_id, blog_id) {
        author_id -> Int4,
        blog_id -> Int4,
    }
}

joinable!(blogs -> users (author_id));
joinable!(comments -> blogs (blog_id));
joinable!(comments -> users (author_id));
joinable!(likes -> blogs (blog_id));
joinable!(likes -> users (author_id));

allow_tables_to_appear_in_same_query!(
    blogs,
    comments,
    likes,
    users,
);
