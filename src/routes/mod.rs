pub mod blog;
pub mod comment;
pub mod idea;
pub mod token;
pub mod user;

use actix_web::web;

use blog::*;
use comment::*;
use idea::*;
use token::*;
use user::*;

/// Registers every endpoint under `/api/v1`
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            //User routes
            .service(signup)
            .service(login)
            //Idea routes, ahead of `/blog/{id}`
            .service(generate_ideas)
            //Blog routes
            .service(create_blog)
            .service(edit_blog)
            .service(delete_blog)
            .service(list_blogs)
            .service(get_blog)
            .service(like_blog)
            //Comment routes
            .service(create_comment)
            //Token routes
            .service(refresh_token),
    );
}
