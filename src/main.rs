#[macro_use]
extern crate diesel;

pub mod schema;
pub mod database;
pub mod app;

mod ai;
mod auth;
mod config;
mod routes;
mod validation;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use env_logger::Env;

use app::AppState;
use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| {
        log::error!("invalid configuration: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;
    let app_state = AppState::new(&config).map_err(|err| {
        log::error!("could not start: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;
    if config.ai.api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set, idea generation will fail");
    }

    log::info!("Server running on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(app_state.clone()))
            .configure(routes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
