use actix_cors::Cors;
use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpServer,
};
use log::info;
use sqlx::SqlitePool;

mod config;
mod db;
mod errors;
mod routes;
mod structs;
mod utils;

use config::Config;

#[derive(Debug, Clone)]
pub struct AppState {
    db_pool: SqlitePool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;
    let db_pool = db::connect(&config).await.map_err(|e| {
        log::error!("FATAL: could not open database {}: {}", config.database_url, e);
        e
    })?;

    info!("Starting HTTP server on http://{}:{}/", config.host, config.port);

    let state = Data::new(AppState { db_pool });

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            // the front-end is served from a different origin
            .wrap(Cors::permissive())
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::default_handler))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
