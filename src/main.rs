use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod repository;
mod routes;
mod service;
mod utils;

use auth::jwt::TokenCodec;
use config::Config;
use db::{init_db, run_migrations};
use repository::mysql::MySqlStore;
use service::Services;

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; using the built-in default secret, which is insecure");
    }

    let pool = init_db(&config.database_url, config.db_max_connections)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;
    info!("Database ready");

    let store = Arc::new(MySqlStore::new(pool));
    let tokens = Arc::new(TokenCodec::new(&config.jwt_secret, config.jwt_expiry_hours));
    let services = Services::new(store, tokens.clone());
    info!(expiry_hours = tokens.expiry_hours(), "Token codec ready");

    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| {
                routes::configure(cfg, &config, &services, Data::from(tokens.clone()))
            })
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await
    .context("server terminated with an error")?;

    Ok(())
}
