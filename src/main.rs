use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;

mod api;
mod clock;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod repositories;
mod routes;
mod validation;

use clock::{Clock, SystemClock};
use config::Config;
use db::init_db;
use repositories::{AttendanceRepository, EmployeeRepository, StatsRepository};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn cors(origins: &[String]) -> Cors {
    let cors = if origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .pretty()
        .init();

    info!(environment = %config.environment, "Server starting...");

    let pool = init_db(&config.database_url).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let employees = EmployeeRepository::new(pool.clone());
    let attendance = AttendanceRepository::new(pool.clone());
    let stats = StatsRepository::new(pool, clock.clone());

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&config.cors_origins))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/api/docs/{_:.*}") // wildcard serves the UI's JS/CSS
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(employees.clone()))
            .app_data(Data::new(attendance.clone()))
            .app_data(Data::new(stats.clone()))
            .app_data(Data::from(clock.clone()))
            .app_data(Data::new(config.clone()))
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
