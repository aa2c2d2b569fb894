mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use mockable::DefaultClock;
use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::postgres::{create_pool, PgStore};
use crate::state::AppState;
use crate::utils::geocode::NominatimGeocoder;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|err| startup_error("Invalid configuration", err))?;

    let pool = create_pool(&config.database_url)
        .await
        .map_err(|err| startup_error("Failed to connect to the database", err))?;

    let geocoder = NominatimGeocoder::new(config.geocoder_url.clone())
        .map_err(|err| startup_error("Failed to build geocoding client", err))?;

    let state = web::Data::new(AppState {
        store: Arc::new(PgStore::new(pool)),
        clock: Arc::new(DefaultClock),
        geocoder: Arc::new(geocoder),
        timezone: config.timezone,
        jwt_secret: config.jwt_secret.clone(),
        location_fallback: config.geocoder_fallback.clone(),
    });

    info!(
        "Starting server at {} (timezone {})",
        config.bind_addr,
        config.timezone.name()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
