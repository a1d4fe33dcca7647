use std::sync::Arc;

use team_picker::{app, config::Config, db, picker::Geocoder, services::geocoder::NominatimGeocoder};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().expect("Environment misconfigured");

    let pool = db::connect(&config.database_url)
        .await
        .expect("Could not connect to SQLite");

    let geocoder: Arc<dyn Geocoder> =
        Arc::new(NominatimGeocoder::from_config(&config).expect("Could not build geocoding client"));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Could not bind listener");
    info!("Started server on {}.", config.bind_addr);

    axum::serve(listener, app(pool, Arc::new(config), geocoder))
        .await
        .expect("Server stopped unexpectedly");
}
