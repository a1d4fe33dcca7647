use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::Extension,
    routing::{delete, get, patch, post},
};
use sqlx::SqlitePool;
use tokio::sync::{RwLock, broadcast};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod db;
pub mod error;
pub mod picker;

pub mod dto {
    pub mod claims_dto;
    pub mod picker_dto;
    pub mod team_dto;
    pub mod user_dto;
}

pub mod services {
    pub mod auth_user;
    pub mod geocoder;
    pub mod roster;
    pub mod websocket;
}

pub mod routes {
    pub mod games;
    pub mod team;
    pub mod users;
}

use config::Config;
use dto::picker_dto::{PickerEvent, SharedSessions};
use picker::Geocoder;
use routes::{games, team, users};
use services::websocket::websocket_handler;

/// Buffered picker events per broadcast channel.
const EVENT_CAPACITY: usize = 100;

pub fn app(pool: SqlitePool, config: Arc<Config>, geocoder: Arc<dyn Geocoder>) -> Router {
    let (tx, _rx) = broadcast::channel::<PickerEvent>(EVENT_CAPACITY);
    app_with_events(pool, config, geocoder, tx)
}

/// Same router, publishing picker events on a caller-owned channel.
pub fn app_with_events(
    pool: SqlitePool,
    config: Arc<Config>,
    geocoder: Arc<dyn Geocoder>,
    tx: broadcast::Sender<PickerEvent>,
) -> Router {
    let sessions: SharedSessions = Arc::new(RwLock::new(HashMap::new()));

    Router::new()
        .route("/register", post(users::create_user))
        .route("/login", post(users::login_user))
        .route("/users/me", delete(users::remove_user))
        .route("/team", get(team::get_members).post(team::create_member))
        .route("/team/delete-all", delete(team::delete_all_members))
        .route("/team/{id}", patch(team::update_status).delete(team::delete_member))
        .route(
            "/games/{game}/session",
            post(games::start_session).get(games::get_session).delete(games::end_session),
        )
        .route("/games/{game}/draw", post(games::draw))
        .route("/games/{game}/reset", post(games::reset))
        .route("/ws", get(websocket_handler))
        .layer(Extension(pool))
        .layer(Extension(config))
        .layer(Extension(geocoder))
        .layer(Extension(sessions))
        .layer(Extension(tx))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
