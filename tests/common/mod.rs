#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use futures_util::{FutureExt, future::BoxFuture};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use team_picker::{
    app_with_events,
    config::Config,
    db,
    dto::picker_dto::PickerEvent,
    picker::{Coordinate, GeocodeError, Geocoder},
};
use tokio::sync::broadcast;
use tower::ServiceExt;

/// Geocoder double: `Some(name)` answers with it, `None` fails every lookup.
pub struct FakeGeocoder(pub Option<&'static str>);

impl Geocoder for FakeGeocoder {
    fn reverse_geocode(&self, _at: Coordinate) -> BoxFuture<'_, Result<String, GeocodeError>> {
        let answer = self.0.map(str::to_string).ok_or(GeocodeError::MissingPlace);
        async move { answer }.boxed()
    }
}

pub async fn test_app(geocoder: impl Geocoder + 'static) -> Router {
    let (tx, _rx) = broadcast::channel(16);
    test_app_with_events(geocoder, tx).await
}

pub async fn test_app_with_events(
    geocoder: impl Geocoder + 'static,
    tx: broadcast::Sender<PickerEvent>,
) -> Router {
    let pool = db::connect_in_memory().await.expect("in-memory sqlite");
    let config = Config {
        bcrypt_cost: 4,
        ..Config::default()
    };
    app_with_events(pool, Arc::new(config), Arc::new(geocoder), tx)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let req = match body {
        Some(body) => req
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Registers and logs in, returning a bearer token.
pub async fn sign_up(app: &Router, email: &str) -> String {
    register(app, email).await.1
}

/// Registers and logs in, returning the new user id and a bearer token.
pub async fn register(app: &Router, email: &str) -> (String, String) {
    let (status, profile) = send(
        app,
        "POST",
        "/register",
        None,
        Some(json!({ "email": email, "username": email.split('@').next().unwrap(), "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        profile["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

pub async fn add_member(app: &Router, token: &str, name: &str, status: &str) -> Value {
    let (code, body) = send(
        app,
        "POST",
        "/team",
        Some(token),
        Some(json!({ "name": name, "status": status })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    body
}
