mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{FakeGeocoder, add_member, register, send, test_app_with_events};
use serde_json::{Value, json};
use team_picker::dto::picker_dto::PickerEvent;
use team_picker::services::websocket::frame_for;
use tokio::sync::broadcast;
use tower::ServiceExt;

/// Everything published until the channel stays quiet for a moment.
async fn drain(rx: &mut broadcast::Receiver<PickerEvent>) -> Vec<PickerEvent> {
    let mut events = Vec::new();
    while let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
        events.push(event);
    }
    events
}

/// The label lands asynchronously; a reset before then would drop it.
async fn wait_for_label(app: &axum::Router, token: &str) {
    for _ in 0..100 {
        let (_, session) = send(app, "GET", "/games/map/session", Some(token), None).await;
        if session["picked"][0]["annotation"]["label"]["state"] != "pending" {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("place label never resolved");
}

fn frames(events: &[PickerEvent], owner_id: &str) -> Vec<Value> {
    events
        .iter()
        .filter_map(|event| frame_for(event, owner_id))
        .map(|json| serde_json::from_str(&json).unwrap())
        .collect()
}

fn of_type<'a>(frames: &'a [Value], kind: &str) -> &'a Value {
    frames
        .iter()
        .find(|f| f["type"] == kind)
        .unwrap_or_else(|| panic!("no {kind} frame in {frames:?}"))
}

#[tokio::test]
async fn each_owner_only_sees_their_own_game() {
    let (tx, mut rx) = broadcast::channel(64);
    let app = test_app_with_events(FakeGeocoder(Some("Atlantis")), tx).await;
    let (ada_id, ada) = register(&app, "ada@example.com").await;
    let (bob_id, bob) = register(&app, "bob@example.com").await;
    add_member(&app, &ada, "Anna", "active").await;
    add_member(&app, &bob, "Boris", "active").await;

    send(&app, "POST", "/games/map/session", Some(&ada), None).await;
    let (_, first) = send(&app, "POST", "/games/map/draw", Some(&ada), None).await;
    wait_for_label(&app, &ada).await;
    send(&app, "POST", "/games/map/draw", Some(&ada), None).await;
    send(&app, "POST", "/games/map/reset", Some(&ada), None).await;

    send(&app, "POST", "/games/emoji/session", Some(&bob), None).await;
    send(&app, "POST", "/games/emoji/draw", Some(&bob), None).await;

    let events = drain(&mut rx).await;

    let ada_frames = frames(&events, &ada_id);
    let mut kinds: Vec<&str> = ada_frames.iter().map(|f| f["type"].as_str().unwrap()).collect();
    kinds.sort();
    assert_eq!(kinds, ["exhausted", "label_resolved", "picked", "reset"]);
    assert!(ada_frames.iter().all(|f| f["game"] == "map"));
    assert!(!ada_frames.iter().any(|f| f.to_string().contains("Boris")));

    let picked = of_type(&ada_frames, "picked");
    assert_eq!(picked["pick"]["member"]["name"], "Anna");
    assert_eq!(picked["pick"]["ticket"], first["pick"]["ticket"]);

    let label = of_type(&ada_frames, "label_resolved");
    assert_eq!(label["ticket"], first["pick"]["ticket"]);
    assert_eq!(label["label"], json!({ "state": "resolved", "name": "Atlantis" }));

    let exhausted = of_type(&ada_frames, "exhausted");
    assert_eq!(exhausted["message"], "All team members have been picked!");

    let bob_frames = frames(&events, &bob_id);
    assert_eq!(bob_frames.len(), 1);
    assert_eq!(bob_frames[0]["type"], "picked");
    assert_eq!(bob_frames[0]["game"], "emoji");
    assert_eq!(bob_frames[0]["pick"]["member"]["name"], "Boris");

    assert!(frames(&events, "someone-else").is_empty());
}

async fn open_stream(app: &axum::Router, uri: &str) -> StatusCode {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .header("Connection", "upgrade")
        .header("Upgrade", "websocket")
        .header("Sec-WebSocket-Version", "13")
        .header("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap().status()
}

#[tokio::test]
async fn event_stream_takes_its_token_from_the_query() {
    let (tx, _rx) = broadcast::channel(4);
    let app = test_app_with_events(FakeGeocoder(None), tx).await;
    let (_, token) = register(&app, "ada@example.com").await;

    assert_eq!(open_stream(&app, "/ws").await, StatusCode::UNAUTHORIZED);
    assert_eq!(open_stream(&app, "/ws?token=forged").await, StatusCode::UNAUTHORIZED);

    // past authentication; the in-process request just cannot be upgraded
    let status = open_stream(&app, &format!("/ws?token={token}")).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
}
