use axum::{
    extract::{
        Extension,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::dto::picker_dto::{PickerEvent, PickerUpdate};
use crate::services::auth_user::AuthUser;

/// Fire and forget: having no listeners is normal.
pub fn publish(tx: &broadcast::Sender<PickerEvent>, owner_id: &str, update: PickerUpdate) {
    let _ = tx.send(PickerEvent {
        owner_id: owner_id.to_string(),
        update,
    });
}

/// The text frame `owner_id`'s socket gets for `event`, or `None` when the
/// event belongs to someone else.
pub fn frame_for(event: &PickerEvent, owner_id: &str) -> Option<String> {
    if event.owner_id != owner_id {
        return None;
    }

    match serde_json::to_string(&event.update) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize picker update: {}", e);
            None
        }
    }
}

pub async fn websocket_handler(
    AuthUser(claims): AuthUser,
    Extension(tx): Extension<broadcast::Sender<PickerEvent>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    info!("Opening picker event stream for {}", claims.sub);
    ws.on_upgrade(move |socket| handle_socket(socket, claims.sub, tx))
}

async fn handle_socket(socket: WebSocket, owner_id: String, tx: broadcast::Sender<PickerEvent>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = tx.subscribe();

    // Task to send this owner's events to the client
    let send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event stream for {} lagged by {} events", owner_id, skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let Some(json) = frame_for(&event, &owner_id) else {
                continue;
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // The stream is push only; drain until the client goes away
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    send_task.abort();
}
