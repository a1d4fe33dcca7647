use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::picker::{Directive, DrawTicket, GameKind, Pick, PlaceLabel, SessionView};

/// One live game per user and game kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub owner_id: String,
    pub game: GameKind,
}

impl SessionKey {
    pub fn new(owner_id: impl Into<String>, game: GameKind) -> Self {
        Self {
            owner_id: owner_id.into(),
            game,
        }
    }
}

pub type SharedSessions = Arc<RwLock<HashMap<SessionKey, crate::picker::PickerSession>>>;

#[derive(Debug, Serialize)]
pub struct SessionStarted {
    pub session: SessionView,
    pub directives: Vec<Directive>,
}

/// Pushed to the owner's websocket connections.
#[derive(Debug, Clone)]
pub struct PickerEvent {
    pub owner_id: String,
    pub update: PickerUpdate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PickerUpdate {
    Picked {
        game: GameKind,
        pick: Pick,
    },
    LabelResolved {
        game: GameKind,
        ticket: DrawTicket,
        label: PlaceLabel,
    },
    Exhausted {
        game: GameKind,
        message: &'static str,
    },
    Reset {
        game: GameKind,
    },
}
