use serde::Serialize;

use super::geo::Coordinate;

pub const ALL_PICKED: &str = "All team members have been picked!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisableReason {
    EmptyPool,
    Exhausted,
}

/// Instructions for the presentation layer. The engine emits them, it never
/// performs them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    RenderCurrentPick,
    RenderHistory,
    CenterViewport {
        coordinate: Coordinate,
        zoom: u8,
        duration_secs: u8,
    },
    DisableDraw {
        reason: DisableReason,
    },
    Notice {
        message: &'static str,
    },
}
