use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::directive::{ALL_PICKED, Directive, DisableReason};
use super::emoji::{self, EmojiAnnotation};
use super::geo::{FOCUS_DURATION_SECS, FOCUS_ZOOM, GeoAnnotation, PlaceLabel};
use super::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Map,
    Emoji,
}

/// An eligible team member as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GameAnnotation {
    Geo(GeoAnnotation),
    Emoji(EmojiAnnotation),
}

impl GameKind {
    fn annotate<R: RandomSource + ?Sized>(self, rng: &mut R) -> GameAnnotation {
        match self {
            GameKind::Map => GameAnnotation::Geo(GeoAnnotation::pending(rng)),
            GameKind::Emoji => GameAnnotation::Emoji(emoji::generate_prompt(rng)),
        }
    }
}

/// Identifies one draw within a session. Tickets keep increasing across
/// resets so a late label can never land on a newer pick of the same member.
/// A replaced session starts over, so callers pair a ticket with
/// [`PickerSession::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub ticket: DrawTicket,
    pub member: Candidate,
    pub annotation: GameAnnotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DrawOutcome {
    Picked {
        pick: Pick,
        picked_count: usize,
        pool_size: usize,
        directives: Vec<Directive>,
    },
    Exhausted {
        message: &'static str,
        directives: Vec<Directive>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickerError {
    #[error("No active team members to pick from")]
    EmptyPool,
}

/// Owned snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub game: GameKind,
    pub pool: Vec<Candidate>,
    pub picked: Vec<Pick>,
    pub current_pick: Option<Pick>,
    pub can_draw: bool,
}

/// One run of a picker game: a frozen pool and the draws made from it.
#[derive(Debug, Clone)]
pub struct PickerSession {
    id: Uuid,
    game: GameKind,
    pool: Vec<Candidate>,
    picked: Vec<Pick>,
    current: Option<usize>,
    next_ticket: u64,
}

impl PickerSession {
    /// Duplicate ids in `pool` are dropped, first occurrence wins.
    pub fn new(game: GameKind, pool: Vec<Candidate>) -> Self {
        let mut seen = HashSet::new();
        let pool = pool
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect();

        Self {
            id: Uuid::new_v4(),
            game,
            pool,
            picked: Vec::new(),
            current: None,
            next_ticket: 1,
        }
    }

    /// Distinct for every session ever started, restarts included.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn pool(&self) -> &[Candidate] {
        &self.pool
    }

    pub fn picked(&self) -> &[Pick] {
        &self.picked
    }

    pub fn current_pick(&self) -> Option<&Pick> {
        self.current.map(|i| &self.picked[i])
    }

    pub fn remaining(&self) -> usize {
        self.pool.len() - self.picked.len()
    }

    pub fn can_draw(&self) -> bool {
        self.remaining() > 0
    }

    /// Directives for a freshly started session.
    pub fn start_directives(&self) -> Vec<Directive> {
        if self.pool.is_empty() {
            vec![Directive::DisableDraw {
                reason: DisableReason::EmptyPool,
            }]
        } else {
            Vec::new()
        }
    }

    pub fn draw<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<DrawOutcome, PickerError> {
        if self.pool.is_empty() {
            return Err(PickerError::EmptyPool);
        }

        let taken: HashSet<&str> = self.picked.iter().map(|p| p.member.id.as_str()).collect();
        let available: Vec<&Candidate> = self
            .pool
            .iter()
            .filter(|c| !taken.contains(c.id.as_str()))
            .collect();

        if available.is_empty() {
            self.current = None;
            return Ok(DrawOutcome::Exhausted {
                message: ALL_PICKED,
                directives: vec![
                    Directive::Notice { message: ALL_PICKED },
                    Directive::DisableDraw {
                        reason: DisableReason::Exhausted,
                    },
                ],
            });
        }

        let member = available[rng.index(available.len())].clone();
        let annotation = self.game.annotate(rng);

        let ticket = DrawTicket(self.next_ticket);
        self.next_ticket += 1;

        let mut directives = vec![Directive::RenderCurrentPick, Directive::RenderHistory];
        if let GameAnnotation::Geo(geo) = &annotation {
            directives.push(Directive::CenterViewport {
                coordinate: geo.coordinate,
                zoom: FOCUS_ZOOM,
                duration_secs: FOCUS_DURATION_SECS,
            });
        }

        let pick = Pick {
            ticket,
            member,
            annotation,
        };
        self.picked.push(pick.clone());
        self.current = Some(self.picked.len() - 1);

        Ok(DrawOutcome::Picked {
            pick,
            picked_count: self.picked.len(),
            pool_size: self.pool.len(),
            directives,
        })
    }

    /// Forget every draw. The pool is kept as is.
    pub fn reset(&mut self) {
        self.picked.clear();
        self.current = None;
    }

    /// Store a resolved place label on the pick holding `ticket`.
    /// Returns false when that pick is gone or is not a map pick.
    pub fn apply_label(&mut self, ticket: DrawTicket, label: PlaceLabel) -> bool {
        let Some(pick) = self.picked.iter_mut().find(|p| p.ticket == ticket) else {
            return false;
        };

        match &mut pick.annotation {
            GameAnnotation::Geo(geo) => {
                geo.label = label;
                true
            }
            GameAnnotation::Emoji(_) => false,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            game: self.game,
            pool: self.pool.clone(),
            picked: self.picked.clone(),
            current_pick: self.current_pick().cloned(),
            can_draw: self.can_draw(),
        }
    }
}
