//! Randomized picker shared by the map and emoji games.

pub mod directive;
pub mod emoji;
pub mod geo;
pub mod random;
pub mod session;

pub use directive::{Directive, DisableReason};
pub use geo::{Coordinate, GeocodeError, Geocoder, PlaceLabel};
pub use random::RandomSource;
pub use session::{Candidate, DrawOutcome, DrawTicket, GameAnnotation, GameKind, Pick, PickerError, PickerSession, SessionView};
