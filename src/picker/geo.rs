use std::fmt;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::random::RandomSource;

/// Latitude bound. The poles are left out so the pin stays on the visible map.
pub const LAT_LIMIT: f64 = 85.0;
pub const LNG_LIMIT: f64 = 180.0;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Zoom and animation length the map flies to after a draw.
pub const FOCUS_ZOOM: u8 = 4;
pub const FOCUS_DURATION_SECS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

pub fn generate_coordinate<R: RandomSource + ?Sized>(rng: &mut R) -> Coordinate {
    let lat = rng.uniform(-LAT_LIMIT, LAT_LIMIT);
    let lng = rng.uniform(-LNG_LIMIT, LNG_LIMIT);
    Coordinate { lat, lng }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "name", rename_all = "lowercase")]
pub enum PlaceLabel {
    Pending,
    Resolved(String),
    Unknown,
}

impl PlaceLabel {
    pub fn is_pending(&self) -> bool {
        matches!(self, PlaceLabel::Pending)
    }
}

impl fmt::Display for PlaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceLabel::Pending => f.write_str("loading location..."),
            PlaceLabel::Resolved(name) => f.write_str(name),
            PlaceLabel::Unknown => f.write_str(UNKNOWN_LOCATION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoAnnotation {
    pub coordinate: Coordinate,
    pub label: PlaceLabel,
}

impl GeoAnnotation {
    pub fn pending<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self {
            coordinate: generate_coordinate(rng),
            label: PlaceLabel::Pending,
        }
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoder answered with status {0}")]
    Status(u16),

    #[error("geocoder response has no place name")]
    MissingPlace,
}

/// Reverse geocoding: coordinate to a human readable place name.
pub trait Geocoder: Send + Sync {
    fn reverse_geocode(&self, at: Coordinate) -> BoxFuture<'_, Result<String, GeocodeError>>;
}

/// Never fails: any geocoder error becomes [`PlaceLabel::Unknown`].
pub async fn resolve_label(geocoder: &dyn Geocoder, at: Coordinate) -> PlaceLabel {
    match geocoder.reverse_geocode(at).await {
        Ok(name) if !name.trim().is_empty() => PlaceLabel::Resolved(name.trim().to_string()),
        Ok(_) => {
            warn!("Geocoder returned a blank name for {:?}", at);
            PlaceLabel::Unknown
        }
        Err(e) => {
            warn!("Could not resolve place for {:?}: {}", at, e);
            PlaceLabel::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::random::scripted::Scripted;
    use futures_util::FutureExt;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixed(Result<&'static str, ()>);

    impl Geocoder for Fixed {
        fn reverse_geocode(&self, _at: Coordinate) -> BoxFuture<'_, Result<String, GeocodeError>> {
            let answer = self.0.map(str::to_string).map_err(|_| GeocodeError::MissingPlace);
            async move { answer }.boxed()
        }
    }

    const ORIGIN: Coordinate = Coordinate { lat: 0.0, lng: 0.0 };

    #[test]
    fn coordinates_stay_within_bounds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..200 {
                let c = generate_coordinate(&mut rng);
                assert!((-LAT_LIMIT..=LAT_LIMIT).contains(&c.lat), "lat {}", c.lat);
                assert!((-LNG_LIMIT..=LNG_LIMIT).contains(&c.lng), "lng {}", c.lng);
            }
        }
    }

    #[test]
    fn range_edges_are_reachable() {
        let mut rng = Scripted::default();
        rng.fractions.extend([0.0, 1.0, 1.0, 0.0]);

        assert_eq!(generate_coordinate(&mut rng), Coordinate { lat: -85.0, lng: 180.0 });
        assert_eq!(generate_coordinate(&mut rng), Coordinate { lat: 85.0, lng: -180.0 });
    }

    #[test]
    fn new_annotation_is_pending() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(GeoAnnotation::pending(&mut rng).label.is_pending());
    }

    #[tokio::test]
    async fn resolved_name_is_kept() {
        let label = resolve_label(&Fixed(Ok(" Brazil ")), ORIGIN).await;
        assert_eq!(label, PlaceLabel::Resolved("Brazil".into()));
        assert_eq!(label.to_string(), "Brazil");
    }

    #[tokio::test]
    async fn failure_falls_back_to_unknown() {
        let label = resolve_label(&Fixed(Err(())), ORIGIN).await;
        assert_eq!(label, PlaceLabel::Unknown);
        assert_eq!(label.to_string(), UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn blank_name_falls_back_to_unknown() {
        let label = resolve_label(&Fixed(Ok("   ")), ORIGIN).await;
        assert_eq!(label, PlaceLabel::Unknown);
    }

    #[test]
    fn label_serializes_with_state_tag() {
        let pending = serde_json::to_value(PlaceLabel::Pending).unwrap();
        assert_eq!(pending, serde_json::json!({ "state": "pending" }));

        let resolved = serde_json::to_value(PlaceLabel::Resolved("Chad".into())).unwrap();
        assert_eq!(resolved, serde_json::json!({ "state": "resolved", "name": "Chad" }));
    }
}
