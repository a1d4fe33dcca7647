use futures_util::{FutureExt, future::BoxFuture};
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;
use crate::picker::{Coordinate, GeocodeError, Geocoder};

/// Country-level reverse geocoding against a Nominatim endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.geocoder_user_agent.clone())
            .timeout(config.geocoder_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.geocoder_url.clone(),
        })
    }

    async fn lookup(&self, at: Coordinate) -> Result<String, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", at.lat.to_string()),
                ("lon", at.lng.to_string()),
                ("zoom", "3".to_string()),
            ])
            .header("Accept-Language", "en")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        country_from_response(&body).ok_or(GeocodeError::MissingPlace)
    }
}

impl Geocoder for NominatimGeocoder {
    fn reverse_geocode(&self, at: Coordinate) -> BoxFuture<'_, Result<String, GeocodeError>> {
        self.lookup(at).boxed()
    }
}

/// Oceans come back as `{"error": "Unable to geocode"}` and have no address.
pub fn country_from_response(body: &Value) -> Option<String> {
    body.get("address")
        .and_then(|address| address.get("country"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|country| !country.is_empty())
        .map(str::to_string)
}
