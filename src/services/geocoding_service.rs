//! Place name to coordinates lookup against a Nominatim-compatible
//! `/search` endpoint.
//!
//! Nominatim is rate limited and occasionally slow, so transient failures
//! (timeouts, dropped connections, 429 and 5xx) are retried a fixed number of
//! times with a fixed delay. An empty result is an answer, not a failure.

use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::config::GeocoderConfig;
use crate::error::{PlannerError, Result};
use crate::models::trip::Coordinates;

const SERVICE: &str = "geocoder";

#[serde_as]
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde_as(as = "DisplayFromStr")]
    lat: f64,
    #[serde_as(as = "DisplayFromStr")]
    lon: f64,
}

pub struct GeocodingService {
    http_client: Client,
    config: GeocoderConfig,
}

impl GeocodingService {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PlannerError::Config(format!("failed to build geocoder client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns `Ok(None)` when the place is unknown.
    pub async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        let attempts = self.config.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match self.search(place).await {
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(
                        "Geocoding '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                        place, attempt, attempts, e, self.config.retry_delay
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn search(&self, place: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.config.base_url);
        debug!("Geocoding '{}'", place);

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PlannerError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::from_status(SERVICE, status, &body));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| PlannerError::from_reqwest(SERVICE, e))?;

        Ok(places.into_iter().next().map(|p| Coordinates {
            latitude: p.lat,
            longitude: p.lon,
        }))
    }
}
