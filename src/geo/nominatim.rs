//! Nominatim geocoding client (OpenStreetMap)
//!
//! Uses the free Nominatim API for forward and reverse geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::error::{Error, Result};
use crate::geo::{GeocodeHit, ReverseHit};
use serde::Deserialize;

/// Nominatim geocoding client
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim reverse response; failures come back as 200 with `error` set
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    hit: ReverseHit,
}

impl NominatimClient {
    /// Create a new client against `base_url`
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    fn reverse_url(&self, lat: f64, lng: f64) -> String {
        format!("{}/reverse?lat={}&lon={}&format=json", self.base_url, lat, lng)
    }

    /// Forward geocode, best match first
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeHit>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))
    }

    /// Reverse geocode; None when Nominatim has nothing at that point
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<ReverseHit>> {
        let response = self
            .client
            .get(self.reverse_url(lat, lng))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Network(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: NominatimReverse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))?;

        Ok(Self::into_hit(result))
    }

    fn into_hit(result: NominatimReverse) -> Option<ReverseHit> {
        if result.error.is_some() {
            return None;
        }
        Some(result.hit)
    }
}
