//! HTTP geocode gateway
//!
//! Combines Nominatim (forward/reverse) and BrasilAPI (postal codes) behind
//! [`GeocodeGateway`], retrying transient network failures.

use crate::config::GeocoderConfig;
use crate::error::Result;
use crate::geo::brasil_api::BrasilApiClient;
use crate::geo::nominatim::NominatimClient;
use crate::geo::{GeocodeGateway, GeocodeHit, PostalAddress, ReverseHit};
use std::future::Future;
use tracing::{debug, warn};

/// Live gateway backed by public HTTP services
#[derive(Debug, Clone)]
pub struct HttpGateway {
    nominatim: NominatimClient,
    postal: BrasilApiClient,
    retries: u32,
}

impl HttpGateway {
    /// Build a gateway from the geocoder configuration
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            nominatim: NominatimClient::new(client.clone(), config.nominatim_url.as_str()),
            postal: BrasilApiClient::new(client, config.postal_url.as_str()),
            retries: config.retries,
        })
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!("{} failed ({}), retry {}/{}", what, e, attempt, self.retries);
                }
                other => return other,
            }
        }
    }
}

impl GeocodeGateway for HttpGateway {
    async fn forward_geocode(&self, text: &str) -> Result<Vec<GeocodeHit>> {
        debug!("Forward geocoding {:?}", text);
        self.with_retry("forward geocode", || self.nominatim.search(text))
            .await
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<ReverseHit>> {
        debug!("Reverse geocoding ({}, {})", lat, lng);
        self.with_retry("reverse geocode", || self.nominatim.reverse(lat, lng))
            .await
    }

    async fn resolve_postal_code(&self, code: &str) -> Result<PostalAddress> {
        debug!("Resolving postal code {:?}", code);
        self.with_retry("postal code lookup", || self.postal.lookup(code))
            .await
    }
}
