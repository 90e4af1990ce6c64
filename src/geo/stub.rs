//! Scripted in-memory gateway
//!
//! Answers from canned responses and records every call, so routing and
//! supersede behavior can be exercised without a network.

use crate::error::{Error, Result};
use crate::geo::{postal_code_digits, GeocodeGateway, GeocodeHit, PostalAddress, ReverseHit};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A gateway method invocation
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Forward(String),
    Reverse(f64, f64),
    PostalCode(String),
}

#[derive(Debug, Clone)]
enum Scripted<T> {
    Ok(T),
    NetworkDown,
}

/// Canned-response gateway
#[derive(Debug, Default)]
pub struct StubGateway {
    forward: HashMap<String, Scripted<Vec<GeocodeHit>>>,
    reverse: Vec<((f64, f64), Scripted<Option<ReverseHit>>)>,
    postal: HashMap<String, PostalAddress>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer forward geocoding of `query` with `hits`
    pub fn with_forward(mut self, query: impl Into<String>, hits: Vec<GeocodeHit>) -> Self {
        self.forward.insert(query.into(), Scripted::Ok(hits));
        self
    }

    /// Fail forward geocoding of `query` with a network error
    pub fn with_forward_failure(mut self, query: impl Into<String>) -> Self {
        self.forward.insert(query.into(), Scripted::NetworkDown);
        self
    }

    /// Answer reverse geocoding at exactly `(lat, lng)`
    pub fn with_reverse(mut self, lat: f64, lng: f64, hit: Option<ReverseHit>) -> Self {
        self.reverse.push(((lat, lng), Scripted::Ok(hit)));
        self
    }

    /// Fail reverse geocoding at `(lat, lng)` with a network error
    pub fn with_reverse_failure(mut self, lat: f64, lng: f64) -> Self {
        self.reverse.push(((lat, lng), Scripted::NetworkDown));
        self
    }

    /// Register a known postal code (digits only)
    pub fn with_postal_code(mut self, digits: impl Into<String>, address: PostalAddress) -> Self {
        self.postal.insert(digits.into(), address);
        self
    }

    /// Delay the forward answer for `query`
    pub fn with_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(query.into(), delay);
        self
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: GatewayCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl GeocodeGateway for StubGateway {
    async fn forward_geocode(&self, text: &str) -> Result<Vec<GeocodeHit>> {
        self.record(GatewayCall::Forward(text.to_string()));
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        match self.forward.get(text) {
            Some(Scripted::Ok(hits)) => Ok(hits.clone()),
            Some(Scripted::NetworkDown) => Err(Error::Network("stub network down".into())),
            None => Ok(Vec::new()),
        }
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<ReverseHit>> {
        self.record(GatewayCall::Reverse(lat, lng));
        match self.reverse.iter().find(|(at, _)| *at == (lat, lng)) {
            Some((_, Scripted::Ok(hit))) => Ok(hit.clone()),
            Some((_, Scripted::NetworkDown)) => Err(Error::Network("stub network down".into())),
            None => Ok(None),
        }
    }

    async fn resolve_postal_code(&self, code: &str) -> Result<PostalAddress> {
        self.record(GatewayCall::PostalCode(code.to_string()));
        let digits = postal_code_digits(code)
            .ok_or_else(|| Error::Validation(format!("Invalid postal code: {}", code)))?;
        self.postal
            .get(&digits)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Postal code {} not found", digits)))
    }
}
