//! Lookup tickets and gateway resolution
//!
//! A ticket is the sequence-stamped description of one lookup. Resolving it
//! touches only the gateway, never the map state, so it can run while other
//! user actions are processed.

use crate::error::Result;
use crate::geo::{postal_code_digits, Coordinates, GeocodeGateway, GeocodeHit, ReverseHit};
use serde::Serialize;

/// How a search query is resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "code")]
pub enum SearchRoute {
    /// 8-digit postal code: resolve to an address, then geocode that
    PostalCode(String),
    /// Geocode the raw text
    FreeText,
}

impl SearchRoute {
    /// Pick the route for a query
    pub fn for_query(query: &str) -> Self {
        match postal_code_digits(query) {
            Some(digits) => Self::PostalCode(digits),
            None => Self::FreeText,
        }
    }
}

/// What a lookup asks for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum LookupRequest {
    Search { query: String, route: SearchRoute },
    Reverse { at: Coordinates },
}

/// Handle of one in-flight lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupTicket {
    pub(crate) seq: u64,
    pub request: LookupRequest,
}

impl LookupTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Raw gateway answer for a ticket
#[derive(Debug)]
pub enum LookupResponse {
    Search(Result<Vec<GeocodeHit>>),
    Reverse(Result<Option<ReverseHit>>),
}

/// Run the network part of a lookup
pub async fn resolve<G: GeocodeGateway>(gateway: &G, ticket: &LookupTicket) -> LookupResponse {
    match &ticket.request {
        LookupRequest::Search { query, route } => {
            LookupResponse::Search(search(gateway, query, route).await)
        }
        LookupRequest::Reverse { at } => {
            LookupResponse::Reverse(gateway.reverse_geocode(at.lat, at.lng).await)
        }
    }
}

async fn search<G: GeocodeGateway>(gateway: &G, query: &str, route: &SearchRoute) -> Result<Vec<GeocodeHit>> {
    match route {
        SearchRoute::PostalCode(digits) => {
            let address = gateway.resolve_postal_code(digits).await?;
            gateway.forward_geocode(&address.compose()).await
        }
        SearchRoute::FreeText => gateway.forward_geocode(query.trim()).await,
    }
}
