//! Search orchestration
//!
//! Drives one lookup at a time: free-text or postal code searches, and the
//! reverse lookup behind a map click. Each lookup runs in three phases:
//!
//! 1. `begin_*` stamps a [`LookupTicket`] with the next sequence number,
//!    applies any immediate state change and posts "searching".
//! 2. [`resolve`] talks to the gateway without touching map state.
//! 3. [`SearchOrchestrator::complete`] applies the response, but only when
//!    the ticket is still the latest one. Late answers to superseded
//!    lookups are dropped.
//!
//! All lookup feedback shares one correlation id, so each phase replaces
//! the previous toast. A rejected blank query posts under its own id.

pub mod ticket;

use crate::constants::notify::{LOADING_NAME, LOOKUP_ERROR_NAME, LOOKUP_ID, QUERY_INPUT_ID, UNKNOWN_PLACE_NAME};
use crate::error::Error;
use crate::geo::{Coordinates, GeocodeHit, ReverseHit};
use crate::notify::{Notification, NotificationSink, Severity};
use crate::state::{MapState, SelectionCandidate};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use ticket::{resolve, LookupRequest, LookupResponse, LookupTicket, SearchRoute};

const MSG_SEARCHING: &str = "Searching...";
const MSG_FOUND: &str = "Place found!";
const MSG_NOT_FOUND: &str = "Place not found.";
const MSG_BLANK_QUERY: &str = "Type an address to search.";
const MSG_BAD_POSTAL_CODE: &str = "Postal code not found or invalid.";

/// Lifecycle of the latest lookup
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum LookupPhase {
    #[default]
    Idle,
    Pending { request: LookupRequest },
    Resolved { request: LookupRequest },
    Failed { request: LookupRequest, class: String },
}

/// What a completed lookup amounted to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum LookupResult {
    Found { at: Coordinates, name: String },
    NotFound,
    Failed { class: String, message: String },
    /// The candidate left the clicked point before its name arrived
    Abandoned,
}

/// Outcome of [`SearchOrchestrator::complete`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Completion {
    Applied { result: LookupResult },
    /// A newer lookup was started; nothing was changed
    Stale,
}

/// Last-submitted-wins lookup coordinator
#[derive(Debug, Default)]
pub struct SearchOrchestrator {
    latest: u64,
    phase: LookupPhase,
}

impl SearchOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &LookupPhase {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, LookupPhase::Pending { .. })
    }

    /// Whether `ticket` is the most recently issued one
    pub fn is_latest(&self, ticket: &LookupTicket) -> bool {
        ticket.seq == self.latest
    }

    fn issue(&mut self, request: LookupRequest) -> LookupTicket {
        self.latest += 1;
        self.phase = LookupPhase::Pending {
            request: request.clone(),
        };
        LookupTicket {
            seq: self.latest,
            request,
        }
    }

    /// Start a text search
    ///
    /// Returns None for a blank query, after posting a warning under its own
    /// id; state is left alone and any pending lookup keeps its toast.
    pub fn begin_search(&mut self, sink: &dyn NotificationSink, query: &str) -> Option<LookupTicket> {
        let query = query.trim();
        if query.is_empty() {
            sink.notify(Notification::new(Severity::Warning, MSG_BLANK_QUERY, QUERY_INPUT_ID));
            return None;
        }

        let route = SearchRoute::for_query(query);
        let ticket = self.issue(LookupRequest::Search {
            query: query.to_string(),
            route,
        });
        info!("Lookup #{} search {:?}", ticket.seq, query);
        sink.notify(Notification::new(Severity::Info, MSG_SEARCHING, LOOKUP_ID));
        Some(ticket)
    }

    /// Start the lookup behind a map click
    ///
    /// The candidate is placed at `at` with a loading name before this
    /// returns; the reverse lookup only fills in the name.
    pub fn begin_reverse(&mut self, state: &mut MapState, sink: &dyn NotificationSink, at: Coordinates) -> LookupTicket {
        state.selection.select(SelectionCandidate::new(at, LOADING_NAME));
        state.camera.pan_to(at);

        let ticket = self.issue(LookupRequest::Reverse { at });
        info!("Lookup #{} reverse ({}, {})", ticket.seq, at.lat, at.lng);
        sink.notify(Notification::new(Severity::Info, MSG_SEARCHING, LOOKUP_ID));
        ticket
    }

    /// Invalidate any in-flight lookup without starting a new one
    ///
    /// Used when the selection is changed directly (favorite focus,
    /// dismissal) so a late answer cannot overwrite it.
    pub fn supersede(&mut self, sink: &dyn NotificationSink) {
        self.latest += 1;
        if self.is_pending() {
            sink.dismiss(LOOKUP_ID);
        }
        self.phase = LookupPhase::Idle;
    }

    /// Apply a gateway response, if its ticket is still current
    pub fn complete(
        &mut self,
        state: &mut MapState,
        sink: &dyn NotificationSink,
        ticket: &LookupTicket,
        response: LookupResponse,
    ) -> Completion {
        if !self.is_latest(ticket) {
            debug!("Lookup #{} superseded by #{}, dropping response", ticket.seq, self.latest);
            return Completion::Stale;
        }

        let result = match (&ticket.request, response) {
            (LookupRequest::Search { route, .. }, LookupResponse::Search(hits)) => {
                apply_search(state, route, hits)
            }
            (LookupRequest::Reverse { at }, LookupResponse::Reverse(hit)) => {
                apply_reverse(state, *at, hit)
            }
            _ => {
                warn!("Lookup #{} got a response of the wrong kind", ticket.seq);
                LookupResult::Failed {
                    class: "unreadable response".to_string(),
                    message: "Error while searching for the place.".to_string(),
                }
            }
        };

        let request = ticket.request.clone();
        let notification = match &result {
            LookupResult::Found { .. } => {
                self.phase = LookupPhase::Resolved { request };
                Some(Notification::new(Severity::Success, MSG_FOUND, LOOKUP_ID))
            }
            LookupResult::NotFound => {
                self.phase = LookupPhase::Resolved { request };
                Some(Notification::new(Severity::Warning, MSG_NOT_FOUND, LOOKUP_ID))
            }
            LookupResult::Failed { class, message } => {
                self.phase = LookupPhase::Failed {
                    request,
                    class: class.clone(),
                };
                Some(Notification::new(Severity::Error, message.as_str(), LOOKUP_ID))
            }
            LookupResult::Abandoned => {
                debug!("Lookup #{} answered for a point no longer selected", ticket.seq);
                self.phase = LookupPhase::Idle;
                None
            }
        };
        match notification {
            Some(n) => sink.notify(n),
            None => sink.dismiss(LOOKUP_ID),
        }

        Completion::Applied { result }
    }
}

fn apply_search(state: &mut MapState, route: &SearchRoute, hits: crate::error::Result<Vec<GeocodeHit>>) -> LookupResult {
    let best = match hits {
        Ok(hits) => match hits.into_iter().next() {
            Some(hit) => hit,
            None => return LookupResult::NotFound,
        },
        Err(e) => return failure(route, &e),
    };

    let at = match best.coordinates() {
        Ok(at) => at,
        Err(e) => return failure(route, &e),
    };

    // Selection and camera move together or not at all.
    state
        .selection
        .select(SelectionCandidate::new(at, best.display_name.clone()));
    state.camera.center_on(at);

    LookupResult::Found {
        at,
        name: best.display_name,
    }
}

fn apply_reverse(state: &mut MapState, at: Coordinates, hit: crate::error::Result<Option<ReverseHit>>) -> LookupResult {
    let still_here = state
        .selection
        .current()
        .is_some_and(|c| c.coordinates() == at);
    if !still_here {
        return LookupResult::Abandoned;
    }

    let (name, result) = match hit {
        Ok(Some(hit)) => match hit.label() {
            Some(label) => (
                label.to_string(),
                LookupResult::Found {
                    at,
                    name: label.to_string(),
                },
            ),
            None => (UNKNOWN_PLACE_NAME.to_string(), LookupResult::NotFound),
        },
        Ok(None) => (UNKNOWN_PLACE_NAME.to_string(), LookupResult::NotFound),
        Err(e) => (LOOKUP_ERROR_NAME.to_string(), failure(&SearchRoute::FreeText, &e)),
    };

    state.selection.rename(name);
    result
}

fn failure(route: &SearchRoute, error: &Error) -> LookupResult {
    warn!("Lookup failed: {}", error);
    let message = match (route, error) {
        (SearchRoute::PostalCode(_), Error::NotFound(_) | Error::Validation(_)) => {
            MSG_BAD_POSTAL_CODE.to_string()
        }
        _ => format!("Error while searching for the place ({}).", error.class()),
    };
    LookupResult::Failed {
        class: error.class().to_string(),
        message,
    }
}
