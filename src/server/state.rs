//! Server shared state
//!
//! One map session shared by every request, plus the gateway and the
//! notification board the frontend polls.

use crate::config::Config;
use crate::geo::GeocodeGateway;
use crate::notify::LoggedBoard;
use crate::session::MapSession;
use crate::store::backend::RecordStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state for the HTTP server
///
/// The session lock is only held for the synchronous phases of a request;
/// gateway calls run unlocked so other requests are served meanwhile.
pub struct AppState<G> {
    pub session: Mutex<MapSession>,
    pub gateway: G,
    pub board: Arc<LoggedBoard>,
}

impl<G: GeocodeGateway> AppState<G> {
    /// Create new application state
    pub fn new(config: &Config, gateway: G, storage: Box<dyn RecordStorage>) -> Self {
        let board = Arc::new(LoggedBoard::default());
        let session = MapSession::open(storage, config, board.clone());
        Self {
            session: Mutex::new(session),
            gateway,
            board,
        }
    }
}
