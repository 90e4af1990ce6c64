//! Map session
//!
//! Bundles the map state, the lookup orchestrator and a notification sink
//! behind the user-level operations: search, click, save, remove, focus and
//! dismiss. The CLI drives one session per command; the HTTP server shares
//! one session behind a lock.

use crate::category::Category;
use crate::config::Config;
use crate::constants::notify::FAVORITES_ID;
use crate::error::{Error, Result};
use crate::geo::{Coordinates, GeocodeGateway};
use crate::markers::{reconcile, Marker};
use crate::notify::{Notification, NotificationSink, Severity};
use crate::search::{resolve, Completion, LookupPhase, LookupResponse, LookupTicket, SearchOrchestrator};
use crate::state::{CameraDirective, MapState, SelectionCandidate};
use crate::store::backend::RecordStorage;
use crate::store::{Place, PlaceId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything a frontend needs to render the map
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub selection: Option<SelectionCandidate>,
    pub selection_saved: bool,
    pub camera: CameraDirective,
    pub favorites: Vec<Place>,
    pub markers: Vec<Marker>,
    pub lookup: LookupPhase,
    pub favorites_synced: bool,
}

pub struct MapSession {
    state: MapState,
    search: SearchOrchestrator,
    sink: Arc<dyn NotificationSink>,
    focus_zoom: u8,
}

impl MapSession {
    pub fn new(state: MapState, sink: Arc<dyn NotificationSink>, focus_zoom: u8) -> Self {
        Self {
            state,
            search: SearchOrchestrator::new(),
            sink,
            focus_zoom,
        }
    }

    /// Open a session over `storage` configured by `config`
    pub fn open(storage: Box<dyn RecordStorage>, config: &Config, sink: Arc<dyn NotificationSink>) -> Self {
        Self::new(MapState::open(storage, config), sink, config.map.focus_zoom)
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn lookup_phase(&self) -> &LookupPhase {
        self.search.phase()
    }

    // --- lookups, phased ---

    /// Submit a search; None when the query was blank
    pub fn begin_search(&mut self, query: &str) -> Option<LookupTicket> {
        self.search.begin_search(self.sink.as_ref(), query)
    }

    /// Handle a map click at `at`
    pub fn begin_click(&mut self, at: Coordinates) -> Result<LookupTicket> {
        at.validate()?;
        Ok(self.search.begin_reverse(&mut self.state, self.sink.as_ref(), at))
    }

    /// Apply a resolved lookup if it is still the latest one
    pub fn complete(&mut self, ticket: &LookupTicket, response: LookupResponse) -> Completion {
        self.search
            .complete(&mut self.state, self.sink.as_ref(), ticket, response)
    }

    // --- lookups, one shot ---

    /// Search and apply the result; None when the query was blank
    pub async fn search<G: GeocodeGateway>(&mut self, gateway: &G, query: &str) -> Option<Completion> {
        let ticket = self.begin_search(query)?;
        let response = resolve(gateway, &ticket).await;
        Some(self.complete(&ticket, response))
    }

    /// Click and resolve the place name
    pub async fn click<G: GeocodeGateway>(&mut self, gateway: &G, at: Coordinates) -> Result<Completion> {
        let ticket = self.begin_click(at)?;
        let response = resolve(gateway, &ticket).await;
        Ok(self.complete(&ticket, response))
    }

    // --- favorites ---

    /// Save the current candidate as a favorite
    ///
    /// `category` falls back to the candidate's own, then to the default.
    /// The selection is cleared only once the place is stored.
    pub fn save_selection(&mut self, name: &str, category: Option<Category>) -> Result<Place> {
        let result = match self.state.selection.current() {
            Some(candidate) => {
                let category = category.or(candidate.category).unwrap_or_default();
                self.state.favorites.add(candidate, name, category)
            }
            None => Err(Error::Validation("No place selected".to_string())),
        };

        let place = match result {
            Ok(place) => place,
            Err(e) => {
                self.notify(Severity::Error, e.to_string());
                return Err(e);
            }
        };

        self.state.selection.clear();
        if self.state.favorites.is_synced() {
            self.notify(Severity::Success, "Place saved!");
        } else {
            self.notify(Severity::Warning, "Place saved for this session only; storage is unavailable.");
        }
        Ok(place)
    }

    /// Remove a favorite; unknown ids change nothing
    pub fn remove_favorite(&mut self, id: &PlaceId) -> Option<Place> {
        let removed = self.state.favorites.remove(id)?;
        self.notify(Severity::Success, format!("Place \"{}\" removed.", removed.name));
        Some(removed)
    }

    /// Select a favorite and fly the camera to it
    pub fn focus_favorite(&mut self, id: &PlaceId) -> Result<Place> {
        let place = self
            .state
            .favorites
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Favorite {}", id)))?;

        self.search.supersede(self.sink.as_ref());
        self.state.selection.select(SelectionCandidate::from(&place));
        self.state.camera.focus(place.coordinates(), self.focus_zoom);
        info!("Focused favorite {} ({:?})", place.id, place.name);
        Ok(place)
    }

    /// Drop the candidate and any lookup still in flight
    pub fn dismiss_selection(&mut self) {
        self.search.supersede(self.sink.as_ref());
        self.state.selection.clear();
        debug!("Selection dismissed");
    }

    // --- rendering ---

    pub fn markers(&self) -> Vec<Marker> {
        reconcile(self.state.favorites.list(), self.state.selection.current())
    }

    pub fn camera(&self) -> CameraDirective {
        self.state.camera.directive()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selection: self.state.selection.current().cloned(),
            selection_saved: self.state.is_selection_saved(),
            camera: self.camera(),
            favorites: self.state.favorites.list().to_vec(),
            markers: self.markers(),
            lookup: self.search.phase().clone(),
            favorites_synced: self.state.favorites.is_synced(),
        }
    }

    fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.sink
            .notify(Notification::new(severity, message, FAVORITES_ID));
    }
}

impl std::fmt::Debug for MapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("state", &self.state)
            .field("search", &self.search)
            .field("focus_zoom", &self.focus_zoom)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::notify::{LOADING_NAME, LOOKUP_ID};
    use crate::geo::stub::StubGateway;
    use crate::geo::{GeocodeHit, ReverseHit};
    use crate::notify::NotificationBoard;
    use crate::state::Camera;
    use crate::store::backend::MemoryStorage;
    use crate::store::FavoritesStore;

    fn create_test_session() -> (MapSession, Arc<NotificationBoard>) {
        let board = Arc::new(NotificationBoard::new());
        let favorites = FavoritesStore::open(Box::new(MemoryStorage::new()), "favorites-storage");
        let session = MapSession::new(MapState::new(favorites, Camera::default()), board.clone(), 16);
        (session, board)
    }

    fn select(session: &mut MapSession, lat: f64, lng: f64) {
        session
            .state
            .selection
            .select(SelectionCandidate::new(Coordinates::new(lat, lng), "Picked"));
    }

    #[test]
    fn test_save_clears_selection_and_marks_saved() {
        let (mut session, board) = create_test_session();
        select(&mut session, 10.0, 20.0);

        let place = session.save_selection("X", Some(Category::Work)).unwrap();

        assert!(session.state().selection.is_empty());
        assert_eq!(session.state().favorites.list(), &[place.clone()]);
        assert_eq!(board.get(FAVORITES_ID).unwrap().message, "Place saved!");

        // Reselecting the same spot is recognized as saved.
        select(&mut session, 10.0, 20.0);
        assert!(session.state().is_selection_saved());
        let markers = session.markers();
        assert_eq!(markers.len(), 1);
        assert!(!markers[0].is_transient());
    }

    struct FailingStorage;

    impl RecordStorage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_save_with_unavailable_storage_warns() {
        let board = Arc::new(NotificationBoard::new());
        let favorites = FavoritesStore::open(Box::new(FailingStorage), "favorites-storage");
        let mut session = MapSession::new(MapState::new(favorites, Camera::default()), board.clone(), 16);
        select(&mut session, 10.0, 20.0);

        let place = session.save_selection("Temp", None).unwrap();

        let toast = board.get(FAVORITES_ID).unwrap();
        assert_eq!(toast.severity, Severity::Warning);
        assert_eq!(toast.message, "Place saved for this session only; storage is unavailable.");
        assert!(!session.state().favorites.is_synced());
        assert_eq!(session.state().favorites.list(), &[place]);
        assert!(session.state().selection.is_empty());
    }

    #[test]
    fn test_save_blank_name_changes_nothing() {
        let (mut session, board) = create_test_session();
        select(&mut session, 1.0, 2.0);

        let result = session.save_selection("   ", None);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(session.state().favorites.is_empty());
        assert_eq!(session.state().selection.current().unwrap().name, "Picked");
        assert_eq!(board.get(FAVORITES_ID).unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_save_without_selection() {
        let (mut session, _) = create_test_session();
        assert!(matches!(session.save_selection("Name", None), Err(Error::Validation(_))));
    }

    #[test]
    fn test_save_uses_candidate_category() {
        let (mut session, _) = create_test_session();
        session.state.selection.select(
            SelectionCandidate::new(Coordinates::new(1.0, 1.0), "Market").with_category(Category::Shopping),
        );

        let place = session.save_selection("Market", None).unwrap();
        assert_eq!(place.category, Category::Shopping);
    }

    #[test]
    fn test_remove_notifies_by_name() {
        let (mut session, board) = create_test_session();
        select(&mut session, 1.0, 1.0);
        let place = session.save_selection("Gym", None).unwrap();

        assert!(session.remove_favorite(&place.id).is_some());
        assert_eq!(board.get(FAVORITES_ID).unwrap().message, "Place \"Gym\" removed.");
        assert!(session.remove_favorite(&place.id).is_none());
    }

    #[test]
    fn test_focus_favorite() {
        let (mut session, _) = create_test_session();
        select(&mut session, -19.75, -47.93);
        let place = session.save_selection("Uberaba", Some(Category::Leisure)).unwrap();

        session.focus_favorite(&place.id).unwrap();

        let selected = session.state().selection.current().unwrap();
        assert_eq!(selected.name, "Uberaba");
        assert_eq!(selected.category, Some(Category::Leisure));
        let camera = session.camera();
        assert_eq!(camera.center, place.coordinates());
        assert_eq!(camera.zoom, 16);
        assert!(session.markers().iter().all(|m| !m.is_transient()));
    }

    #[test]
    fn test_focus_unknown_favorite() {
        let (mut session, _) = create_test_session();
        let id: PlaceId = "6f1c1b1e-8d4a-4c3e-9a4f-2b1d6a7e9c10".parse().unwrap();
        assert!(matches!(session.focus_favorite(&id), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_focus_supersedes_pending_click() {
        let at = Coordinates::new(-18.9, -48.2);
        let gateway = StubGateway::new().with_reverse(at.lat, at.lng, Some(ReverseHit {
            name: "Late name".into(),
            ..Default::default()
        }));
        let (mut session, board) = create_test_session();
        select(&mut session, 5.0, 5.0);
        let place = session.save_selection("Saved", None).unwrap();

        let ticket = session.begin_click(at).unwrap();
        session.focus_favorite(&place.id).unwrap();
        let response = resolve(&gateway, &ticket).await;

        assert_eq!(session.complete(&ticket, response), Completion::Stale);
        assert_eq!(session.state().selection.current().unwrap().name, "Saved");
        assert!(board.get(LOOKUP_ID).is_none());
    }

    #[tokio::test]
    async fn test_click_then_dismiss() {
        let gateway = StubGateway::new();
        let (mut session, _) = create_test_session();

        let ticket = session.begin_click(Coordinates::new(-18.9, -48.2)).unwrap();
        assert_eq!(session.state().selection.current().unwrap().name, LOADING_NAME);

        session.dismiss_selection();
        let response = resolve(&gateway, &ticket).await;
        session.complete(&ticket, response);

        assert!(session.state().selection.is_empty());
        assert!(session.markers().is_empty());
    }

    #[test]
    fn test_click_rejects_out_of_range() {
        let (mut session, _) = create_test_session();
        assert!(session.begin_click(Coordinates::new(91.0, 0.0)).is_err());
        assert!(session.state().selection.is_empty());
    }

    #[tokio::test]
    async fn test_search_shortcut() {
        let gateway = StubGateway::new().with_forward("Centro", vec![GeocodeHit::new("-18.91", "-48.27", "Centro")]);
        let (mut session, _) = create_test_session();

        assert!(session.search(&gateway, "  ").await.is_none());
        let completion = session.search(&gateway, "Centro").await.unwrap();

        assert!(matches!(completion, Completion::Applied { .. }));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.selection.unwrap().name, "Centro");
        assert!(!snapshot.selection_saved);
        assert_eq!(snapshot.markers.len(), 1);
        assert!(matches!(snapshot.lookup, LookupPhase::Resolved { .. }));
    }
}
