//! Map state container
//!
//! Favorites, selection and camera form one register set. Components that
//! mutate it take `&mut MapState`; nothing reaches it through globals.

pub mod camera;
pub mod selection;

use crate::config::Config;
use crate::store::backend::RecordStorage;
use crate::store::FavoritesStore;

pub use camera::{Camera, CameraDirective, CameraState};
pub use selection::{Selection, SelectionCandidate};

/// The engine's shared registers
pub struct MapState {
    pub favorites: FavoritesStore,
    pub selection: Selection,
    pub camera: Camera,
}

impl MapState {
    pub fn new(favorites: FavoritesStore, camera: Camera) -> Self {
        Self {
            favorites,
            selection: Selection::new(),
            camera,
        }
    }

    /// Open favorites from `storage` and place the camera per `config`
    pub fn open(storage: Box<dyn RecordStorage>, config: &Config) -> Self {
        Self::new(
            FavoritesStore::open(storage, config.storage.key.clone()),
            Camera::from_config(&config.map),
        )
    }

    /// Whether the current candidate coincides with a favorite
    pub fn is_selection_saved(&self) -> bool {
        self.selection.is_saved(self.favorites.list())
    }
}

impl std::fmt::Debug for MapState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapState")
            .field("favorites", &self.favorites.len())
            .field("selection", &self.selection.current())
            .field("camera", &self.camera.state())
            .finish()
    }
}
