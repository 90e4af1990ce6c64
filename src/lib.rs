//! geopin: Favorite Places Map Engine
//!
//! A library and CLI tool that keeps a map's selection, camera and saved
//! places consistent while the user searches, clicks and saves locations.
//!
//! ## Features
//!
//! - Address and Brazilian postal code (CEP) search via Nominatim and BrasilAPI
//! - Map click reverse lookup with an immediate placeholder candidate
//! - Last-submitted-wins lookups: late responses never overwrite newer ones
//! - Categorized favorites persisted as one JSON record
//! - Pure marker reconciliation with duplicate suppression
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use geopin::geo::stub::StubGateway;
//! use geopin::geo::{Coordinates, GeocodeHit};
//! use geopin::notify::NotificationBoard;
//! use geopin::store::backend::MemoryStorage;
//! use geopin::{Category, Config, MapSession};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let gateway = StubGateway::new()
//!     .with_forward("Paulista Avenue", vec![GeocodeHit::new("-23.5614", "-46.6559", "Avenida Paulista")]);
//! let board = Arc::new(NotificationBoard::new());
//! let mut session = MapSession::open(Box::new(MemoryStorage::new()), &Config::default(), board.clone());
//!
//! // Search, then save the hit as a favorite
//! session.search(&gateway, "Paulista Avenue").await;
//! let place = session.save_selection("Work", Some(Category::Work)).unwrap();
//! assert_eq!(place.coordinates(), Coordinates::new(-23.5614, -46.6559));
//!
//! // One marker per favorite; the cleared selection adds none
//! assert_eq!(session.markers().len(), 1);
//! # }
//! ```

pub mod category;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod markers;
pub mod notify;
pub mod search;
pub mod server;
pub mod session;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use category::Category;
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{Coordinates, GeocodeGateway, HttpGateway};
pub use markers::{reconcile, Marker};
pub use session::MapSession;
pub use store::{FavoritesStore, Place, PlaceId};
