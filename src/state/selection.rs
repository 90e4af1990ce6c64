//! The selection register
//!
//! Holds at most one candidate location: the spot the user clicked or the
//! last search hit. Writes replace the candidate wholesale.

use crate::category::Category;
use crate::geo::Coordinates;
use crate::store::Place;
use serde::{Deserialize, Serialize};

/// The location currently under consideration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCandidate {
    pub lat: f64,
    pub lng: f64,
    /// Display name; may be a placeholder or empty
    #[serde(default)]
    pub name: String,
    /// Category pre-filled into the save form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl SelectionCandidate {
    pub fn new(coords: Coordinates, name: impl Into<String>) -> Self {
        Self {
            lat: coords.lat,
            lng: coords.lng,
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Exact coordinate match with a saved place
    ///
    /// No tolerance: two values computed by different paths can differ in
    /// the last bit and will then not match.
    pub fn coincides_with(&self, place: &Place) -> bool {
        self.lat == place.lat && self.lng == place.lng
    }
}

impl From<&Place> for SelectionCandidate {
    fn from(place: &Place) -> Self {
        Self::new(place.coordinates(), place.name.clone()).with_category(place.category)
    }
}

/// Single-slot register for the candidate
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<SelectionCandidate>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate, whatever was there
    pub fn select(&mut self, candidate: SelectionCandidate) {
        self.current = Some(candidate);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&SelectionCandidate> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Overwrite the candidate's name, keeping its coordinates
    ///
    /// Returns false when there is no candidate.
    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        match self.current.as_mut() {
            Some(candidate) => {
                candidate.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Whether the candidate sits exactly on a saved favorite
    pub fn is_saved(&self, favorites: &[Place]) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| favorites.iter().any(|f| c.coincides_with(f)))
    }
}
