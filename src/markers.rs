//! Marker reconciliation
//!
//! Derives the full marker set from favorites and the selection. The result
//! is recomputed from scratch on every change; the map widget diffs by
//! [`MarkerKey`].

use crate::category::Category;
use crate::geo::Coordinates;
use crate::state::SelectionCandidate;
use crate::store::{Place, PlaceId};
use serde::Serialize;

/// Transient marker color, distinct from every category
const TRANSIENT_COLOR: &str = "#ef4444";
const TRANSIENT_ICON: &str = "crosshair";
const TRANSIENT_OPACITY: f64 = 0.8;

/// Identity of a marker across renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum MarkerKey {
    Favorite(PlaceId),
    Transient,
}

/// How to draw a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub icon: &'static str,
    pub opacity: f64,
}

/// Action offered by a marker's popup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum PopupAction {
    /// Remove the saved place
    Remove { id: PlaceId },
    /// Open the save form, pre-filled
    Save { initial_name: String, category: Category },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: MarkerKey,
    pub position: Coordinates,
    pub label: String,
    pub style: MarkerStyle,
    pub popup: PopupAction,
    /// Popup clicks must not reach the map as a click
    pub stop_propagation: bool,
}

impl Marker {
    fn favorite(place: &Place) -> Self {
        let style = place.category.style();
        Self {
            key: MarkerKey::Favorite(place.id),
            position: place.coordinates(),
            label: place.name.clone(),
            style: MarkerStyle {
                color: style.color,
                icon: style.icon,
                opacity: 1.0,
            },
            popup: PopupAction::Remove { id: place.id },
            stop_propagation: true,
        }
    }

    fn transient(candidate: &SelectionCandidate) -> Self {
        Self {
            key: MarkerKey::Transient,
            position: candidate.coordinates(),
            label: candidate.name.clone(),
            style: MarkerStyle {
                color: TRANSIENT_COLOR,
                icon: TRANSIENT_ICON,
                opacity: TRANSIENT_OPACITY,
            },
            popup: PopupAction::Save {
                initial_name: candidate.name.clone(),
                category: candidate.category.unwrap_or_default(),
            },
            stop_propagation: true,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.key == MarkerKey::Transient
    }
}

/// One marker per favorite, plus the candidate unless it is already saved
pub fn reconcile(favorites: &[Place], selection: Option<&SelectionCandidate>) -> Vec<Marker> {
    let mut markers: Vec<Marker> = favorites.iter().map(Marker::favorite).collect();

    if let Some(candidate) = selection {
        if !favorites.iter().any(|f| candidate.coincides_with(f)) {
            markers.push(Marker::transient(candidate));
        }
    }

    markers
}
