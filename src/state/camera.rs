//! Desired map camera
//!
//! The camera is written by the engine and pushed to the map widget as a
//! directive. Nothing reads the widget's live viewport back in here.

use crate::config::MapConfig;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// Intended center and zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Instruction for the map widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDirective {
    pub center: Coordinates,
    pub zoom: u8,
    pub animate_secs: f64,
    /// Bumped on every move, so the widget can tell a new directive apart
    pub revision: u64,
}

/// Camera register
#[derive(Debug, Clone)]
pub struct Camera {
    state: CameraState,
    default_zoom: u8,
    fly_duration_secs: f64,
    revision: u64,
}

impl Camera {
    pub fn new(home: Coordinates, default_zoom: u8, fly_duration_secs: f64) -> Self {
        Self {
            state: CameraState {
                center: home,
                zoom: default_zoom,
            },
            default_zoom,
            fly_duration_secs,
            revision: 0,
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.home(), config.zoom, config.fly_duration_secs)
    }

    /// Center on `center` at an explicit zoom
    pub fn focus(&mut self, center: Coordinates, zoom: u8) {
        self.state = CameraState { center, zoom };
        self.revision += 1;
    }

    /// Center on `center` at the baseline zoom
    pub fn center_on(&mut self, center: Coordinates) {
        self.focus(center, self.default_zoom);
    }

    /// Move to `center`, keeping the current zoom
    pub fn pan_to(&mut self, center: Coordinates) {
        self.focus(center, self.state.zoom);
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn directive(&self) -> CameraDirective {
        CameraDirective {
            center: self.state.center,
            zoom: self.state.zoom,
            animate_secs: self.fly_duration_secs,
            revision: self.revision,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&MapConfig::default())
    }
}
