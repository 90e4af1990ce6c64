//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, map, storage};

/// Home region latitude
pub const DEFAULT_HOME_LAT: f64 = map::HOME_LAT;

/// Home region longitude
pub const DEFAULT_HOME_LNG: f64 = map::HOME_LNG;

/// Baseline zoom
pub const DEFAULT_ZOOM: u8 = map::DEFAULT_ZOOM;

/// Zoom when focusing a favorite
pub const DEFAULT_FOCUS_ZOOM: u8 = map::FOCUS_ZOOM;

/// Camera fly animation in seconds
pub const DEFAULT_FLY_DURATION_SECS: f64 = map::FLY_DURATION_SECS;

/// Forward/reverse geocoder base URL
pub const DEFAULT_NOMINATIM_URL: &str = api::NOMINATIM_URL;

/// Postal code service base URL
pub const DEFAULT_POSTAL_URL: &str = api::BRASIL_API_CEP_URL;

/// Retries after a transient geocoder failure
pub const DEFAULT_RETRIES: u32 = 1;

/// Favorites record key
pub const DEFAULT_STORAGE_KEY: &str = storage::FAVORITES_KEY;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geopin";
