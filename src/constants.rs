//! Centralized constants for the geopin crate
//!
//! Values shared across modules live here so the engine, the CLI and the
//! HTTP surface agree on them.

/// Map viewport constants
pub mod map {
    /// Home region center (Uberlândia, MG)
    pub const HOME_LAT: f64 = -18.9186;
    pub const HOME_LNG: f64 = -48.2772;

    /// Baseline zoom level
    pub const DEFAULT_ZOOM: u8 = 13;

    /// Zoom used when focusing a saved favorite
    pub const FOCUS_ZOOM: u8 = 16;

    /// Camera fly animation duration in seconds
    pub const FLY_DURATION_SECS: f64 = 1.2;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// BrasilAPI postal code (CEP) lookup, v2
    pub const BRASIL_API_CEP_URL: &str = "https://brasilapi.com.br/api/cep/v2";

    /// User agent sent to geocoders (Nominatim rejects anonymous clients)
    pub const USER_AGENT: &str = concat!("geopin/", env!("CARGO_PKG_VERSION"));
}

/// Durable storage settings
pub mod storage {
    /// Key of the single record holding the favorites collection
    pub const FAVORITES_KEY: &str = "favorites-storage";
}

/// Notification correlation ids and placeholder names
pub mod notify {
    /// Shared by the search and map-click flows
    pub const LOOKUP_ID: &str = "location-lookup";

    /// Input feedback that must not replace a pending lookup's toast
    pub const QUERY_INPUT_ID: &str = "search-input";

    /// Save/remove feedback
    pub const FAVORITES_ID: &str = "favorites";

    /// Candidate name while a reverse lookup is pending
    pub const LOADING_NAME: &str = "Loading...";

    /// Candidate name when reverse lookup found nothing
    pub const UNKNOWN_PLACE_NAME: &str = "Unknown place";

    /// Candidate name when reverse lookup failed
    pub const LOOKUP_ERROR_NAME: &str = "Error loading address";
}
