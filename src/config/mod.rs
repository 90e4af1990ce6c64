//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geopin/config.toml

pub mod defaults;

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Map viewport settings
    #[serde(default)]
    pub map: MapConfig,

    /// Geocoding services
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Favorites persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Map viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Latitude of the home region (initial camera center)
    #[serde(default = "default_home_lat")]
    pub home_lat: f64,

    /// Longitude of the home region
    #[serde(default = "default_home_lng")]
    pub home_lng: f64,

    /// Baseline zoom, also used when centering on a search result
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Zoom used when focusing a saved favorite
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,

    /// Camera animation duration in seconds
    #[serde(default = "default_fly_duration")]
    pub fly_duration_secs: f64,
}

/// Geocoding services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    #[serde(default = "default_postal_url")]
    pub postal_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retries after a transient failure
    #[serde(default = "default_retries")]
    pub retries: u32,
}

/// Favorites persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Record key holding the favorites collection
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Override for the data directory (XDG data dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_home_lat() -> f64 {
    DEFAULT_HOME_LAT
}
fn default_home_lng() -> f64 {
    DEFAULT_HOME_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_focus_zoom() -> u8 {
    DEFAULT_FOCUS_ZOOM
}
fn default_fly_duration() -> f64 {
    DEFAULT_FLY_DURATION_SECS
}
fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
fn default_postal_url() -> String {
    DEFAULT_POSTAL_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_retries() -> u32 {
    DEFAULT_RETRIES
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            home_lat: default_home_lat(),
            home_lng: default_home_lng(),
            zoom: default_zoom(),
            focus_zoom: default_focus_zoom(),
            fly_duration_secs: default_fly_duration(),
        }
    }
}

impl MapConfig {
    /// Home region as coordinates
    pub fn home(&self) -> Coordinates {
        Coordinates::new(self.home_lat, self.home_lng)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            postal_url: default_postal_url(),
            user_agent: default_user_agent(),
            retries: default_retries(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            dir: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl StorageConfig {
    /// Directory holding the favorites record
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|p| p.join(APP_DIR_NAME))
                .ok_or_else(|| Error::Config("Could not determine data directory".to_string())),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "home_lat"] => Some(self.map.home_lat.to_string()),
            ["map", "home_lng"] => Some(self.map.home_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "focus_zoom"] => Some(self.map.focus_zoom.to_string()),
            ["map", "fly_duration_secs"] => Some(self.map.fly_duration_secs.to_string()),

            ["geocoder", "nominatim_url"] => Some(self.geocoder.nominatim_url.clone()),
            ["geocoder", "postal_url"] => Some(self.geocoder.postal_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "retries"] => Some(self.geocoder.retries.to_string()),

            ["storage", "key"] => Some(self.storage.key.clone()),
            ["storage", "dir"] => Some(
                self.storage
                    .dir
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
            ),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "home_lat"] => {
                self.map.home_lat = parse_value(value, "latitude")?;
            }
            ["map", "home_lng"] => {
                self.map.home_lng = parse_value(value, "longitude")?;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value(value, "zoom")?;
            }
            ["map", "focus_zoom"] => {
                self.map.focus_zoom = parse_value(value, "zoom")?;
            }
            ["map", "fly_duration_secs"] => {
                self.map.fly_duration_secs = parse_value(value, "duration")?;
            }

            ["geocoder", "nominatim_url"] => {
                self.geocoder.nominatim_url = value.to_string();
            }
            ["geocoder", "postal_url"] => {
                self.geocoder.postal_url = value.to_string();
            }
            ["geocoder", "user_agent"] => {
                self.geocoder.user_agent = value.to_string();
            }
            ["geocoder", "retries"] => {
                self.geocoder.retries = parse_value(value, "retries")?;
            }

            ["storage", "key"] => {
                if value.trim().is_empty() {
                    return Err(Error::Config("Storage key cannot be empty".to_string()));
                }
                self.storage.key = value.to_string();
            }
            ["storage", "dir"] => {
                self.storage.dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(value, "port")?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "map.home_lat",
            "map.home_lng",
            "map.zoom",
            "map.focus_zoom",
            "map.fly_duration_secs",
            "geocoder.nominatim_url",
            "geocoder.postal_url",
            "geocoder.user_agent",
            "geocoder.retries",
            "storage.key",
            "storage.dir",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.map.home_lat, -18.9186);
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.map.focus_zoom, 16);
        assert_eq!(config.geocoder.retries, 1);
        assert_eq!(config.storage.key, "favorites-storage");
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("map.zoom"), Some("13".to_string()));

        config.set("map.zoom", "15").unwrap();
        assert_eq!(config.get("map.zoom"), Some("15".to_string()));
        assert_eq!(config.map.zoom, 15);

        config.set("storage.dir", "/tmp/pins").unwrap();
        assert_eq!(config.storage.dir, Some(PathBuf::from("/tmp/pins")));
        config.set("storage.dir", "").unwrap();
        assert_eq!(config.storage.dir, None);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("map.zoom", "very close").is_err());
        assert!(config.set("storage.key", "  ").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.map.focus_zoom = 18;
        config.geocoder.retries = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.map.focus_zoom, 18);
        assert_eq!(loaded.geocoder.retries, 3);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(config.map.zoom, 13);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[map]\nzoom = 11\n").unwrap();
        assert_eq!(loaded.map.zoom, 11);
        assert_eq!(loaded.map.focus_zoom, 16);
        assert_eq!(loaded.server.host, "127.0.0.1");
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[map]"));
        assert!(toml.contains("[geocoder]"));
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[server]"));
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(Config::default().server_addr(), "127.0.0.1:7979");
    }

    #[test]
    fn test_available_keys_resolve() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }
}
