//! Geocoding module
//!
//! Forward search (text to coordinates), reverse lookup (coordinates to a
//! display name) and Brazilian postal code (CEP) resolution, behind the
//! [`GeocodeGateway`] trait.

pub mod brasil_api;
pub mod gateway;
pub mod nominatim;
pub mod stub;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use gateway::HttpGateway;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::Validation(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::Validation(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// A coordinate component as geocoders send it: JSON string or number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordValue {
    Number(f64),
    Text(String),
}

impl CoordValue {
    fn parse(&self, what: &str) -> Result<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::Geo(format!("Invalid {}: {}", what, s)))?,
        };
        // "NaN" and "inf" parse as f64 but cannot be stored as JSON numbers.
        if !value.is_finite() {
            return Err(Error::Geo(format!("Non-finite {}: {}", what, value)));
        }
        Ok(value)
    }
}

impl From<f64> for CoordValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CoordValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One forward geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub lat: CoordValue,
    pub lon: CoordValue,
    pub display_name: String,
}

impl GeocodeHit {
    pub fn new(lat: impl Into<CoordValue>, lon: impl Into<CoordValue>, display_name: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
            display_name: display_name.into(),
        }
    }

    /// Parse the hit's coordinates; anything non-finite or off the globe
    /// is an unreadable response
    pub fn coordinates(&self) -> Result<Coordinates> {
        let coords = Coordinates::new(
            self.lat.parse("latitude")?,
            self.lon.parse("longitude")?,
        );
        coords.validate().map_err(|e| Error::Geo(e.to_string()))?;
        Ok(coords)
    }
}

/// A reverse geocoding result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReverseHit {
    /// Short name of the feature (may be empty for plain addresses)
    #[serde(default)]
    pub name: String,
    /// Full formatted address
    #[serde(default)]
    pub display_name: String,
    /// Structured address fields (road, suburb, city, ...)
    #[serde(default)]
    pub address: BTreeMap<String, String>,
}

impl ReverseHit {
    /// Best human-readable label, or None if the hit carries no name at all
    pub fn label(&self) -> Option<&str> {
        [self.name.as_str(), self.display_name.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Street address resolved from a postal code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl PostalAddress {
    /// Compose the free-text address sent to forward geocoding
    pub fn compose(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.street, self.neighborhood, self.city, self.state
        )
    }
}

/// Extract an 8-digit postal code from free text
///
/// Every non-digit character is dropped first, so "01310-100" and
/// "01.310 100" both qualify.
pub fn postal_code_digits(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == 8).then_some(digits)
}

/// Trait for geocoding backends
pub trait GeocodeGateway: Send + Sync {
    /// Search free text, best match first (possibly empty)
    fn forward_geocode(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<GeocodeHit>>> + Send;

    /// Resolve coordinates to a place, or None if nothing is there
    fn reverse_geocode(&self, lat: f64, lng: f64) -> impl std::future::Future<Output = Result<Option<ReverseHit>>> + Send;

    /// Resolve a postal code to a street address
    ///
    /// Fails with `Validation` on a malformed code and `NotFound` on an
    /// unknown one.
    fn resolve_postal_code(&self, code: &str) -> impl std::future::Future<Output = Result<PostalAddress>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hit_parses_strings_and_numbers() {
        let hit: GeocodeHit = serde_json::from_str(
            r#"{"lat": "-23.5614", "lon": -46.6559, "display_name": "Avenida Paulista", "class": "highway"}"#,
        )
        .unwrap();
        let coords = hit.coordinates().unwrap();
        assert_relative_eq!(coords.lat, -23.5614);
        assert_relative_eq!(coords.lng, -46.6559);
    }

    #[test]
    fn test_hit_invalid_coordinates() {
        let hit = GeocodeHit::new("north", "0", "Nowhere");
        assert!(matches!(hit.coordinates(), Err(Error::Geo(_))));
    }

    #[test]
    fn test_hit_rejects_non_finite_and_out_of_range() {
        for (lat, lon) in [("NaN", "0"), ("0", "inf"), ("-infinity", "0"), ("95.0", "10"), ("10", "-200")] {
            let hit = GeocodeHit::new(lat, lon, "Bogus");
            assert!(
                matches!(hit.coordinates(), Err(Error::Geo(_))),
                "accepted ({}, {})",
                lat,
                lon
            );
        }
        assert!(matches!(GeocodeHit::new(f64::NAN, 0.0, "Bogus").coordinates(), Err(Error::Geo(_))));
    }

    #[test]
    fn test_postal_code_digits() {
        assert_eq!(postal_code_digits("01310-100").as_deref(), Some("01310100"));
        assert_eq!(postal_code_digits("38400 000").as_deref(), Some("38400000"));
        assert_eq!(postal_code_digits("Paulista Avenue"), None);
        assert_eq!(postal_code_digits("1234567"), None);
        assert_eq!(postal_code_digits("Rua 7, 123456789"), None);
    }

    #[test]
    fn test_compose_address() {
        let address = PostalAddress {
            street: "Avenida Paulista".into(),
            neighborhood: "Bela Vista".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
        };
        assert_eq!(address.compose(), "Avenida Paulista, Bela Vista, São Paulo - SP");
    }

    #[test]
    fn test_reverse_label() {
        let hit = ReverseHit {
            name: " ".into(),
            display_name: "Praça Tubal Vilela, Centro".into(),
            ..Default::default()
        };
        assert_eq!(hit.label(), Some("Praça Tubal Vilela, Centro"));
        assert_eq!(ReverseHit::default().label(), None);
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(Coordinates::new(-18.9, -48.2).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
    }
}
