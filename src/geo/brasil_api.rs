//! BrasilAPI postal code (CEP) client

use crate::error::{Error, Result};
use crate::geo::{postal_code_digits, PostalAddress};

/// BrasilAPI CEP v2 client
#[derive(Debug, Clone)]
pub struct BrasilApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl BrasilApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn cep_url(&self, digits: &str) -> String {
        format!("{}/{}", self.base_url, digits)
    }

    /// Resolve a CEP to its street address
    pub async fn lookup(&self, code: &str) -> Result<PostalAddress> {
        let digits = postal_code_digits(code)
            .ok_or_else(|| Error::Validation(format!("Invalid postal code: {}", code)))?;

        let response = self
            .client
            .get(self.cep_url(&digits))
            .send()
            .await
            .map_err(|e| Error::Network(format!("BrasilAPI request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::BAD_REQUEST {
            return Err(Error::NotFound(format!("Postal code {} not found", digits)));
        }
        if !status.is_success() {
            return Err(Error::Network(format!("BrasilAPI returned status: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse BrasilAPI response: {}", e)))
    }
}
