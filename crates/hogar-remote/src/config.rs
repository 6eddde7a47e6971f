//! Connection settings for the hosted backend and the form relay.

use std::sync::Arc;

use hogar_data::{FetchClient, Transport};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// Default table holding the catalog.
pub const DEFAULT_TABLE: &str = "products";

/// Form relay endpoint used by the storefront's contact page.
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://formspree.io/f/mbdjnypn";

/// Hosted product table settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anonymous API key, sent as `apikey` and as bearer token.
    pub api_key: String,
    pub table: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Whether both the URL and the key are set.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// REST root of the project.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Client preconfigured with the REST root and both auth headers.
    pub fn client(&self, transport: Arc<dyn Transport>) -> GatewayResult<FetchClient> {
        if !self.is_configured() {
            return Err(GatewayError::Config(
                "remote url and api_key must both be set".into(),
            ));
        }
        if self.table.trim().is_empty() {
            return Err(GatewayError::Config("table name is empty".into()));
        }
        Ok(FetchClient::new(transport)
            .with_base_url(self.rest_url())
            .with_default_header("apikey", self.api_key.clone())
            .with_default_header("Authorization", format!("Bearer {}", self.api_key)))
    }
}

/// Contact relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub endpoint: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogar_data::MockTransport;

    #[test]
    fn test_rest_url_trims_slash() {
        let config = GatewayConfig::new("https://demo.supabase.co/", "key");
        assert_eq!(config.rest_url(), "https://demo.supabase.co/rest/v1");
        assert_eq!(config.table, "products");
    }

    #[test]
    fn test_unconfigured_client_is_rejected() {
        let config = GatewayConfig::default();
        assert!(!config.is_configured());
        let err = config.client(Arc::new(MockTransport::new())).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"url": "https://x.supabase.co", "api_key": "k"}"#).unwrap();
        assert_eq!(config.table, DEFAULT_TABLE);
        assert!(config.is_configured());
    }
}
