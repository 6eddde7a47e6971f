//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use hogar_core::checkout::DEFAULT_WHATSAPP_PHONE;
use hogar_core::search::DEFAULT_PER_PAGE;
use hogar_remote::{ContactConfig, GatewayConfig};
use serde::{Deserialize, Serialize};

/// Names searched for, in order, in each directory up from the working one.
pub const CONFIG_NAMES: [&str; 3] = ["hogar.toml", ".hogar.toml", "hogar.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub shop: StorefrontConfig,

    /// Hosted product table. Remote commands fail until url and key are set.
    #[serde(default)]
    pub remote: GatewayConfig,

    #[serde(default)]
    pub contact: ContactConfig,
}

impl ShopConfig {
    /// Load config from a file; `.json` files are JSON, anything else TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer el archivo de configuración: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Configuración JSON inválida: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Configuración TOML inválida: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("No se pudo escribir el archivo de configuración: {}", path))
    }

    /// Problems that would make commands misbehave.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.shop.page_size == 0 {
            problems.push("shop.page_size debe ser al menos 1".to_string());
        }
        if !self.shop.whatsapp_phone.chars().any(|c| c.is_ascii_digit()) {
            problems.push("shop.whatsapp_phone no tiene dígitos".to_string());
        }
        let partial = self.remote.url.trim().is_empty() != self.remote.api_key.trim().is_empty();
        if partial {
            problems.push("remote.url y remote.api_key deben definirse juntos".to_string());
        }
        if !self.contact.endpoint.starts_with("http") {
            problems.push("contact.endpoint debe ser una URL http(s)".to_string());
        }
        problems
    }
}

/// Where the storefront state lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per store.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".hogar")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Storefront presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default = "default_phone")]
    pub whatsapp_phone: String,

    /// Products per page in `hogar browse`.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_locale")]
    pub currency_locale: String,
}

fn default_phone() -> String {
    DEFAULT_WHATSAPP_PHONE.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PER_PAGE
}

fn default_locale() -> String {
    "es-CL".to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            whatsapp_phone: default_phone(),
            page_size: default_page_size(),
            currency_locale: default_locale(),
        }
    }
}

/// Generate a default hogar.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Hogar storefront configuration

[storage]
dir = ".hogar"

[shop]
whatsapp_phone = "{phone}"
page_size = {page_size}
currency_locale = "es-CL"

[remote]
# url = "https://your-project.supabase.co"
# api_key = "your-anon-key"
table = "products"

[contact]
endpoint = "{endpoint}"
"#,
        phone = DEFAULT_WHATSAPP_PHONE,
        page_size = DEFAULT_PER_PAGE,
        endpoint = hogar_remote::config::DEFAULT_CONTACT_ENDPOINT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ShopConfig = toml::from_str("").unwrap();
        assert_eq!(config, ShopConfig::default());
        assert_eq!(config.shop.page_size, 12);
        assert_eq!(config.storage.dir, PathBuf::from(".hogar"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: ShopConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.shop.whatsapp_phone, DEFAULT_WHATSAPP_PHONE);
        assert_eq!(config.remote.table, "products");
        assert!(!config.remote.is_configured());
    }

    #[test]
    fn test_partial_remote_is_flagged() {
        let config: ShopConfig = toml::from_str(
            r#"
            [remote]
            url = "https://demo.supabase.co"
            "#,
        )
        .unwrap();
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hogar.json");
        let path = path.to_str().unwrap();

        let mut config = ShopConfig::default();
        config.shop.page_size = 24;
        config.save(path).unwrap();
        assert_eq!(ShopConfig::load(path).unwrap(), config);
    }
}
