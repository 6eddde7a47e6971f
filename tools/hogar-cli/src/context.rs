//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use hogar_cache::Cache;
use hogar_core::checkout::WhatsApp;
use hogar_core::persist::StorefrontState;
use hogar_data::{FetchClient, ReqwestTransport};
use hogar_remote::{FormRelay, RemoteCatalog, RestProductTable};

use crate::config::{ShopConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    pub config: ShopConfig,
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("No se pudo obtener el directorio actual")?;

        let (config, config_path) = match config_path {
            Some(path) => (ShopConfig::load(path)?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (ShopConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Directory holding the persisted stores.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the store directory, creating it if needed.
    pub fn cache(&self) -> Result<Cache> {
        let dir = self.storage_dir();
        Cache::open_dir(&dir)
            .with_context(|| format!("No se pudo abrir el almacenamiento en {}", dir.display()))
    }

    /// Load every store.
    pub fn state(&self) -> Result<(Cache, StorefrontState)> {
        let cache = self.cache()?;
        let state = StorefrontState::load(&cache);
        self.output.debug(&format!(
            "{} productos cargados desde {}",
            state.catalog.len(),
            self.storage_dir().display()
        ));
        Ok((cache, state))
    }

    pub fn whatsapp(&self) -> WhatsApp {
        WhatsApp::new(&self.config.shop.whatsapp_phone)
    }

    /// Remote catalog over the configured table.
    pub fn remote_catalog(&self) -> Result<RemoteCatalog> {
        let remote = &self.config.remote;
        let client = remote
            .client(Arc::new(ReqwestTransport::new()))
            .context("La tabla remota no está configurada; define url y api_key en [remote]")?;
        Ok(RemoteCatalog::new(Arc::new(RestProductTable::new(
            client,
            remote.table.clone(),
        ))))
    }

    pub fn form_relay(&self) -> FormRelay {
        FormRelay::new(
            FetchClient::new(Arc::new(ReqwestTransport::new())),
            self.config.contact.endpoint.clone(),
        )
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<(ShopConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = ShopConfig::load(config_path.to_str()?) {
                    return Some((config, config_path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
