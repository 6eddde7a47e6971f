//! Type-safe key-value persistence layer for the Hogar storefront.
//!
//! Stores JSON-serialized snapshots under string keys, the way the browser
//! storefront keeps its catalog, cart and favorites in local storage.
//! Two backends ship with the crate: an in-memory map for tests and a
//! directory of JSON files for the CLI.
//!
//! # Example
//!
//! ```rust,ignore
//! use hogar_cache::Cache;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Favorites {
//!     ids: Vec<i64>,
//! }
//!
//! let cache = Cache::open_dir("./.hogar")?;
//!
//! cache.set("georgina-favorites", &favorites)?;
//! let favorites: Option<Favorites> = cache.get("georgina-favorites")?;
//! cache.delete("georgina-favorites")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::{Backend, Cache, FileBackend, MemoryBackend};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Backend, Cache, CacheError};
}
