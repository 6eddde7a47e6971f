//! Remote collaborators of the Hogar storefront.
//!
//! - [`RestProductTable`] talks to the hosted product table and maps its
//!   snake_case rows to catalog [`Product`](hogar_core::catalog::Product)s.
//! - [`RemoteCatalog`] mirrors that table, refetching after every write.
//! - [`FormRelay`] posts the contact form to a form relay service.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hogar_data::ReqwestTransport;
//! use hogar_remote::prelude::*;
//!
//! let config = GatewayConfig::new(url, api_key);
//! let client = config.client(Arc::new(ReqwestTransport::new()))?;
//! let mut catalog = RemoteCatalog::new(Arc::new(RestProductTable::new(client, &config.table)));
//! catalog.fetch().await?;
//! ```

pub mod catalog;
pub mod config;
pub mod contact;
pub mod error;
pub mod row;
pub mod table;

pub use catalog::RemoteCatalog;
pub use config::{ContactConfig, GatewayConfig};
pub use contact::{Attachment, ContactForm, FormRelay};
pub use error::{GatewayError, GatewayResult};
pub use table::{ProductTable, RestProductTable};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::RemoteCatalog;
    pub use crate::config::{ContactConfig, GatewayConfig};
    pub use crate::contact::{Attachment, ContactForm, FormRelay, MAX_ATTACHMENTS};
    pub use crate::error::{GatewayError, GatewayResult};
    pub use crate::table::{ProductTable, RestProductTable};
}
