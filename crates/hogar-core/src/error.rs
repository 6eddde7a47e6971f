//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Missing ids are not errors here: store operations on an unknown id are
/// silent no-ops. These variants cover malformed input and storage.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Invalid user-supplied data.
    #[error("Dato inválido: {0}")]
    ValidationError(String),

    /// A coupon with the same code already exists.
    #[error("El cupón {0} ya existe")]
    DuplicateCoupon(String),

    /// Storage error.
    #[error("Error de almacenamiento: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Error de serialización: {0}")]
    SerializationError(String),
}

#[cfg(feature = "storage")]
impl From<hogar_cache::CacheError> for CommerceError {
    fn from(e: hogar_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
