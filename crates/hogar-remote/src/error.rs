//! Gateway error types.

use hogar_data::FetchError;
use thiserror::Error;

/// Errors from the hosted product table and the contact relay.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request could not be sent or its body could not be read.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The backend answered with a non-2xx status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A row in the response could not be mapped to a product.
    #[error("Invalid row: {0}")]
    Decode(String),

    /// Missing or unusable connection settings.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("At most {max} attachments are allowed, got {count}")]
    TooManyAttachments { max: usize, count: usize },

    /// The contact form failed validation before sending.
    #[error("Invalid contact form: {0}")]
    InvalidContact(String),
}

impl GatewayError {
    /// Map an HTTP error from [`hogar_data::Response::error_for_status`].
    pub(crate) fn from_fetch(e: FetchError) -> Self {
        match e {
            FetchError::HttpError { status, message } => GatewayError::Status { status, message },
            other => GatewayError::Fetch(other),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
