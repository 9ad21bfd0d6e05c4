use jbridge_api::ApiError;
use thiserror::Error;

/// Errors that end a serving session or a callback round trip.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Invocation failed: {0}")]
    Invocation(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
