//! Error types for the sync controller.
//!
//! Failures are classified by propagation rule:
//! - RemoteError: network/HTTP failures, carry a display message
//! - StorageError: local notes persistence failures, never fatal
//! - ControllerError::Validation: client-side input rejection, blocks the request

use thiserror::Error;

/// Failure talking to the appointment backend.
///
/// The Display output is suitable for rendering directly in the alert slot.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl RemoteError {
    /// True when the error means the appointment resource itself is gone,
    /// as opposed to a transient failure reaching the backend.
    pub fn is_gone(&self) -> bool {
        matches!(self, RemoteError::Api { status: 404, .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Failure of the local notes store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Local storage is unavailable")]
    Unavailable,

    #[error("Storage operation failed: {0}")]
    Io(String),
}

/// Top-level error for controller actions.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
