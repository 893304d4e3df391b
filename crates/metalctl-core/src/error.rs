// ── Core error types ──
//
// User-facing errors from metalctl-core. Every API failure is flattened
// into one human-readable message string before it reaches a view: pages
// render it as a banner, modals render it inline. Nothing here is thrown
// past the controller layer.

use thiserror::Error;

/// Error type shared by the controller layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Client-side required-field check failed. Never sent to the server.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// A mutation was submitted while another is still in flight.
    #[error("another submission is already in flight")]
    SubmissionInFlight,

    /// Session expired or token rejected; re-authentication required.
    #[error("unauthorized -- run `metalctl login` to re-authenticate")]
    Unauthorized,

    /// Any other API failure, carrying the server's (or transport's) message.
    #[error("{message}")]
    Api { message: String },
}

impl CoreError {
    /// The message a view should display for this error.
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

impl From<metalctl_api::Error> for CoreError {
    fn from(err: metalctl_api::Error) -> Self {
        match err {
            metalctl_api::Error::Unauthorized => Self::Unauthorized,
            other => Self::Api {
                message: other.to_string(),
            },
        }
    }
}
