//! CLI error types with miette diagnostics.
//!
//! Maps API and controller errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use metalctl_core::CoreError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Metal API")]
    #[diagnostic(
        code(metal::connection_failed),
        help(
            "Check your network and the configured base URL.\n\
             Try: metalctl health -v"
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(metal::timeout),
        help("Increase the timeout with --timeout or check API responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not authenticated")]
    #[diagnostic(
        code(metal::auth_required),
        help("Log in first: metalctl login --email <EMAIL>")
    )]
    AuthRequired,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(metal::auth_failed),
        help("Verify the email and password and try again.")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource} '{identifier}' not found")]
    #[diagnostic(
        code(metal::not_found),
        help("Run: metalctl {list_command} to see available items")
    )]
    NotFound {
        resource: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(metal::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(metal::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration error: {0}")]
    #[diagnostic(code(metal::config))]
    Config(#[from] metalctl_config::ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthRequired | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap an API not-found for a named resource with a list hint.
    pub fn not_found(resource: &str, identifier: &str, list_command: &str) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }
}

// ── API error → CliError mapping ─────────────────────────────────────

impl From<metalctl_api::Error> for CliError {
    fn from(err: metalctl_api::Error) -> Self {
        match err {
            metalctl_api::Error::Unauthorized => Self::AuthRequired,
            metalctl_api::Error::Authentication { message } => Self::AuthFailed { message },
            metalctl_api::Error::Network(e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed { source: e.into() }
                } else {
                    Self::Api {
                        message: e.to_string(),
                    }
                }
            }
            other => Self::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized => Self::AuthRequired,
            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            other => Self::Api {
                message: other.display_message(),
            },
        }
    }
}
