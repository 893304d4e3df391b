use thiserror::Error;

/// Top-level error type for the `metalctl-api` crate.
///
/// Covers every failure mode of a call against the admin API: transport,
/// non-2xx responses, session expiry, and body decoding. `metalctl-core`
/// flattens these into user-facing message strings.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the parsed `error`/`message` field
    /// from the JSON body, or the HTTP status text when parsing fails.
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// 401 on a non-auth endpoint. The session has already been torn down
    /// by the time this surfaces.
    #[error("unauthorized -- session expired or token invalid")]
    Unauthorized,

    /// Login or signup rejected. Carries the server's message so the form
    /// can show it inline; never triggers session teardown.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// The HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
