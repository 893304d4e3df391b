// ── Session token handling ──
//
// The admin API authenticates every request with a bearer token minted by
// login/signup. The token lives in an explicit `Session` object with clear
// init/teardown points; an optional `TokenStore` persists it across runs.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

/// Persistence seam for the bearer token.
///
/// `metalctl-config` provides the on-disk implementation; tests use
/// in-memory stubs. Persistence failures are logged, never fatal --
/// an unwritable store degrades to a per-process session.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<SecretString>;
    fn save(&self, token: &SecretString) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

/// Hook invoked when a non-auth endpoint answers 401.
///
/// The browser original redirected to the login page here. The CLI installs
/// a hook that tells the operator to re-run `metalctl login`; tests install
/// counting stubs to assert the at-most-once-per-response law.
pub trait UnauthorizedHook: Send + Sync {
    fn on_unauthorized(&self);
}

/// The bearer-token session shared by all API calls.
///
/// Cheaply cloneable. Created empty or primed from a [`TokenStore`];
/// `set` on successful login/signup, `clear` on logout or the first 401.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    token: RwLock<Option<SecretString>>,
    store: Option<Box<dyn TokenStore>>,
}

impl Session {
    /// A session with no persistence. Token lives for the process only.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(None),
                store: None,
            }),
        }
    }

    /// A session backed by a [`TokenStore`], primed with any stored token.
    pub fn with_store(store: Box<dyn TokenStore>) -> Self {
        let token = store.load();
        if token.is_some() {
            debug!("restored bearer token from store");
        }
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                store: Some(store),
            }),
        }
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }

    /// Install a new token (successful login/signup) and persist it.
    pub fn set(&self, token: SecretString) {
        if let Some(ref store) = self.inner.store {
            if let Err(e) = store.save(&token) {
                warn!(error = %e, "failed to persist bearer token");
            }
        }
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token);
    }

    /// Destroy the token (logout or 401) and wipe the store.
    pub fn clear(&self) {
        if let Some(ref store) = self.inner.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to clear persisted bearer token");
            }
        }
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }

    /// Expose the raw token value for header construction.
    pub(crate) fn bearer_value(&self) -> Option<String> {
        self.token()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
