// Hand-crafted async HTTP client for the Metal platform admin API.
//
// Base path: /api/v1/ (configurable)
// Auth: `Authorization: Bearer <token>` header from the Session

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::session::{Session, UnauthorizedHook};
use crate::types::{
    self, Broadcast, Connection, DashboardStats, Feedback, Message, PageQuery, PageResult, Prompt,
    Thought, User, UserStats,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether an endpoint belongs to the login/signup flow.
///
/// Auth endpoints surface their own 401/400 as an in-form error and must
/// never trigger session teardown or the unauthorized hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Standard,
    Auth,
}

// ── Error response shape from the admin API ─────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the Metal admin API.
///
/// Owns the [`Session`] and attaches its bearer token to every request.
/// Exactly one network call per invocation: no retries, no caching --
/// the remote API is the sole source of truth and callers refetch.
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    on_unauthorized: Option<Arc<dyn UnauthorizedHook>>,
}

impl AdminClient {
    // ── Constructors ────────────────────────────────────────────────

    /// Build a client against `base_url` with a default transport.
    pub fn new(base_url: &str, session: Session) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("metalctl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::from_reqwest(base_url, http, session)
    }

    /// Wrap an existing `reqwest::Client` (tests, custom transports).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        session: Session,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            session,
            on_unauthorized: None,
        })
    }

    /// Install the hook fired on a non-auth 401 (at most once per response).
    #[must_use]
    pub fn with_unauthorized_hook(mut self, hook: Arc<dyn UnauthorizedHook>) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Generic request surface ─────────────────────────────────────

    /// Issue a single request and return the parsed JSON body unchanged.
    ///
    /// Shape mapping is the caller's job; the typed wrappers below go
    /// through the envelope decoders in [`types`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        self.send(method, path, &[], body, Endpoint::Standard).await
    }

    // ── Plumbing ────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&B>,
        endpoint: Endpoint,
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!(%method, %url, "admin API request");

        let mut req = self.http.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(token) = self.session.bearer_value() {
            req = req.header(reqwest::header::AUTHORIZATION, token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        self.handle_response(resp, endpoint).await
    }

    async fn handle_response(
        &self,
        resp: reqwest::Response,
        endpoint: Endpoint,
    ) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED && endpoint == Endpoint::Standard {
            // Session teardown happens here, before the error surfaces;
            // the hook fires exactly once per 401 response.
            self.session.clear();
            if let Some(ref hook) = self.on_unauthorized {
                hook.on_unauthorized();
            }
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let message = parse_error_message(status, resp).await;
            return Err(match endpoint {
                Endpoint::Auth => Error::Authentication { message },
                Endpoint::Standard => Error::Http {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let raw = resp.text().await?;
        if raw.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&raw).map_err(|e| {
            let preview = &raw[..raw.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: raw,
            }
        })
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth ────────────────────────────────────────────────────────

    /// Log in and install the minted bearer token on the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "email": email, "password": password });
        let resp = self
            .send(Method::POST, "admin/auth/login", &[], Some(&body), Endpoint::Auth)
            .await?;
        self.install_token(&resp)
    }

    /// Create an admin account; the backend logs the new account in.
    pub async fn signup(&self, email: &str, password: &str, full_name: &str) -> Result<(), Error> {
        let body =
            serde_json::json!({ "email": email, "password": password, "fullName": full_name });
        let resp = self
            .send(Method::POST, "admin/auth/signup", &[], Some(&body), Endpoint::Auth)
            .await?;
        self.install_token(&resp)
    }

    /// Drop the session token. The backend keeps no server-side session.
    pub fn logout(&self) {
        self.session.clear();
    }

    fn install_token(&self, resp: &Value) -> Result<(), Error> {
        match types::token_from_envelope(resp) {
            Some(token) => {
                self.session.set(secrecy::SecretString::from(token));
                Ok(())
            }
            None => Err(Error::Authentication {
                message: "login response carried no token".into(),
            }),
        }
    }

    // ── Users ───────────────────────────────────────────────────────

    pub async fn list_users(&self, query: &PageQuery) -> Result<PageResult<User>, Error> {
        let resp = self
            .send::<Value>(Method::GET, "admin/users", &query.to_params(), None, Endpoint::Standard)
            .await?;
        types::paged_from_envelope(&resp, "users")
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                &format!("admin/users/{user_id}"),
                &[],
                None,
                Endpoint::Standard,
            )
            .await?;
        types::single_from_envelope(&resp, "user")
    }

    pub async fn user_stats(&self) -> Result<UserStats, Error> {
        let resp = self
            .send::<Value>(Method::GET, "admin/users/stats", &[], None, Endpoint::Standard)
            .await?;
        types::single_from_envelope(&resp, "stats")
    }

    // ── Thoughts ────────────────────────────────────────────────────

    pub async fn list_thoughts(&self, query: &PageQuery) -> Result<PageResult<Thought>, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                "admin/thoughts",
                &query.to_params(),
                None,
                Endpoint::Standard,
            )
            .await?;
        types::paged_from_envelope(&resp, "thoughts")
    }

    pub async fn get_thought(&self, thought_id: &str) -> Result<Thought, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                &format!("admin/thoughts/{thought_id}"),
                &[],
                None,
                Endpoint::Standard,
            )
            .await?;
        types::single_from_envelope(&resp, "thought")
    }

    pub async fn delete_thought(&self, thought_id: &str) -> Result<(), Error> {
        self.send::<Value>(
            Method::DELETE,
            &format!("admin/thoughts/{thought_id}"),
            &[],
            None,
            Endpoint::Standard,
        )
        .await?;
        Ok(())
    }

    // ── Feedback ────────────────────────────────────────────────────

    pub async fn list_feedback(&self, query: &PageQuery) -> Result<PageResult<Feedback>, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                "admin/feedback",
                &query.to_params(),
                None,
                Endpoint::Standard,
            )
            .await?;
        types::paged_from_envelope(&resp, "feedback")
    }

    pub async fn reply_to_feedback(&self, feedback_id: &str, message: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "message": message });
        self.send(
            Method::POST,
            &format!("admin/feedback/{feedback_id}/reply"),
            &[],
            Some(&body),
            Endpoint::Standard,
        )
        .await?;
        Ok(())
    }

    pub async fn set_feedback_status(&self, feedback_id: &str, status: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "status": status });
        self.send(
            Method::PATCH,
            &format!("admin/feedback/{feedback_id}/status"),
            &[],
            Some(&body),
            Endpoint::Standard,
        )
        .await?;
        Ok(())
    }

    // ── Broadcasts ──────────────────────────────────────────────────

    /// Send a broadcast. Returns the recipient count reported back.
    pub async fn send_broadcast(
        &self,
        title: &str,
        message: &str,
        target_audience: &str,
    ) -> Result<u64, Error> {
        let body = serde_json::json!({
            "title": title,
            "message": message,
            "targetAudience": target_audience,
        });
        let resp = self
            .send(Method::POST, "admin/broadcast", &[], Some(&body), Endpoint::Standard)
            .await?;
        Ok(resp
            .get("data")
            .and_then(|d| d.get("recipientCount"))
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    pub async fn broadcast_history(
        &self,
        query: &PageQuery,
    ) -> Result<PageResult<Broadcast>, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                "admin/broadcast/history",
                &query.to_params(),
                None,
                Endpoint::Standard,
            )
            .await?;
        types::paged_from_envelope(&resp, "broadcasts")
    }

    // ── Connections ─────────────────────────────────────────────────

    pub async fn list_connections(
        &self,
        query: &PageQuery,
    ) -> Result<PageResult<Connection>, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                "admin/connections",
                &query.to_params(),
                None,
                Endpoint::Standard,
            )
            .await?;
        types::paged_from_envelope(&resp, "connections")
    }

    pub async fn connection_messages(
        &self,
        connection_id: &str,
        query: &PageQuery,
    ) -> Result<PageResult<Message>, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                &format!("admin/connections/{connection_id}/messages"),
                &query.to_params(),
                None,
                Endpoint::Standard,
            )
            .await?;
        types::paged_from_envelope(&resp, "messages")
    }

    // ── Prompts ─────────────────────────────────────────────────────

    pub async fn list_prompts(&self) -> Result<Vec<Prompt>, Error> {
        let resp = self
            .send::<Value>(Method::GET, "admin/prompts", &[], None, Endpoint::Standard)
            .await?;
        types::list_from_envelope(&resp, "prompts")
    }

    pub async fn create_prompt(&self, text: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "text": text });
        self.send(Method::POST, "admin/prompts", &[], Some(&body), Endpoint::Standard)
            .await?;
        Ok(())
    }

    pub async fn update_prompt(&self, prompt_id: &str, text: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "text": text });
        self.send(
            Method::PUT,
            &format!("admin/prompts/{prompt_id}"),
            &[],
            Some(&body),
            Endpoint::Standard,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_prompt(&self, prompt_id: &str) -> Result<(), Error> {
        self.send::<Value>(
            Method::DELETE,
            &format!("admin/prompts/{prompt_id}"),
            &[],
            None,
            Endpoint::Standard,
        )
        .await?;
        Ok(())
    }

    // ── Dashboard ───────────────────────────────────────────────────

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        let resp = self
            .send::<Value>(
                Method::GET,
                "admin/dashboard/stats",
                &[],
                None,
                Endpoint::Standard,
            )
            .await?;
        types::single_from_envelope(&resp, "stats")
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.send::<Value>(Method::GET, "admin/health", &[], None, Endpoint::Standard)
            .await?;
        Ok(())
    }
}

/// Ensure the base URL ends with a single `/` so relative joins work.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Extract the human-readable error message from a non-2xx response.
///
/// Policy: prefer the JSON body's `error` then `message` field; fall back
/// to the HTTP status text when the body is not JSON or carries neither.
async fn parse_error_message(status: reqwest::StatusCode, resp: reqwest::Response) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToOwned::to_owned)
    };

    let raw = resp.text().await.unwrap_or_default();
    if raw.is_empty() {
        return fallback();
    }

    match serde_json::from_str::<ErrorBody>(&raw) {
        Ok(body) => body.error.or(body.message).unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}
