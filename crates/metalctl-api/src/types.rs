// ── Wire types for the Metal admin API ──
//
// DTOs mirror the remote API verbatim: the dashboard does not own these
// records, it only reads and occasionally mutates them. Every field the
// backend might omit carries a serde default so envelope drift degrades
// to empty values instead of decode failures.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── Pagination ──────────────────────────────────────────────────────

/// Pagination metadata as returned inside every list envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of a resource listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Query state for a paginated list request.
///
/// Invariant: `page >= 1`. Filter and search values are only emitted when
/// non-empty, so the wire request carries exactly what the caller set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: BTreeMap<String, String>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            filters: BTreeMap::new(),
            search: None,
        }
    }

    /// Set or clear a named filter. `None` (or an empty value) removes it.
    pub fn set_filter(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) if !v.is_empty() => {
                self.filters.insert(name.to_owned(), v.to_owned());
            }
            _ => {
                self.filters.remove(name);
            }
        }
    }

    /// Render the query-string parameters for this request.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_owned(), self.page.to_string()),
            ("limit".to_owned(), self.limit.to_string()),
        ];
        for (name, value) in &self.filters {
            params.push((name.clone(), value.clone()));
        }
        if let Some(ref search) = self.search {
            if !search.is_empty() {
                params.push(("search".to_owned(), search.clone()));
            }
        }
        params
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(20)
    }
}

// ── Envelope decoding ───────────────────────────────────────────────
//
// Lists arrive as `{data: {<resourceName>: [...], pagination: {...}}}`.
// The backend has been observed to drop members of that shape; decoding
// defaults anything missing rather than raising.

/// Decode a paginated list envelope keyed by `resource`.
pub fn paged_from_envelope<T: DeserializeOwned>(
    value: &Value,
    resource: &str,
) -> Result<PageResult<T>, Error> {
    let data = value.get("data");

    let items = match data.and_then(|d| d.get(resource)) {
        Some(items) => decode(items)?,
        None => Vec::new(),
    };
    let pagination = match data.and_then(|d| d.get("pagination")) {
        Some(p) => decode(p)?,
        None => Pagination::default(),
    };

    Ok(PageResult { items, pagination })
}

/// Decode a single record from `data.<key>`, falling back to `data` itself.
pub fn single_from_envelope<T: DeserializeOwned>(value: &Value, key: &str) -> Result<T, Error> {
    let data = value.get("data").unwrap_or(value);
    let record = data.get(key).unwrap_or(data);
    decode(record)
}

/// Decode a plain (non-paginated) list from `data.<key>`.
pub fn list_from_envelope<T: DeserializeOwned>(value: &Value, key: &str) -> Result<Vec<T>, Error> {
    match value.get("data").and_then(|d| d.get(key)) {
        Some(items) => decode(items),
        None => Ok(Vec::new()),
    }
}

/// Pull the bearer token out of an auth response.
///
/// The backend has shipped `data.token`, `data.data.token`, and a bare
/// top-level `token` at various times; accept all three.
pub fn token_from_envelope(value: &Value) -> Option<String> {
    let paths = [
        value.get("data").and_then(|d| d.get("token")),
        value
            .get("data")
            .and_then(|d| d.get("data"))
            .and_then(|d| d.get("token")),
        value.get("token"),
    ];
    paths
        .into_iter()
        .flatten()
        .find_map(|t| t.as_str())
        .map(ToOwned::to_owned)
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

// ── Resource records ────────────────────────────────────────────────

/// Embedded author summary carried by thoughts, feedback, and connections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSummary {
    pub id: Option<String>,
    pub full_name: String,
    pub username: String,
    pub email: Option<String>,
    pub metal_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
}

/// A platform member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    /// Raw profile status: `complete` or `incomplete`.
    pub status: String,
    pub is_verified: bool,
    pub metal_name: Option<String>,
    pub created_at: String,
    pub last_active: Option<String>,
    pub spark_balance: i64,
    pub connection_count: u32,
    pub location: Option<Location>,
}

/// A posted thought.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thought {
    pub id: String,
    pub user_id: String,
    pub user: UserSummary,
    pub content: String,
    pub connection_only: bool,
    pub created_at: String,
    pub reaction_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackReply {
    pub id: String,
    pub admin_id: String,
    pub admin_name: String,
    pub message: String,
    pub created_at: String,
}

/// User-submitted feedback with any admin replies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feedback {
    pub id: String,
    pub user_id: String,
    pub user: UserSummary,
    pub message: String,
    /// Raw status: `pending` or `resolved`.
    pub status: String,
    pub created_at: String,
    pub replies: Vec<FeedbackReply>,
}

/// A broadcast notification record from the history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Broadcast {
    pub id: String,
    pub title: String,
    pub message: String,
    pub target_audience: String,
    pub recipient_count: u64,
    /// Raw delivery status from the backend (`sent`, `sending`, ...).
    pub status: String,
    pub created_at: String,
    /// Older rows carry `sentAt` instead of `createdAt`.
    pub sent_at: Option<String>,
}

impl Broadcast {
    /// Best-effort creation timestamp, preferring `createdAt`.
    pub fn timestamp(&self) -> &str {
        if self.created_at.is_empty() {
            self.sent_at.as_deref().unwrap_or_default()
        } else {
            &self.created_at
        }
    }
}

/// A connection (mutual match) between two members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connection {
    pub id: String,
    pub user1: UserSummary,
    pub user2: UserSummary,
    pub status: String,
    pub connected_on: String,
    pub last_updated_at: String,
    pub last_message: Option<String>,
    pub last_sender_id: Option<String>,
}

/// A chat message within a connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender: UserSummary,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub created_at: String,
}

/// An onboarding/profile prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prompt {
    pub id: String,
    pub text: String,
    pub order: Option<u32>,
    pub created_at: Option<String>,
}

// ── Stats ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total: u64,
    pub complete: u64,
    pub incomplete: u64,
    pub new_today: u64,
    pub verified: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_active_users: u64,
    pub todays_thoughts: u64,
    pub todays_users: u64,
    pub todays_connections: u64,
}
