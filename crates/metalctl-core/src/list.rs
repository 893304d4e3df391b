// ── Paginated list controller ──
//
// One controller drives one paginated admin surface (users, thoughts,
// feedback, ...). It owns the canonical query (page, limit, filters,
// search) and publishes every state transition over a watch channel, so
// any number of views can render the latest snapshot without polling.
//
// Two invariants the controller enforces:
//
//  * Responses apply in issue order. Each fetch takes a monotonic id and
//    a response is dropped if a newer fetch was issued while it was in
//    flight, so a slow page-2 response can never clobber page 3.
//
//  * Errors never blank the screen. A failed fetch keeps the previous
//    items visible and sets `error`; the next successful fetch clears it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use metalctl_api::{
    AdminClient, Broadcast, Connection, Feedback, Message, PageQuery, PageResult, Pagination,
    Prompt, Thought, User,
};

use crate::error::CoreError;

/// How long a search keystroke waits for a successor before it fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// A server resource that can be fetched one page at a time.
///
/// Implementors are lightweight markers; ones that need scope (a parent
/// id, say) carry it as a field and thread it into the request path.
pub trait PagedResource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Resource name used in log output.
    const NAME: &'static str;

    fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> impl Future<Output = Result<PageResult<Self::Item>, metalctl_api::Error>> + Send;
}

/// The registered user roster.
pub struct Users;

impl PagedResource for Users {
    type Item = User;
    const NAME: &'static str = "users";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<User>, metalctl_api::Error> {
        client.list_users(query).await
    }
}

/// User-authored thought posts.
pub struct Thoughts;

impl PagedResource for Thoughts {
    type Item = Thought;
    const NAME: &'static str = "thoughts";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<Thought>, metalctl_api::Error> {
        client.list_thoughts(query).await
    }
}

/// The feedback triage queue.
pub struct FeedbackQueue;

impl PagedResource for FeedbackQueue {
    type Item = Feedback;
    const NAME: &'static str = "feedback";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<Feedback>, metalctl_api::Error> {
        client.list_feedback(query).await
    }
}

/// Past broadcast campaigns, newest first.
pub struct BroadcastHistory;

impl PagedResource for BroadcastHistory {
    type Item = Broadcast;
    const NAME: &'static str = "broadcasts";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<Broadcast>, metalctl_api::Error> {
        client.broadcast_history(query).await
    }
}

/// Matched user pairs.
pub struct Connections;

impl PagedResource for Connections {
    type Item = Connection;
    const NAME: &'static str = "connections";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<Connection>, metalctl_api::Error> {
        client.list_connections(query).await
    }
}

/// Message history within a single connection.
pub struct ConnectionMessages {
    pub connection_id: String,
}

impl PagedResource for ConnectionMessages {
    type Item = Message;
    const NAME: &'static str = "messages";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<Message>, metalctl_api::Error> {
        client.connection_messages(&self.connection_id, query).await
    }
}

/// Onboarding prompt catalogue. The endpoint is unpaginated; the full
/// list is presented as a single page.
pub struct Prompts;

impl PagedResource for Prompts {
    type Item = Prompt;
    const NAME: &'static str = "prompts";

    async fn fetch(
        &self,
        client: &AdminClient,
        query: &PageQuery,
    ) -> Result<PageResult<Prompt>, metalctl_api::Error> {
        let items = client.list_prompts().await?;
        let total = items.len() as u64;
        Ok(PageResult {
            items,
            pagination: Pagination {
                page: 1,
                limit: query.limit,
                total,
                total_pages: 1,
                has_next_page: false,
                has_prev_page: false,
            },
        })
    }
}

/// Snapshot of a list surface, as published over the watch channel.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub page: u32,
    pub limit: u32,
    pub filters: BTreeMap<String, String>,
    pub search: String,
    /// Items from the last successful fetch. Survives failed refreshes.
    pub items: Arc<Vec<T>>,
    pub pagination: Pagination,
    pub is_loading: bool,
    /// Display message for the last failed fetch, empty when healthy.
    pub error: String,
}

impl<T> ListState<T> {
    fn new(query: &PageQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            filters: query.filters.clone(),
            search: query.search.clone().unwrap_or_default(),
            items: Arc::new(Vec::new()),
            pagination: Pagination::default(),
            is_loading: false,
            error: String::new(),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

struct ListInner<R: PagedResource> {
    client: Arc<AdminClient>,
    resource: R,
    query: Mutex<PageQuery>,
    state: watch::Sender<ListState<R::Item>>,
    /// Id of the most recently issued fetch. A response is applied only
    /// while its own id is still the newest.
    issued: AtomicU64,
    /// Bumped on every keystroke; a sleeping debounce task resigns when
    /// it wakes to find itself superseded.
    search_gen: AtomicU64,
    debounce: Duration,
}

/// Controller for one paginated list surface.
///
/// Cheap to clone; all clones share query, state, and sequencing.
pub struct ListController<R: PagedResource> {
    inner: Arc<ListInner<R>>,
}

impl<R: PagedResource> Clone for ListController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: PagedResource> ListController<R> {
    pub fn new(client: Arc<AdminClient>, resource: R) -> Self {
        Self::with_query(client, resource, PageQuery::default())
    }

    /// Start from a caller-supplied query, e.g. CLI flags.
    pub fn with_query(client: Arc<AdminClient>, resource: R, query: PageQuery) -> Self {
        let (state, _) = watch::channel(ListState::new(&query));
        Self {
            inner: Arc::new(ListInner {
                client,
                resource,
                query: Mutex::new(query),
                state,
                issued: AtomicU64::new(0),
                search_gen: AtomicU64::new(0),
                debounce: SEARCH_DEBOUNCE,
            }),
        }
    }

    /// Subscribe to state snapshots. Each subscriber sees every change
    /// made after it subscribed, plus the current value immediately.
    pub fn subscribe(&self) -> watch::Receiver<ListState<R::Item>> {
        self.inner.state.subscribe()
    }

    /// The current state, cloned out of the channel.
    pub fn snapshot(&self) -> ListState<R::Item> {
        self.inner.state.borrow().clone()
    }

    /// The shared API client, for out-of-band calls like detail fetches.
    pub fn client(&self) -> &Arc<AdminClient> {
        &self.inner.client
    }

    /// Re-fetch the current page with the current query.
    pub async fn refresh(&self) {
        let query = self.inner.query.lock().unwrap_or_else(PoisonError::into_inner).clone();
        self.run_fetch(query).await;
    }

    /// Jump to a page. Out-of-range pages are the server's to reject;
    /// the controller only clamps below 1.
    pub async fn set_page(&self, page: u32) {
        let query = {
            let mut q = self.inner.query.lock().unwrap_or_else(PoisonError::into_inner);
            q.page = page.max(1);
            q.clone()
        };
        self.run_fetch(query).await;
    }

    /// Change the page size and return to page 1.
    pub async fn set_limit(&self, limit: u32) {
        let query = {
            let mut q = self.inner.query.lock().unwrap_or_else(PoisonError::into_inner);
            q.limit = limit.max(1);
            q.page = 1;
            q.clone()
        };
        self.run_fetch(query).await;
    }

    /// Set or clear a filter and return to page 1.
    pub async fn set_filter(&self, key: &str, value: Option<&str>) {
        let query = {
            let mut q = self.inner.query.lock().unwrap_or_else(PoisonError::into_inner);
            q.set_filter(key, value);
            q.page = 1;
            q.clone()
        };
        self.run_fetch(query).await;
    }

    /// Record a search keystroke.
    ///
    /// The fetch is debounced: it fires only after [`SEARCH_DEBOUNCE`]
    /// of quiet, and a burst of keystrokes produces a single request
    /// carrying the final text. Firing resets to page 1 unless the text
    /// is unchanged from the last applied search, in which case nothing
    /// is fetched at all.
    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        let generation = self.inner.search_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let ctrl = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ctrl.inner.debounce).await;
            if ctrl.inner.search_gen.load(Ordering::SeqCst) != generation {
                return;
            }
            ctrl.apply_search(text).await;
        });
    }

    async fn apply_search(&self, text: String) {
        let query = {
            let mut q = self.inner.query.lock().unwrap_or_else(PoisonError::into_inner);
            if q.search.as_deref().unwrap_or_default() == text {
                return;
            }
            q.search = Some(text);
            q.page = 1;
            q.clone()
        };
        self.run_fetch(query).await;
    }

    async fn run_fetch(&self, query: PageQuery) {
        let id = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.send_modify(|s| {
            s.page = query.page;
            s.limit = query.limit;
            s.filters = query.filters.clone();
            s.search = query.search.clone().unwrap_or_default();
            s.is_loading = true;
        });

        tracing::debug!(resource = R::NAME, page = query.page, id, "fetching page");
        let result = self.inner.resource.fetch(&self.inner.client, &query).await;

        if self.inner.issued.load(Ordering::SeqCst) != id {
            tracing::debug!(resource = R::NAME, id, "discarding superseded response");
            return;
        }

        match result {
            Ok(page) => {
                self.inner.state.send_modify(|s| {
                    s.items = Arc::new(page.items);
                    s.pagination = page.pagination;
                    s.is_loading = false;
                    s.error.clear();
                });
            }
            Err(err) => {
                let message = CoreError::from(err).display_message();
                tracing::warn!(resource = R::NAME, error = %message, "fetch failed");
                self.inner.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = message;
                });
            }
        }
    }
}

impl ListController<Users> {
    /// Fetch one user's full record for a detail view.
    ///
    /// This is out-of-band: it never touches the roster's page, filters,
    /// or published state, so closing the detail view returns to the list
    /// exactly as it was left.
    pub async fn fetch_user_detail(&self, id: &str) -> Result<User, CoreError> {
        Ok(self.inner.client.get_user(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_starts_empty_and_healthy() {
        let q = PageQuery::default();
        let state: ListState<User> = ListState::new(&q);
        assert!(state.items.is_empty());
        assert!(!state.is_loading);
        assert!(!state.has_error());
        assert_eq!(state.page, 1);
    }
}
