// Integration tests for the list and mutation controllers against a
// mock admin API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use metalctl_api::{AdminClient, PageQuery, Session, UnauthorizedHook};
use metalctl_core::{
    CoreError, FeedbackQueue, ListController, MutationController, Thoughts, Users,
};

struct CountingHook(AtomicUsize);

impl UnauthorizedHook for CountingHook {
    fn on_unauthorized(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn client_for(server: &MockServer) -> Arc<AdminClient> {
    let session = Session::in_memory();
    session.set(secrecy_token("tok-test"));
    Arc::new(AdminClient::new(&server.uri(), session).expect("client"))
}

fn secrecy_token(raw: &str) -> secrecy::SecretString {
    secrecy::SecretString::from(raw.to_string())
}

fn feedback_page(ids: &[&str]) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "status": "pending", "message": "hello"}))
        .collect();
    json!({
        "data": {
            "feedback": items,
            "pagination": {
                "page": 1, "limit": 20, "total": ids.len(),
                "totalPages": 1, "hasNextPage": false, "hasPrevPage": false
            }
        }
    })
}

fn user_page(ids: &[&str]) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "fullName": "A", "username": "a"}))
        .collect();
    json!({
        "data": {
            "users": items,
            "pagination": {
                "page": 1, "limit": 20, "total": ids.len(),
                "totalPages": 1, "hasNextPage": false, "hasPrevPage": false
            }
        }
    })
}

#[tokio::test]
async fn refresh_sends_exactly_the_configured_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "50"))
        .and(query_param("status", "complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["u1"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = PageQuery::new(50);
    query.page = 2;
    query.set_filter("status", Some("complete"));

    let ctrl = ListController::with_query(client_for(&server), Users, query);
    ctrl.refresh().await;

    let state = ctrl.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "u1");
    assert_eq!(state.page, 2);
    assert_eq!(state.error, "");
    assert!(!state.is_loading);
}

#[tokio::test]
async fn detail_fetch_leaves_list_state_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("page", "3"))
        .and(query_param("status", "complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["u1", "u2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/users/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user": {"id": "u2", "fullName": "Grace", "username": "grace"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = PageQuery::new(20);
    query.page = 3;
    query.set_filter("status", Some("complete"));
    let ctrl = ListController::with_query(client_for(&server), Users, query);
    ctrl.refresh().await;
    let before = ctrl.snapshot();

    let user = ctrl.fetch_user_detail("u2").await.expect("detail");
    assert_eq!(user.full_name, "Grace");

    let after = ctrl.snapshot();
    assert_eq!(after.page, before.page);
    assert_eq!(after.filters, before.filters);
    assert_eq!(after.items.len(), before.items.len());
}

#[tokio::test]
async fn filter_change_resets_to_page_one_and_delivers_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/feedback"))
        .and(query_param("page", "1"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_page(&["1"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = PageQuery::default();
    query.page = 4;
    let ctrl = ListController::with_query(client_for(&server), FeedbackQueue, query);

    ctrl.set_filter("status", Some("pending")).await;

    let state = ctrl.snapshot();
    assert_eq!(state.page, 1);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "1");
    assert_eq!(state.error, "");
}

#[tokio::test]
async fn search_keystrokes_coalesce_into_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("search", "metal"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["u9"])))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), Users);
    ctrl.set_search("m");
    ctrl.set_search("me");
    ctrl.set_search("metal");

    // Past the debounce window plus slack for the fetch itself.
    tokio::time::sleep(Duration::from_millis(900)).await;

    let state = ctrl.snapshot();
    assert_eq!(state.search, "metal");
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "u9");
    server.verify().await;
}

#[tokio::test]
async fn settled_search_resets_deep_page_to_one() {
    let server = MockServer::start().await;
    // Only a page=1 request with the settled text is answered; the old
    // page=5 must not survive into the search fetch.
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("search", "iron"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["u3"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = PageQuery::new(20);
    query.page = 5;
    let ctrl = ListController::with_query(client_for(&server), Users, query);
    ctrl.set_search("iron");

    tokio::time::sleep(Duration::from_millis(900)).await;

    let state = ctrl.snapshot();
    assert_eq!(state.page, 1);
    assert_eq!(state.search, "iron");
    assert_eq!(state.items.len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn unchanged_search_text_fetches_nothing() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and set an error.
    let ctrl = ListController::new(client_for(&server), Users);

    ctrl.set_search("");
    tokio::time::sleep(Duration::from_millis(700)).await;

    let state = ctrl.snapshot();
    assert_eq!(state.error, "");
    assert!(state.items.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_items_visible() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["u1", "u2"])))
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), Users);
    ctrl.refresh().await;
    assert_eq!(ctrl.snapshot().items.len(), 2);

    // Page 2 blows up server-side.
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "database on fire"})),
        )
        .mount(&server)
        .await;

    ctrl.set_page(2).await;

    let state = ctrl.snapshot();
    assert_eq!(state.items.len(), 2, "stale items stay visible");
    assert!(state.error.contains("database on fire"));
    assert!(!state.is_loading);

    // A later success clears the error.
    ctrl.set_page(1).await;
    let state = ctrl.snapshot();
    assert_eq!(state.error, "");
}

#[tokio::test]
async fn slow_response_is_discarded_when_superseded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("page", "1"))
        .and(query_param_is_missing("status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_page(&["old"]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("status", "complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["new"])))
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), Users);

    let slow = {
        let ctrl = ctrl.clone();
        tokio::spawn(async move { ctrl.refresh().await })
    };
    // Let the slow request leave before changing the filter.
    tokio::time::sleep(Duration::from_millis(50)).await;
    ctrl.set_filter("status", Some("complete")).await;
    slow.await.unwrap();

    let state = ctrl.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "new", "late response must not clobber the newer one");
    assert_eq!(state.filters.get("status").map(String::as_str), Some("complete"));
}

#[tokio::test]
async fn repeated_refresh_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_page(&["u1"])))
        .expect(2)
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), Users);
    ctrl.refresh().await;
    let first = ctrl.snapshot();
    ctrl.refresh().await;
    let second = ctrl.snapshot();

    assert_eq!(first.items.len(), second.items.len());
    assert_eq!(first.page, second.page);
    assert_eq!(second.error, "");
}

#[tokio::test]
async fn failed_mutation_leaves_list_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/feedback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_page(&["1", "2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/feedback/1/reply"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "reply failed"})))
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), FeedbackQueue);
    ctrl.refresh().await;

    let mutations = MutationController::new(ctrl.clone());
    let err = mutations
        .submit(|client| async move { client.reply_to_feedback("1", "on it").await })
        .await
        .unwrap_err();

    assert!(err.display_message().contains("reply failed"));
    let state = ctrl.snapshot();
    assert_eq!(state.items.len(), 2, "failed mutation must not refresh or drop items");
    assert!(!mutations.is_submitting());
    server.verify().await;
}

#[tokio::test]
async fn successful_mutation_refreshes_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/feedback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_page(&["1"])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/admin/feedback/1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), FeedbackQueue);
    ctrl.refresh().await;

    let mutations = MutationController::new(ctrl.clone());
    mutations
        .submit(|client| async move { client.set_feedback_status("1", "resolved").await })
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn overlapping_submissions_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/thoughts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/thoughts/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let ctrl = ListController::new(client_for(&server), Thoughts);
    let mutations = MutationController::new(ctrl);

    let slow = {
        let mutations = mutations.clone();
        tokio::spawn(async move {
            mutations
                .submit(|client| async move { client.delete_thought("t1").await })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(mutations.is_submitting());

    let second = mutations
        .submit(|client| async move { client.delete_thought("t1").await })
        .await;
    assert!(matches!(second, Err(CoreError::SubmissionInFlight)));

    slow.await.unwrap().unwrap();
    assert!(!mutations.is_submitting());
}

#[tokio::test]
async fn mutation_401_tears_down_session_and_leaves_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/thoughts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "thoughts": [{"id": "t1", "content": "hi"}],
                "pagination": {"page": 1, "limit": 20, "total": 1, "totalPages": 1}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/thoughts/t1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let hook = Arc::new(CountingHook(AtomicUsize::new(0)));
    let session = Session::in_memory();
    session.set(secrecy_token("tok-expired"));
    let client = Arc::new(
        AdminClient::new(&server.uri(), session.clone())
            .expect("client")
            .with_unauthorized_hook(hook.clone()),
    );

    let ctrl = ListController::new(client, Thoughts);
    ctrl.refresh().await;

    let mutations = MutationController::new(ctrl.clone());
    let err = mutations
        .submit(|client| async move { client.delete_thought("t1").await })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Unauthorized));
    assert!(!session.is_authenticated(), "401 must clear the session token");
    assert_eq!(hook.0.load(Ordering::SeqCst), 1);
    assert_eq!(ctrl.snapshot().items.len(), 1, "list is not refreshed on failure");
    server.verify().await;
}
