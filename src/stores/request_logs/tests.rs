use super::*;
use crate::bridge::testing::{fail, ok, ScriptedBridge};
use serde_json::{json, Value};

struct SignedIn(bool);

impl SessionGate for SignedIn {
    fn is_authenticated(&self) -> bool {
        self.0
    }
}

fn store(signed_in: bool) -> (Arc<ScriptedBridge>, RequestLogsStore) {
    let bridge = Arc::new(ScriptedBridge::new());
    let store = RequestLogsStore::new(
        bridge.clone(),
        Arc::new(SignedIn(signed_in)),
        PaginationOptions::default(),
        DEFAULT_LOG_LIMIT,
    );
    (bridge, store)
}

fn log_json(id: &str, status_code: i32) -> Value {
    json!({
        "id": id,
        "apiKeyName": "prod",
        "method": "POST",
        "path": "/v1beta/models/gemini-pro:generateContent",
        "statusCode": status_code,
        "responseTimeMs": 840,
        "createdAt": "2024-05-01T08:00:00Z"
    })
}

#[tokio::test]
async fn fetch_logs_uses_default_limit() {
    let (bridge, store) = store(true);
    bridge
        .reply(commands::GET_REQUEST_LOGS, ok(json!([log_json("l1", 200), log_json("l2", 502)])))
        .reply(commands::GET_REQUEST_LOGS, ok(json!([])));

    store.fetch_logs(None).await;
    assert_eq!(bridge.calls()[0], (commands::GET_REQUEST_LOGS, json!({"limit": 100})));
    let state = store.snapshot();
    assert_eq!(state.logs.len(), 2);
    assert_eq!(state.logs[1].status_code, 502);
    assert_eq!(state.last_fetch(), FetchMode::All);

    store.fetch_logs(Some(25)).await;
    assert_eq!(bridge.calls()[1], (commands::GET_REQUEST_LOGS, json!({"limit": 25})));
    assert!(store.snapshot().logs.is_empty());
}

#[tokio::test]
async fn paginated_logs_follow_server_meta() {
    let (bridge, store) = store(true);
    bridge
        .reply(
            commands::GET_REQUEST_LOGS_PAGINATED,
            ok(json!({
                "logs": [log_json("l1", 200)],
                "totalCount": 95,
                "page": 1,
                "perPage": 20,
                "totalPages": 5
            })),
        )
        .reply(
            commands::GET_REQUEST_LOGS_PAGINATED,
            ok(json!({
                "logs": [log_json("l95", 200)],
                "totalCount": 95,
                "page": 5,
                "perPage": 20,
                "totalPages": 5
            })),
        );

    store.fetch_page(1, 20).await;
    assert_eq!(store.snapshot().pagination.total_pages(), 5);

    store.last_page().await;
    let state = store.snapshot();
    assert_eq!(state.logs[0].id, "l95");
    assert_eq!(state.pagination.current_page(), 5);
    let range = state.pagination.data_range();
    assert_eq!((range.start, range.end), (81, 95));

    store.next_page().await;
    assert_eq!(bridge.call_count(commands::GET_REQUEST_LOGS_PAGINATED), 2);
}

#[tokio::test]
async fn stats_failure_keeps_previous_stats() {
    let (bridge, store) = store(true);
    bridge
        .reply(
            commands::GET_USAGE_STATS,
            ok(json!({"totalRequests": 12, "totalUsage": 40, "avgResponseTime": 512.5})),
        )
        .reply(commands::GET_USAGE_STATS, fail("database locked"));

    store.fetch_stats().await;
    let stats = store.snapshot().stats.unwrap();
    assert_eq!(stats.total_requests, 12);
    assert_eq!(stats.total_usage, Some(40));

    store.fetch_stats().await;
    let state = store.snapshot();
    assert_eq!(state.stats.map(|s| s.total_requests), Some(12));
    assert_eq!(state.status.error.as_deref(), Some("database locked"));
    assert!(!state.status.loading);
}

#[tokio::test]
async fn signed_out_store_stays_idle() {
    let (bridge, store) = store(false);
    store.fetch_logs(None).await;
    store.fetch_page(1, 20).await;
    store.fetch_stats().await;
    assert!(bridge.calls().is_empty());
    assert_eq!(store.snapshot().status, AsyncStatus::default());
}

#[tokio::test]
async fn reset_clears_logs_and_stats() {
    let (bridge, store) = store(true);
    bridge
        .reply(commands::GET_REQUEST_LOGS, ok(json!([log_json("l1", 200)])))
        .reply(commands::GET_USAGE_STATS, ok(json!({"totalRequests": 1})));
    store.fetch_logs(None).await;
    store.fetch_stats().await;

    store.reset();

    let state = store.snapshot();
    assert!(state.logs.is_empty());
    assert_eq!(state.stats, None);
    assert_eq!(state.pagination.state(), PaginationController::default().state());
}
