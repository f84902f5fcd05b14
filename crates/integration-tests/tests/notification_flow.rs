//! End-to-end notification flows through the real SQLite document store.
//!
//! Drives change events through the dispatcher exactly the way the daemon
//! does, with a recording sender in place of the delivery service.

use std::sync::Arc;

use jobcast_core::application::constants::JOBS_COLLECTION;
use jobcast_core::application::{
    ChangeEvent, CustomerNotifier, Dispatcher, TriggerBinding, WorkerNotifier,
};
use jobcast_core::port::document_store::Document;
use jobcast_core::port::push_sender::mocks::RecordingPushSender;
use jobcast_infra_sqlite::{run_migrations, SqliteDocumentStore};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;

// Single-connection pool so the :memory: database is shared across queries
async fn memory_store() -> Arc<SqliteDocumentStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    Arc::new(SqliteDocumentStore::new(pool))
}

fn wired_dispatcher(
    store: Arc<SqliteDocumentStore>,
    sender: Arc<RecordingPushSender>,
) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        TriggerBinding::created(JOBS_COLLECTION),
        Arc::new(WorkerNotifier::new(store.clone(), sender.clone())),
    );
    dispatcher.register(
        TriggerBinding::updated(JOBS_COLLECTION),
        Arc::new(CustomerNotifier::new(store, sender)),
    );
    dispatcher
}

fn worker_doc(id: &str, available: bool, token: &str) -> Document {
    Document::new(
        id,
        json!({"role": "worker", "isAvailable": available, "fcmToken": token}),
    )
}

fn job_doc(status: &str) -> Document {
    Document::new(
        "job1",
        json!({
            "status": status,
            "location": {"latitude": 40.0, "longitude": -75.0},
            "customerId": "cust1"
        }),
    )
}

#[tokio::test]
async fn test_job_creation_fans_out_to_available_workers() {
    let store = memory_store().await;
    store.upsert("users", &worker_doc("w1", true, "tokA")).await.unwrap();
    store.upsert("users", &worker_doc("w2", true, "tokB")).await.unwrap();
    store.upsert("users", &worker_doc("w3", false, "tokC")).await.unwrap();

    let sender = Arc::new(RecordingPushSender::new());
    let dispatcher = wired_dispatcher(store, sender.clone());

    dispatcher
        .dispatch(&ChangeEvent::Created {
            collection: "jobs".to_string(),
            document: job_doc("pending"),
        })
        .await;

    let multicasts = sender.multicasts();
    assert_eq!(multicasts.len(), 1);

    let (tokens, payload) = &multicasts[0];
    assert_eq!(tokens, &vec!["tokA".to_string(), "tokB".to_string()]);
    assert_eq!(payload.title, "New Job Request");
    assert!(payload.body.contains("40.0"));
    assert!(payload.body.contains("-75.0"));

    // The creation event must not reach the customer notifier
    assert!(sender.singles().is_empty());
}

#[tokio::test]
async fn test_non_pending_job_creation_sends_nothing() {
    let store = memory_store().await;
    store.upsert("users", &worker_doc("w1", true, "tokA")).await.unwrap();

    let sender = Arc::new(RecordingPushSender::new());
    let dispatcher = wired_dispatcher(store, sender.clone());

    dispatcher
        .dispatch(&ChangeEvent::Created {
            collection: "jobs".to_string(),
            document: job_doc("draft"),
        })
        .await;

    assert!(sender.multicasts().is_empty());
}

#[tokio::test]
async fn test_fan_out_pages_through_a_large_worker_set() {
    let store = memory_store().await;
    for i in 1..=1200 {
        let id = format!("w{:04}", i);
        let token = format!("tok-{}", id);
        store.upsert("users", &worker_doc(&id, true, &token)).await.unwrap();
    }
    // Ineligible records interleaved with the eligible set
    store.upsert("users", &worker_doc("w0000", false, "tok-off")).await.unwrap();
    store
        .upsert("users", &Document::new("w9999", json!({"role": "customer"})))
        .await
        .unwrap();

    let sender = Arc::new(RecordingPushSender::new());
    let dispatcher = wired_dispatcher(store, sender.clone());

    dispatcher
        .dispatch(&ChangeEvent::Created {
            collection: "jobs".to_string(),
            document: job_doc("pending"),
        })
        .await;

    let multicasts = sender.multicasts();
    assert_eq!(multicasts.len(), 1);
    assert_eq!(multicasts[0].0.len(), 1200);
}

#[tokio::test]
async fn test_status_change_notifies_the_customer() {
    let store = memory_store().await;
    store
        .upsert(
            "users",
            &Document::new("cust1", json!({"role": "customer", "fcmToken": "tokC"})),
        )
        .await
        .unwrap();

    let sender = Arc::new(RecordingPushSender::new());
    let dispatcher = wired_dispatcher(store, sender.clone());

    dispatcher
        .dispatch(&ChangeEvent::Updated {
            collection: "jobs".to_string(),
            before: job_doc("pending"),
            after: job_doc("completed"),
        })
        .await;

    let singles = sender.singles();
    assert_eq!(singles.len(), 1);
    assert_eq!(singles[0].0, "tokC");
    assert!(singles[0].1.body.contains("completed"));

    // The update event must not reach the worker fan-out
    assert!(sender.multicasts().is_empty());
}

#[tokio::test]
async fn test_customer_without_token_is_a_quiet_no_op() {
    let store = memory_store().await;
    store
        .upsert("users", &Document::new("cust1", json!({"role": "customer"})))
        .await
        .unwrap();

    let sender = Arc::new(RecordingPushSender::new());
    let dispatcher = wired_dispatcher(store, sender.clone());

    dispatcher
        .dispatch(&ChangeEvent::Updated {
            collection: "jobs".to_string(),
            before: job_doc("pending"),
            after: job_doc("completed"),
        })
        .await;

    assert!(sender.singles().is_empty());
}

#[tokio::test]
async fn test_events_parse_from_daemon_wire_format() {
    let store = memory_store().await;
    store.upsert("users", &worker_doc("w1", true, "tokA")).await.unwrap();

    let sender = Arc::new(RecordingPushSender::new());
    let dispatcher = wired_dispatcher(store, sender.clone());

    // Same JSON-lines shape the daemon reads from stdin
    let line = r#"{"kind":"created","collection":"jobs","document":{"id":"job1","data":{"status":"pending","location":{"latitude":40.0,"longitude":-75.0},"customerId":"cust1"}}}"#;
    let event: ChangeEvent = serde_json::from_str(line).unwrap();

    dispatcher.dispatch(&event).await;

    assert_eq!(sender.multicasts().len(), 1);
}
