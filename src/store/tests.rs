use std::time::Duration;

use super::{FailureMode, FlakyStore, KvStore, MemoryStore, StoreError};

#[tokio::test]
async fn put_then_get_round_trips() {
    let store = MemoryStore::new();

    store
        .put("k", b"value".to_vec(), Duration::from_secs(60))
        .await
        .expect("put");

    let got = store.get("k").await.expect("get");
    assert_eq!(got.as_deref(), Some(b"value".as_slice()));
}

#[tokio::test]
async fn get_missing_key_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("absent").await.expect("get").is_none());
}

#[tokio::test]
async fn put_overwrites_idempotently() {
    let store = MemoryStore::new();

    store
        .put("k", b"first".to_vec(), Duration::from_secs(60))
        .await
        .expect("put");
    store
        .put("k", b"second".to_vec(), Duration::from_secs(60))
        .await
        .expect("put");

    let got = store.get("k").await.expect("get");
    assert_eq!(got.as_deref(), Some(b"second".as_slice()));
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let store = MemoryStore::new();

    store
        .put("short", b"gone soon".to_vec(), Duration::from_millis(30))
        .await
        .expect("put");

    assert!(store.get("short").await.expect("get").is_some());
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(store.get("short").await.expect("get").is_none());
}

#[tokio::test]
async fn incr_is_monotone_and_returns_new_value() {
    let store = MemoryStore::new();

    assert_eq!(store.incr("n").await.expect("incr"), 1);
    assert_eq!(store.incr("n").await.expect("incr"), 2);
    assert_eq!(store.incr("n").await.expect("incr"), 3);
    assert_eq!(store.read_counter("n").await.expect("read"), 3);
}

#[tokio::test]
async fn absent_counter_reads_zero() {
    let store = MemoryStore::new();
    assert_eq!(store.read_counter("never").await.expect("read"), 0);
}

#[tokio::test]
async fn concurrent_incr_loses_no_updates() {
    let store = MemoryStore::new();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..100 {
                store.incr("shared").await.expect("incr");
            }
        }));
    }
    for handle in handles {
        handle.await.expect("join");
    }

    assert_eq!(store.read_counter("shared").await.expect("read"), 800);
}

#[tokio::test]
async fn len_and_clear_track_live_entries() {
    let store = MemoryStore::new();
    assert!(store.is_empty());

    store
        .put("durable", b"1".to_vec(), Duration::from_secs(60))
        .await
        .expect("put");
    store
        .put("fleeting", b"2".to_vec(), Duration::from_millis(30))
        .await
        .expect("put");
    assert_eq!(store.len(), 2);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(store.len(), 1);

    store.incr("n").await.expect("incr");
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.read_counter("n").await.expect("read"), 0);
}

#[tokio::test]
async fn clones_share_state() {
    let store = MemoryStore::new();
    let clone = store.clone();

    store
        .put("k", b"shared".to_vec(), Duration::from_secs(60))
        .await
        .expect("put");

    assert!(clone.get("k").await.expect("get").is_some());
}

#[tokio::test]
async fn flaky_store_injects_errors() {
    let store = FlakyStore::new();
    store.set_mode(FailureMode::Errors);

    let err = store.get("k").await.expect_err("should fail");
    assert!(matches!(err, StoreError::Unavailable { .. }));

    store.set_mode(FailureMode::Healthy);
    assert!(store.get("k").await.is_ok());
}

#[tokio::test]
async fn flaky_store_inner_bypasses_injection() {
    let store = FlakyStore::new();
    store.set_mode(FailureMode::Errors);

    // Seeding through the inner handle works even while errors are injected.
    store
        .inner()
        .put("seeded", b"value".to_vec(), Duration::from_secs(60))
        .await
        .expect("inner put");
    assert!(store.get("seeded").await.is_err());

    store.set_mode(FailureMode::Healthy);
    let got = store.get("seeded").await.expect("get");
    assert_eq!(got.as_deref(), Some(b"value".as_slice()));
}
