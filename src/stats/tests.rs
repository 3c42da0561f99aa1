use std::sync::Arc;

use super::{Counter, Counters, StatsAggregator, StatsReport, StatsSnapshot, StoreCounters};
use crate::store::{FailureMode, FlakyStore, MemoryStore};

fn zero_snapshot() -> StatsSnapshot {
    StatsSnapshot {
        resumes_processed: 0,
        cache_hits: 0,
        cache_misses: 0,
        cache_operations: 0,
        resumes_failed: 0,
    }
}

#[test]
fn hit_rate_is_zero_without_activity() {
    assert_eq!(zero_snapshot().hit_rate_percent(), 0);
}

#[test]
fn hit_rate_rounds_to_nearest_percent() {
    let snapshot = StatsSnapshot {
        cache_hits: 3,
        cache_misses: 1,
        ..zero_snapshot()
    };
    assert_eq!(snapshot.hit_rate_percent(), 75);

    let snapshot = StatsSnapshot {
        cache_hits: 1,
        cache_misses: 2,
        ..zero_snapshot()
    };
    assert_eq!(snapshot.hit_rate_percent(), 33);

    let snapshot = StatsSnapshot {
        cache_hits: 2,
        cache_misses: 1,
        ..zero_snapshot()
    };
    assert_eq!(snapshot.hit_rate_percent(), 67);
}

#[tokio::test]
async fn increments_are_visible_in_report() {
    let counters = Arc::new(StoreCounters::new(MemoryStore::new()));

    counters.incr(Counter::CacheHits).await;
    counters.incr(Counter::CacheHits).await;
    counters.incr(Counter::CacheMisses).await;
    counters.incr(Counter::ResumesProcessed).await;

    let aggregator = StatsAggregator::new(counters);
    let report = aggregator.report().await;

    let snapshot = report.snapshot().expect("available");
    assert_eq!(snapshot.cache_hits, 2);
    assert_eq!(snapshot.cache_misses, 1);
    assert_eq!(snapshot.resumes_processed, 1);
    assert_eq!(snapshot.resumes_failed, 0);
}

#[tokio::test]
async fn all_zero_report_is_available_not_unavailable() {
    let counters = Arc::new(StoreCounters::new(MemoryStore::new()));
    let aggregator = StatsAggregator::new(counters);

    let report = aggregator.report().await;
    assert!(report.is_available());
    assert_eq!(report.snapshot(), Some(&zero_snapshot()));
}

#[tokio::test]
async fn unreadable_backend_reports_unavailable() {
    let store = Arc::new(FlakyStore::new());
    let counters = Arc::new(StoreCounters::new(Arc::clone(&store)));
    let aggregator = StatsAggregator::new(counters);

    store.set_mode(FailureMode::Errors);
    let report = aggregator.report().await;
    assert!(matches!(report, StatsReport::Unavailable { .. }));

    store.set_mode(FailureMode::Healthy);
    assert!(aggregator.report().await.is_available());
}

#[tokio::test]
async fn failed_increment_is_swallowed() {
    let store = Arc::new(FlakyStore::new());
    let counters = StoreCounters::new(Arc::clone(&store));

    store.set_mode(FailureMode::Errors);
    // Must not panic or propagate.
    counters.incr(Counter::CacheOperations).await;

    store.set_mode(FailureMode::Healthy);
    assert_eq!(counters.read(Counter::CacheOperations).await.expect("read"), 0);
}
