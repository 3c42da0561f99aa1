//! Shared fixtures for integration tests.

use std::sync::Arc;
use std::time::Duration;

use sift::{
    Counters, DedupCoordinator, MemoryStore, MockParseGateway, ParsedResume, ResultCache,
    ResumeFile, StatsAggregator, StoreCounters, TaskTracker,
};

pub const READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const TASK_TTL: Duration = Duration::from_secs(60);

/// A minimal well-formed PDF upload. Same seed, same bytes, same fingerprint.
pub fn pdf_file(name: &str, seed: u8) -> ResumeFile {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.extend(std::iter::repeat(seed).take(256));
    ResumeFile::new(name, bytes)
}

pub fn parsed_resume(name: &str, skills: &[&str], years: u32) -> ParsedResume {
    let mut resume = ParsedResume::named(name.to_string());
    resume.skills = skills.iter().map(|s| s.to_string()).collect();
    resume.years_experience = years;
    resume
}

/// Everything a pipeline test needs, wired over one shared in-memory store.
pub struct Pipeline {
    pub store: MemoryStore,
    pub gateway: Arc<MockParseGateway>,
    pub counters: Arc<dyn Counters>,
    pub coordinator: DedupCoordinator<MemoryStore>,
    pub tracker: TaskTracker<MemoryStore>,
    pub stats: StatsAggregator,
}

impl Pipeline {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let gateway = Arc::new(MockParseGateway::new());
        let counters: Arc<dyn Counters> = Arc::new(StoreCounters::new(store.clone()));
        let cache = ResultCache::new(store.clone(), counters.clone(), READ_TIMEOUT);
        let coordinator =
            DedupCoordinator::new(cache, gateway.clone(), counters.clone());
        let tracker = TaskTracker::new(store.clone(), TASK_TTL);
        let stats = StatsAggregator::new(counters.clone());
        Self {
            store,
            gateway,
            counters,
            coordinator,
            tracker,
            stats,
        }
    }
}
