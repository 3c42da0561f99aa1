//! Scripted gateway implementations for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::payload::ParsedResume;

use super::error::GatewayError;
use super::{ParseGateway, ResumeFile, SimilarityProvider};

/// In-process [`ParseGateway`] with scripted per-filename outcomes and call
/// accounting (how many gateway calls went out, and which files each saw).
#[derive(Default)]
pub struct MockParseGateway {
    responses: Mutex<HashMap<String, Result<ParsedResume, String>>>,
    calls: AtomicUsize,
    files_seen: Mutex<Vec<Vec<String>>>,
}

impl MockParseGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful parse for `filename`.
    pub fn respond_with(&self, filename: &str, payload: ParsedResume) {
        self.responses
            .lock()
            .insert(filename.to_string(), Ok(payload));
    }

    /// Scripts a failure for `filename`.
    pub fn fail_with(&self, filename: &str, reason: &str) {
        self.responses
            .lock()
            .insert(filename.to_string(), Err(reason.to_string()));
    }

    /// Total number of gateway calls issued (`parse` and `parse_batch` each
    /// count once, regardless of batch size).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Filenames covered by each call, in call order.
    pub fn calls_seen(&self) -> Vec<Vec<String>> {
        self.files_seen.lock().clone()
    }

    fn respond(&self, file: &ResumeFile) -> Result<ParsedResume, GatewayError> {
        match self.responses.lock().get(&file.filename) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(reason)) => Err(GatewayError::Rejected {
                reason: reason.clone(),
            }),
            // Unscripted files parse to a minimal record so tests don't have
            // to script every fixture.
            None => Ok(ParsedResume::named(file.filename.clone())),
        }
    }

    fn record_call(&self, files: &[ResumeFile]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.files_seen
            .lock()
            .push(files.iter().map(|f| f.filename.clone()).collect());
    }
}

#[async_trait]
impl ParseGateway for MockParseGateway {
    async fn parse(&self, file: &ResumeFile) -> Result<ParsedResume, GatewayError> {
        self.record_call(std::slice::from_ref(file));
        self.respond(file)
    }

    async fn parse_batch(&self, files: &[ResumeFile]) -> Vec<Result<ParsedResume, GatewayError>> {
        self.record_call(files);
        files.iter().map(|f| self.respond(f)).collect()
    }
}

/// Deterministic [`SimilarityProvider`]: substring-keyed scores with an
/// optional failure trigger.
pub struct MockSimilarityProvider {
    scores: Mutex<Vec<(String, f32)>>,
    fail_for: Mutex<Vec<String>>,
    default_score: f32,
}

impl MockSimilarityProvider {
    pub fn new(default_score: f32) -> Self {
        Self {
            scores: Mutex::new(Vec::new()),
            fail_for: Mutex::new(Vec::new()),
            default_score,
        }
    }

    /// Profiles containing `marker` score `score`.
    pub fn score_for(&self, marker: &str, score: f32) {
        self.scores.lock().push((marker.to_string(), score));
    }

    /// Profiles containing `marker` fail with a transport error.
    pub fn fail_for(&self, marker: &str) {
        self.fail_for.lock().push(marker.to_string());
    }
}

impl Default for MockSimilarityProvider {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[async_trait]
impl SimilarityProvider for MockSimilarityProvider {
    async fn similarity(&self, _query: &str, profile: &str) -> Result<f32, GatewayError> {
        if self.fail_for.lock().iter().any(|m| profile.contains(m)) {
            return Err(GatewayError::Transport {
                reason: "injected similarity failure".to_string(),
            });
        }

        let score = self
            .scores
            .lock()
            .iter()
            .find(|(marker, _)| profile.contains(marker))
            .map(|(_, score)| *score)
            .unwrap_or(self.default_score);
        Ok(score)
    }
}
