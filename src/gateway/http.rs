//! `reqwest` adapters for the external parse and similarity services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::payload::ParsedResume;

use super::error::GatewayError;
use super::{ParseGateway, ResumeFile, SimilarityProvider};

/// Per-file slot in the batch parse response.
#[derive(Debug, Deserialize)]
struct WireParseResult {
    filename: String,
    #[serde(default)]
    data: Option<ParsedResume>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireSimilarityRequest<'a> {
    query: &'a str,
    profile: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireSimilarityResponse {
    similarity: f32,
}

/// HTTP client for the extraction service.
///
/// `POST {base}/parse` for one file, `POST {base}/parse/batch` for many,
/// both multipart with one part per file. Every call carries the configured
/// timeout.
pub struct HttpParseGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpParseGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::from)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn file_part(file: &ResumeFile) -> Part {
        Part::bytes(file.bytes.clone()).file_name(file.filename.clone())
    }
}

impl std::fmt::Debug for HttpParseGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpParseGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ParseGateway for HttpParseGateway {
    #[instrument(skip(self, file), fields(filename = %file.filename, bytes = file.bytes.len()))]
    async fn parse(&self, file: &ResumeFile) -> Result<ParsedResume, GatewayError> {
        let form = Form::new().part("file", Self::file_part(file));

        let response = self
            .client
            .post(format!("{}/parse", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<ParsedResume>().await?)
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    async fn parse_batch(&self, files: &[ResumeFile]) -> Vec<Result<ParsedResume, GatewayError>> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", Self::file_part(file));
        }

        let response = match self
            .client
            .post(format!("{}/parse/batch", self.base_url))
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            // Whole-call transport failure: every file fails the same way.
            Err(e) => {
                let err = GatewayError::from(e);
                return files
                    .iter()
                    .map(|_| {
                        Err(GatewayError::Transport {
                            reason: err.to_string(),
                        })
                    })
                    .collect();
            }
        };

        let status = response.status();
        if !status.is_success() {
            return files
                .iter()
                .map(|_| {
                    Err(GatewayError::Status {
                        status: status.as_u16(),
                    })
                })
                .collect();
        }

        let wire: Vec<WireParseResult> = match response.json().await {
            Ok(wire) => wire,
            Err(e) => {
                let reason = e.to_string();
                return files
                    .iter()
                    .map(|_| {
                        Err(GatewayError::InvalidResponse {
                            reason: reason.clone(),
                        })
                    })
                    .collect();
            }
        };

        debug!(results = wire.len(), "batch parse response received");

        align_batch(files, &wire)
    }
}

/// Maps the wire response onto the request positionally: `wire[i]` answers
/// `files[i]`. Filenames are not unique within a batch, so each slot must
/// echo its file's name; a mismatched or missing slot fails that file only.
fn align_batch(
    files: &[ResumeFile],
    wire: &[WireParseResult],
) -> Vec<Result<ParsedResume, GatewayError>> {
    files
        .iter()
        .enumerate()
        .map(|(i, file)| match wire.get(i) {
            Some(slot) if slot.filename != file.filename => Err(GatewayError::InvalidResponse {
                reason: format!(
                    "slot {} answers {}, expected {}",
                    i, slot.filename, file.filename
                ),
            }),
            Some(WireParseResult {
                data: Some(data), ..
            }) => Ok(data.clone()),
            Some(WireParseResult { error, .. }) => Err(GatewayError::Rejected {
                reason: error.clone().unwrap_or_else(|| "unspecified".to_string()),
            }),
            None => Err(GatewayError::InvalidResponse {
                reason: format!("no result for {}", file.filename),
            }),
        })
        .collect()
}

/// HTTP client for the similarity service (`POST {base}/similarity`).
pub struct HttpSimilarityProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSimilarityProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::from)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl std::fmt::Debug for HttpSimilarityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSimilarityProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SimilarityProvider for HttpSimilarityProvider {
    #[instrument(skip(self, query, profile), fields(query_len = query.len(), profile_len = profile.len()))]
    async fn similarity(&self, query: &str, profile: &str) -> Result<f32, GatewayError> {
        let response = self
            .client
            .post(format!("{}/similarity", self.base_url))
            .json(&WireSimilarityRequest { query, profile })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        let body: WireSimilarityResponse = response.json().await?;
        Ok(body.similarity.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(filename: &str, name_in_payload: &str) -> WireParseResult {
        WireParseResult {
            filename: filename.to_string(),
            data: Some(ParsedResume::named(name_in_payload)),
            error: None,
        }
    }

    fn error_slot(filename: &str, error: &str) -> WireParseResult {
        WireParseResult {
            filename: filename.to_string(),
            data: None,
            error: Some(error.to_string()),
        }
    }

    #[test]
    fn same_named_files_keep_their_own_slots() {
        // Two applicants, same filename, different bytes.
        let files = vec![
            ResumeFile::new("resume.pdf", b"applicant A".to_vec()),
            ResumeFile::new("resume.pdf", b"applicant B".to_vec()),
        ];
        let wire = vec![slot("resume.pdf", "Applicant A"), slot("resume.pdf", "Applicant B")];

        let results = align_batch(&files, &wire);
        assert_eq!(results[0].as_ref().unwrap().full_name, "Applicant A");
        assert_eq!(results[1].as_ref().unwrap().full_name, "Applicant B");
    }

    #[test]
    fn mismatched_slot_fails_that_file_only() {
        let files = vec![
            ResumeFile::new("a.pdf", b"a".to_vec()),
            ResumeFile::new("b.pdf", b"b".to_vec()),
        ];
        // The service answered out of order.
        let wire = vec![slot("b.pdf", "B"), slot("a.pdf", "A")];

        let results = align_batch(&files, &wire);
        assert!(matches!(
            results[0],
            Err(GatewayError::InvalidResponse { .. })
        ));
        assert!(matches!(
            results[1],
            Err(GatewayError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn short_response_fails_trailing_files() {
        let files = vec![
            ResumeFile::new("a.pdf", b"a".to_vec()),
            ResumeFile::new("b.pdf", b"b".to_vec()),
        ];
        let wire = vec![slot("a.pdf", "A")];

        let results = align_batch(&files, &wire);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(GatewayError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn error_slot_maps_to_rejection() {
        let files = vec![ResumeFile::new("scan.pdf", b"s".to_vec())];
        let wire = vec![error_slot("scan.pdf", "unreadable scan")];

        let results = align_batch(&files, &wire);
        match &results[0] {
            Err(GatewayError::Rejected { reason }) => assert_eq!(reason, "unreadable scan"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
