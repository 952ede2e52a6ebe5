//! Dataset sources: where the resume-analysis records come from.
//!
//! `AppState` holds an `Arc<dyn ResumeSource>`, chosen at startup from config.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::ResumeRecord;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("upstream rejected the request: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected payload: expected an object or an array, got {0}")]
    UnexpectedShape(&'static str),
}

#[async_trait]
pub trait ResumeSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<ResumeRecord>, SourceError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// `{"success": bool, "data": [...], "error": "..."}` as sent by the analysis service.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Vec<ResumeRecord>,
    #[serde(default)]
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Decodes either the upstream envelope or a bare array of records.
pub fn decode_payload(body: &[u8]) -> Result<Vec<ResumeRecord>, SourceError> {
    let value: Value = serde_json::from_slice(body)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(value)?;
            if !envelope.success {
                return Err(SourceError::Rejected(
                    envelope
                        .error
                        .unwrap_or_else(|| "no error message".to_string()),
                ));
            }
            Ok(envelope.data)
        }
        Value::Null => Err(SourceError::UnexpectedShape("null")),
        Value::Bool(_) => Err(SourceError::UnexpectedShape("a boolean")),
        Value::Number(_) => Err(SourceError::UnexpectedShape("a number")),
        Value::String(_) => Err(SourceError::UnexpectedShape("a string")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HttpResumeSource: the upstream analysis service
// ────────────────────────────────────────────────────────────────────────────

pub struct HttpResumeSource {
    client: reqwest::Client,
    url: String,
}

impl HttpResumeSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: resumes_url(base_url),
        })
    }
}

fn resumes_url(base_url: &str) -> String {
    format!("{}/api/resumes", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ResumeSource for HttpResumeSource {
    async fn fetch_all(&self) -> Result<Vec<ResumeRecord>, SourceError> {
        debug!(url = %self.url, "Fetching resumes");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        decode_payload(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FileResumeSource: a JSON export on disk
// ────────────────────────────────────────────────────────────────────────────

pub struct FileResumeSource {
    path: PathBuf,
}

impl FileResumeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResumeSource for FileResumeSource {
    async fn fetch_all(&self) -> Result<Vec<ResumeRecord>, SourceError> {
        let body = tokio::fs::read(&self.path).await?;
        decode_payload(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_envelope() {
        let body = br#"{"success": true, "data": [{"analysis_id": "a", "status": "Failed"}]}"#;
        let records = decode_payload(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].analysis_id, "a");
    }

    #[test]
    fn test_decode_bare_array() {
        let records = decode_payload(br#"[{"analysis_id": "a"}, {"analysis_id": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(decode_payload(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejected_envelope() {
        let err = decode_payload(br#"{"success": false, "error": "db offline"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Rejected(ref msg) if msg == "db offline"));
    }

    #[test]
    fn test_decode_unexpected_shapes() {
        assert!(matches!(
            decode_payload(b"42"),
            Err(SourceError::UnexpectedShape("a number"))
        ));
        assert!(matches!(decode_payload(b"{not json"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_resumes_url_joins_cleanly() {
        assert_eq!(resumes_url("http://host:5000/"), "http://host:5000/api/resumes");
        assert_eq!(resumes_url("http://host:5000"), "http://host:5000/api/resumes");
    }

    #[tokio::test]
    async fn test_file_source_reads_export() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"success": true, "data": [{{"analysis_id": "f1", "filename": "cv.pdf"}}]}}"#
        )
        .unwrap();

        let source = FileResumeSource::new(file.path());
        let records = source.fetch_all().await.unwrap();
        assert_eq!(records[0].filename, "cv.pdf");
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileResumeSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.fetch_all().await, Err(SourceError::Io(_))));
    }
}
