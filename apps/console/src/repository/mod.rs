//! Access to the upstream screening service.
//!
//! `ReviewWorkflow` only sees the `RecordRepository` trait; `HttpRecordRepository`
//! is the production backend. Every call is an independent request/response
//! exchange and nothing here retries.

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::models::{ResumeRecord, SubmitReceipt, UploadFile};

pub mod http;
#[cfg(test)]
pub mod testing;

pub use http::HttpRecordRepository;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("resume {0} not found")]
    NotFound(String),

    #[error("upload rejected: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        RepositoryError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<ResumeRecord>, RepositoryError>;

    async fn get_detail(&self, id: &str) -> Result<ResumeRecord, RepositoryError>;

    /// Link to the stored PDF. Built locally; whether it resolves is the
    /// server's business.
    fn download_url(&self, id: &str) -> Url;

    async fn submit(&self, file: UploadFile) -> Result<SubmitReceipt, RepositoryError>;
}

/// Checks an upload before it is sent anywhere.
pub fn validate_upload(file: &UploadFile, max_bytes: usize) -> Result<(), RepositoryError> {
    if file.bytes.is_empty() {
        return Err(RepositoryError::Validation(
            "no file provided or file is empty".to_string(),
        ));
    }

    let media_type = file
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    if !media_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        return Err(RepositoryError::Validation(format!(
            "only PDF files are accepted, got '{}'",
            file.content_type
        )));
    }

    if file.bytes.len() > max_bytes {
        return Err(RepositoryError::Validation(format!(
            "file is {} bytes, limit is {max_bytes}",
            file.bytes.len()
        )));
    }

    Ok(())
}
