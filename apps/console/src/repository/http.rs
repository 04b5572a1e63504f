use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{ResumeRecord, SubmitReceipt, UploadFile};
use crate::repository::{RecordRepository, RepositoryError};

/// `RecordRepository` over the screening service's REST API.
#[derive(Clone)]
pub struct HttpRecordRepository {
    client: Client,
    base_url: Url,
}

impl HttpRecordRepository {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, RepositoryError> {
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::Transport(format!(
                "upstream base URL '{base_url}' cannot carry a path"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl RecordRepository for HttpRecordRepository {
    async fn list_all(&self) -> Result<Vec<ResumeRecord>, RepositoryError> {
        let url = self.endpoint(&["all-resumes"]);
        debug!(%url, "fetching resume list");

        let response = ensure_success(self.client.get(url).send().await?).await?;

        response
            .json::<Vec<ResumeRecord>>()
            .await
            .map_err(|e| RepositoryError::Transport(format!("invalid resume list: {e}")))
    }

    async fn get_detail(&self, id: &str) -> Result<ResumeRecord, RepositoryError> {
        let url = self.endpoint(&["resume", id]);
        debug!(%url, "fetching resume detail");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        let body: Value = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| RepositoryError::Transport(format!("invalid resume body: {e}")))?;

        // Upstream answers a missing resume with 200 and `{"error": "..."}`.
        let is_error_body = body.get("error").is_some()
            && body.get("_id").is_none()
            && body.get("id").is_none();
        if is_error_body {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        serde_json::from_value(body)
            .map_err(|e| RepositoryError::Transport(format!("invalid resume body: {e}")))
    }

    fn download_url(&self, id: &str) -> Url {
        self.endpoint(&["download", id])
    }

    async fn submit(&self, file: UploadFile) -> Result<SubmitReceipt, RepositoryError> {
        // The trailing empty segment keeps the route's trailing slash.
        let url = self.endpoint(&["upload-resume", ""]);
        debug!(%url, filename = %file.filename, size = file.bytes.len(), "submitting resume");

        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.filename)
            .mime_str(&file.content_type)
            .map_err(|e| RepositoryError::Validation(format!("invalid content type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if is_rejection(status) {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body);
            warn!(%status, %message, "upstream rejected upload");
            return Err(RepositoryError::Validation(message));
        }

        ensure_success(response)
            .await?
            .json::<SubmitReceipt>()
            .await
            .map_err(|e| RepositoryError::Transport(format!("invalid upload response: {e}")))
    }
}

fn is_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::PAYLOAD_TOO_LARGE
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY
    )
}

async fn ensure_success(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%status, "upstream request failed");
    Err(RepositoryError::Transport(format!(
        "HTTP {status}: {}",
        upstream_message(&body)
    )))
}

/// Pulls `error` (service errors) or `detail` (framework validation errors)
/// out of a JSON error body, falling back to the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("detail"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
