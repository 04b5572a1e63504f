//! Axum route handlers for the review console.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::models::{SubmitReceipt, UploadFile};
use crate::routes::auth::AdminSession;
use crate::state::AppState;
use crate::workflow::{Dashboard, SelectionView, SessionGrant, Transition};

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub session: SessionGrant,
    pub dashboard: Dashboard,
}

/// 200 with the new view, or 202 when a newer request took over.
fn transition_response<T: Serialize>(transition: Transition<T>) -> Response {
    match transition {
        Transition::Applied(view) => Json(view).into_response(),
        Transition::Superseded => {
            (StatusCode::ACCEPTED, Json(json!({ "status": "superseded" }))).into_response()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/session
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = state
        .workflow
        .login(&request.username, &request.password)
        .await?;
    let dashboard = state.workflow.dashboard(&session.token).await?;

    Ok(Json(LoginResponse { session, dashboard }))
}

/// DELETE /api/v1/session
pub async fn handle_logout(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
) -> Result<StatusCode, AppError> {
    state.workflow.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes
pub async fn handle_dashboard(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(state.workflow.dashboard(&token).await?))
}

/// POST /api/v1/resumes/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
) -> Result<Response, AppError> {
    Ok(transition_response(state.workflow.refresh(&token).await?))
}

/// GET /api/v1/resumes/:id/download
///
/// Redirects to the screening service; the PDF never passes through here.
pub async fn handle_download(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let url = state.workflow.download_url(&token, &id).await?;
    Ok(Redirect::temporary(url.as_str()))
}

/// PUT /api/v1/selection/:id
pub async fn handle_select(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    Ok(transition_response(state.workflow.select(&token, &id).await?))
}

/// GET /api/v1/selection
pub async fn handle_current_selection(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
) -> Result<Json<SelectionView>, AppError> {
    Ok(Json(state.workflow.selection(&token).await?))
}

/// DELETE /api/v1/selection
pub async fn handle_deselect(
    State(state): State<AppState>,
    AdminSession(token): AdminSession,
) -> Result<StatusCode, AppError> {
    state.workflow.deselect(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/uploads
///
/// Public upload page endpoint: multipart with a single `file` field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmitReceipt>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;

        upload = Some(UploadFile {
            filename,
            content_type,
            bytes,
        });
        break;
    }

    let upload = upload
        .ok_or_else(|| AppError::Validation(format!("missing multipart field '{UPLOAD_FIELD}'")))?;

    Ok(Json(state.workflow.submit(upload).await?))
}
