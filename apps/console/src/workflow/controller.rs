use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::models::{ResumeRecord, SubmitReceipt, UploadFile};
use crate::repository::{validate_upload, RecordRepository};
use crate::stats::{aggregate, RiskSummary};
use crate::workflow::session::{AdminCredentials, Session, SessionGrant, SessionToken};
use crate::workflow::views::{Dashboard, DetailView, SelectionView};
use crate::workflow::WorkflowError;

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub session_ttl: Duration,
    pub max_upload_bytes: usize,
}

/// Everything the console knows between requests. Mutated only by the
/// transitions on `ReviewWorkflow`.
#[derive(Debug, Default)]
pub struct WorkflowState {
    pub session: Session,
    pub records: Vec<ResumeRecord>,
    pub summary: RiskSummary,
    pub selected: Option<ResumeRecord>,
    /// Bumped by every `select`/`deselect`; a detail response is applied only
    /// while the id captured at request time is still current.
    pub selection_request_id: u64,
    /// Same rule for listings.
    pub refresh_request_id: u64,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Written only by `refresh`; shown on the dashboard.
    pub listing_error: Option<String>,
    /// Written only by `select`/`deselect`; shown on the detail panel.
    pub selection_error: Option<String>,
}

impl WorkflowState {
    /// Drops the session and everything fetched under it. Bumping both ids
    /// makes responses still in flight land as superseded.
    fn reset(&mut self) {
        *self = WorkflowState {
            selection_request_id: self.selection_request_id + 1,
            refresh_request_id: self.refresh_request_id + 1,
            ..WorkflowState::default()
        };
    }

    fn dashboard(&self) -> Dashboard {
        Dashboard::build(
            &self.records,
            self.summary,
            self.fetched_at,
            self.listing_error.clone(),
        )
    }
}

/// Outcome of a transition whose response may arrive after a newer request.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<T> {
    Applied(T),
    /// A later request took over; this response was discarded.
    Superseded,
}

pub struct ReviewWorkflow {
    repository: Arc<dyn RecordRepository>,
    credentials: AdminCredentials,
    settings: WorkflowSettings,
    state: Mutex<WorkflowState>,
}

impl ReviewWorkflow {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        credentials: AdminCredentials,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            repository,
            credentials,
            settings,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    /// Starts a fresh admin session and loads the record list.
    ///
    /// A failed initial listing does not revoke the session; it shows up as
    /// `last_error` on the dashboard.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionGrant, WorkflowError> {
        if !self.credentials.matches(username, password) {
            warn!(username, "rejected admin login");
            return Err(WorkflowError::InvalidCredentials);
        }

        let grant = SessionGrant::issue(Utc::now(), self.settings.session_ttl);
        {
            let mut state = self.state.lock().await;
            state.reset();
            state.session = Session::Authenticated(grant.clone());
        }
        info!(username, expires_at = %grant.expires_at, "admin session started");

        if let Err(e) = self.refresh(&grant.token).await {
            warn!(error = %e, "initial resume listing failed");
        }

        Ok(grant)
    }

    pub async fn logout(&self, token: &SessionToken) -> Result<(), WorkflowError> {
        let mut state = self.authorized(token).await?;
        state.reset();
        info!("admin session ended");
        Ok(())
    }

    #[cfg(test)]
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.session.is_authenticated()
    }

    /// Re-fetches the record list. When refreshes overlap, only the most
    /// recently started one is applied.
    pub async fn refresh(
        &self,
        token: &SessionToken,
    ) -> Result<Transition<Dashboard>, WorkflowError> {
        let request_id = {
            let mut state = self.authorized(token).await?;
            state.refresh_request_id += 1;
            state.refresh_request_id
        };

        let result = self.repository.list_all().await;

        let mut state = self.state.lock().await;
        if state.refresh_request_id != request_id {
            debug!(request_id, "discarding superseded resume listing");
            return Ok(Transition::Superseded);
        }

        match result {
            Ok(records) => {
                state.summary = aggregate(&records);
                state.records = records;
                state.fetched_at = Some(Utc::now());
                state.listing_error = None;
                info!(
                    request_id,
                    count = state.records.len(),
                    high = state.summary.counts_by_level.high,
                    "resume list refreshed"
                );
                Ok(Transition::Applied(state.dashboard()))
            }
            Err(e) => {
                warn!(request_id, error = %e, "resume listing failed; keeping previous records");
                state.listing_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Fetches one record for the detail panel. Only the latest selection is
    /// ever applied, whatever order responses come back in.
    pub async fn select(
        &self,
        token: &SessionToken,
        id: &str,
    ) -> Result<Transition<DetailView>, WorkflowError> {
        let request_id = {
            let mut state = self.authorized(token).await?;
            state.selection_request_id += 1;
            state.selection_request_id
        };
        debug!(request_id, record_id = id, "resume selected");

        let result = self.repository.get_detail(id).await;

        let mut state = self.state.lock().await;
        if state.selection_request_id != request_id {
            debug!(request_id, record_id = id, "discarding superseded resume detail");
            return Ok(Transition::Superseded);
        }

        match result {
            Ok(record) => {
                let view = self.detail_view(&record);
                state.selected = Some(record);
                state.selection_error = None;
                Ok(Transition::Applied(view))
            }
            Err(e) => {
                warn!(request_id, record_id = id, error = %e, "resume detail failed");
                state.selection_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Closes the detail panel and orphans any detail request in flight.
    pub async fn deselect(&self, token: &SessionToken) -> Result<(), WorkflowError> {
        let mut state = self.authorized(token).await?;
        state.selection_request_id += 1;
        state.selected = None;
        state.selection_error = None;
        Ok(())
    }

    pub async fn dashboard(&self, token: &SessionToken) -> Result<Dashboard, WorkflowError> {
        Ok(self.authorized(token).await?.dashboard())
    }

    pub async fn selection(&self, token: &SessionToken) -> Result<SelectionView, WorkflowError> {
        let state = self.authorized(token).await?;
        Ok(SelectionView::build(
            state.selected.as_ref().map(|record| self.detail_view(record)),
            state.selection_error.clone(),
        ))
    }

    pub async fn download_url(
        &self,
        token: &SessionToken,
        id: &str,
    ) -> Result<Url, WorkflowError> {
        drop(self.authorized(token).await?);
        Ok(self.repository.download_url(id))
    }

    /// Forwards a resume from the public upload page. Needs no session.
    pub async fn submit(&self, file: UploadFile) -> Result<SubmitReceipt, WorkflowError> {
        validate_upload(&file, self.settings.max_upload_bytes)?;

        let filename = file.filename.clone();
        let receipt = self.repository.submit(file).await?;
        info!(
            filename = %filename,
            is_duplicate = receipt.is_duplicate,
            "resume submitted"
        );
        Ok(receipt)
    }

    fn detail_view(&self, record: &ResumeRecord) -> DetailView {
        DetailView::build(record, self.repository.download_url(&record.id).as_str())
    }

    /// Locks the state after checking `token`. An expired session is torn
    /// down on the spot.
    async fn authorized(
        &self,
        token: &SessionToken,
    ) -> Result<MutexGuard<'_, WorkflowState>, WorkflowError> {
        let mut state = self.state.lock().await;
        match state.session.check(token, Utc::now()) {
            Ok(()) => Ok(state),
            Err(WorkflowError::SessionExpired) => {
                warn!("admin session expired");
                state.reset();
                Err(WorkflowError::SessionExpired)
            }
            Err(e) => Err(e),
        }
    }
}
