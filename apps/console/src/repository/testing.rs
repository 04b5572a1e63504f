//! Scripted in-memory repository for workflow and router tests.
//!
//! Responses can be gated: the next call for a gated id (or the next listing)
//! parks until the test sends its result through the returned `oneshot`
//! sender, which lets tests pick the order responses arrive in.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::{mpsc, oneshot};

use crate::models::{ResumeRecord, RiskLevel, SubmitReceipt, UploadFile};
use crate::repository::{RecordRepository, RepositoryError};

type Gate<T> = oneshot::Receiver<Result<T, RepositoryError>>;

pub struct ScriptedRepository {
    listing: Mutex<Result<Vec<ResumeRecord>, RepositoryError>>,
    details: Mutex<HashMap<String, ResumeRecord>>,
    detail_gates: Mutex<HashMap<String, Gate<ResumeRecord>>>,
    list_gates: Mutex<VecDeque<Gate<Vec<ResumeRecord>>>>,
    calls: Mutex<Option<mpsc::UnboundedSender<String>>>,
    list_calls: AtomicUsize,
    submit_calls: AtomicUsize,
}

impl ScriptedRepository {
    pub fn new(records: Vec<ResumeRecord>) -> Self {
        let details = records.iter().map(|r| (r.id.clone(), r.clone())).collect();
        Self {
            listing: Mutex::new(Ok(records)),
            details: Mutex::new(details),
            detail_gates: Mutex::new(HashMap::new()),
            list_gates: Mutex::new(VecDeque::new()),
            calls: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_listing(&self, listing: Result<Vec<ResumeRecord>, RepositoryError>) {
        *self.listing.lock().unwrap() = listing;
    }

    /// Parks the next `get_detail(id)` until the returned sender fires.
    pub fn gate_detail(&self, id: &str) -> oneshot::Sender<Result<ResumeRecord, RepositoryError>> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    /// Parks the next ungated `list_all()` until the returned sender fires.
    pub fn gate_listing(&self) -> oneshot::Sender<Result<Vec<ResumeRecord>, RepositoryError>> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Reports `list` and `detail:<id>` as each call reaches the repository.
    pub fn watch_calls(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.calls.lock().unwrap() = Some(tx);
        rx
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn notify(&self, call: String) {
        if let Some(tx) = self.calls.lock().unwrap().as_ref() {
            let _ = tx.send(call);
        }
    }
}

async fn wait_for<T>(gate: Gate<T>) -> Result<T, RepositoryError> {
    gate.await
        .unwrap_or_else(|_| Err(RepositoryError::Transport("gate dropped".to_string())))
}

#[async_trait]
impl RecordRepository for ScriptedRepository {
    async fn list_all(&self) -> Result<Vec<ResumeRecord>, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.list_gates.lock().unwrap().pop_front();
        self.notify("list".to_string());
        match gate {
            Some(gate) => wait_for(gate).await,
            None => self.listing.lock().unwrap().clone(),
        }
    }

    async fn get_detail(&self, id: &str) -> Result<ResumeRecord, RepositoryError> {
        let gate = self.detail_gates.lock().unwrap().remove(id);
        self.notify(format!("detail:{id}"));
        match gate {
            Some(gate) => wait_for(gate).await,
            None => self
                .details
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound(id.to_string())),
        }
    }

    fn download_url(&self, id: &str) -> Url {
        let mut url: Url = "http://upstream.test/".parse().unwrap();
        url.path_segments_mut().unwrap().pop_if_empty().extend(["download", id]);
        url
    }

    async fn submit(&self, _file: UploadFile) -> Result<SubmitReceipt, RepositoryError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SubmitReceipt {
            message: "Resume submitted successfully.".to_string(),
            is_duplicate: false,
        })
    }
}

pub fn record(id: &str, level: RiskLevel) -> ResumeRecord {
    ResumeRecord {
        id: id.to_string(),
        filename: format!("{id}.pdf"),
        email: Some(format!("{id}@example.com")),
        phone: None,
        risk_score: 20.0,
        risk_level: level,
        duplicate_count: Some(1),
        raw_analysis: String::new(),
    }
}
