//! JSON view models handed to the UI layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{parse, ParsedAnalysis};
use crate::models::{ResumeRecord, RiskLevel, Severity};
use crate::stats::{LevelBucket, RiskSummary};

/// Shown in place of contact details the extractor could not find.
pub const MISSING_CONTACT: &str = "Not Found";

/// One row of the records table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRow {
    pub id: String,
    pub filename: String,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub duplicate_count: u32,
}

impl From<&ResumeRecord> for RecordRow {
    fn from(record: &ResumeRecord) -> Self {
        Self {
            id: record.id.clone(),
            filename: record.filename.clone(),
            risk_level: record.risk_level.clone(),
            risk_score: record.risk_score,
            duplicate_count: record.duplicates(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub records: Vec<RecordRow>,
    pub summary: RiskSummary,
    pub unrecognized: usize,
    pub distribution: Vec<LevelBucket>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Most recent failed listing, cleared by the next successful one.
    pub last_error: Option<String>,
}

impl Dashboard {
    pub fn build(
        records: &[ResumeRecord],
        summary: RiskSummary,
        fetched_at: Option<DateTime<Utc>>,
        last_error: Option<String>,
    ) -> Self {
        Self {
            records: records.iter().map(RecordRow::from).collect(),
            summary,
            unrecognized: summary.unrecognized(),
            distribution: summary.distribution(),
            fetched_at,
            last_error,
        }
    }
}

/// Everything the detail panel shows for the selected resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub filename: String,
    pub email: String,
    pub phone: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub severity: Severity,
    pub duplicate_count: u32,
    pub analysis: ParsedAnalysis,
    pub download_url: String,
}

impl DetailView {
    pub fn build(record: &ResumeRecord, download_url: &str) -> Self {
        Self {
            id: record.id.clone(),
            filename: record.filename.clone(),
            email: contact_or_placeholder(record.email.as_deref()),
            phone: contact_or_placeholder(record.phone.as_deref()),
            risk_score: record.risk_score,
            risk_level: record.risk_level.clone(),
            severity: record.risk_level.severity(),
            duplicate_count: record.duplicates(),
            analysis: parse(&record.raw_analysis),
            download_url: download_url.to_string(),
        }
    }
}

/// Detail panel state: the applied selection plus the latest detail failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionView {
    #[serde(flatten)]
    pub detail: Option<DetailView>,
    pub last_error: Option<String>,
}

impl SelectionView {
    pub fn build(detail: Option<DetailView>, last_error: Option<String>) -> Self {
        Self { detail, last_error }
    }
}

fn contact_or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_CONTACT)
        .to_string()
}
