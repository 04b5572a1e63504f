use serde::{Deserialize, Serialize};

use crate::models::{ResumeRecord, RiskLevel};

/// Per-level record counts. Unrecognized levels land in none of the buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl LevelCounts {
    pub fn sum(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// One slice of the risk distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBucket {
    pub level: RiskLevel,
    pub count: usize,
}

/// Summary numbers for the dashboard.
///
/// `counts_by_level.sum() == total` holds whenever every record carries one of
/// the three known levels; records with any other level only count towards
/// `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total: usize,
    pub counts_by_level: LevelCounts,
    pub duplicate_total: u64,
}

impl RiskSummary {
    /// Records whose level matched none of the buckets.
    pub fn unrecognized(&self) -> usize {
        self.total.saturating_sub(self.counts_by_level.sum())
    }

    /// Buckets in chart order: High, Medium, Low.
    pub fn distribution(&self) -> Vec<LevelBucket> {
        vec![
            LevelBucket {
                level: RiskLevel::High,
                count: self.counts_by_level.high,
            },
            LevelBucket {
                level: RiskLevel::Medium,
                count: self.counts_by_level.medium,
            },
            LevelBucket {
                level: RiskLevel::Low,
                count: self.counts_by_level.low,
            },
        ]
    }
}

/// Reduces records to a `RiskSummary` in a single pass.
pub fn aggregate(records: &[ResumeRecord]) -> RiskSummary {
    records
        .iter()
        .fold(RiskSummary::default(), |mut summary, record| {
            summary.total += 1;
            match record.risk_level {
                RiskLevel::High => summary.counts_by_level.high += 1,
                RiskLevel::Medium => summary.counts_by_level.medium += 1,
                RiskLevel::Low => summary.counts_by_level.low += 1,
                RiskLevel::Unrecognized(_) => {}
            }
            summary.duplicate_total = summary
                .duplicate_total
                .saturating_add(u64::from(record.duplicates()));
            summary
        })
}
