pub mod aggregator;

pub use aggregator::{aggregate, LevelBucket, RiskSummary};
