use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

/// Coarse fraud-risk verdict assigned upstream.
///
/// Upstream writes exactly `High`, `Medium` or `Low`. Anything else is kept
/// verbatim in `Unrecognized` so it can still be listed and counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unrecognized(String),
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Unrecognized(String::new())
    }
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "High" => RiskLevel::High,
            "Medium" => RiskLevel::Medium,
            "Low" => RiskLevel::Low,
            _ => RiskLevel::Unrecognized(value),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        level.as_str().to_string()
    }
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::Unrecognized(raw) => raw,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RiskLevel::High => Severity::Critical,
            RiskLevel::Medium => Severity::Warning,
            RiskLevel::Low => Severity::Ok,
            RiskLevel::Unrecognized(_) => Severity::Unknown,
        }
    }
}

/// Display hint for a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Ok,
    Unknown,
}

/// One submitted resume as returned by the screening service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_level: RiskLevel,
    /// Absent on records written before duplicate tracking existed.
    #[serde(default, alias = "duplicate_score")]
    pub duplicate_count: Option<u32>,
    #[serde(
        rename = "llm_analysis",
        default,
        deserialize_with = "null_as_default"
    )]
    pub raw_analysis: String,
}

impl ResumeRecord {
    pub fn duplicates(&self) -> u32 {
        self.duplicate_count.unwrap_or(0)
    }
}

/// A resume file handed to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Upstream acknowledgement of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub message: String,
    #[serde(default)]
    pub is_duplicate: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
