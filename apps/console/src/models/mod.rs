pub mod resume;

pub use resume::{ResumeRecord, RiskLevel, Severity, SubmitReceipt, UploadFile};
