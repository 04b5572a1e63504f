//! Interpretation of the free-form analysis text the screening service's
//! model attaches to every resume.

pub mod fences;
pub mod parser;

pub use parser::{parse, ParsedAnalysis};
