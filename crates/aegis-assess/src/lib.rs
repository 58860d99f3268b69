//! # aegis-assess
//!
//! Assessment engine for Aegis.
//!
//! Ties the content store (`aegis-db`) to the framework tree reader
//! (`aegis-snapshot`): responses are checked against the assessment's
//! framework tree before they are written, and progress, score preview, and
//! maturity reports are computed on demand from the stored responses.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::AssessmentEngine;
pub use error::AssessError;
pub use report::{AssessmentOverview, MaturityReport, ProgressReport};
