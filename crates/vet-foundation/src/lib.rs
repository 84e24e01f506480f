//! Shared foundation types for the codevet analysis engine.
//!
//! This crate defines the data model every other crate builds on: findings
//! with severity and confidence, run statistics with structured warnings,
//! the engine-wide error type, and the cancellation flag observed by
//! long-running scans. It deliberately has no parsing or I/O dependencies.

mod cancel;
mod error;
mod finding;
mod stats;

pub use cancel::CancelFlag;
pub use error::{VetError, VetResult};
pub use finding::{Finding, FixKind, SecurityInfo, Severity};
pub use stats::{AnalysisStats, AnalysisWarning, WarningKind};
