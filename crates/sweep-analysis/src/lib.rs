//! sweep-analysis - Usage analysis for Fieldsweep
//!
//! Ties the pieces together: the schema catalog, the layout references, and
//! the formula dependency graph feed a closure that marks every field reached
//! from the report, after which each catalog field is put into exactly one
//! usage category.

pub mod analyzer;
pub mod closure;
pub mod error;
pub mod report;
pub mod usage;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use analyzer::{Analysis, Analyzer, Explanation, Fingerprints};
pub use closure::UsageClosure;
pub use error::{AnalysisError, AnalysisResult};
pub use report::{CategorySets, UsageReport, UsageSummary};
pub use usage::{FieldUsage, UsageCategory, UsageCounts};
