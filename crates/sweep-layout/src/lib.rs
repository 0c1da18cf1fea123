//! sweep-layout - Report layout scanning for Fieldsweep
//!
//! Walks the report layout document (report, page and visual filters,
//! visual queries, visual configs) and collects every `Table[Name]` field
//! reference it contains, resolving query-local source aliases on the way.
//! References are reported as found; matching them against the schema
//! catalog happens downstream.

pub mod alias;
pub mod error;
pub mod extractor;
pub mod walker;

pub use alias::AliasTable;
pub use error::{LayoutError, LayoutResult};
pub use extractor::{scan_payload, LayoutExtractor, LayoutStats, LayoutUsage, ScopeKind};
pub use walker::{HierarchyLevelRef, ReferenceCollector};
