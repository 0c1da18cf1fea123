//! sweep-core - Core library for Fieldsweep
//!
//! This crate provides field identity types, the schema catalog builder,
//! the formula dependency graph, raw document decoding, archive access, and
//! configuration shared across all Fieldsweep components.

pub mod archive;
pub mod catalog;
pub mod checksum;
pub mod config;
pub mod document;
pub mod error;
pub mod field;
pub mod graph;
pub(crate) mod serde_helpers;

pub use archive::{ArchiveSource, RawDocuments, LAYOUT_DOCUMENT, SCHEMA_DOCUMENT};
pub use catalog::{CatalogBuilder, FormulaIndex, HierarchyIndex, SchemaCatalog};
pub use checksum::compute_checksum;
pub use config::{CatalogConfig, Config, FormulaConfig, LayoutConfig, UnqualifiedPolicy};
pub use document::{decode_document, DecodedDocument, TextEncoding};
pub use error::{CoreError, CoreResult};
pub use field::{FieldKey, FieldKind, FieldRef, QualifiedField};
pub use graph::DependencyGraph;
