//! sweep-formula - Formula dependency extraction for Fieldsweep
//!
//! This crate mines computed-field formula text for candidate field
//! references and turns them into a [`DependencyGraph`] over catalog fields.
//!
//! Scanning is a best-effort lexical pass behind the [`ReferenceScanner`]
//! trait, not a parser of the formula language: it knows nothing about
//! string literals or comments and can report bracketed text inside them.
//!
//! [`DependencyGraph`]: sweep_core::DependencyGraph

pub mod error;
pub mod extractor;
pub mod scanner;

pub use error::{FormulaError, FormulaResult};
pub use extractor::DependencyExtractor;
pub use scanner::{flatten_formula, FormulaReference, LexicalScanner, ReferenceScanner};
