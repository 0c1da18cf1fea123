//! Field identity: `Table[Name]` references and catalog-qualified fields.
//!
//! Matching is case-insensitive with surrounding whitespace trimmed. Both
//! [`FieldRef`] and [`QualifiedField`] keep their trimmed display spelling
//! but compare, hash, and order by their normalized [`FieldKey`].

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Normalize one part of a field reference for matching.
pub fn normalize_part(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Whether a schema field is a column or a measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Column,
    Measure,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Column => write!(f, "column"),
            FieldKind::Measure => write!(f, "measure"),
        }
    }
}

/// Normalized (trimmed, lowercased) table/name pair used for lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub table: String,
    pub name: String,
}

impl FieldKey {
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            table: normalize_part(table),
            name: normalize_part(name),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.table, self.name)
    }
}

/// An unvalidated `Table[Name]` reference.
///
/// Produced by the layout scan and by relationship endpoints; it may or may
/// not name a field declared in the catalog.
#[derive(Debug, Clone)]
pub struct FieldRef {
    table: String,
    name: String,
    key: FieldKey,
}

impl FieldRef {
    /// Build a reference from raw parts, trimming surrounding whitespace.
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            table: table.trim().to_string(),
            name: name.trim().to_string(),
            key: FieldKey::new(table, name),
        }
    }

    /// Build a reference, returning `None` if either part is blank.
    pub fn try_new(table: &str, name: &str) -> Option<Self> {
        if table.trim().is_empty() || name.trim().is_empty() {
            None
        } else {
            Some(Self::new(table, name))
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }
}

impl PartialEq for FieldRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FieldRef {}

impl Hash for FieldRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for FieldRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.table, self.name)
    }
}

impl Serialize for FieldRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a string is not of the form `Table[Name]`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a field of the form Table[Name], got '{0}'")]
pub struct ParseFieldRefError(String);

impl FromStr for FieldRef {
    type Err = ParseFieldRefError;

    /// Parse `Table[Name]` or `'Table'[Name]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFieldRefError(s.to_string());
        let body = s.trim().strip_suffix(']').ok_or_else(err)?;
        let (table, name) = body.split_once('[').ok_or_else(err)?;
        let table = table.trim();
        let table = table
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(table);
        FieldRef::try_new(table, name).ok_or_else(err)
    }
}

/// A column or measure declared in the schema catalog.
#[derive(Debug, Clone)]
pub struct QualifiedField {
    reference: FieldRef,
    kind: FieldKind,
}

impl QualifiedField {
    pub fn new(table: &str, name: &str, kind: FieldKind) -> Self {
        Self {
            reference: FieldRef::new(table, name),
            kind,
        }
    }

    pub fn column(table: &str, name: &str) -> Self {
        Self::new(table, name, FieldKind::Column)
    }

    pub fn measure(table: &str, name: &str) -> Self {
        Self::new(table, name, FieldKind::Measure)
    }

    pub fn table(&self) -> &str {
        self.reference.table()
    }

    pub fn name(&self) -> &str {
        self.reference.name()
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_measure(&self) -> bool {
        self.kind == FieldKind::Measure
    }

    pub fn key(&self) -> &FieldKey {
        self.reference.key()
    }

    /// The unqualified `Table[Name]` reference for this field.
    pub fn field_ref(&self) -> &FieldRef {
        &self.reference
    }
}

impl PartialEq for QualifiedField {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.reference == other.reference
    }
}

impl Eq for QualifiedField {}

impl Hash for QualifiedField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
        self.kind.hash(state);
    }
}

impl PartialOrd for QualifiedField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualifiedField {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reference
            .cmp(&other.reference)
            .then(self.kind.cmp(&other.kind))
    }
}

impl fmt::Display for QualifiedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reference.fmt(f)
    }
}

impl Serialize for QualifiedField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_ref_trims_and_matches_case_insensitively() {
        let a = FieldRef::new("  Sales ", " Amount");
        let b = FieldRef::new("sales", "AMOUNT");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Sales[Amount]");

        let set: HashSet<FieldRef> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_field_ref_rejects_blank_parts() {
        assert!(FieldRef::try_new("", "x").is_none());
        assert!(FieldRef::try_new("t", "   ").is_none());
        assert!(FieldRef::try_new("t", "x").is_some());
    }

    #[test]
    fn test_parse_field_ref() {
        let r: FieldRef = "Orders[Total]".parse().unwrap();
        assert_eq!(r.table(), "Orders");
        assert_eq!(r.name(), "Total");

        let quoted: FieldRef = "'Sales Table'[Net Amount]".parse().unwrap();
        assert_eq!(quoted.table(), "Sales Table");
        assert_eq!(quoted.name(), "Net Amount");

        assert!("Orders".parse::<FieldRef>().is_err());
        assert!("[Total]".parse::<FieldRef>().is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "Orders.Total".parse::<FieldRef>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected a field of the form Table[Name], got 'Orders.Total'"
        );
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_qualified_field_identity_includes_kind() {
        let col = QualifiedField::column("Orders", "Total");
        let msr = QualifiedField::measure("orders", "total");
        assert_ne!(col, msr);
        assert_eq!(col.key(), msr.key());
        assert_eq!(col, QualifiedField::column(" ORDERS ", "total "));
    }

    #[test]
    fn test_qualified_field_serializes_as_display_string() {
        let f = QualifiedField::measure("Orders", "Total Sales");
        assert_eq!(serde_json::to_string(&f).unwrap(), "\"Orders[Total Sales]\"");
    }
}
