//! Query alias tables

use serde_json::Value;
use std::collections::HashMap;

/// Maps query-local source aliases (`"s"`) to entity names (`"Sales"`).
///
/// Built from a `From` list of `{ "Name": .., "Entity": .. }` entries. Alias
/// names are matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `From` list; entries missing a name or entity are ignored
    pub fn from_list(from: &Value) -> Self {
        let mut table = Self::new();
        table.extend_from_list(from);
        table
    }

    /// A copy of this table with the entries of `from` layered on top
    pub fn overlay(&self, from: &Value) -> Self {
        let mut table = self.clone();
        table.extend_from_list(from);
        table
    }

    pub fn insert(&mut self, name: &str, entity: &str) {
        let (name, entity) = (name.trim(), entity.trim());
        if !name.is_empty() && !entity.is_empty() {
            self.aliases.insert(name.to_string(), entity.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name.trim()).map(String::as_str)
    }

    /// Table named by a `SourceRef` mapping.
    ///
    /// A `Source` alias known to this table wins; otherwise the explicit
    /// `Entity` is used. A `Source` with no alias entry and no `Entity`
    /// resolves to nothing.
    pub fn resolve<'a>(&'a self, source_ref: &'a Value) -> Option<&'a str> {
        source_ref
            .get("Source")
            .and_then(Value::as_str)
            .and_then(|source| self.get(source))
            .or_else(|| {
                source_ref
                    .get("Entity")
                    .and_then(Value::as_str)
                    .filter(|e| !e.trim().is_empty())
            })
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn extend_from_list(&mut self, from: &Value) {
        let Some(entries) = from.as_array() else {
            return;
        };
        for entry in entries {
            if let (Some(name), Some(entity)) = (
                entry.get("Name").and_then(Value::as_str),
                entry.get("Entity").and_then(Value::as_str),
            ) {
                self.insert(name, entity);
            }
        }
    }
}
