//! Recursive reference collection over decoded layout payloads

use crate::alias::AliasTable;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use sweep_core::FieldRef;

/// A hierarchy level named by a visual (`Date.Calendar.Year`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HierarchyLevelRef {
    pub table: String,
    pub hierarchy: String,
    pub level: String,
}

impl HierarchyLevelRef {
    pub fn new(table: &str, hierarchy: &str, level: &str) -> Self {
        Self {
            table: table.trim().to_string(),
            hierarchy: hierarchy.trim().to_string(),
            level: level.trim().to_string(),
        }
    }
}

impl fmt::Display for HierarchyLevelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.table, self.hierarchy, self.level)
    }
}

/// Accumulates field references found while walking payloads.
///
/// At every mapping, `Column`, `Measure` and `HierarchyLevel` entries that
/// resolve to a table are recorded and not descended into. `Aggregation`
/// entries are descended into to reach the field they wrap. Any other key,
/// or a recognized key whose shape does not resolve, is walked generically.
/// A mapping carrying a `From` list opens a nested alias scope for itself and
/// everything beneath it.
#[derive(Debug, Default, Clone)]
pub struct ReferenceCollector {
    fields: BTreeSet<FieldRef>,
    hierarchy_levels: BTreeSet<HierarchyLevelRef>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &BTreeSet<FieldRef> {
        &self.fields
    }

    pub fn hierarchy_levels(&self) -> &BTreeSet<HierarchyLevelRef> {
        &self.hierarchy_levels
    }

    pub fn into_parts(self) -> (BTreeSet<FieldRef>, BTreeSet<HierarchyLevelRef>) {
        (self.fields, self.hierarchy_levels)
    }

    /// Merge everything another collector found into this one
    pub fn absorb(&mut self, other: ReferenceCollector) {
        self.fields.extend(other.fields);
        self.hierarchy_levels.extend(other.hierarchy_levels);
    }

    /// Walk any JSON value under the given alias scope
    pub fn collect(&mut self, value: &Value, aliases: &AliasTable) {
        match value {
            Value::Object(map) => self.collect_object(map, aliases),
            Value::Array(items) => {
                for item in items {
                    self.collect(item, aliases);
                }
            }
            _ => {}
        }
    }

    fn collect_object(&mut self, map: &Map<String, Value>, aliases: &AliasTable) {
        let nested;
        let aliases = match map.get("From") {
            Some(from @ Value::Array(_)) => {
                nested = aliases.overlay(from);
                &nested
            }
            _ => aliases,
        };

        for (key, value) in map {
            let recorded = match key.as_str() {
                "Column" | "Measure" => self.record_property(value, aliases),
                "HierarchyLevel" => self.record_hierarchy_level(value, aliases),
                _ => false,
            };
            if !recorded {
                self.collect(value, aliases);
            }
        }
    }

    /// `{ "Expression": { "SourceRef": .. }, "Property": "Amount" }`
    fn record_property(&mut self, value: &Value, aliases: &AliasTable) -> bool {
        let Some(property) = value.get("Property").and_then(Value::as_str) else {
            return false;
        };
        let Some(table) = value
            .get("Expression")
            .and_then(|e| e.get("SourceRef"))
            .and_then(|s| aliases.resolve(s))
        else {
            return false;
        };
        match FieldRef::try_new(table, property) {
            Some(reference) => {
                self.fields.insert(reference);
                true
            }
            None => false,
        }
    }

    /// `{ "Expression": { "Hierarchy": { "Expression": .., "Hierarchy": "H" } }, "Level": "Year" }`
    ///
    /// The hierarchy expression is either a plain `SourceRef` or a
    /// `PropertyVariationSource` (auto date hierarchy over a column), whose
    /// `Property` column is recorded as well. The hierarchy's own `Entity`
    /// takes precedence over the enclosing alias table.
    fn record_hierarchy_level(&mut self, value: &Value, aliases: &AliasTable) -> bool {
        let Some(level) = value.get("Level").and_then(Value::as_str) else {
            return false;
        };
        let Some(hierarchy) = value.get("Expression").and_then(|e| e.get("Hierarchy")) else {
            return false;
        };
        let Some(expression) = hierarchy.get("Expression") else {
            return false;
        };

        let (source_ref, variation_property) = match expression.get("PropertyVariationSource") {
            Some(variation) => (
                variation.get("Expression").and_then(|e| e.get("SourceRef")),
                variation.get("Property").and_then(Value::as_str),
            ),
            None => (expression.get("SourceRef"), None),
        };
        let Some(table) = source_ref.and_then(|s| hierarchy_entity(s, aliases)) else {
            return false;
        };
        let Some(level_ref) = FieldRef::try_new(table, level) else {
            return false;
        };

        self.fields.insert(level_ref);
        if let Some(column) = variation_property.and_then(|p| FieldRef::try_new(table, p)) {
            self.fields.insert(column);
        }
        if let Some(name) = hierarchy
            .get("Hierarchy")
            .and_then(Value::as_str)
            .filter(|h| !h.trim().is_empty())
        {
            self.hierarchy_levels
                .insert(HierarchyLevelRef::new(table, name, level));
        }
        true
    }
}

/// Entity of a hierarchy `SourceRef`: its explicit `Entity`, else its alias
fn hierarchy_entity<'a>(source_ref: &'a Value, aliases: &'a AliasTable) -> Option<&'a str> {
    source_ref
        .get("Entity")
        .and_then(Value::as_str)
        .filter(|entity| !entity.trim().is_empty())
        .or_else(|| aliases.resolve(source_ref))
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod tests;
