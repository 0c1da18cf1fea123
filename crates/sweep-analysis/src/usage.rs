//! Field categorization

use crate::closure::UsageClosure;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use sweep_core::field::normalize_part;
use sweep_core::{FieldKind, QualifiedField, SchemaCatalog};

/// How a catalog field is used, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageCategory {
    /// Referenced by the report layout
    Direct,
    /// A relationship join column not referenced directly
    Relationship,
    /// Reached only through formula dependencies
    Indirect,
    Unused,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 4] = [
        UsageCategory::Direct,
        UsageCategory::Relationship,
        UsageCategory::Indirect,
        UsageCategory::Unused,
    ];

    pub fn is_used(self) -> bool {
        self != UsageCategory::Unused
    }

    pub fn label(self) -> &'static str {
        match self {
            UsageCategory::Direct => "Directly Used",
            UsageCategory::Relationship => "Used via Relationship",
            UsageCategory::Indirect => "Indirectly Used",
            UsageCategory::Unused => "Unused",
        }
    }
}

impl fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Used/unused counts for one kind of object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageCounts {
    pub total: usize,
    pub used: usize,
    pub unused: usize,
}

impl UsageCounts {
    fn new(total: usize, used: usize) -> Self {
        Self {
            total,
            used,
            unused: total - used,
        }
    }
}

/// Exactly one category for every catalog field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUsage {
    categories: BTreeMap<QualifiedField, UsageCategory>,
    used_tables: BTreeSet<String>,
    unused_tables: BTreeSet<String>,
}

impl FieldUsage {
    /// Categorize every catalog field.
    ///
    /// `direct` and `relationship` must already be restricted to catalog
    /// fields; relationship fields are only honored for columns.
    pub fn categorize(
        catalog: &SchemaCatalog,
        direct: &BTreeSet<QualifiedField>,
        relationship: &BTreeSet<QualifiedField>,
        closure: &UsageClosure,
    ) -> Self {
        let categories: BTreeMap<QualifiedField, UsageCategory> = catalog
            .fields()
            .map(|field| {
                let category = if direct.contains(field) {
                    UsageCategory::Direct
                } else if field.kind() == FieldKind::Column && relationship.contains(field) {
                    UsageCategory::Relationship
                } else if closure.contains(field) {
                    UsageCategory::Indirect
                } else {
                    UsageCategory::Unused
                };
                (field.clone(), category)
            })
            .collect();

        let tables_with_used_fields: BTreeSet<String> = categories
            .iter()
            .filter(|(_, category)| category.is_used())
            .map(|(field, _)| field.key().table.clone())
            .collect();
        let (used_tables, unused_tables): (BTreeSet<String>, BTreeSet<String>) = catalog
            .tables()
            .iter()
            .cloned()
            .partition(|table| tables_with_used_fields.contains(&normalize_part(table)));

        Self {
            categories,
            used_tables,
            unused_tables,
        }
    }

    pub fn category_of(&self, field: &QualifiedField) -> Option<UsageCategory> {
        self.categories.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedField, UsageCategory)> {
        self.categories.iter().map(|(f, c)| (f, *c))
    }

    /// Fields of `kind` in `category`, sorted
    pub fn fields_in(&self, kind: FieldKind, category: UsageCategory) -> Vec<&QualifiedField> {
        self.iter()
            .filter(|(field, c)| field.kind() == kind && *c == category)
            .map(|(field, _)| field)
            .collect()
    }

    pub fn used_tables(&self) -> &BTreeSet<String> {
        &self.used_tables
    }

    pub fn unused_tables(&self) -> &BTreeSet<String> {
        &self.unused_tables
    }

    pub fn table_counts(&self) -> UsageCounts {
        UsageCounts::new(
            self.used_tables.len() + self.unused_tables.len(),
            self.used_tables.len(),
        )
    }

    pub fn counts(&self, kind: FieldKind) -> UsageCounts {
        let (total, used) = self
            .iter()
            .filter(|(field, _)| field.kind() == kind)
            .fold((0, 0), |(total, used), (_, category)| {
                (total + 1, used + usize::from(category.is_used()))
            });
        UsageCounts::new(total, used)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
#[path = "usage_test.rs"]
mod tests;
