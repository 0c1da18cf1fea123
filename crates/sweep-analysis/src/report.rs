//! Serializable analysis report

use crate::analyzer::{Analysis, Fingerprints};
use crate::usage::{UsageCategory, UsageCounts};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use sweep_core::{FieldKind, FieldRef, QualifiedField};
use sweep_layout::LayoutStats;

#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub tables: UsageCounts,
    pub columns: UsageCounts,
    pub measures: UsageCounts,
}

/// The four category sets for one field kind
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorySets {
    pub directly_used: Vec<QualifiedField>,
    pub used_via_relationship: Vec<QualifiedField>,
    pub indirectly_used: Vec<QualifiedField>,
    pub unused: Vec<QualifiedField>,
}

impl CategorySets {
    fn collect(analysis: &Analysis, kind: FieldKind) -> Self {
        let fields = |category| -> Vec<QualifiedField> {
            analysis
                .usage()
                .fields_in(kind, category)
                .into_iter()
                .cloned()
                .collect()
        };
        Self {
            directly_used: fields(UsageCategory::Direct),
            used_via_relationship: fields(UsageCategory::Relationship),
            indirectly_used: fields(UsageCategory::Indirect),
            unused: fields(UsageCategory::Unused),
        }
    }

    pub fn get(&self, category: UsageCategory) -> &[QualifiedField] {
        match category {
            UsageCategory::Direct => &self.directly_used,
            UsageCategory::Relationship => &self.used_via_relationship,
            UsageCategory::Indirect => &self.indirectly_used,
            UsageCategory::Unused => &self.unused,
        }
    }
}

/// Complete result of analyzing one archive
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub archive: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprints: Option<Fingerprints>,
    pub summary: UsageSummary,
    pub columns: CategorySets,
    pub measures: CategorySets,
    pub used_tables: Vec<String>,
    pub unused_tables: Vec<String>,
    /// Tables dropped from the catalog as system date tables
    pub excluded_tables: Vec<String>,
    /// Direct dependencies of every computed field that has any
    pub dependencies: BTreeMap<QualifiedField, Vec<QualifiedField>>,
    /// For each indirectly reached field, the field whose formula reached it
    pub reached_via: BTreeMap<QualifiedField, QualifiedField>,
    pub formula_cycles: Vec<Vec<QualifiedField>>,
    /// Relationship endpoints that are not declared catalog columns
    pub relationship_only: Vec<FieldRef>,
    /// Layout references that match no catalog field
    pub unresolved_references: Vec<FieldRef>,
    pub layout: LayoutStats,
    pub closure_passes: usize,
}

impl UsageReport {
    pub fn new(analysis: &Analysis, archive: &str) -> Self {
        let usage = analysis.usage();
        let graph = analysis.graph();

        let dependencies = graph
            .fields_with_dependencies()
            .into_iter()
            .map(|(field, deps)| (field.clone(), deps.into_iter().cloned().collect()))
            .collect();

        let reached_via = usage
            .iter()
            .filter(|(_, category)| *category == UsageCategory::Indirect)
            .filter_map(|(field, _)| {
                analysis
                    .closure()
                    .reached_via(field)
                    .map(|parent| (field.clone(), parent.clone()))
            })
            .collect();

        Self {
            archive: archive.to_string(),
            generated_at: Utc::now(),
            fingerprints: analysis.fingerprints().cloned(),
            summary: UsageSummary {
                tables: usage.table_counts(),
                columns: usage.counts(FieldKind::Column),
                measures: usage.counts(FieldKind::Measure),
            },
            columns: CategorySets::collect(analysis, FieldKind::Column),
            measures: CategorySets::collect(analysis, FieldKind::Measure),
            used_tables: usage.used_tables().iter().cloned().collect(),
            unused_tables: usage.unused_tables().iter().cloned().collect(),
            excluded_tables: analysis.catalog().excluded_tables().iter().cloned().collect(),
            dependencies,
            reached_via,
            formula_cycles: graph.cycles(),
            relationship_only: analysis.relationship_only().iter().cloned().collect(),
            unresolved_references: analysis.unresolved().iter().cloned().collect(),
            layout: analysis.layout().stats,
            closure_passes: analysis.closure().passes(),
        }
    }

    /// Drop every used field from the category sets, keeping only unused ones
    pub fn retain_unused(&mut self) {
        for sets in [&mut self.columns, &mut self.measures] {
            sets.directly_used.clear();
            sets.used_via_relationship.clear();
            sets.indirectly_used.clear();
        }
        self.used_tables.clear();
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
