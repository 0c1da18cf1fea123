//! The end-to-end analysis pipeline

use crate::closure::UsageClosure;
use crate::error::{AnalysisError, AnalysisResult};
use crate::usage::{FieldUsage, UsageCategory};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use sweep_core::{
    decode_document, ArchiveSource, CatalogBuilder, Config, DependencyGraph, FieldRef,
    QualifiedField, RawDocuments, SchemaCatalog, LAYOUT_DOCUMENT, SCHEMA_DOCUMENT,
};
use sweep_formula::DependencyExtractor;
use sweep_layout::{LayoutExtractor, LayoutUsage};

/// Identity of the documents an analysis was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprints {
    pub schema_sha256: String,
    pub layout_sha256: String,
    pub schema_encoding: String,
    pub layout_encoding: String,
}

/// Runs catalog building, layout and formula extraction, and the closure
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and analyze an archive. Missing or undecodable documents are fatal.
    pub fn analyze_source(&self, source: &ArchiveSource) -> AnalysisResult<Analysis> {
        let documents = source.read_documents()?;
        self.analyze_documents(&documents)
    }

    /// Decode and analyze raw archive documents
    pub fn analyze_documents(&self, documents: &RawDocuments) -> AnalysisResult<Analysis> {
        let schema = decode_document(SCHEMA_DOCUMENT, &documents.schema)?;
        let layout = decode_document(LAYOUT_DOCUMENT, &documents.layout)?;

        let mut analysis = self.analyze_values(&schema.value, &layout.value);
        analysis.fingerprints = Some(Fingerprints {
            schema_sha256: documents.schema_checksum(),
            layout_sha256: documents.layout_checksum(),
            schema_encoding: schema.encoding.to_string(),
            layout_encoding: layout.encoding.to_string(),
        });
        Ok(analysis)
    }

    /// Build only the schema catalog of raw archive documents
    pub fn catalog_documents(&self, documents: &RawDocuments) -> AnalysisResult<SchemaCatalog> {
        let schema = decode_document(SCHEMA_DOCUMENT, &documents.schema)?;
        Ok(CatalogBuilder::new(&self.config.catalog).build(&schema.value))
    }

    /// Analyze already-decoded schema and layout documents
    pub fn analyze_values(&self, schema: &Value, layout: &Value) -> Analysis {
        let catalog = CatalogBuilder::new(&self.config.catalog).build(schema);
        let layout = LayoutExtractor::new(&self.config.layout).extract(layout);

        let extractor = DependencyExtractor::new(&self.config.formulas);
        let graph = extractor.build_graph(&catalog);

        let (mut direct, unresolved) = resolve_layout_references(&catalog, &layout);
        if self.config.formulas.seed_all_references {
            direct.extend(extractor.referenced_anywhere(&catalog));
        }

        let mut relationship = BTreeSet::new();
        let mut relationship_only = BTreeSet::new();
        for reference in catalog.relationship_columns() {
            match catalog.column(reference) {
                Some(column) => {
                    relationship.insert(column.clone());
                }
                None => {
                    relationship_only.insert(reference.clone());
                }
            }
        }

        let seeds: BTreeSet<QualifiedField> = direct.union(&relationship).cloned().collect();
        let closure = UsageClosure::compute(&seeds, &graph);
        let usage = FieldUsage::categorize(&catalog, &direct, &relationship, &closure);

        log::debug!(
            "Analysis: {} direct, {} relationship, {} marked after {} passes, {} unresolved",
            direct.len(),
            relationship.len(),
            closure.marked().len(),
            closure.passes(),
            unresolved.len()
        );

        Analysis {
            catalog,
            layout,
            graph,
            direct,
            relationship,
            relationship_only,
            unresolved,
            closure,
            usage,
            fingerprints: None,
        }
    }
}

/// Match layout references against the catalog.
///
/// A reference naming both a column and a measure marks both. Hierarchy
/// levels declared in the catalog also mark their underlying column, and
/// their `Table[Level]` pseudo-field is then not reported as unresolved.
fn resolve_layout_references(
    catalog: &SchemaCatalog,
    layout: &LayoutUsage,
) -> (BTreeSet<QualifiedField>, BTreeSet<FieldRef>) {
    let mut direct = BTreeSet::new();
    let mut unresolved = BTreeSet::new();
    let mut resolved_levels = BTreeSet::new();

    for level in &layout.hierarchy_levels {
        let column = catalog
            .hierarchies()
            .level_column(&level.table, &level.hierarchy, &level.level)
            .and_then(|column| catalog.column(column.field_ref()));
        if let Some(column) = column {
            direct.insert(column.clone());
            resolved_levels.insert(FieldRef::new(&level.table, &level.level));
        }
    }

    for reference in &layout.fields {
        let column = catalog.column(reference);
        let measure = catalog.measure(reference);
        if column.is_none() && measure.is_none() {
            if !resolved_levels.contains(reference) {
                unresolved.insert(reference.clone());
            }
            continue;
        }
        direct.extend(column.cloned());
        direct.extend(measure.cloned());
    }

    (direct, unresolved)
}

/// Why a single field has the category it has
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub field: QualifiedField,
    pub category: UsageCategory,
    /// The field, then each field whose formula led to it, ending at a seed.
    /// Empty for unused fields.
    pub trail: Vec<QualifiedField>,
    pub formula: Option<String>,
    pub dependencies: Vec<QualifiedField>,
    pub dependents: Vec<QualifiedField>,
}

/// Everything computed for one archive
#[derive(Debug, Clone)]
pub struct Analysis {
    catalog: SchemaCatalog,
    layout: LayoutUsage,
    graph: DependencyGraph,
    direct: BTreeSet<QualifiedField>,
    relationship: BTreeSet<QualifiedField>,
    relationship_only: BTreeSet<FieldRef>,
    unresolved: BTreeSet<FieldRef>,
    closure: UsageClosure,
    usage: FieldUsage,
    fingerprints: Option<Fingerprints>,
}

impl Analysis {
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &LayoutUsage {
        &self.layout
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Catalog fields referenced by the layout
    pub fn direct(&self) -> &BTreeSet<QualifiedField> {
        &self.direct
    }

    /// Catalog columns that are relationship endpoints
    pub fn relationship(&self) -> &BTreeSet<QualifiedField> {
        &self.relationship
    }

    /// Relationship endpoints that are not catalog columns
    pub fn relationship_only(&self) -> &BTreeSet<FieldRef> {
        &self.relationship_only
    }

    /// Layout references that match no catalog field
    pub fn unresolved(&self) -> &BTreeSet<FieldRef> {
        &self.unresolved
    }

    pub fn closure(&self) -> &UsageClosure {
        &self.closure
    }

    pub fn usage(&self) -> &FieldUsage {
        &self.usage
    }

    pub fn fingerprints(&self) -> Option<&Fingerprints> {
        self.fingerprints.as_ref()
    }

    /// Explain the category of the field named by `input` (`Table[Name]`)
    pub fn explain(&self, input: &str) -> AnalysisResult<Explanation> {
        let reference: FieldRef =
            input
                .parse()
                .map_err(|_| AnalysisError::InvalidFieldReference {
                    input: input.to_string(),
                })?;
        let field = self
            .catalog
            .resolve(&reference)
            .ok_or_else(|| AnalysisError::UnknownField {
                field: reference.to_string(),
            })?;
        let category = self
            .usage
            .category_of(field)
            .unwrap_or(UsageCategory::Unused);

        let trail = if self.closure.contains(field) {
            self.closure.trail(field)
        } else {
            Vec::new()
        };

        Ok(Explanation {
            field: field.clone(),
            category,
            trail,
            formula: self.catalog.formulas().get(field).map(str::to_string),
            dependencies: self.graph.dependencies(field).into_iter().cloned().collect(),
            dependents: self.graph.dependents(field).into_iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
