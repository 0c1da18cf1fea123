//! Resolution of scanned formula references against the schema catalog

use crate::scanner::{FormulaReference, LexicalScanner, ReferenceScanner};
use std::collections::{BTreeSet, HashSet};
use sweep_core::{
    DependencyGraph, FieldRef, FormulaConfig, QualifiedField, SchemaCatalog, UnqualifiedPolicy,
};

/// Extracts catalog fields referenced by formula text
pub struct DependencyExtractor {
    scanner: Box<dyn ReferenceScanner>,
    unqualified: UnqualifiedPolicy,
    same_table_columns: bool,
}

impl Default for DependencyExtractor {
    fn default() -> Self {
        Self::new(&FormulaConfig::default())
    }
}

impl DependencyExtractor {
    /// Create an extractor using the lexical scanner
    pub fn new(config: &FormulaConfig) -> Self {
        Self::with_scanner(config, Box::new(LexicalScanner::new()))
    }

    /// Create an extractor around a custom scanner
    pub fn with_scanner(config: &FormulaConfig, scanner: Box<dyn ReferenceScanner>) -> Self {
        Self {
            scanner,
            unqualified: config.unqualified,
            same_table_columns: config.same_table_columns,
        }
    }

    /// Catalog fields referenced by one formula.
    ///
    /// `owner` is the computed field the formula belongs to, when known. It
    /// enables same-table column resolution and is never reported as its own
    /// dependency.
    pub fn extract(
        &self,
        formula: &str,
        owner: Option<&QualifiedField>,
        catalog: &SchemaCatalog,
    ) -> BTreeSet<QualifiedField> {
        let refs = match self.scanner.scan(formula) {
            Ok(refs) => refs,
            Err(e) => {
                log::debug!(
                    "Ignoring formula of {}: {}",
                    owner.map(|o| o.to_string()).unwrap_or_default(),
                    e
                );
                return BTreeSet::new();
            }
        };

        let mut found = BTreeSet::new();
        let mut resolved_brackets = HashSet::new();

        for reference in &refs {
            if let FormulaReference::Qualified {
                table,
                name,
                quoted,
                bracket,
            } = reference
            {
                if let Some(field) = resolve_qualified(catalog, table, name, *quoted) {
                    found.insert(field.clone());
                    resolved_brackets.insert(*bracket);
                }
            }
        }

        for reference in &refs {
            if let FormulaReference::Unqualified { name, bracket } = reference {
                if resolved_brackets.contains(bracket) {
                    continue;
                }
                self.resolve_unqualified(catalog, name, owner, &mut found);
            }
        }

        if let Some(owner) = owner {
            found.remove(owner);
        }
        found
    }

    fn resolve_unqualified(
        &self,
        catalog: &SchemaCatalog,
        name: &str,
        owner: Option<&QualifiedField>,
        found: &mut BTreeSet<QualifiedField>,
    ) {
        let measures = catalog.measures_named(name);
        match self.unqualified {
            UnqualifiedPolicy::AnyTable => found.extend(measures.iter().cloned()),
            UnqualifiedPolicy::UniqueOnly => {
                if let [only] = measures {
                    found.insert(only.clone());
                }
            }
        }

        if self.same_table_columns {
            if let Some(column) =
                owner.and_then(|o| catalog.column(&FieldRef::new(o.table(), name)))
            {
                found.insert(column.clone());
            }
        }
    }

    /// Build the dependency graph of every computed field in the catalog
    pub fn build_graph(&self, catalog: &SchemaCatalog) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (field, formula) in catalog.formulas().iter() {
            graph.add_field(field);
            for dep in self.extract(formula, Some(field), catalog) {
                graph.add_dependency(field, &dep);
            }
        }
        log::debug!(
            "Dependency graph: {} fields, {} edges",
            graph.len(),
            graph.edge_count()
        );
        graph
    }

    /// Every field referenced by any formula, regardless of which field owns it
    pub fn referenced_anywhere(&self, catalog: &SchemaCatalog) -> BTreeSet<QualifiedField> {
        catalog
            .formulas()
            .texts()
            .flat_map(|formula| self.extract(formula, None, catalog))
            .collect()
    }
}

/// Resolve `table[name]` against the catalog.
///
/// An unquoted table part may have swallowed leading words (`RETURN Orders`),
/// so shorter word suffixes are tried, longest first.
fn resolve_qualified<'c>(
    catalog: &'c SchemaCatalog,
    table: &str,
    name: &str,
    quoted: bool,
) -> Option<&'c QualifiedField> {
    if quoted {
        return catalog.resolve(&FieldRef::new(table, name));
    }

    let words: Vec<&str> = table.split_whitespace().collect();
    (0..words.len()).find_map(|start| {
        let candidate = words[start..].join(" ");
        catalog.resolve(&FieldRef::new(&candidate, name))
    })
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
