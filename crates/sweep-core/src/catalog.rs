//! Schema catalog builder.
//!
//! Turns the decoded schema document (`{ model: { tables, relationships } }`)
//! into the canonical set of qualified fields, the formula index of computed
//! fields, the hierarchy index, and the relationship join-column set.
//!
//! A malformed document degrades to an empty catalog rather than an error.

use crate::config::CatalogConfig;
use crate::field::{normalize_part, FieldKey, FieldKind, FieldRef, QualifiedField};
use crate::serde_helpers::{lenient, lenient_list};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Raw formula text of computed columns and measures
#[derive(Debug, Clone, Default)]
pub struct FormulaIndex {
    formulas: BTreeMap<QualifiedField, String>,
}

impl FormulaIndex {
    pub fn insert(&mut self, field: QualifiedField, formula: String) {
        self.formulas.insert(field, formula);
    }

    pub fn get(&self, field: &QualifiedField) -> Option<&str> {
        self.formulas.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedField, &str)> {
        self.formulas.iter().map(|(f, s)| (f, s.as_str()))
    }

    /// Every formula string, without its owning field
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.formulas.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

/// Hierarchy levels and the columns they are built on
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    levels: HashMap<(String, String, String), QualifiedField>,
}

impl HierarchyIndex {
    fn insert(&mut self, table: &str, hierarchy: &str, level: &str, column: QualifiedField) {
        self.levels.insert(
            (
                normalize_part(table),
                normalize_part(hierarchy),
                normalize_part(level),
            ),
            column,
        );
    }

    /// The column behind `table.hierarchy.level`, if declared
    pub fn level_column(&self, table: &str, hierarchy: &str, level: &str) -> Option<&QualifiedField> {
        self.levels.get(&(
            normalize_part(table),
            normalize_part(hierarchy),
            normalize_part(level),
        ))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// The full set of fields declared by one archive's schema
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: BTreeSet<String>,
    excluded_tables: BTreeSet<String>,
    columns: BTreeSet<QualifiedField>,
    measures: BTreeSet<QualifiedField>,
    relationship_columns: BTreeSet<FieldRef>,
    columns_by_key: HashMap<FieldKey, QualifiedField>,
    measures_by_key: HashMap<FieldKey, QualifiedField>,
    measures_by_name: HashMap<String, Vec<QualifiedField>>,
    formulas: FormulaIndex,
    hierarchies: HierarchyIndex,
}

impl SchemaCatalog {
    /// Build a catalog with default settings
    pub fn from_document(schema: &Value) -> Self {
        CatalogBuilder::new(&CatalogConfig::default()).build(schema)
    }

    /// Table names, excluding system date tables
    pub fn tables(&self) -> &BTreeSet<String> {
        &self.tables
    }

    /// Tables dropped because of a system date annotation
    pub fn excluded_tables(&self) -> &BTreeSet<String> {
        &self.excluded_tables
    }

    pub fn columns(&self) -> &BTreeSet<QualifiedField> {
        &self.columns
    }

    pub fn measures(&self) -> &BTreeSet<QualifiedField> {
        &self.measures
    }

    /// Every column and measure, columns first
    pub fn fields(&self) -> impl Iterator<Item = &QualifiedField> {
        self.columns.iter().chain(self.measures.iter())
    }

    /// Number of columns plus measures
    pub fn len(&self) -> usize {
        self.columns.len() + self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.measures.is_empty()
    }

    /// Both endpoints of every relationship, verbatim
    pub fn relationship_columns(&self) -> &BTreeSet<FieldRef> {
        &self.relationship_columns
    }

    pub fn formulas(&self) -> &FormulaIndex {
        &self.formulas
    }

    pub fn hierarchies(&self) -> &HierarchyIndex {
        &self.hierarchies
    }

    pub fn column(&self, reference: &FieldRef) -> Option<&QualifiedField> {
        self.columns_by_key.get(reference.key())
    }

    pub fn measure(&self, reference: &FieldRef) -> Option<&QualifiedField> {
        self.measures_by_key.get(reference.key())
    }

    /// Resolve a reference to a declared column or measure.
    ///
    /// A measure wins when a table declares both with the same name.
    pub fn resolve(&self, reference: &FieldRef) -> Option<&QualifiedField> {
        self.measure(reference).or_else(|| self.column(reference))
    }

    /// Every measure with this name, in any table
    pub fn measures_named(&self, name: &str) -> &[QualifiedField] {
        self.measures_by_name
            .get(&normalize_part(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a table (matched case-insensitively) is in the catalog
    pub fn has_table(&self, table: &str) -> bool {
        let wanted = normalize_part(table);
        self.tables.iter().any(|t| normalize_part(t) == wanted)
    }

    fn add_field(&mut self, field: QualifiedField) {
        match field.kind() {
            FieldKind::Column => {
                self.columns_by_key
                    .insert(field.key().clone(), field.clone());
                self.columns.insert(field);
            }
            FieldKind::Measure => {
                self.measures_by_key
                    .insert(field.key().clone(), field.clone());
                self.measures_by_name
                    .entry(field.key().name.clone())
                    .or_default()
                    .push(field.clone());
                self.measures.insert(field);
            }
        }
    }
}

/// Formula text stored either as one string or as a list of lines
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FormulaText {
    Text(String),
    Lines(Vec<String>),
}

impl FormulaText {
    /// The formula as a single string, or `None` when blank
    fn into_text(self) -> Option<String> {
        let text = match self {
            FormulaText::Text(s) => s,
            FormulaText::Lines(lines) => lines.join("\n"),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnnotationDef {
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
    value: Option<Value>,
}

impl AnnotationDef {
    fn is_true(&self) -> bool {
        match &self.value {
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            Some(Value::Bool(b)) => *b,
            _ => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnDef {
    name: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    column_type: Option<String>,
    /// An unreadable formula leaves the column in place as a plain column
    #[serde(deserialize_with = "lenient")]
    expression: Option<FormulaText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MeasureDef {
    name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    expression: Option<FormulaText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LevelDef {
    name: Option<String>,
    column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HierarchyDef {
    name: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    levels: Vec<LevelDef>,
}

/// A table entry. Each list is read element by element so that one
/// unreadable column, measure, annotation or hierarchy drops only itself.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TableDef {
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    annotations: Vec<AnnotationDef>,
    #[serde(deserialize_with = "lenient_list")]
    columns: Vec<ColumnDef>,
    #[serde(deserialize_with = "lenient_list")]
    measures: Vec<MeasureDef>,
    #[serde(deserialize_with = "lenient_list")]
    hierarchies: Vec<HierarchyDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RelationshipDef {
    from_table: Option<String>,
    from_column: Option<String>,
    to_table: Option<String>,
    to_column: Option<String>,
}

/// Builds a [`SchemaCatalog`] from a decoded schema document
pub struct CatalogBuilder<'a> {
    config: &'a CatalogConfig,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self { config }
    }

    /// Build the catalog. Never fails; unreadable parts are skipped.
    pub fn build(&self, schema: &Value) -> SchemaCatalog {
        let mut catalog = SchemaCatalog::default();

        let Some(model) = schema.get("model") else {
            log::warn!("Schema document has no 'model' key; catalog is empty");
            return catalog;
        };
        let Some(tables) = model.get("tables").and_then(Value::as_array) else {
            log::warn!("Schema document has no 'model.tables' list; catalog is empty");
            return catalog;
        };

        for (idx, raw) in tables.iter().enumerate() {
            match TableDef::deserialize(raw) {
                Ok(table) => self.add_table(&mut catalog, table),
                Err(e) => log::warn!("Skipping unreadable table entry #{}: {}", idx, e),
            }
        }

        if let Some(relationships) = model.get("relationships").and_then(Value::as_array) {
            for raw in relationships {
                self.add_relationship(&mut catalog, raw);
            }
        }

        log::debug!(
            "Catalog: {} tables ({} excluded), {} columns, {} measures, {} formulas, {} relationship columns",
            catalog.tables.len(),
            catalog.excluded_tables.len(),
            catalog.columns.len(),
            catalog.measures.len(),
            catalog.formulas.len(),
            catalog.relationship_columns.len()
        );
        catalog
    }

    fn is_system_date_table(&self, table: &TableDef) -> bool {
        table.annotations.iter().any(|a| {
            a.is_true()
                && a
                    .name
                    .as_deref()
                    .is_some_and(|name| self.config.is_system_date_annotation(name))
        })
    }

    fn add_table(&self, catalog: &mut SchemaCatalog, table: TableDef) {
        let Some(table_name) = table
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            log::warn!("Skipping table entry without a name");
            return;
        };

        if self.is_system_date_table(&table) {
            log::debug!("Excluding system date table '{}'", table_name);
            catalog.excluded_tables.insert(table_name);
            return;
        }
        catalog.tables.insert(table_name.clone());

        for column in table.columns {
            let Some(name) = column.name.as_deref() else {
                continue;
            };
            if self.config.skip_row_number_columns
                && column
                    .column_type
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case("rowNumber"))
            {
                continue;
            }
            let Some(reference) = FieldRef::try_new(&table_name, name) else {
                continue;
            };
            let field = QualifiedField::column(reference.table(), reference.name());
            if let Some(formula) = column.expression.and_then(FormulaText::into_text) {
                catalog.formulas.insert(field.clone(), formula);
            }
            catalog.add_field(field);
        }

        for measure in table.measures {
            let Some(reference) = measure
                .name
                .as_deref()
                .and_then(|name| FieldRef::try_new(&table_name, name))
            else {
                continue;
            };
            let field = QualifiedField::measure(reference.table(), reference.name());
            if let Some(formula) = measure.expression.and_then(FormulaText::into_text) {
                catalog.formulas.insert(field.clone(), formula);
            }
            catalog.add_field(field);
        }

        for hierarchy in &table.hierarchies {
            let Some(hierarchy_name) = hierarchy.name.as_deref() else {
                continue;
            };
            for level in &hierarchy.levels {
                if let (Some(level_name), Some(column)) = (&level.name, &level.column) {
                    catalog.hierarchies.insert(
                        &table_name,
                        hierarchy_name,
                        level_name,
                        QualifiedField::column(&table_name, column),
                    );
                }
            }
        }
    }

    fn add_relationship(&self, catalog: &mut SchemaCatalog, raw: &Value) {
        let rel = match RelationshipDef::deserialize(raw) {
            Ok(rel) => rel,
            Err(e) => {
                log::warn!("Skipping unreadable relationship: {}", e);
                return;
            }
        };

        let endpoints = [
            (rel.from_table.as_deref(), rel.from_column.as_deref()),
            (rel.to_table.as_deref(), rel.to_column.as_deref()),
        ];
        for (table, column) in endpoints {
            if let Some(reference) = table
                .zip(column)
                .and_then(|(t, c)| FieldRef::try_new(t, c))
            {
                catalog.relationship_columns.insert(reference);
            }
        }
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
