//! Catalog command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use sweep_analysis::Analyzer;
use sweep_core::{FieldRef, QualifiedField, SchemaCatalog};

use crate::cli::{CatalogArgs, CatalogOutput, GlobalArgs};
use crate::commands::common::{load_config, open_archive, print_json, print_table};

/// Schema catalog as listed by `sweep catalog --output json`
#[derive(Debug, Serialize)]
struct CatalogListing<'a> {
    tables: Vec<&'a str>,
    excluded_tables: Vec<&'a str>,
    columns: Vec<&'a QualifiedField>,
    measures: Vec<&'a QualifiedField>,
    relationship_columns: Vec<&'a FieldRef>,
    formulas: BTreeMap<&'a QualifiedField, &'a str>,
}

impl<'a> CatalogListing<'a> {
    fn new(catalog: &'a SchemaCatalog) -> Self {
        Self {
            tables: catalog.tables().iter().map(String::as_str).collect(),
            excluded_tables: catalog.excluded_tables().iter().map(String::as_str).collect(),
            columns: catalog.columns().iter().collect(),
            measures: catalog.measures().iter().collect(),
            relationship_columns: catalog.relationship_columns().iter().collect(),
            formulas: catalog.formulas().iter().collect(),
        }
    }
}

/// Execute the catalog command
pub(crate) fn execute(args: &CatalogArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let source = open_archive(&args.archive)?;
    let documents = source
        .read_documents()
        .with_context(|| format!("Failed to read {}", args.archive.display()))?;
    let catalog = Analyzer::new(config)
        .catalog_documents(&documents)
        .context("Failed to build schema catalog")?;

    match args.output {
        CatalogOutput::Json => print_json(&CatalogListing::new(&catalog)),
        CatalogOutput::Table => {
            print_catalog(&catalog);
            Ok(())
        }
    }
}

fn print_catalog(catalog: &SchemaCatalog) {
    if catalog.is_empty() {
        println!("No columns or measures found.");
    } else {
        let rows: Vec<Vec<String>> = catalog
            .fields()
            .map(|field| {
                let computed = catalog.formulas().get(field).is_some();
                vec![
                    field.table().to_string(),
                    field.name().to_string(),
                    field.kind().to_string(),
                    if computed { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        print_table(&["TABLE", "FIELD", "KIND", "COMPUTED"], &rows);
    }

    if !catalog.excluded_tables().is_empty() {
        let excluded: Vec<&str> = catalog
            .excluded_tables()
            .iter()
            .map(String::as_str)
            .collect();
        println!();
        println!("Excluded system date tables: {}", excluded.join(", "));
    }
}
