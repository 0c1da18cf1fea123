use super::*;
use serde_json::json;
use sweep_core::DependencyGraph;

fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_document(&json!({
        "model": {
            "tables": [
                {
                    "name": "Orders",
                    "columns": [{"name": "CustomerID"}, {"name": "Total"}, {"name": "Notes"}],
                    "measures": [{"name": "TotalMeasure", "expression": "SUM(Orders[Total])"}]
                },
                {"name": "Customers", "columns": [{"name": "ID"}]},
                {"name": "Staging", "columns": [{"name": "Raw"}]},
                {"name": "Empty"}
            ]
        }
    }))
}

fn set(fields: &[QualifiedField]) -> BTreeSet<QualifiedField> {
    fields.iter().cloned().collect()
}

fn categorize(direct: &[QualifiedField], relationship: &[QualifiedField]) -> FieldUsage {
    let catalog = catalog();
    let mut graph = DependencyGraph::new();
    graph.add_dependency(
        &QualifiedField::measure("Orders", "TotalMeasure"),
        &QualifiedField::column("Orders", "Total"),
    );
    let direct = set(direct);
    let relationship = set(relationship);
    let seeds = direct.union(&relationship).cloned().collect();
    let closure = UsageClosure::compute(&seeds, &graph);
    FieldUsage::categorize(&catalog, &direct, &relationship, &closure)
}

#[test]
fn test_priority_order() {
    let customer_id = QualifiedField::column("Orders", "CustomerID");
    let usage = categorize(
        &[QualifiedField::measure("Orders", "TotalMeasure"), customer_id.clone()],
        &[customer_id.clone(), QualifiedField::column("Customers", "ID")],
    );

    // Direct wins over relationship
    assert_eq!(usage.category_of(&customer_id), Some(UsageCategory::Direct));
    assert_eq!(
        usage.category_of(&QualifiedField::column("Customers", "ID")),
        Some(UsageCategory::Relationship)
    );
    assert_eq!(
        usage.category_of(&QualifiedField::column("Orders", "Total")),
        Some(UsageCategory::Indirect)
    );
    assert_eq!(
        usage.category_of(&QualifiedField::column("Orders", "Notes")),
        Some(UsageCategory::Unused)
    );
}

#[test]
fn test_exhaustive_and_disjoint() {
    let usage = categorize(&[QualifiedField::measure("Orders", "TotalMeasure")], &[]);
    let catalog = catalog();
    assert_eq!(usage.len(), catalog.len());
    for field in catalog.fields() {
        let hits = UsageCategory::ALL
            .iter()
            .filter(|&&c| usage.fields_in(field.kind(), c).contains(&field))
            .count();
        assert_eq!(hits, 1, "{} must be in exactly one category", field);
    }
}

#[test]
fn test_table_usage() {
    let usage = categorize(&[], &[QualifiedField::column("Customers", "ID")]);
    assert_eq!(
        usage.used_tables().iter().collect::<Vec<_>>(),
        vec!["Customers"]
    );
    assert_eq!(
        usage.unused_tables().iter().collect::<Vec<_>>(),
        vec!["Empty", "Orders", "Staging"]
    );
    assert_eq!(
        usage.table_counts(),
        UsageCounts {
            total: 4,
            used: 1,
            unused: 3
        }
    );
}

#[test]
fn test_counts() {
    let usage = categorize(&[QualifiedField::measure("Orders", "TotalMeasure")], &[]);
    assert_eq!(
        usage.counts(FieldKind::Column),
        UsageCounts {
            total: 5,
            used: 1,
            unused: 4
        }
    );
    assert_eq!(
        usage.counts(FieldKind::Measure),
        UsageCounts {
            total: 1,
            used: 1,
            unused: 0
        }
    );
}

#[test]
fn test_category_labels() {
    assert_eq!(UsageCategory::Direct.to_string(), "Directly Used");
    assert_eq!(UsageCategory::Relationship.to_string(), "Used via Relationship");
    assert!(!UsageCategory::Unused.is_used());
    assert_eq!(
        serde_json::to_string(&UsageCategory::Indirect).unwrap(),
        "\"indirect\""
    );
}
