use super::*;
use serde_json::json;

fn collect(value: &Value) -> Vec<String> {
    let mut collector = ReferenceCollector::new();
    collector.collect(value, &AliasTable::new());
    collector.fields().iter().map(|f| f.to_string()).collect()
}

#[test]
fn test_column_with_alias() {
    let query = json!({
        "From": [{"Name": "T1", "Entity": "Sales", "Type": 0}],
        "Select": [{
            "Column": {
                "Expression": {"SourceRef": {"Source": "T1"}},
                "Property": "Amount"
            },
            "Name": "Sales.Amount"
        }]
    });
    assert_eq!(collect(&query), vec!["Sales[Amount]"]);
}

#[test]
fn test_measure_with_entity() {
    let filter = json!([{
        "expression": {
            "Measure": {
                "Expression": {"SourceRef": {"Entity": "Sales"}},
                "Property": "Total Sales"
            }
        }
    }]);
    assert_eq!(collect(&filter), vec!["Sales[Total Sales]"]);
}

#[test]
fn test_aggregation_reaches_wrapped_column() {
    let select = json!({
        "Aggregation": {
            "Expression": {
                "Column": {
                    "Expression": {"SourceRef": {"Entity": "Orders"}},
                    "Property": "Qty"
                }
            },
            "Function": 0
        },
        "Name": "Sum(Orders.Qty)"
    });
    assert_eq!(collect(&select), vec!["Orders[Qty]"]);
}

#[test]
fn test_references_are_trimmed() {
    let value = json!({
        "Column": {
            "Expression": {"SourceRef": {"Entity": " Sales "}},
            "Property": " Amount "
        }
    });
    assert_eq!(collect(&value), vec!["Sales[Amount]"]);
}

#[test]
fn test_sibling_keys_still_walked() {
    let value = json!({
        "Column": {
            "Expression": {"SourceRef": {"Entity": "Sales"}},
            "Property": "Amount"
        },
        "Filter": {
            "Measure": {
                "Expression": {"SourceRef": {"Entity": "Sales"}},
                "Property": "Margin"
            }
        }
    });
    assert_eq!(collect(&value), vec!["Sales[Amount]", "Sales[Margin]"]);
}

#[test]
fn test_unresolved_shape_walked_generically() {
    // The outer Column has no usable SourceRef, so its subtree is searched
    let value = json!({
        "Column": {
            "Expression": {
                "Subquery": {
                    "Column": {
                        "Expression": {"SourceRef": {"Entity": "Product"}},
                        "Property": "Category"
                    }
                }
            },
            "Property": "Category"
        }
    });
    assert_eq!(collect(&value), vec!["Product[Category]"]);
}

#[test]
fn test_unknown_alias_without_entity_not_recorded() {
    let value = json!({
        "Column": {
            "Expression": {"SourceRef": {"Source": "x"}},
            "Property": "Amount"
        }
    });
    assert!(collect(&value).is_empty());
}

#[test]
fn test_nested_from_overlays_outer_scope() {
    let value = json!({
        "From": [
            {"Name": "s", "Entity": "Sales"},
            {"Name": "p", "Entity": "Product"}
        ],
        "Where": [{
            "Condition": {
                "In": {
                    "Table": {
                        "From": [{"Name": "s", "Entity": "Stores"}],
                        "Select": [
                            {"Column": {"Expression": {"SourceRef": {"Source": "s"}}, "Property": "City"}},
                            {"Column": {"Expression": {"SourceRef": {"Source": "p"}}, "Property": "Brand"}}
                        ]
                    }
                }
            }
        }],
        "Select": [
            {"Column": {"Expression": {"SourceRef": {"Source": "s"}}, "Property": "Amount"}}
        ]
    });
    assert_eq!(
        collect(&value),
        vec!["Product[Brand]", "Sales[Amount]", "Stores[City]"]
    );
}

#[test]
fn test_hierarchy_level() {
    let value = json!({
        "HierarchyLevel": {
            "Expression": {
                "Hierarchy": {
                    "Expression": {"SourceRef": {"Source": "d"}},
                    "Hierarchy": "Calendar"
                }
            },
            "Level": "Year"
        }
    });
    let mut collector = ReferenceCollector::new();
    let aliases = AliasTable::from_list(&json!([{"Name": "d", "Entity": "Date"}]));
    collector.collect(&value, &aliases);

    let fields: Vec<String> = collector.fields().iter().map(|f| f.to_string()).collect();
    assert_eq!(fields, vec!["Date[Year]"]);
    assert_eq!(
        collector.hierarchy_levels().iter().collect::<Vec<_>>(),
        vec![&HierarchyLevelRef::new("Date", "Calendar", "Year")]
    );
}

#[test]
fn test_hierarchy_entity_wins_over_outer_alias() {
    let value = json!({
        "HierarchyLevel": {
            "Expression": {
                "Hierarchy": {
                    "Expression": {"SourceRef": {"Source": "d", "Entity": "Fiscal Calendar"}},
                    "Hierarchy": "Fiscal"
                }
            },
            "Level": "Quarter"
        }
    });
    let mut collector = ReferenceCollector::new();
    let aliases = AliasTable::from_list(&json!([{"Name": "d", "Entity": "Date"}]));
    collector.collect(&value, &aliases);

    let fields: Vec<String> = collector.fields().iter().map(|f| f.to_string()).collect();
    assert_eq!(fields, vec!["Fiscal Calendar[Quarter]"]);
    assert_eq!(
        collector.hierarchy_levels().iter().collect::<Vec<_>>(),
        vec![&HierarchyLevelRef::new("Fiscal Calendar", "Fiscal", "Quarter")]
    );
}

#[test]
fn test_property_variation_source_records_column() {
    let value = json!({
        "HierarchyLevel": {
            "Expression": {
                "Hierarchy": {
                    "Expression": {
                        "PropertyVariationSource": {
                            "Expression": {"SourceRef": {"Entity": "Orders"}},
                            "Name": "Variation",
                            "Property": "Order Date"
                        }
                    },
                    "Hierarchy": "Date Hierarchy"
                }
            },
            "Level": "Month"
        }
    });
    let mut collector = ReferenceCollector::new();
    collector.collect(&value, &AliasTable::new());

    let fields: Vec<String> = collector.fields().iter().map(|f| f.to_string()).collect();
    assert_eq!(fields, vec!["Orders[Month]", "Orders[Order Date]"]);
    assert_eq!(collector.hierarchy_levels().len(), 1);
}

#[test]
fn test_scalars_and_empty_containers() {
    assert!(collect(&json!(null)).is_empty());
    assert!(collect(&json!("Sales[Amount]")).is_empty());
    assert!(collect(&json!({})).is_empty());
    assert!(collect(&json!([])).is_empty());
}

#[test]
fn test_absorb() {
    let mut a = ReferenceCollector::new();
    a.collect(
        &json!({"Column": {"Expression": {"SourceRef": {"Entity": "A"}}, "Property": "x"}}),
        &AliasTable::new(),
    );
    let mut b = ReferenceCollector::new();
    b.collect(
        &json!({"Column": {"Expression": {"SourceRef": {"Entity": "a"}}, "Property": "X"}}),
        &AliasTable::new(),
    );
    a.absorb(b);
    // Same field modulo case
    assert_eq!(a.fields().len(), 1);
}
