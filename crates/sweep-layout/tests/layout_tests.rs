//! End-to-end scans of realistic layout documents

use serde_json::{json, Value};
use sweep_layout::{HierarchyLevelRef, LayoutExtractor};

fn sample_layout() -> Value {
    let chart_config = json!({
        "name": "a1b2",
        "layouts": [{"id": 0, "position": {"x": 0, "y": 0}}],
        "singleVisual": {
            "visualType": "clusteredColumnChart",
            "projections": {"Category": [{"queryRef": "d.Year"}], "Y": [{"queryRef": "Sales.Total Sales"}]},
            "prototypeQuery": {
                "Version": 2,
                "From": [
                    {"Name": "d", "Entity": "Date", "Type": 0},
                    {"Name": "s", "Entity": "Sales", "Type": 0}
                ],
                "Select": [
                    {
                        "HierarchyLevel": {
                            "Expression": {"Hierarchy": {"Expression": {"SourceRef": {"Source": "d"}}, "Hierarchy": "Calendar"}},
                            "Level": "Year"
                        },
                        "Name": "d.Year"
                    },
                    {
                        "Measure": {"Expression": {"SourceRef": {"Source": "s"}}, "Property": "Total Sales"},
                        "Name": "Sales.Total Sales"
                    }
                ]
            }
        }
    });

    let chart_query = json!({
        "Commands": [{
            "SemanticQueryDataShapeCommand": {
                "Query": {
                    "Version": 2,
                    "From": [
                        {"Name": "d", "Entity": "Date", "Type": 0},
                        {"Name": "s", "Entity": "Sales", "Type": 0}
                    ],
                    "Select": [{
                        "Measure": {"Expression": {"SourceRef": {"Source": "s"}}, "Property": "Total Sales"},
                        "Name": "Sales.Total Sales"
                    }],
                    "OrderBy": [{
                        "Direction": 2,
                        "Expression": {
                            "Aggregation": {
                                "Expression": {"Column": {"Expression": {"SourceRef": {"Source": "s"}}, "Property": "Amount"}},
                                "Function": 0
                            }
                        }
                    }]
                },
                "Binding": {"Primary": {"Groupings": [{"Projections": [0, 1]}]}}
            }
        }]
    });

    let slicer_filters = json!([{
        "name": "Filter1",
        "type": "Categorical",
        "filter": {
            "Version": 2,
            "From": [{"Name": "c", "Entity": "Customer", "Type": 0}],
            "Where": [{
                "Condition": {
                    "In": {
                        "Expressions": [{"Column": {"Expression": {"SourceRef": {"Source": "c"}}, "Property": "Segment"}}],
                        "Values": [[{"Literal": {"Value": "'Retail'"}}]]
                    }
                }
            }]
        }
    }]);

    json!({
        "id": 0,
        "filters": "[]",
        "sections": [
            {
                "name": "ReportSection",
                "displayName": "Overview",
                "filters": "[]",
                "visualContainers": [
                    {
                        "x": 10.0,
                        "y": 20.0,
                        "config": chart_config.to_string(),
                        "query": chart_query.to_string(),
                        "filters": slicer_filters.to_string()
                    },
                    {
                        "x": 400.0,
                        "config": "{\"name\":\"textbox\",\"singleVisual\":{\"visualType\":\"textbox\"}}"
                    }
                ]
            },
            {
                "name": "ReportSection2",
                "displayName": "Broken",
                "visualContainers": [{"config": "{\"singleVisual\": "}]
            }
        ]
    })
}

#[test]
fn test_sample_layout_references() {
    let usage = LayoutExtractor::default().extract(&sample_layout());
    let fields: Vec<String> = usage.fields.iter().map(|f| f.to_string()).collect();
    assert_eq!(
        fields,
        vec![
            "Customer[Segment]",
            "Date[Year]",
            "Sales[Amount]",
            "Sales[Total Sales]"
        ]
    );
    assert_eq!(
        usage.hierarchy_levels.into_iter().collect::<Vec<_>>(),
        vec![HierarchyLevelRef::new("Date", "Calendar", "Year")]
    );
}

#[test]
fn test_sample_layout_stats() {
    let stats = LayoutExtractor::default().extract(&sample_layout()).stats;
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.visuals, 3);
    // report filters, page filters, 3 scopes of the chart, textbox config
    assert_eq!(stats.scopes_scanned, 6);
    assert_eq!(stats.scopes_skipped, 1);
}
