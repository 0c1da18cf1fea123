//! Shared fixtures for sweep-analysis tests

use serde_json::{json, Value};
use sweep_core::RawDocuments;

/// Encode a document the way report template archives store it
pub fn encode_utf16le(value: &Value) -> Vec<u8> {
    value
        .to_string()
        .encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

/// Sample schema: orders and customers joined by a relationship, two
/// tables exchanging an unqualified measure reference, a date table with a
/// hierarchy, an unreferenced staging table, and an auto date table.
pub fn sample_schema() -> Value {
    json!({
        "name": "sample",
        "compatibilityLevel": 1550,
        "model": {
            "culture": "en-US",
            "tables": [
                {
                    "name": "Orders",
                    "columns": [
                        {"name": "OrderID", "dataType": "int64"},
                        {"name": "CustomerID", "dataType": "int64"},
                        {"name": "OrderDate", "dataType": "dateTime"},
                        {"name": "Total", "dataType": "double"},
                        {"name": "Qty", "dataType": "int64"},
                        {"name": "Price", "dataType": "double"},
                        {"name": "Line Value", "type": "calculated", "expression": "Orders[Qty] * Orders[Price]"},
                        {"name": "Notes", "dataType": "string"}
                    ],
                    "measures": [
                        {"name": "TotalMeasure", "expression": "SUM(Orders[Total])"},
                        {"name": "Avg Line", "expression": ["AVERAGE(", "    Orders[Line Value]", ")"]},
                        {"name": "Unused Measure", "expression": "COUNTROWS(Orders)"}
                    ]
                },
                {
                    "name": "Customers",
                    "columns": [
                        {"name": "ID", "dataType": "int64"},
                        {"name": "Name", "dataType": "string"},
                        {"name": "Segment", "dataType": "string"}
                    ],
                    "measures": [
                        {"name": "Customer Count", "expression": "DISTINCTCOUNT(Customers[ID])"}
                    ]
                },
                {
                    "name": "A",
                    "measures": [{"name": "M1", "expression": "[M2] * 2"}]
                },
                {
                    "name": "B",
                    "columns": [{"name": "Key", "dataType": "int64"}],
                    "measures": [{"name": "M2", "expression": "COUNTROWS(B)"}]
                },
                {
                    "name": "Date",
                    "columns": [
                        {"name": "Date", "dataType": "dateTime"},
                        {"name": "Year", "dataType": "int64"},
                        {"name": "Month", "dataType": "string"}
                    ],
                    "hierarchies": [{
                        "name": "Calendar",
                        "levels": [
                            {"name": "Year", "ordinal": 0, "column": "Year"},
                            {"name": "Month Name", "ordinal": 1, "column": "Month"}
                        ]
                    }]
                },
                {
                    "name": "Staging",
                    "columns": [{"name": "Raw", "dataType": "string"}]
                },
                {
                    "name": "LocalDateTable_0a1b",
                    "columns": [{"name": "Date"}, {"name": "Year"}],
                    "annotations": [{"name": "__PBI_LocalDateTable", "value": "true"}]
                }
            ],
            "relationships": [
                {
                    "name": "r1",
                    "fromTable": "Orders",
                    "fromColumn": "CustomerID",
                    "toTable": "Customers",
                    "toColumn": "ID"
                },
                {
                    "name": "r2",
                    "fromTable": "Orders",
                    "fromColumn": "OrderDate",
                    "toTable": "LocalDateTable_0a1b",
                    "toColumn": "Date"
                }
            ]
        }
    })
}

/// Sample layout: a chart on the sample schema, a config with a hierarchy
/// level, a page filter on a measure, a filter on an unknown table, and a
/// visual whose config is not valid JSON.
pub fn sample_layout() -> Value {
    let query = json!({
        "Commands": [{
            "SemanticQueryDataShapeCommand": {
                "Query": {
                    "Version": 2,
                    "From": [
                        {"Name": "o", "Entity": "Orders", "Type": 0},
                        {"Name": "c", "Entity": "Customers", "Type": 0}
                    ],
                    "Select": [
                        {"Measure": {"Expression": {"SourceRef": {"Source": "o"}}, "Property": "TotalMeasure"}},
                        {"Column": {"Expression": {"SourceRef": {"Source": "c"}}, "Property": "Segment"}}
                    ]
                }
            }
        }]
    });
    let config = json!({
        "name": "v2",
        "singleVisual": {
            "visualType": "lineChart",
            "prototypeQuery": {
                "Version": 2,
                "From": [
                    {"Name": "d", "Entity": "Date", "Type": 0},
                    {"Name": "a", "Entity": "A", "Type": 0}
                ],
                "Select": [
                    {
                        "HierarchyLevel": {
                            "Expression": {"Hierarchy": {"Expression": {"SourceRef": {"Source": "d"}}, "Hierarchy": "Calendar"}},
                            "Level": "Month Name"
                        }
                    },
                    {"Measure": {"Expression": {"SourceRef": {"Source": "a"}}, "Property": "M1"}}
                ]
            }
        }
    });
    let page_filters = json!([{
        "name": "f1",
        "expression": {"Measure": {"Expression": {"SourceRef": {"Entity": "Orders"}}, "Property": "Avg Line"}}
    }]);
    let visual_filters = json!([{
        "name": "f2",
        "expression": {"Column": {"Expression": {"SourceRef": {"Entity": "Ghost"}}, "Property": "Field"}}
    }]);

    json!({
        "id": 0,
        "sections": [{
            "name": "ReportSection",
            "displayName": "Overview",
            "filters": page_filters.to_string(),
            "visualContainers": [
                {"query": query.to_string(), "filters": visual_filters.to_string()},
                {"config": config.to_string()},
                {"config": "{\"singleVisual\": {"}
            ]
        }]
    })
}

/// The sample documents as raw UTF-16LE archive bytes
pub fn sample_documents() -> RawDocuments {
    RawDocuments {
        schema: encode_utf16le(&sample_schema()),
        layout: encode_utf16le(&sample_layout()),
    }
}
