//! Analyze command implementation

use anyhow::Result;
use chrono::SecondsFormat;
use sweep_analysis::{CategorySets, UsageCategory, UsageReport};

use crate::cli::{AnalyzeArgs, AnalyzeOutput, GlobalArgs};
use crate::commands::common::{
    analyze_archive, print_json, print_table, write_json_results, ExitCode,
};

/// Execute the analyze command
pub(crate) fn execute(args: &AnalyzeArgs, global: &GlobalArgs) -> Result<()> {
    let analysis = analyze_archive(&args.archive, global)?;
    let mut report = UsageReport::new(&analysis, &args.archive.display().to_string());
    if args.only_unused {
        report.retain_unused();
    }

    if let Some(path) = &args.write {
        write_json_results(path, &report)?;
        log::debug!("Wrote report to {}", path.display());
    }

    match args.output {
        AnalyzeOutput::Summary => print_summary(&report),
        AnalyzeOutput::Table => print_fields(&report),
        AnalyzeOutput::Json => print_json(&report)?,
    }

    let unused = report.summary.columns.unused + report.summary.measures.unused;
    if args.fail_on_unused && unused > 0 {
        return Err(ExitCode(1).into());
    }

    Ok(())
}

fn print_summary(report: &UsageReport) {
    println!("Archive: {}", report.archive);
    println!(
        "Generated: {}",
        report
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!();

    let summary = &report.summary;
    let rows: Vec<Vec<String>> = [
        ("tables", summary.tables),
        ("columns", summary.columns),
        ("measures", summary.measures),
    ]
    .iter()
    .map(|(object, counts)| {
        vec![
            object.to_string(),
            counts.total.to_string(),
            counts.used.to_string(),
            counts.unused.to_string(),
        ]
    })
    .collect();
    print_table(&["OBJECT", "TOTAL", "USED", "UNUSED"], &rows);

    if !report.unused_tables.is_empty() {
        println!();
        println!("Unused tables: {}", report.unused_tables.join(", "));
    }
    print_field_list("Unused columns", &report.columns.unused);
    print_field_list("Unused measures", &report.measures.unused);

    print_notes(report);
}

fn print_field_list(title: &str, fields: &[sweep_core::QualifiedField]) {
    if fields.is_empty() {
        return;
    }
    println!();
    println!("{} ({}):", title, fields.len());
    for field in fields {
        println!("  {}", field);
    }
}

fn print_notes(report: &UsageReport) {
    let mut notes = Vec::new();
    if !report.unresolved_references.is_empty() {
        let refs: Vec<String> = report
            .unresolved_references
            .iter()
            .map(|r| r.to_string())
            .collect();
        notes.push(format!(
            "{} layout reference(s) match no schema field: {}",
            refs.len(),
            refs.join(", ")
        ));
    }
    if !report.relationship_only.is_empty() {
        notes.push(format!(
            "{} relationship column(s) outside the catalog",
            report.relationship_only.len()
        ));
    }
    if report.layout.scopes_skipped > 0 {
        notes.push(format!(
            "{} of {} layout payload(s) could not be read and were skipped",
            report.layout.scopes_skipped,
            report.layout.scopes_scanned + report.layout.scopes_skipped
        ));
    }
    for cycle in &report.formula_cycles {
        let members: Vec<String> = cycle.iter().map(|f| f.to_string()).collect();
        notes.push(format!("formula cycle: {}", members.join(" -> ")));
    }

    if notes.is_empty() {
        return;
    }
    println!();
    println!("Notes:");
    for note in notes {
        println!("  - {}", note);
    }
}

fn print_fields(report: &UsageReport) {
    let mut rows = Vec::new();
    collect_rows(&mut rows, "column", &report.columns);
    collect_rows(&mut rows, "measure", &report.measures);
    if rows.is_empty() {
        println!("No fields found.");
        return;
    }
    print_table(&["FIELD", "KIND", "CATEGORY"], &rows);
}

fn collect_rows(rows: &mut Vec<Vec<String>>, kind: &str, sets: &CategorySets) {
    for category in UsageCategory::ALL {
        for field in sets.get(category) {
            rows.push(vec![
                field.to_string(),
                kind.to_string(),
                category.label().to_string(),
            ]);
        }
    }
}
