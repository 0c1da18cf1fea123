//! Explain command implementation

use anyhow::{Context, Result};
use sweep_analysis::{Explanation, UsageCategory};
use sweep_core::QualifiedField;

use crate::cli::{ExplainArgs, ExplainOutput, GlobalArgs};
use crate::commands::common::{analyze_archive, print_json};

/// Execute the explain command
pub(crate) fn execute(args: &ExplainArgs, global: &GlobalArgs) -> Result<()> {
    let analysis = analyze_archive(&args.archive, global)?;
    let explanation = analysis
        .explain(&args.field)
        .with_context(|| format!("Cannot explain '{}'", args.field))?;

    match args.output {
        ExplainOutput::Json => print_json(&explanation),
        ExplainOutput::Text => {
            print_explanation(&explanation);
            Ok(())
        }
    }
}

fn print_explanation(explanation: &Explanation) {
    println!("{} ({})", explanation.field, explanation.field.kind());
    println!("Category: {}", explanation.category);

    if let Some(formula) = &explanation.formula {
        println!("Formula: {}", formula);
    }
    print_list("Depends on", &explanation.dependencies);
    print_list("Used by formulas of", &explanation.dependents);

    match explanation.category {
        UsageCategory::Indirect => println!("Reached via: {}", join_trail(&explanation.trail)),
        UsageCategory::Unused => {
            println!("Not referenced by the layout, a relationship, or any used formula.")
        }
        UsageCategory::Direct | UsageCategory::Relationship => {}
    }
}

fn print_list(title: &str, fields: &[QualifiedField]) {
    if fields.is_empty() {
        return;
    }
    let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    println!("{}: {}", title, names.join(", "));
}

/// `Child <- Parent <- Seed`
fn join_trail(trail: &[QualifiedField]) -> String {
    trail
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" <- ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_trail() {
        let trail = vec![
            QualifiedField::column("Orders", "Qty"),
            QualifiedField::column("Orders", "Line Value"),
            QualifiedField::measure("Orders", "Avg Line"),
        ];
        assert_eq!(
            join_trail(&trail),
            "Orders[Qty] <- Orders[Line Value] <- Orders[Avg Line]"
        );
        assert_eq!(join_trail(&[]), "");
    }
}
