use super::*;

fn col(table: &str, name: &str) -> QualifiedField {
    QualifiedField::column(table, name)
}

fn msr(table: &str, name: &str) -> QualifiedField {
    QualifiedField::measure(table, name)
}

fn seeds(fields: &[QualifiedField]) -> BTreeSet<QualifiedField> {
    fields.iter().cloned().collect()
}

#[test]
fn test_no_seeds_single_pass() {
    let closure = UsageClosure::compute(&BTreeSet::new(), &DependencyGraph::new());
    assert!(closure.marked().is_empty());
    assert_eq!(closure.passes(), 1);
    assert_eq!(closure.pass_sizes(), &[0]);
}

#[test]
fn test_measure_reaches_column() {
    let mut graph = DependencyGraph::new();
    graph.add_dependency(&msr("Orders", "TotalMeasure"), &col("Orders", "Total"));

    let closure = UsageClosure::compute(&seeds(&[msr("Orders", "TotalMeasure")]), &graph);
    assert!(closure.contains(&col("Orders", "Total")));
    assert_eq!(
        closure.reached_via(&col("Orders", "Total")),
        Some(&msr("Orders", "TotalMeasure"))
    );
    assert_eq!(closure.reached_via(&msr("Orders", "TotalMeasure")), None);
    assert_eq!(closure.passes(), 2);
}

#[test]
fn test_chain_is_monotonic_and_bounded() {
    // a -> b -> c -> d
    let fields = [msr("T", "a"), msr("T", "b"), msr("T", "c"), col("T", "d")];
    let mut graph = DependencyGraph::new();
    for pair in fields.windows(2) {
        graph.add_dependency(&pair[0], &pair[1]);
    }

    let closure = UsageClosure::compute(&seeds(&fields[..1]), &graph);
    assert_eq!(closure.marked().len(), 4);
    assert_eq!(closure.pass_sizes(), &[2, 3, 4, 4]);
    assert!(closure.pass_sizes().windows(2).all(|w| w[0] <= w[1]));
    assert!(closure.passes() <= fields.len());
    assert_eq!(
        closure.trail(&col("T", "d")),
        vec![col("T", "d"), msr("T", "c"), msr("T", "b"), msr("T", "a")]
    );
}

#[test]
fn test_cycles_terminate() {
    let (a, b, c) = (msr("T", "a"), msr("T", "b"), msr("T", "c"));
    let mut graph = DependencyGraph::new();
    graph.add_dependency(&a, &b);
    graph.add_dependency(&b, &c);
    graph.add_dependency(&c, &a);
    graph.add_dependency(&c, &c);

    let closure = UsageClosure::compute(&seeds(&[b.clone()]), &graph);
    assert_eq!(closure.marked().len(), 3);
    assert!(closure.passes() <= 3);
    assert_eq!(closure.trail(&a), vec![a.clone(), c.clone(), b.clone()]);
}

#[test]
fn test_unreached_fields_stay_unmarked() {
    let mut graph = DependencyGraph::new();
    graph.add_dependency(&msr("T", "unused"), &col("T", "x"));
    graph.add_dependency(&msr("T", "used"), &col("T", "y"));

    let closure = UsageClosure::compute(&seeds(&[msr("T", "used")]), &graph);
    assert!(closure.contains(&col("T", "y")));
    assert!(!closure.contains(&col("T", "x")));
    assert!(!closure.contains(&msr("T", "unused")));
}

#[test]
fn test_idempotent() {
    let mut graph = DependencyGraph::new();
    graph.add_dependency(&msr("T", "a"), &msr("T", "b"));
    graph.add_dependency(&msr("T", "a"), &col("T", "x"));
    graph.add_dependency(&msr("T", "b"), &col("T", "y"));
    let seeds = seeds(&[msr("T", "a"), col("T", "z")]);

    let first = UsageClosure::compute(&seeds, &graph);
    let second = UsageClosure::compute(&seeds, &graph);
    assert_eq!(first, second);

    // Re-seeding with the closure itself adds nothing
    let again = UsageClosure::compute(first.marked(), &graph);
    assert_eq!(again.marked(), first.marked());
    assert_eq!(again.passes(), 1);
}

#[test]
fn test_seed_count() {
    let closure = UsageClosure::compute(
        &seeds(&[col("T", "a"), col("T", "b")]),
        &DependencyGraph::new(),
    );
    assert_eq!(closure.seed_count(), 2);
    assert_eq!(closure.trail(&col("T", "a")), vec![col("T", "a")]);
}

#[test]
fn test_chain_marks_one_field_per_pass() {
    // Every field depends on the next, so each pass marks exactly one
    let fields: Vec<QualifiedField> = (0..6).map(|i| msr("T", &format!("m{}", i))).collect();
    let mut graph = DependencyGraph::new();
    for pair in fields.windows(2) {
        graph.add_dependency(&pair[0], &pair[1]);
    }

    let closure = UsageClosure::compute(&seeds(&fields[..1]), &graph);
    assert_eq!(closure.marked().len(), fields.len());
    assert_eq!(closure.passes(), fields.len());
    assert!(closure.passes() <= 1 + graph.len());
}
