use super::*;

fn m(table: &str, name: &str) -> QualifiedField {
    QualifiedField::measure(table, name)
}

fn c(table: &str, name: &str) -> QualifiedField {
    QualifiedField::column(table, name)
}

#[test]
fn test_add_dependency_is_idempotent() {
    let mut graph = DependencyGraph::new();
    graph.add_dependency(&m("Orders", "Total"), &c("Orders", "Amount"));
    graph.add_dependency(&m("Orders", "Total"), &c("Orders", "Amount"));

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.dependencies(&m("Orders", "Total")), vec![&c("Orders", "Amount")]);
    assert_eq!(graph.dependents(&c("Orders", "Amount")), vec![&m("Orders", "Total")]);
}

#[test]
fn test_unknown_field_has_no_dependencies() {
    let graph = DependencyGraph::new();
    assert!(graph.dependencies(&m("X", "Y")).is_empty());
    assert!(graph.dependents(&m("X", "Y")).is_empty());
    assert!(!graph.contains(&m("X", "Y")));
}

#[test]
fn test_fields_with_dependencies_skips_leaves() {
    let total = m("Orders", "Total");
    let margin = m("Orders", "Margin");
    let amount = c("Orders", "Amount");
    let empty = m("Orders", "Constant");

    let mut graph = DependencyGraph::new();
    graph.add_dependency(&total, &amount);
    graph.add_dependency(&margin, &total);
    graph.add_dependency(&margin, &amount);
    graph.add_field(&empty);

    let with_deps = graph.fields_with_dependencies();
    assert_eq!(with_deps.len(), 2);
    assert_eq!(with_deps[0].0, &margin);
    assert_eq!(with_deps[0].1, vec![&amount, &total]);
    assert_eq!(with_deps[1].0, &total);
    assert!(graph.contains(&empty));
}

#[test]
fn test_cycles_detected() {
    let a = m("T", "A");
    let b = m("T", "B");
    let s = m("T", "Self");
    let leaf = c("T", "Leaf");

    let mut graph = DependencyGraph::new();
    graph.add_dependency(&a, &b);
    graph.add_dependency(&b, &a);
    graph.add_dependency(&a, &leaf);
    graph.add_dependency(&s, &s);

    let cycles = graph.cycles();
    assert_eq!(cycles.len(), 2);
    assert!(cycles.contains(&vec![a.clone(), b.clone()]));
    assert!(cycles.contains(&vec![s.clone()]));
}

#[test]
fn test_acyclic_graph_has_no_cycles() {
    let mut graph = DependencyGraph::new();
    graph.add_dependency(&m("T", "A"), &m("T", "B"));
    graph.add_dependency(&m("T", "B"), &c("T", "C"));
    assert!(graph.cycles().is_empty());
}
