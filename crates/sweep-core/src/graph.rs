//! Formula dependency graph over catalog fields

use crate::field::QualifiedField;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Directed graph from a computed field to the fields its formula references.
///
/// Cycles are allowed; consumers that walk the graph must tolerate them.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Edge goes from a field to one of its dependencies
    graph: DiGraph<QualifiedField, ()>,

    /// Map from field to node index
    node_map: HashMap<QualifiedField, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, returning its node (idempotent)
    pub fn add_field(&mut self, field: &QualifiedField) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(field) {
            idx
        } else {
            let idx = self.graph.add_node(field.clone());
            self.node_map.insert(field.clone(), idx);
            idx
        }
    }

    /// Record that `from`'s formula references `to`
    pub fn add_dependency(&mut self, from: &QualifiedField, to: &QualifiedField) {
        let from_idx = self.add_field(from);
        let to_idx = self.add_field(to);
        self.graph.update_edge(from_idx, to_idx, ());
    }

    /// Direct dependencies of a field, sorted
    pub fn dependencies(&self, field: &QualifiedField) -> Vec<&QualifiedField> {
        let Some(&idx) = self.node_map.get(field) else {
            return Vec::new();
        };
        let mut deps: Vec<&QualifiedField> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| &self.graph[n])
            .collect();
        deps.sort();
        deps
    }

    /// Fields whose formulas reference `field`, sorted
    pub fn dependents(&self, field: &QualifiedField) -> Vec<&QualifiedField> {
        let Some(&idx) = self.node_map.get(field) else {
            return Vec::new();
        };
        let mut deps: Vec<&QualifiedField> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| &self.graph[n])
            .collect();
        deps.sort();
        deps
    }

    /// Fields with at least one dependency, with their sorted dependencies
    pub fn fields_with_dependencies(&self) -> Vec<(&QualifiedField, Vec<&QualifiedField>)> {
        let mut out: Vec<_> = self
            .graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .map(|field| (field, self.dependencies(field)))
            .filter(|(_, deps)| !deps.is_empty())
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Groups of fields that reference each other through their formulas.
    ///
    /// Each group is a strongly connected component with more than one
    /// member, or a single field that references itself.
    pub fn cycles(&self) -> Vec<Vec<QualifiedField>> {
        let mut cycles: Vec<Vec<QualifiedField>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&idx| self.graph.find_edge(idx, idx).is_some())
            })
            .map(|component| {
                let members: BTreeSet<QualifiedField> = component
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect();
                members.into_iter().collect()
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn contains(&self, field: &QualifiedField) -> bool {
        self.node_map.contains_key(field)
    }

    /// Number of fields in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
