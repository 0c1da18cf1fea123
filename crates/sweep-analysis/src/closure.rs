//! Usage closure over formula dependencies.
//!
//! Starting from the seed fields, each pass follows the dependency edges of
//! every field marked so far and marks the targets not yet marked. The loop
//! stops after the first pass that marks nothing. Fields only ever go from
//! unmarked to marked and every productive pass marks at least one, so the
//! loop is guaranteed to end within `max(seeds + graph fields, 1)` passes,
//! cycles included. The bound is a property of the loop, not a cap on it.

use std::collections::{BTreeMap, BTreeSet};
use sweep_core::{DependencyGraph, QualifiedField};

/// Result of running the closure to its fixpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageClosure {
    marked: BTreeSet<QualifiedField>,
    seed_count: usize,
    pass_sizes: Vec<usize>,
    reached_via: BTreeMap<QualifiedField, QualifiedField>,
}

impl UsageClosure {
    /// Run the closure from `seeds` over `graph`
    pub fn compute(seeds: &BTreeSet<QualifiedField>, graph: &DependencyGraph) -> Self {
        let mut marked = seeds.clone();
        let mut reached_via = BTreeMap::new();
        let mut pass_sizes = Vec::new();
        let pass_limit = (seeds.len() + graph.len()).max(1);

        loop {
            let mut newly_marked = Vec::new();
            for field in &marked {
                for dep in graph.dependencies(field) {
                    if !marked.contains(dep) && !reached_via.contains_key(dep) {
                        reached_via.insert(dep.clone(), field.clone());
                        newly_marked.push(dep.clone());
                    }
                }
            }

            let changed = !newly_marked.is_empty();
            marked.extend(newly_marked);
            pass_sizes.push(marked.len());
            log::debug!("Closure pass {}: {} fields marked", pass_sizes.len(), marked.len());
            debug_assert!(
                pass_sizes.len() <= pass_limit,
                "closure exceeded {} passes",
                pass_limit
            );

            if !changed {
                break;
            }
        }

        Self {
            marked,
            seed_count: seeds.len(),
            pass_sizes,
            reached_via,
        }
    }

    /// Every marked field, seeds included
    pub fn marked(&self) -> &BTreeSet<QualifiedField> {
        &self.marked
    }

    pub fn contains(&self, field: &QualifiedField) -> bool {
        self.marked.contains(field)
    }

    /// Number of passes run, including the final pass that changed nothing
    pub fn passes(&self) -> usize {
        self.pass_sizes.len()
    }

    /// Marked-set size after each pass
    pub fn pass_sizes(&self) -> &[usize] {
        &self.pass_sizes
    }

    pub fn seed_count(&self) -> usize {
        self.seed_count
    }

    /// The field whose formula first reached `field`, if it was not a seed
    pub fn reached_via(&self, field: &QualifiedField) -> Option<&QualifiedField> {
        self.reached_via.get(field)
    }

    /// `field` followed by the fields that led to it, ending at a seed
    pub fn trail(&self, field: &QualifiedField) -> Vec<QualifiedField> {
        let mut trail = vec![field.clone()];
        let mut current = field;
        while let Some(parent) = self.reached_via.get(current) {
            // a parent is always marked in an earlier pass than its child
            trail.push(parent.clone());
            current = parent;
        }
        trail
    }
}

#[cfg(test)]
#[path = "closure_test.rs"]
mod tests;
