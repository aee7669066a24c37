//! Turns declared module dependencies into a validated edge list.

use archgraph_core::{DependencyEdge, Module};
use std::collections::HashSet;
use tracing::debug;

/// Emits one edge per declared dependency whose target exists in `modules`.
///
/// Edges come out in module-then-dependency order. Dangling identifiers are
/// dropped without error and duplicates are kept.
pub fn extract_dependencies(modules: &[Module]) -> Vec<DependencyEdge> {
    let known: HashSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();

    let mut edges = Vec::new();
    let mut dropped = 0usize;
    for module in modules {
        for target in &module.dependencies {
            if known.contains(target.as_str()) {
                edges.push(DependencyEdge::new(&module.id, target));
            } else {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, "Dropped dependencies pointing outside the projection");
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, deps: &[&str]) -> Module {
        let mut m = Module::new(id, id, id);
        m.dependencies = deps.iter().map(|d| d.to_string()).collect();
        m
    }

    #[test]
    fn drops_dangling_targets() {
        let modules = vec![module("a", &["b", "ghost"]), module("b", &[])];
        let edges = extract_dependencies(&modules);
        assert_eq!(edges, vec![DependencyEdge::new("a", "b")]);
    }

    #[test]
    fn preserves_iteration_order_and_duplicates() {
        let modules = vec![
            module("a", &["c", "b"]),
            module("b", &["c"]),
            module("c", &[]),
            module("a", &["b"]),
        ];
        let edges: Vec<(String, String)> = extract_dependencies(&modules)
            .into_iter()
            .map(|e| (e.from, e.to))
            .collect();

        assert_eq!(
            edges,
            vec![
                ("a".to_string(), "c".to_string()),
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string()),
                ("a".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn every_edge_has_unit_strength() {
        let modules = vec![module("a", &["b"]), module("b", &["a"])];
        assert!(extract_dependencies(&modules).iter().all(|e| e.strength == 1));
    }
}
