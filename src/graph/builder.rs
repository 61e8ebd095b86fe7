//! Graph builder implementation.
//!
//! This module provides the `GraphBuilder` which constructs a
//! `DependencyGraph` from one parsed unit's blocks and their resolved
//! references.

use crate::graph::types::DependencyGraph;
use crate::parser::resolve_references;
use crate::types::ParsedUnit;

/// Builder for constructing dependency graphs.
///
/// # Algorithm
///
/// 1. **Node Creation Phase**: every addressable block becomes a node, so
///    resources without any references still appear in renderings.
/// 2. **Edge Creation Phase**: each resolved reference `a -> b` becomes a
///    directed edge; references are deduplicated and sorted upstream, so
///    edge insertion order is deterministic.
///
/// # Example
///
/// ```rust,no_run
/// use tfcarve::graph::GraphBuilder;
/// use tfcarve::parser::BlockExtractor;
///
/// let unit = BlockExtractor::new()
///     .extract("resource \"azurerm_subnet\" \"sub1\" {\n}\n", std::path::Path::new("main.tf"));
/// let graph = GraphBuilder::new().build(&unit);
/// println!("Built graph with {} nodes", graph.node_count());
/// ```
pub struct GraphBuilder;

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a dependency graph from one parsed unit.
    #[must_use]
    pub fn build(&self, unit: &ParsedUnit) -> DependencyGraph {
        let mut graph = DependencyGraph::new();

        for block in unit.addressable_blocks() {
            if let (Some(block_type), Some(name)) = (&block.block_type, &block.name) {
                graph.add_resource(block_type, name);
            }
        }

        let references = resolve_references(unit);
        for (source, targets) in &references {
            for target in targets {
                graph.add_edge(source, target);
            }
        }

        tracing::debug!(
            source = %unit.source.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph construction complete"
        );

        graph
    }
}
