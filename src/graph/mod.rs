//! Dependency Graph Module
//!
//! This module implements a directed graph over the resource and data
//! blocks of one parse unit, using the `petgraph` library as its
//! foundation.
//!
//! # Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  DEPENDENCY GRAPH                      │
//! ├────────────────────────────────────────────────────────┤
//! │                                                        │
//! │  ┌───────────────┐  references  ┌──────────────────┐  │
//! │  │ azurerm_subnet│─────────────▶│ azurerm_virtual_ │  │
//! │  │     .sub1     │              │  network.vnet1   │  │
//! │  └───────────────┘              └──────────────────┘  │
//! │         ▲                                              │
//! │         │ references                                   │
//! │  ┌──────┴──────────────┐                               │
//! │  │ azurerm_network_    │                               │
//! │  │ interface.nic1      │                               │
//! │  └─────────────────────┘                               │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Nodes are resource/data addresses; an edge `a -> b` means block `a`
//! mentions `b`'s address in its body. Isolated resources are still nodes
//! so renderings show the full inventory.
//!
//! # Node Indexing
//!
//! Nodes are indexed in two ways:
//! 1. **Petgraph NodeIndex**: internal graph index for traversal
//! 2. **Address**: `type.name` string for lookups
//!
//! A `HashMap<String, NodeIndex>` provides O(1) lookup by address.
//!
//! # Example: Complete Workflow
//!
//! ```rust,no_run
//! use tfcarve::config::GraphOptions;
//! use tfcarve::graph::{export_graph, GraphBuilder};
//! use tfcarve::parser::BlockExtractor;
//! use tfcarve::types::GraphFormat;
//!
//! // 1. Extract blocks from an input unit
//! let content = std::fs::read_to_string("main.tf").unwrap();
//! let unit = BlockExtractor::new().extract(&content, std::path::Path::new("main.tf"));
//!
//! // 2. Build the dependency graph
//! let graph = GraphBuilder::new().build(&unit);
//! println!("Total nodes: {}", graph.node_count());
//!
//! // 3. Export for visualization
//! let dot = export_graph(&graph, GraphFormat::Dot, &GraphOptions::default());
//! std::fs::write("dependencies.dot", dot).unwrap();
//!
//! // 4. Render with Graphviz: dot -Tpng dependencies.dot -o dependencies.png
//! ```

mod builder;
mod export;
mod types;

pub use builder::GraphBuilder;
pub use export::export_graph;
pub use types::{DependencyGraph, NodeId, ResourceNode};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphOptions;
    use crate::parser::BlockExtractor;
    use crate::types::GraphFormat;
    use std::path::Path;

    fn build(content: &str) -> DependencyGraph {
        let unit = BlockExtractor::new().extract(content, Path::new("main.tf"));
        GraphBuilder::new().build(&unit)
    }

    #[test]
    fn test_build_and_export_all_formats() {
        let graph = build(
            r#"resource "azurerm_virtual_network" "vnet1" {
  name = "vnet-a"
}

resource "azurerm_subnet" "sub1" {
  virtual_network_name = azurerm_virtual_network.vnet1.name
}
"#,
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let options = GraphOptions::default();
        for format in [GraphFormat::Dot, GraphFormat::Mermaid, GraphFormat::Tree] {
            let rendered = export_graph(&graph, format, &options);
            assert!(rendered.contains("azurerm_subnet"), "{format:?}");
        }
    }
}
