//! Graph type definitions.
//!
//! This module defines the core types used in the dependency graph:
//! - `DependencyGraph`: The main graph structure
//! - `ResourceNode`: One resource or data block, keyed by its address
//! - `NodeId`: Unique identifier for nodes

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the graph: the block's `type.name`
/// address.
pub type NodeId = String;

/// A resource or data block node in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    /// The `type.name` address
    pub id: NodeId,
    /// Declared resource type (e.g., "azurerm_subnet")
    pub resource_type: String,
    /// Instance name label
    pub name: String,
}

/// The dependency graph structure.
///
/// Wraps a petgraph directed graph of resource nodes and provides
/// domain-specific operations. Every addressable block of a unit becomes a
/// node, including isolated ones; an edge `a -> b` means block `a`
/// references block `b`.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying petgraph directed graph
    inner: DiGraph<ResourceNode, ()>,

    /// Index from address to petgraph NodeIndex
    node_index: HashMap<NodeId, NodeIndex>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Add a resource node to the graph.
    ///
    /// Returns the node ID. Adding the same address twice is a no-op; the
    /// first node wins.
    pub fn add_resource(&mut self, resource_type: &str, name: &str) -> NodeId {
        let node_id = format!("{resource_type}.{name}");

        if self.node_index.contains_key(&node_id) {
            return node_id;
        }

        let node = ResourceNode {
            id: node_id.clone(),
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        };

        let idx = self.inner.add_node(node);
        self.node_index.insert(node_id.clone(), idx);

        node_id
    }

    /// Add an edge between two nodes.
    ///
    /// Returns true if the edge was added, false if it already exists
    /// or if either node doesn't exist.
    pub fn add_edge(&mut self, from: &NodeId, to: &NodeId) -> bool {
        let Some(&from_idx) = self.node_index.get(from) else {
            return false;
        };
        let Some(&to_idx) = self.node_index.get(to) else {
            return false;
        };

        if self.inner.find_edge(from_idx, to_idx).is_some() {
            return false;
        }

        self.inner.add_edge(from_idx, to_idx, ());
        true
    }

    /// Get a node by its address.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&ResourceNode> {
        self.node_index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Get the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Get the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All node addresses, sorted.
    #[must_use]
    pub fn addresses(&self) -> Vec<&NodeId> {
        let mut ids: Vec<&NodeId> = self.node_index.keys().collect();
        ids.sort();
        ids
    }

    /// Addresses this node references (outgoing edges), sorted.
    #[must_use]
    pub fn dependencies_of(&self, id: &str) -> Vec<&NodeId> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };

        let mut deps: Vec<&NodeId> = self
            .inner
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .map(|neighbor_idx| &self.inner[neighbor_idx].id)
            .collect();
        deps.sort();
        deps
    }

    /// Addresses that reference this node (incoming edges), sorted.
    #[must_use]
    pub fn dependents_of(&self, id: &str) -> Vec<&NodeId> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };

        let mut deps: Vec<&NodeId> = self
            .inner
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .map(|neighbor_idx| &self.inner[neighbor_idx].id)
            .collect();
        deps.sort();
        deps
    }

    /// Number of incoming edges for a node; 0 for unknown addresses.
    #[must_use]
    pub fn in_degree(&self, id: &str) -> usize {
        self.node_index
            .get(id)
            .map(|&idx| {
                self.inner
                    .neighbors_directed(idx, petgraph::Direction::Incoming)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Number of outgoing edges for a node; 0 for unknown addresses.
    #[must_use]
    pub fn out_degree(&self, id: &str) -> usize {
        self.node_index
            .get(id)
            .map(|&idx| {
                self.inner
                    .neighbors_directed(idx, petgraph::Direction::Outgoing)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Get an iterator over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.inner.node_weights()
    }

    /// Get an iterator over all edges as (source, target) node pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&ResourceNode, &ResourceNode)> {
        self.inner
            .edge_references()
            .map(|edge| (&self.inner[edge.source()], &self.inner[edge.target()]))
    }

    /// Get the underlying petgraph for advanced operations.
    #[must_use]
    pub fn inner(&self) -> &DiGraph<ResourceNode, ()> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_resource_deduplicates() {
        let mut graph = DependencyGraph::new();
        let first = graph.add_resource("azurerm_subnet", "sub1");
        let second = graph.add_resource("azurerm_subnet", "sub1");
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_deduplicates() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_resource("azurerm_subnet", "sub1");
        let b = graph.add_resource("azurerm_virtual_network", "vnet1");

        assert!(graph.add_edge(&a, &b));
        assert!(!graph.add_edge(&a, &b));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_resource("azurerm_subnet", "sub1");
        assert!(!graph.add_edge(&a, &"azurerm_missing.x".to_string()));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_degrees() {
        let mut graph = DependencyGraph::new();
        let vnet = graph.add_resource("azurerm_virtual_network", "vnet1");
        let sub = graph.add_resource("azurerm_subnet", "sub1");
        let nic = graph.add_resource("azurerm_network_interface", "nic1");
        graph.add_edge(&sub, &vnet);
        graph.add_edge(&nic, &sub);

        assert_eq!(graph.in_degree(&vnet), 1);
        assert_eq!(graph.out_degree(&vnet), 0);
        assert_eq!(graph.in_degree(&nic), 0);
        assert_eq!(graph.out_degree(&nic), 1);
        assert_eq!(graph.dependencies_of(&sub), vec![&vnet]);
        assert_eq!(graph.dependents_of(&sub), vec![&nic]);
    }
}
