//! Graph export functionality.
//!
//! This module renders the dependency graph for visualization:
//!
//! - **DOT**: Graphviz DOT format
//! - **Mermaid**: Mermaid flowchart syntax for documentation
//! - **Tree**: indented text tree for terminals
//!
//! All renderings iterate nodes and edges in sorted address order, so the
//! same graph always produces byte-identical output.

use crate::config::GraphOptions;
use crate::graph::types::DependencyGraph;
use crate::types::GraphFormat;

/// Fill color for resource types without a configured color.
const DEFAULT_NODE_COLOR: &str = "lightgray";

/// Export the dependency graph to the specified format.
///
/// # Example
///
/// ```rust
/// use tfcarve::config::GraphOptions;
/// use tfcarve::graph::{export_graph, DependencyGraph};
/// use tfcarve::types::GraphFormat;
///
/// let graph = DependencyGraph::new();
/// let dot = export_graph(&graph, GraphFormat::Dot, &GraphOptions::default());
/// assert!(dot.starts_with("digraph"));
/// ```
#[must_use]
pub fn export_graph(graph: &DependencyGraph, format: GraphFormat, options: &GraphOptions) -> String {
    match format {
        GraphFormat::Dot => export_dot(graph, options),
        GraphFormat::Mermaid => export_mermaid(graph),
        GraphFormat::Tree => export_tree(graph),
    }
}

/// Export to Graphviz DOT format.
fn export_dot(graph: &DependencyGraph, options: &GraphOptions) -> String {
    let mut dot = String::new();
    dot.push_str("digraph terraform_dependencies {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box, style=rounded];\n");
    dot.push('\n');

    for address in graph.addresses() {
        let color = graph
            .get_node(address)
            .and_then(|node| options.colors.get(&node.resource_type))
            .map_or(DEFAULT_NODE_COLOR, String::as_str);
        // Break long addresses across lines at underscores
        let label = address.replace('_', "\\n");
        dot.push_str(&format!(
            "  \"{address}\" [label=\"{label}\", fillcolor=\"{color}\", style=\"filled,rounded\"];\n"
        ));
    }

    dot.push('\n');

    for address in graph.addresses() {
        for target in graph.dependencies_of(address) {
            dot.push_str(&format!("  \"{address}\" -> \"{target}\";\n"));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Export to Mermaid flowchart format.
fn export_mermaid(graph: &DependencyGraph) -> String {
    let mut mermaid = String::new();
    mermaid.push_str("graph LR\n");
    mermaid.push('\n');

    for address in graph.addresses() {
        let id = sanitize_mermaid_id(address);
        mermaid.push_str(&format!("  {id}[\"{address}\"]\n"));
    }

    mermaid.push('\n');

    for address in graph.addresses() {
        let from_id = sanitize_mermaid_id(address);
        for target in graph.dependencies_of(address) {
            let to_id = sanitize_mermaid_id(target);
            mermaid.push_str(&format!("  {from_id} --> {to_id}\n"));
        }
    }

    mermaid
}

/// Export to an indented text tree.
///
/// Roots are the nodes nothing depends on; when every node has an incoming
/// edge (a cycle), the three nodes with the fewest outgoing references are
/// promoted to roots instead. Each node is printed at most once, so shared
/// subtrees and cycles terminate.
fn export_tree(graph: &DependencyGraph) -> String {
    let mut lines = vec!["Terraform Resource Dependencies:".to_string(), String::new()];

    let mut roots: Vec<String> = graph
        .addresses()
        .into_iter()
        .filter(|address| graph.in_degree(address) == 0)
        .cloned()
        .collect();

    if roots.is_empty() && graph.node_count() > 0 {
        let mut by_out_degree: Vec<String> =
            graph.addresses().into_iter().cloned().collect();
        by_out_degree.sort_by_key(|address| (graph.out_degree(address), address.clone()));
        roots = by_out_degree.into_iter().take(3).collect();
        roots.sort();
    }

    let mut visited = std::collections::HashSet::new();
    let root_count = roots.len();
    for (i, root) in roots.iter().enumerate() {
        print_tree(graph, root, "", i == root_count - 1, &mut visited, &mut lines);
    }

    lines.join("\n")
}

fn print_tree(
    graph: &DependencyGraph,
    address: &str,
    prefix: &str,
    is_last: bool,
    visited: &mut std::collections::HashSet<String>,
    lines: &mut Vec<String>,
) {
    if !visited.insert(address.to_string()) {
        return;
    }

    let connector = if is_last { "└── " } else { "├── " };
    lines.push(format!("{prefix}{connector}{address}"));

    let deps = graph.dependencies_of(address);
    let extension = if is_last { "    " } else { "│   " };
    let child_prefix = format!("{prefix}{extension}");

    let count = deps.len();
    for (i, dep) in deps.into_iter().enumerate() {
        print_tree(graph, dep, &child_prefix, i == count - 1, visited, lines);
    }
}

/// Sanitize an address for use as a Mermaid node ID.
fn sanitize_mermaid_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::parser::BlockExtractor;
    use std::path::Path;

    fn sample_graph() -> DependencyGraph {
        let unit = BlockExtractor::new().extract(
            r#"resource "azurerm_virtual_network" "vnet1" {
  name = "vnet-a"
}

resource "azurerm_subnet" "sub1" {
  virtual_network_name = azurerm_virtual_network.vnet1.name
}

resource "azurerm_network_interface" "nic1" {
  subnet_id = azurerm_subnet.sub1.id
}

resource "azurerm_storage_account" "lonely" {
  name = "sa"
}
"#,
            Path::new("main.tf"),
        );
        GraphBuilder::new().build(&unit)
    }

    #[test]
    fn test_export_dot() {
        let dot = export_dot(&sample_graph(), &GraphOptions::default());

        assert!(dot.starts_with("digraph terraform_dependencies {"));
        assert!(dot.contains("rankdir=LR;"));
        // Configured color for vnets, fallback for the unmapped type
        assert!(dot.contains("fillcolor=\"lightblue\""));
        assert!(dot.contains("fillcolor=\"lightgray\""));
        assert!(dot.contains(
            "\"azurerm_subnet.sub1\" -> \"azurerm_virtual_network.vnet1\";"
        ));
        // Isolated node still rendered
        assert!(dot.contains("azurerm_storage_account.lonely"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_dot_labels_break_at_underscores() {
        let dot = export_dot(&sample_graph(), &GraphOptions::default());
        assert!(dot.contains("label=\"azurerm\\nvirtual\\nnetwork.vnet1\""));
    }

    #[test]
    fn test_export_mermaid() {
        let mermaid = export_mermaid(&sample_graph());

        assert!(mermaid.starts_with("graph LR\n"));
        assert!(mermaid.contains("azurerm_subnet_sub1[\"azurerm_subnet.sub1\"]"));
        assert!(mermaid.contains("azurerm_subnet_sub1 --> azurerm_virtual_network_vnet1"));
    }

    #[test]
    fn test_export_tree_roots_and_children() {
        let tree = export_tree(&sample_graph());

        assert!(tree.starts_with("Terraform Resource Dependencies:"));
        // nic1 and lonely have no incoming edges; both are roots.
        assert!(tree.contains("azurerm_network_interface.nic1"));
        assert!(tree.contains("azurerm_storage_account.lonely"));
        // vnet1 appears as a nested child under the chain from nic1.
        let nic_pos = tree.find("azurerm_network_interface.nic1").unwrap();
        let vnet_pos = tree.find("azurerm_virtual_network.vnet1").unwrap();
        assert!(nic_pos < vnet_pos);
        assert!(tree.contains("── azurerm_subnet.sub1"));
    }

    #[test]
    fn test_export_tree_cycle_falls_back_to_fewest_outgoing() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_resource("azurerm_route_table", "a");
        let b = graph.add_resource("azurerm_route_table", "b");
        graph.add_edge(&a, &b);
        graph.add_edge(&b, &a);

        let tree = export_tree(&graph);
        // Every node has an incoming edge; the fallback still prints both.
        assert!(tree.contains("azurerm_route_table.a"));
        assert!(tree.contains("azurerm_route_table.b"));
    }

    #[test]
    fn test_export_deterministic() {
        let first = export_graph(&sample_graph(), GraphFormat::Dot, &GraphOptions::default());
        let second = export_graph(&sample_graph(), GraphFormat::Dot, &GraphOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(export_dot(&graph, &GraphOptions::default()).contains("digraph"));
        assert!(export_tree(&graph).starts_with("Terraform Resource Dependencies:"));
    }
}
