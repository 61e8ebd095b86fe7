//! Cross-block reference resolution.
//!
//! Scans a block body for tokens shaped like `type.name[.attribute]` and
//! keeps those whose `type.name` pair is the address of a block already
//! extracted from the same unit. Reserved language namespaces are filtered
//! through a closed set, so adding a new reserved keyword is a one-line
//! change.

use crate::types::ParsedUnit;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// First token segments that are language namespaces, never resource types.
///
/// `var.foo`, `local.bar`, `each.value` and friends must never produce a
/// reference edge.
pub const RESERVED_PREFIXES: &[&str] = &[
    "var",
    "local",
    "data",
    "module",
    "each",
    "count",
    "path",
    "terraform",
    "self",
];

/// Resolve all reference edges within one parse unit.
///
/// Returns source address → set of target addresses. Edges are deduplicated
/// per source, self-edges are excluded, and a target must be a known block
/// address in this unit; references to blocks in other units are silently
/// dropped.
#[must_use]
pub fn resolve_references(unit: &ParsedUnit) -> BTreeMap<String, BTreeSet<String>> {
    // type.name, optionally followed by an attribute segment (ignored)
    let token = Regex::new(r"\b([a-z][a-z0-9_]*)\.([A-Za-z0-9_-]+)")
        .expect("reference token pattern is valid");

    let known = unit.address_index();
    let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for block in unit.addressable_blocks() {
        let source = block.address().expect("addressable blocks have addresses");
        let targets = edges.entry(source.clone()).or_default();

        for caps in token.captures_iter(block.inner_body()) {
            let prefix = &caps[1];
            if RESERVED_PREFIXES.contains(&prefix) {
                continue;
            }

            let candidate = format!("{}.{}", prefix, &caps[2]);
            if candidate == source {
                continue;
            }
            if known.contains_key(&candidate) {
                targets.insert(candidate);
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::BlockExtractor;
    use std::path::Path;

    fn parse(content: &str) -> ParsedUnit {
        BlockExtractor::new().extract(content, Path::new("main.tf"))
    }

    #[test]
    fn test_resolves_known_reference() {
        let unit = parse(
            r#"resource "azurerm_virtual_network" "vnet1" {
  name = "vnet-a"
}

resource "azurerm_subnet" "sub1" {
  name                 = "sub-a"
  virtual_network_name = azurerm_virtual_network.vnet1.name
}
"#,
        );

        let edges = resolve_references(&unit);
        let targets = &edges["azurerm_subnet.sub1"];
        assert!(targets.contains("azurerm_virtual_network.vnet1"));
        assert!(edges["azurerm_virtual_network.vnet1"].is_empty());
    }

    #[test]
    fn test_reserved_prefixes_never_resolve() {
        let unit = parse(
            r#"resource "azurerm_subnet" "sub1" {
  name                = var.subnet_name
  resource_group_name = local.rg_name
  tags                = module.tags.common
  zone                = each.value
  index               = count.index
}
"#,
        );

        let edges = resolve_references(&unit);
        assert!(edges["azurerm_subnet.sub1"].is_empty());
    }

    #[test]
    fn test_unknown_address_dropped() {
        // `nsg.id` looks like a reference but no block of type `nsg` exists.
        let unit = parse(
            r#"resource "azurerm_subnet" "sub1" {
  security_group = nsg.id
}
"#,
        );

        let edges = resolve_references(&unit);
        assert!(edges["azurerm_subnet.sub1"].is_empty());
    }

    #[test]
    fn test_self_edges_excluded() {
        let unit = parse(
            r#"resource "azurerm_route_table" "rt1" {
  note = azurerm_route_table.rt1.id
}
"#,
        );

        let edges = resolve_references(&unit);
        assert!(edges["azurerm_route_table.rt1"].is_empty());
    }

    #[test]
    fn test_edges_deduplicated() {
        let unit = parse(
            r#"resource "azurerm_virtual_network" "vnet1" {
  name = "vnet-a"
}

resource "azurerm_subnet" "sub1" {
  a = azurerm_virtual_network.vnet1.name
  b = azurerm_virtual_network.vnet1.id
}
"#,
        );

        let edges = resolve_references(&unit);
        assert_eq!(edges["azurerm_subnet.sub1"].len(), 1);
    }

    #[test]
    fn test_attribute_segment_ignored() {
        let unit = parse(
            r#"resource "azurerm_network_interface" "nic1" {
  name = "nic-a"
}

resource "azurerm_linux_virtual_machine" "vm1" {
  network_interface_ids = [azurerm_network_interface.nic1.id]
}
"#,
        );

        let edges = resolve_references(&unit);
        assert!(edges["azurerm_linux_virtual_machine.vm1"]
            .contains("azurerm_network_interface.nic1"));
    }
}
