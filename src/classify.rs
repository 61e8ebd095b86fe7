//! Type-to-bucket classification and block grouping.
//!
//! A [`TypeIndex`] is built once per run from the mapping configuration and
//! is immutable afterwards. Classification resolves a resource type to the
//! bucket file its blocks are routed into: skip list first, then exact
//! match, then longest-prefix match, then the default bucket.

use crate::config::MappingOptions;
use crate::types::{Block, BlockKind, CarveSummary, ParsedUnit, SkippedBlock, SplitResult};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Fixed bucket for non-resource block kinds.
///
/// These routes are not configurable; they mirror the conventional layout of
/// a hand-written Terraform module.
#[must_use]
pub fn special_bucket(kind: BlockKind) -> Option<&'static str> {
    match kind {
        BlockKind::Terraform => Some("versions.tf"),
        BlockKind::Provider => Some("providers.tf"),
        BlockKind::Variable => Some("variables.tf"),
        BlockKind::Output => Some("outputs.tf"),
        BlockKind::Locals => Some("locals.tf"),
        BlockKind::Module => Some("modules.tf"),
        BlockKind::Resource | BlockKind::Data => None,
    }
}

/// Immutable reverse index from resource type to bucket file.
///
/// Built from [`MappingOptions`] once; prefix candidates are sorted
/// longest-first (then lexicographically) so the most specific rule wins and
/// classification never depends on map iteration order.
#[derive(Debug, Clone)]
pub struct TypeIndex {
    exact: HashMap<String, String>,
    /// (type prefix, bucket), longest prefix first.
    prefixes: Vec<(String, String)>,
    skip: HashSet<String>,
    default_file: String,
}

impl TypeIndex {
    /// Build the index from mapping configuration.
    #[must_use]
    pub fn new(options: &MappingOptions) -> Self {
        let mut exact = HashMap::new();
        let mut prefixes = Vec::new();

        for (file, types) in &options.mappings {
            for rtype in types {
                exact.insert(rtype.clone(), file.clone());
                prefixes.push((rtype.clone(), file.clone()));
            }
        }

        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            exact,
            prefixes,
            skip: options.skip_types.iter().cloned().collect(),
            default_file: options.default_file.clone(),
        }
    }

    /// Resolve a resource type to its bucket file.
    ///
    /// Returns `None` for types on the skip list; everything else always
    /// lands somewhere, falling through to the default bucket.
    #[must_use]
    pub fn classify(&self, resource_type: &str) -> Option<&str> {
        if self.skip.contains(resource_type) {
            return None;
        }

        if let Some(file) = self.exact.get(resource_type) {
            return Some(file);
        }

        for (prefix, file) in &self.prefixes {
            if resource_type.starts_with(prefix.as_str()) {
                return Some(file);
            }
        }

        Some(&self.default_file)
    }

    /// The configured fallback bucket.
    #[must_use]
    pub fn default_file(&self) -> &str {
        &self.default_file
    }
}

/// Route every block of a unit into its bucket and render the bucket files.
///
/// Blocks keep their input order within each bucket; bucket bodies are
/// joined with a blank line and end with a trailing newline. Skipped and
/// unclosed blocks are recorded in the summary rather than failing the run.
#[must_use]
pub fn group_blocks(unit: &ParsedUnit, index: &TypeIndex) -> SplitResult {
    let mut buckets: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    let mut summary = CarveSummary {
        total_blocks: unit.blocks.len(),
        ..CarveSummary::default()
    };

    for block in &unit.blocks {
        if block.unclosed {
            summary
                .unclosed
                .push(block.address().unwrap_or_else(|| block.kind.to_string()));
        }

        let Some(bucket) = bucket_for(block, index) else {
            if let (Some(block_type), Some(name)) = (&block.block_type, &block.name) {
                tracing::info!(
                    resource_type = %block_type,
                    name = %name,
                    "Skipping resource per skip_types"
                );
                summary.skipped.push(SkippedBlock {
                    block_type: block_type.clone(),
                    name: name.clone(),
                });
            }
            continue;
        };

        buckets
            .entry(bucket.to_string())
            .or_default()
            .push(block.body.as_str());
    }

    let mut files = BTreeMap::new();
    for (file, bodies) in buckets {
        summary.files.insert(file.clone(), bodies.len());
        let mut content = bodies.join("\n\n");
        content.push('\n');
        files.insert(file, content);
    }

    tracing::debug!(
        source = %unit.source.display(),
        buckets = files.len(),
        routed = summary.routed_blocks(),
        "Grouped blocks into buckets"
    );

    SplitResult { files, summary }
}

/// Bucket for one block: fixed routes for special kinds, the type index for
/// resource and data blocks.
fn bucket_for<'a>(block: &Block, index: &'a TypeIndex) -> Option<&'a str> {
    if let Some(fixed) = special_bucket(block.kind) {
        return Some(fixed);
    }
    let block_type = block.block_type.as_deref()?;
    index.classify(block_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingOptions;
    use crate::parser::BlockExtractor;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use test_case::test_case;

    fn index() -> TypeIndex {
        TypeIndex::new(&MappingOptions::default())
    }

    fn parse(content: &str) -> ParsedUnit {
        BlockExtractor::new().extract(content, Path::new("main.tf"))
    }

    #[test_case("azurerm_virtual_network", "networking.tf" ; "exact networking")]
    #[test_case("azurerm_storage_account", "storage.tf" ; "exact storage")]
    #[test_case("azurerm_resource_group", "resource-groups.tf" ; "exact resource group")]
    #[test_case("azurerm_subnet_nat_gateway_association", "networking.tf" ; "prefix of subnet")]
    #[test_case("google_compute_instance", "other.tf" ; "unknown type defaults")]
    fn test_classify_default_table(resource_type: &str, expected: &str) {
        assert_eq!(index().classify(resource_type), Some(expected));
    }

    #[test]
    fn test_prefix_match_longest_wins() {
        let mut options = MappingOptions::default();
        options.mappings.insert(
            "special.tf".to_string(),
            vec!["azurerm_network_interface_special".to_string()],
        );
        let index = TypeIndex::new(&options);

        // azurerm_network_interface_security_group_association is exact;
        // a novel suffix of the longer prefix routes to the longer rule.
        assert_eq!(
            index.classify("azurerm_network_interface_special_v2"),
            Some("special.tf")
        );
        // Falls back to the shorter azurerm_network_interface prefix.
        assert_eq!(
            index.classify("azurerm_network_interface_backend"),
            Some("compute-nics.tf")
        );
    }

    #[test]
    fn test_skip_type() {
        let options = MappingOptions {
            skip_types: vec!["azurerm_monitor_diagnostic_setting".to_string()],
            ..MappingOptions::default()
        };
        let index = TypeIndex::new(&options);
        assert_eq!(index.classify("azurerm_monitor_diagnostic_setting"), None);
    }

    #[test]
    fn test_classification_is_deterministic() {
        // The same options must classify identically across index builds
        // regardless of HashMap iteration order.
        let options = MappingOptions::default();
        let first = TypeIndex::new(&options);
        for _ in 0..10 {
            let rebuilt = TypeIndex::new(&options);
            for rtype in [
                "azurerm_subnet",
                "azurerm_subnet_nat_gateway_association",
                "azurerm_virtual_network_gateway",
                "azurerm_totally_unknown",
            ] {
                assert_eq!(first.classify(rtype), rebuilt.classify(rtype), "{rtype}");
            }
        }
    }

    #[test]
    fn test_group_blocks_routes_and_counts() {
        let unit = parse(
            r#"terraform {
  required_version = ">= 1.5.0"
}

resource "azurerm_virtual_network" "vnet1" {
  name = "vnet-a"
}

resource "azurerm_subnet" "sub1" {
  name = "sub-a"
}

resource "azurerm_widget" "w1" {
  name = "w"
}
"#,
        );

        let result = group_blocks(&unit, &index());
        assert_eq!(result.summary.total_blocks, 4);
        assert_eq!(result.summary.files["versions.tf"], 1);
        assert_eq!(result.summary.files["networking.tf"], 2);
        assert_eq!(result.summary.files["other.tf"], 1);

        let networking = &result.files["networking.tf"];
        assert!(networking.contains("vnet1"));
        assert!(networking.contains("sub1"));
        // Bodies joined with a blank line, trailing newline at the end.
        assert!(networking.contains("}\n\nresource"));
        assert!(networking.ends_with("}\n"));
    }

    #[test]
    fn test_group_blocks_input_order_preserved() {
        let unit = parse(
            "resource \"azurerm_subnet\" \"b\" {\n}\n\nresource \"azurerm_subnet\" \"a\" {\n}\n",
        );
        let result = group_blocks(&unit, &index());
        let content = &result.files["networking.tf"];
        let pos_b = content.find("\"b\"").unwrap();
        let pos_a = content.find("\"a\"").unwrap();
        assert!(pos_b < pos_a);
    }

    #[test]
    fn test_group_blocks_records_skips_and_unclosed() {
        let options = MappingOptions {
            skip_types: vec!["azurerm_widget".to_string()],
            ..MappingOptions::default()
        };
        let index = TypeIndex::new(&options);

        let unit = parse(
            r#"resource "azurerm_widget" "w1" {
  name = "w"
}

resource "azurerm_subnet" "sub1" {
  name = "sub-a"
"#,
        );

        let result = group_blocks(&unit, &index);
        assert_eq!(result.summary.skipped.len(), 1);
        assert_eq!(result.summary.skipped[0].block_type, "azurerm_widget");
        assert_eq!(result.summary.unclosed, vec!["azurerm_subnet.sub1"]);
        // The unclosed block is still routed, never dropped.
        assert_eq!(result.summary.files["networking.tf"], 1);
        assert!(result.summary.has_warnings());
    }

    #[test]
    fn test_data_blocks_classified_like_resources() {
        let unit = parse(
            "data \"azurerm_virtual_network\" \"existing\" {\n  name = \"vnet-x\"\n}\n",
        );
        let result = group_blocks(&unit, &index());
        assert_eq!(result.summary.files["networking.tf"], 1);
    }
}
