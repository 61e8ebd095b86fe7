//! Keyed locals/outputs generation.
//!
//! aztfexport names resources `res-0`, `res-1`, ... which makes cross-state
//! references unreadable. This module projects resource blocks into two
//! generated files:
//!
//! - `locals.tf`: one `all_<family>` map per configured resource family,
//!   keyed by the resource's Azure name (or a composite key built from a
//!   template)
//! - `outputs.tf`: one `output` block per family exposing a fixed attribute
//!   projection over the corresponding map, plus an `_metadata` output
//!
//! Resources whose key attribute cannot be recovered are skipped with a
//! warning comment in the generated file and recorded in the summary rather
//! than failing the run.

use crate::config::{KeyAttribute, ResourceTypeSchema, SchemaOptions};
use crate::parser::{attribute_at_depth_zero, attributes_at_depth_zero};
use crate::types::{Block, BlockKind, CarveSummary, ParsedUnit};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Generates `locals.tf` and `outputs.tf` from a parsed unit.
pub struct OutputGenerator {
    config_map: HashMap<String, ResourceTypeSchema>,
}

impl OutputGenerator {
    /// Create a generator from the configured family schemas.
    #[must_use]
    pub fn new(options: &SchemaOptions) -> Self {
        let config_map = options
            .resource_types
            .iter()
            .map(|schema| (schema.terraform_type.clone(), schema.clone()))
            .collect();
        Self { config_map }
    }

    /// Generate the `locals.tf` content.
    ///
    /// Resources missing their key attribute are recorded in `summary` and
    /// emit a warning comment in place of a map entry; unknown resource
    /// types emit a skip comment before being left out entirely.
    #[must_use]
    pub fn generate_locals(&self, unit: &ParsedUnit, summary: &mut CarveSummary) -> String {
        let mut lines = vec![
            "# =============================================================================".to_string(),
            "# LOCALS - Auto-generated by tfcarve".to_string(),
            "# =============================================================================".to_string(),
            "# Maps aztfexport resources by their Azure names for easier reference.".to_string(),
            "# DO NOT EDIT MANUALLY - regenerate if main.tf changes.".to_string(),
            "# =============================================================================".to_string(),
            String::new(),
            "locals {".to_string(),
        ];

        for (resource_type, blocks) in group_resources(unit) {
            let Some(schema) = self.config_map.get(resource_type) else {
                lines.push(format!(
                    "  # Skipped unknown type: {} ({} resources)",
                    resource_type,
                    blocks.len()
                ));
                continue;
            };

            lines.push(String::new());
            lines.push(format!("  # {}", schema.description));
            lines.push(format!("  all_{} = {{", schema.output_key));

            for block in blocks {
                let name = block.name.as_deref().unwrap_or_default();
                match derive_key(schema, block) {
                    Some(key) => {
                        lines.push(format!("    \"{key}\" = {resource_type}.{name}"));
                    }
                    None => {
                        let address = format!("{resource_type}.{name}");
                        tracing::warn!(
                            address = %address,
                            "Resource has no usable key attribute, omitting from locals"
                        );
                        summary.missing_key.push(address);
                        lines.push(format!(
                            "    # Warning: {name} has no name attribute"
                        ));
                    }
                }
            }

            lines.push("  }".to_string());
        }

        lines.push("}".to_string());
        lines.push(String::new());

        lines.join("\n")
    }

    /// Generate the `outputs.tf` content.
    ///
    /// One output per family with at least one keyed resource, each
    /// projecting the schema's attributes over the family map, followed by
    /// an `_metadata` output describing the export.
    #[must_use]
    pub fn generate_outputs(&self, unit: &ParsedUnit) -> String {
        let mut lines = vec![
            "# =============================================================================".to_string(),
            "# OUTPUTS - Auto-generated by tfcarve".to_string(),
            "# =============================================================================".to_string(),
            "# These outputs expose resources for consumption by:".to_string(),
            "#   - The subscription-level catalog (merges all RG outputs)".to_string(),
            "#   - Cross-state references via terraform_remote_state".to_string(),
            "# DO NOT EDIT MANUALLY - regenerate if main.tf changes.".to_string(),
            "# =============================================================================".to_string(),
            String::new(),
        ];

        let grouped = group_resources(unit);
        let mut total = 0;

        for (resource_type, blocks) in &grouped {
            total += blocks.len();

            let Some(schema) = self.config_map.get(*resource_type) else {
                continue;
            };
            if !blocks.iter().any(|block| derive_key(schema, block).is_some()) {
                continue;
            }

            lines.push(format!("output \"{}\" {{", schema.output_key));
            lines.push(format!(
                "  description = \"{} in this resource group\"",
                schema.description
            ));
            lines.push("  value = {".to_string());
            lines.push(format!(
                "    for k, v in local.all_{} : k => {{",
                schema.output_key
            ));

            for attr in &schema.attributes {
                lines.push(format!("      {attr} = v.{attr}"));
            }

            lines.push("    }".to_string());
            lines.push("  }".to_string());
            lines.push("}".to_string());
            lines.push(String::new());
        }

        let type_list = grouped
            .keys()
            .map(|rtype| format!("\"{rtype}\""))
            .collect::<Vec<_>>()
            .join(", ");

        lines.extend([
            "# Metadata about this export".to_string(),
            "output \"_metadata\" {".to_string(),
            "  description = \"Metadata about this legacy RG export\"".to_string(),
            "  value = {".to_string(),
            format!("    resource_count = {total}"),
            format!("    resource_types = [{type_list}]"),
            "    generated_by   = \"tfcarve\"".to_string(),
            "  }".to_string(),
            "}".to_string(),
            String::new(),
        ]);

        lines.join("\n")
    }
}

/// Resource blocks grouped by type, in input order within each type.
fn group_resources(unit: &ParsedUnit) -> BTreeMap<&str, Vec<&Block>> {
    let mut grouped: BTreeMap<&str, Vec<&Block>> = BTreeMap::new();
    for block in &unit.blocks {
        if block.kind != BlockKind::Resource {
            continue;
        }
        if let Some(block_type) = block.block_type.as_deref() {
            grouped.entry(block_type).or_default().push(block);
        }
    }
    grouped
}

/// Derive the map key for one resource per its family schema.
///
/// `Name` keys use the depth-zero `name` attribute. `Composite` keys
/// substitute depth-zero attributes into the `${attr}` template; when a
/// template attribute is missing the key falls back to the plain name.
fn derive_key(schema: &ResourceTypeSchema, block: &Block) -> Option<String> {
    let body = block.inner_body();
    let name = attribute_at_depth_zero(body, "name");

    match schema.key_attribute {
        KeyAttribute::Name => name,
        KeyAttribute::Composite => {
            let template = schema.key_template.as_deref()?;
            substitute_template(template, &attributes_at_depth_zero(body)).or(name)
        }
    }
}

/// Substitute `${attr}` placeholders; `None` when any attribute is absent.
fn substitute_template(template: &str, attrs: &HashMap<String, String>) -> Option<String> {
    let placeholder =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid");

    let mut result = template.to_string();
    for caps in placeholder.captures_iter(template) {
        let value = attrs.get(&caps[1])?;
        result = result.replace(&caps[0], value);
    }
    Some(result)
}
