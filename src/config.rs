//! Configuration module for tfcarve.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`tfcarve.yaml`)
//! - Environment variables (expanded inside the YAML)
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # tfcarve.yaml
//!
//! # Scanning options
//! scan:
//!   exclude_patterns:
//!     - "**/.terraform/**"
//!   continue_on_error: true
//!
//! # Output options
//! output:
//!   colored: true
//!   verbose: false
//!
//! # Type-to-bucket classification
//! mapping:
//!   mappings:
//!     networking.tf:
//!       - azurerm_virtual_network
//!       - azurerm_subnet
//!   default_file: other.tf
//!   skip_types: []
//!
//! # Keyed-output generation schemas
//! schema:
//!   resource_types:
//!     - terraform_type: azurerm_subnet
//!       output_key: subnets
//!       key_attribute: composite
//!       key_template: "${virtual_network_name}/${name}"
//!       description: Subnets
//!       attributes: [id, name, virtual_network_name]
//!
//! # Graph rendering
//! graph:
//!   colors:
//!     azurerm_virtual_network: lightblue
//! ```
//!
//! Absence of a section falls back to built-in defaults covering the common
//! networking/compute/storage/database/identity resource type families.

use crate::error::{CarveError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Patterns to exclude from scanning (glob patterns).
    pub exclude_patterns: Vec<String>,

    /// Continue processing even if some units fail.
    pub continue_on_error: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                "**/.terraform/**".to_string(),
                "**/examples/**".to_string(),
            ],
            continue_on_error: false,
        }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Verbose output mode.
    pub verbose: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
        }
    }
}

/// Type-to-bucket classification rules.
///
/// Loaded into an immutable reverse index by [`crate::classify::TypeIndex`]
/// once per run; exact matches beat prefix matches, and prefix matching is
/// longest-first so classification is independent of map iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Bucket file name to the resource types routed into it.
    pub mappings: HashMap<String, Vec<String>>,

    /// Bucket for types with no exact or prefix match.
    pub default_file: String,

    /// Types excluded from all output entirely.
    pub skip_types: Vec<String>,
}

impl Default for MappingOptions {
    fn default() -> Self {
        let mut mappings = HashMap::new();
        let table: &[(&str, &[&str])] = &[
            (
                "compute.tf",
                &[
                    "azurerm_linux_virtual_machine",
                    "azurerm_windows_virtual_machine",
                    "azurerm_virtual_machine",
                    "azurerm_availability_set",
                ],
            ),
            (
                "compute-disks.tf",
                &[
                    "azurerm_managed_disk",
                    "azurerm_virtual_machine_data_disk_attachment",
                ],
            ),
            (
                "compute-nics.tf",
                &[
                    "azurerm_network_interface",
                    "azurerm_network_interface_security_group_association",
                ],
            ),
            ("compute-extensions.tf", &["azurerm_virtual_machine_extension"]),
            (
                "networking.tf",
                &[
                    "azurerm_virtual_network",
                    "azurerm_subnet",
                    "azurerm_public_ip",
                    "azurerm_virtual_network_peering",
                ],
            ),
            (
                "networking-nsgs.tf",
                &[
                    "azurerm_network_security_group",
                    "azurerm_network_security_rule",
                    "azurerm_subnet_network_security_group_association",
                ],
            ),
            (
                "networking-routes.tf",
                &[
                    "azurerm_route_table",
                    "azurerm_route",
                    "azurerm_subnet_route_table_association",
                ],
            ),
            (
                "storage.tf",
                &[
                    "azurerm_storage_account",
                    "azurerm_storage_container",
                    "azurerm_storage_blob",
                ],
            ),
            (
                "databases-sql.tf",
                &["azurerm_mssql_server", "azurerm_mssql_database"],
            ),
            (
                "keyvault.tf",
                &[
                    "azurerm_key_vault",
                    "azurerm_key_vault_access_policy",
                    "azurerm_key_vault_secret",
                ],
            ),
            (
                "identity.tf",
                &["azurerm_user_assigned_identity", "azurerm_role_assignment"],
            ),
            ("resource-groups.tf", &["azurerm_resource_group"]),
        ];
        for (file, types) in table {
            mappings.insert(
                (*file).to_string(),
                types.iter().map(|t| (*t).to_string()).collect(),
            );
        }
        Self {
            mappings,
            default_file: "other.tf".to_string(),
            skip_types: Vec::new(),
        }
    }
}

/// How the map key for a resource family is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAttribute {
    /// Key by the block's depth-zero `name` attribute.
    Name,
    /// Key by substituting attributes into `key_template`.
    Composite,
}

impl Default for KeyAttribute {
    fn default() -> Self {
        Self::Name
    }
}

/// Schema describing how one resource-type family is projected into keyed
/// locals/outputs declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTypeSchema {
    /// The Terraform resource type this schema applies to.
    pub terraform_type: String,

    /// Name of the generated map (`all_<output_key>` / `output "<output_key>"`).
    pub output_key: String,

    /// Key derivation mode.
    #[serde(default)]
    pub key_attribute: KeyAttribute,

    /// Template with `${attr}` placeholders, required for composite keys.
    #[serde(default)]
    pub key_template: Option<String>,

    /// Human-readable family description, written as a comment.
    #[serde(default)]
    pub description: String,

    /// Attributes projected into the generated output declaration.
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,
}

fn default_attributes() -> Vec<String> {
    vec!["id".to_string(), "name".to_string()]
}

/// Keyed-output generation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Per-family schemas, in declaration order.
    pub resource_types: Vec<ResourceTypeSchema>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        let simple = |terraform_type: &str, output_key: &str, description: &str, attrs: &[&str]| {
            ResourceTypeSchema {
                terraform_type: terraform_type.to_string(),
                output_key: output_key.to_string(),
                key_attribute: KeyAttribute::Name,
                key_template: None,
                description: description.to_string(),
                attributes: attrs.iter().map(|a| (*a).to_string()).collect(),
            }
        };
        Self {
            resource_types: vec![
                simple(
                    "azurerm_virtual_network",
                    "vnets",
                    "Virtual Networks",
                    &["id", "name", "location", "resource_group_name", "address_space"],
                ),
                ResourceTypeSchema {
                    terraform_type: "azurerm_subnet".to_string(),
                    output_key: "subnets".to_string(),
                    key_attribute: KeyAttribute::Composite,
                    key_template: Some("${virtual_network_name}/${name}".to_string()),
                    description: "Subnets".to_string(),
                    attributes: vec![
                        "id".to_string(),
                        "name".to_string(),
                        "virtual_network_name".to_string(),
                        "resource_group_name".to_string(),
                        "address_prefixes".to_string(),
                    ],
                },
                simple(
                    "azurerm_network_security_group",
                    "nsgs",
                    "Network Security Groups",
                    &["id", "name", "location", "resource_group_name"],
                ),
                simple(
                    "azurerm_network_interface",
                    "nics",
                    "Network Interfaces",
                    &["id", "name", "location", "resource_group_name", "private_ip_address"],
                ),
                simple(
                    "azurerm_public_ip",
                    "public_ips",
                    "Public IPs",
                    &["id", "name", "location", "resource_group_name", "ip_address"],
                ),
                simple(
                    "azurerm_route_table",
                    "route_tables",
                    "Route Tables",
                    &["id", "name", "location", "resource_group_name"],
                ),
                simple(
                    "azurerm_linux_virtual_machine",
                    "linux_vms",
                    "Linux Virtual Machines",
                    &["id", "name", "location", "resource_group_name", "size", "private_ip_address"],
                ),
                simple(
                    "azurerm_windows_virtual_machine",
                    "windows_vms",
                    "Windows Virtual Machines",
                    &["id", "name", "location", "resource_group_name", "size", "private_ip_address"],
                ),
                simple(
                    "azurerm_managed_disk",
                    "managed_disks",
                    "Managed Disks",
                    &["id", "name", "location", "resource_group_name", "disk_size_gb"],
                ),
                simple(
                    "azurerm_storage_account",
                    "storage_accounts",
                    "Storage Accounts",
                    &["id", "name", "location", "resource_group_name", "account_tier"],
                ),
                simple(
                    "azurerm_storage_container",
                    "storage_containers",
                    "Storage Containers",
                    &["id", "name", "storage_account_name"],
                ),
                simple(
                    "azurerm_mssql_server",
                    "sql_servers",
                    "Azure SQL Servers",
                    &["id", "name", "location", "resource_group_name", "fully_qualified_domain_name"],
                ),
                simple(
                    "azurerm_mssql_database",
                    "sql_databases",
                    "Azure SQL Databases",
                    &["id", "name", "server_id"],
                ),
                simple(
                    "azurerm_key_vault",
                    "key_vaults",
                    "Key Vaults",
                    &["id", "name", "location", "resource_group_name", "vault_uri"],
                ),
                simple(
                    "azurerm_user_assigned_identity",
                    "managed_identities",
                    "User Assigned Managed Identities",
                    &["id", "name", "location", "resource_group_name", "client_id", "principal_id"],
                ),
                simple(
                    "azurerm_resource_group",
                    "resource_groups",
                    "Resource Groups",
                    &["id", "name", "location"],
                ),
            ],
        }
    }
}

/// Graph rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Resource type to node fill color; unmapped types render gray.
    pub colors: HashMap<String, String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        let mut colors = HashMap::new();
        for (rtype, color) in [
            ("azurerm_virtual_network", "lightblue"),
            ("azurerm_subnet", "lightblue"),
            ("azurerm_network_security_group", "orange"),
            ("azurerm_linux_virtual_machine", "lightgreen"),
            ("azurerm_windows_virtual_machine", "lightgreen"),
            ("azurerm_storage_account", "yellow"),
        ] {
            colors.insert(rtype.to_string(), color.to_string());
        }
        Self { colors }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanning options
    pub scan: ScanOptions,

    /// Output options
    pub output: OutputOptions,

    /// Type-to-bucket classification rules
    pub mapping: MappingOptions,

    /// Keyed-output generation schemas
    pub schema: SchemaOptions,

    /// Graph rendering options
    pub graph: GraphOptions,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Config =
            serde_yaml::from_str(&expanded).map_err(|e| CarveError::ConfigParse {
                message: e.to_string(),
                source: None,
            })?;

        config.validate()?;

        tracing::debug!(
            buckets = config.mapping.mappings.len(),
            schemas = config.schema.resource_types.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check cross-field constraints the serde layer cannot express.
    fn validate(&self) -> Result<()> {
        for schema in &self.schema.resource_types {
            if schema.key_attribute == KeyAttribute::Composite && schema.key_template.is_none() {
                return Err(CarveError::ConfigValue {
                    key: format!("schema.resource_types.{}", schema.terraform_type),
                    message: "composite key_attribute requires key_template".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# tfcarve Configuration File

# Scanning options
scan:
  # Patterns to exclude from scanning (glob patterns)
  exclude_patterns:
    - "**/.terraform/**"
    - "**/examples/**"

  # Continue processing even if some units fail
  continue_on_error: false

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Enable verbose output
  verbose: false

# Type-to-bucket classification.
# Types not listed here fall through prefix matching to default_file.
mapping:
  mappings:
    networking.tf:
      - azurerm_virtual_network
      - azurerm_subnet
      - azurerm_public_ip
    compute.tf:
      - azurerm_linux_virtual_machine
      - azurerm_windows_virtual_machine
    storage.tf:
      - azurerm_storage_account
  default_file: other.tf
  skip_types: []

# Keyed-output generation schemas (locals.tf / outputs.tf)
schema:
  resource_types:
    - terraform_type: azurerm_virtual_network
      output_key: vnets
      key_attribute: name
      description: Virtual Networks
      attributes: [id, name, location, resource_group_name]
    - terraform_type: azurerm_subnet
      output_key: subnets
      key_attribute: composite
      key_template: "${virtual_network_name}/${name}"
      description: Subnets
      attributes: [id, name, virtual_network_name]

# Graph rendering
graph:
  colors:
    azurerm_virtual_network: lightblue
    azurerm_subnet: lightblue
    azurerm_storage_account: yellow
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::SplitArgs) {
        if args.continue_on_error {
            self.scan.continue_on_error = true;
        }
        if let Some(ref default_file) = args.default_file {
            self.mapping.default_file = default_file.clone();
        }
        self.scan
            .exclude_patterns
            .extend(args.exclude_patterns.iter().cloned());
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    let re = regex::Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
