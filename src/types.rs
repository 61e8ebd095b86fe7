//! Core data types used throughout tfcarve.
//!
//! This module defines the fundamental data structures for representing:
//! - Top-level Terraform blocks extracted from an input unit
//! - Parsed units (one input file's worth of blocks)
//! - Split results and processing summaries
//! - Report and graph output formats

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::path::PathBuf;

/// The kind of a top-level Terraform block.
///
/// These are the only header keywords the block extractor recognizes;
/// anything else at the top level is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// `resource "type" "name" { ... }`
    Resource,
    /// `data "type" "name" { ... }`
    Data,
    /// `variable "name" { ... }`
    Variable,
    /// `output "name" { ... }`
    Output,
    /// `locals { ... }`
    Locals,
    /// `terraform { ... }`
    Terraform,
    /// `provider "name" { ... }`
    Provider,
    /// `module "name" { ... }`
    Module,
}

impl BlockKind {
    /// Parse a header keyword into a kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "resource" => Some(Self::Resource),
            "data" => Some(Self::Data),
            "variable" => Some(Self::Variable),
            "output" => Some(Self::Output),
            "locals" => Some(Self::Locals),
            "terraform" => Some(Self::Terraform),
            "provider" => Some(Self::Provider),
            "module" => Some(Self::Module),
            _ => None,
        }
    }

    /// The keyword as written in configuration text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Data => "data",
            Self::Variable => "variable",
            Self::Output => "output",
            Self::Locals => "locals",
            Self::Terraform => "terraform",
            Self::Provider => "provider",
            Self::Module => "module",
        }
    }

    /// Whether blocks of this kind carry a `type.name` address.
    #[must_use]
    pub const fn is_addressable(&self) -> bool {
        matches!(self, Self::Resource | Self::Data)
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One top-level block extracted from an input unit.
///
/// Blocks are immutable after extraction and exclusively owned by the
/// [`ParsedUnit`] they came from.
///
/// # Example HCL
///
/// ```hcl
/// resource "azurerm_subnet" "sub1" {
///   name                 = "sub-a"
///   virtual_network_name = "vnet-a"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block kind (resource, data, variable, ...)
    pub kind: BlockKind,

    /// Declared type, present for resource/data blocks
    /// (e.g., "azurerm_subnet")
    pub block_type: Option<String>,

    /// Instance name label (e.g., "sub1"); absent for locals/terraform
    pub name: Option<String>,

    /// Full raw text of the block, header line through closing brace
    pub body: String,

    /// Source line range `[start, end)` within the input unit
    pub span: (usize, usize),

    /// True when end-of-input was reached before the closing brace;
    /// the block is kept and flagged rather than dropped
    pub unclosed: bool,
}

impl Block {
    /// The `type.name` address for resource/data blocks, `None` otherwise.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        if !self.kind.is_addressable() {
            return None;
        }
        match (&self.block_type, &self.name) {
            (Some(t), Some(n)) => Some(format!("{t}.{n}")),
            _ => None,
        }
    }

    /// The content between the header's opening brace and the matching
    /// closing brace.
    ///
    /// Attribute extraction is scoped to depth zero *relative to this inner
    /// body*. For unclosed blocks everything after the opening brace is
    /// returned.
    #[must_use]
    pub fn inner_body(&self) -> &str {
        let Some(open) = self.body.find('{') else {
            return "";
        };
        let inner = &self.body[open + 1..];
        if self.unclosed {
            return inner;
        }
        match inner.rfind('}') {
            Some(close) => &inner[..close],
            None => inner,
        }
    }
}

/// The blocks extracted from one input unit, in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// Path of the input unit this was parsed from
    pub source: PathBuf,

    /// All recognized top-level blocks, in input order
    pub blocks: Vec<Block>,
}

impl ParsedUnit {
    /// Index of block addresses to block positions.
    ///
    /// Duplicate addresses are tolerated; the last-seen block wins for
    /// lookup purposes. Every block still appears in `blocks`.
    #[must_use]
    pub fn address_index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if let Some(addr) = block.address() {
                if index.insert(addr.clone(), i).is_some() {
                    tracing::warn!(address = %addr, "Duplicate block address, last-seen wins");
                }
            }
        }
        index
    }

    /// All addressable blocks (resource/data) in input order.
    pub fn addressable_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.address().is_some())
    }
}

/// A resource that was skipped by an explicit `skip_types` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedBlock {
    /// The declared resource type
    pub block_type: String,
    /// The instance name
    pub name: String,
}

/// Summary of one split/output pass, returned alongside successful output.
///
/// Recoverable conditions (skipped types, unclosed blocks, resources missing
/// a key attribute) accumulate here instead of failing the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarveSummary {
    /// Target file name to number of blocks routed into it
    pub files: BTreeMap<String, usize>,

    /// Resources excluded by `skip_types`
    pub skipped: Vec<SkippedBlock>,

    /// Addresses (or kinds) of blocks whose closing brace was never found
    pub unclosed: Vec<String>,

    /// Addresses omitted from keyed output for lack of the key attribute
    pub missing_key: Vec<String>,

    /// Total number of blocks extracted from the unit
    pub total_blocks: usize,
}

impl CarveSummary {
    /// Total number of blocks routed into output files.
    #[must_use]
    pub fn routed_blocks(&self) -> usize {
        self.files.values().sum()
    }

    /// Whether any recoverable condition was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty() || !self.unclosed.is_empty() || !self.missing_key.is_empty()
    }
}

/// The result of splitting one unit into bucket files.
#[derive(Debug, Clone, Default)]
pub struct SplitResult {
    /// Bucket file name to rendered contents
    pub files: BTreeMap<String, String>,

    /// Processing summary for this unit
    pub summary: CarveSummary,
}

/// Output format for split summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text
    Text,
    /// Machine-readable JSON
    Json,
}

/// Output format for dependency graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    /// Graphviz DOT format
    Dot,
    /// Mermaid diagram syntax
    Mermaid,
    /// Indented text tree
    Tree,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(block_type: &str, name: &str) -> Block {
        Block {
            kind: BlockKind::Resource,
            block_type: Some(block_type.to_string()),
            name: Some(name.to_string()),
            body: String::new(),
            span: (0, 1),
            unclosed: false,
        }
    }

    #[test]
    fn test_block_address() {
        let block = resource("azurerm_subnet", "sub1");
        assert_eq!(block.address().as_deref(), Some("azurerm_subnet.sub1"));

        let locals = Block {
            kind: BlockKind::Locals,
            block_type: None,
            name: None,
            body: String::new(),
            span: (0, 1),
            unclosed: false,
        };
        assert_eq!(locals.address(), None);
    }

    #[test]
    fn test_kind_from_keyword() {
        assert_eq!(BlockKind::from_keyword("resource"), Some(BlockKind::Resource));
        assert_eq!(BlockKind::from_keyword("locals"), Some(BlockKind::Locals));
        assert_eq!(BlockKind::from_keyword("widget"), None);
    }

    #[test]
    fn test_address_index_last_seen_wins() {
        let unit = ParsedUnit {
            source: PathBuf::from("main.tf"),
            blocks: vec![resource("azurerm_subnet", "sub1"), resource("azurerm_subnet", "sub1")],
        };
        let index = unit.address_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index["azurerm_subnet.sub1"], 1);
    }

    #[test]
    fn test_inner_body_strips_header_braces() {
        let block = Block {
            kind: BlockKind::Resource,
            block_type: Some("azurerm_subnet".to_string()),
            name: Some("sub1".to_string()),
            body: "resource \"azurerm_subnet\" \"sub1\" {\n  name = \"sub-a\"\n}".to_string(),
            span: (0, 3),
            unclosed: false,
        };
        assert_eq!(block.inner_body(), "\n  name = \"sub-a\"\n");
    }

    #[test]
    fn test_inner_body_unclosed() {
        let block = Block {
            kind: BlockKind::Resource,
            block_type: Some("azurerm_subnet".to_string()),
            name: Some("sub1".to_string()),
            body: "resource \"azurerm_subnet\" \"sub1\" {\n  name = \"sub-a\"".to_string(),
            span: (0, 2),
            unclosed: true,
        };
        assert_eq!(block.inner_body(), "\n  name = \"sub-a\"");
    }

    #[test]
    fn test_summary_warnings() {
        let mut summary = CarveSummary::default();
        assert!(!summary.has_warnings());
        summary.unclosed.push("azurerm_subnet.sub1".to_string());
        assert!(summary.has_warnings());
    }
}
