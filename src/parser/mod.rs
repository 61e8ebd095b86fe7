//! Lexical parsing of aztfexport-style Terraform text.
//!
//! This module recovers top-level blocks, depth-zero attributes, and
//! cross-block references from configuration text using line-oriented
//! scanning and brace-depth tracking, deliberately *not* a full HCL
//! grammar. aztfexport output is well-formatted but occasionally truncated,
//! and a grammar parser would reject exactly the inputs this tool must
//! recover (see [`blocks::BlockExtractor`]).
//!
//! # Components
//!
//! - [`blocks`]: top-level block extraction with brace counting
//! - [`attrs`]: depth-zero scalar attribute extraction
//! - [`refs`]: `type.name` reference resolution
//!
//! # Example
//!
//! ```rust
//! use tfcarve::parser::BlockExtractor;
//!
//! let extractor = BlockExtractor::new();
//! let unit = extractor.extract(
//!     "resource \"azurerm_subnet\" \"sub1\" {\n  name = \"sub-a\"\n}\n",
//!     std::path::Path::new("main.tf"),
//! );
//! assert_eq!(unit.blocks.len(), 1);
//! ```

pub mod attrs;
pub mod blocks;
pub mod refs;

pub use attrs::{attribute_at_depth_zero, attributes_at_depth_zero};
pub use blocks::BlockExtractor;
pub use refs::{resolve_references, RESERVED_PREFIXES};

/// Directory/file names to skip during unit discovery.
pub const SKIP_FILES: &[&str] = &[".terraform", ".terragrunt-cache", "terraform.tfstate"];
