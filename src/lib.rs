//! # tfcarve
//!
//! Carves the monolithic Terraform output of aztfexport into organized,
//! analyzable files.
//!
//! aztfexport dumps every imported Azure resource into one `main.tf` with
//! opaque names like `res-0`. tfcarve takes that output and:
//!
//! - **Splits** it into conventionally organized files (`networking.tf`,
//!   `compute.tf`, ...) driven by a configurable type-to-bucket mapping
//! - **Graphs** the references between resources as DOT, Mermaid, or a
//!   text tree
//! - **Generates** keyed `locals.tf` / `outputs.tf` maps so other states
//!   can reference resources by their Azure names
//!
//! Parsing is deliberately lexical (line scanning plus brace counting)
//! rather than a full HCL grammar, so truncated exports are recovered
//! instead of rejected.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfcarve::{Carver, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let carver = Carver::new(config);
//!
//!     let results = carver.split_paths(&["./rg-network"]).await?;
//!     for (source, result) in &results {
//!         println!("{}: {} files", source.display(), result.files.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod outputs;
pub mod parser;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{CarveError, Result};
pub use types::{
    Block, BlockKind, CarveSummary, GraphFormat, ParsedUnit, ReportFormat, SplitResult,
};

use crate::classify::TypeIndex;
use crate::graph::{DependencyGraph, GraphBuilder};
use crate::outputs::OutputGenerator;
use crate::parser::{BlockExtractor, SKIP_FILES};
use std::path::{Path, PathBuf};

/// The generated catalog files for one unit.
#[derive(Debug, Clone)]
pub struct GeneratedOutputs {
    /// `locals.tf` content
    pub locals_tf: String,
    /// `outputs.tf` content
    pub outputs_tf: String,
    /// Recoverable conditions encountered during generation
    pub summary: CarveSummary,
}

/// Main orchestrator that coordinates parsing, splitting, graphing, and
/// output generation.
///
/// The `Carver` is the primary entry point for using tfcarve as a library.
///
/// # Example
///
/// ```rust,no_run
/// use tfcarve::{Carver, Config};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let carver = Carver::new(Config::default());
///     let unit = carver.parse_unit(std::path::Path::new("./main.tf")).await?;
///     let graph = carver.graph_for_unit(&unit);
///     println!("{} resources", graph.node_count());
///     Ok(())
/// }
/// ```
pub struct Carver {
    config: Config,
    extractor: BlockExtractor,
    index: TypeIndex,
}

impl Carver {
    /// Create a new carver with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let index = TypeIndex::new(&config.mapping);
        Self {
            config,
            extractor: BlockExtractor::new(),
            index,
        }
    }

    /// The carver's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and parse one input unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    pub async fn parse_unit(&self, path: &Path) -> Result<ParsedUnit> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CarveError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CarveError::io(path, e)
            }
        })?;

        Ok(self.extractor.extract(&content, path))
    }

    /// Split one parsed unit into bucket files.
    #[must_use]
    pub fn split_unit(&self, unit: &ParsedUnit) -> SplitResult {
        classify::group_blocks(unit, &self.index)
    }

    /// Discover, parse, and split every unit under the given paths.
    ///
    /// Units are processed concurrently. With `continue_on_error` set,
    /// failed units are logged and skipped; otherwise the first failure
    /// aborts the run.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails, or if any unit fails and
    /// `continue_on_error` is off.
    pub async fn split_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<(PathBuf, SplitResult)>> {
        let units = self.discover_units(paths)?;
        tracing::info!(units = units.len(), "Processing input units");

        let futures: Vec<_> = units
            .iter()
            .map(|path| async move {
                let unit = self.parse_unit(path).await?;
                Ok::<_, CarveError>((path.clone(), self.split_unit(&unit)))
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        let mut results = Vec::new();
        let mut collector = error::ErrorCollector::new();

        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    if self.config.scan.continue_on_error {
                        tracing::warn!(error = %e, "Skipping failed unit");
                    } else {
                        collector.add(e);
                    }
                }
            }
        }

        collector.into_result()?;
        Ok(results)
    }

    /// Build the dependency graph for one parsed unit.
    #[must_use]
    pub fn graph_for_unit(&self, unit: &ParsedUnit) -> DependencyGraph {
        GraphBuilder::new().build(unit)
    }

    /// Generate the keyed `locals.tf` / `outputs.tf` pair for one unit.
    #[must_use]
    pub fn generate_outputs(&self, unit: &ParsedUnit) -> GeneratedOutputs {
        let generator = OutputGenerator::new(&self.config.schema);
        let mut summary = CarveSummary {
            total_blocks: unit.blocks.len(),
            ..CarveSummary::default()
        };

        let locals_tf = generator.generate_locals(unit, &mut summary);
        let outputs_tf = generator.generate_outputs(unit);

        GeneratedOutputs {
            locals_tf,
            outputs_tf,
            summary,
        }
    }

    /// Discover input units under the given paths.
    ///
    /// Files are taken as-is; directories are walked recursively for `.tf`
    /// files, skipping Terraform state/cache directories, hidden entries,
    /// and configured exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a path does not exist.
    pub fn discover_units<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<PathBuf>> {
        let exclude: Vec<glob::Pattern> = self
            .config
            .scan
            .exclude_patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();

        let mut units = Vec::new();

        for path in paths {
            let path = path.as_ref();

            if path.is_file() {
                units.push(path.to_path_buf());
                continue;
            }
            if !path.is_dir() {
                return Err(CarveError::DirectoryNotFound {
                    path: path.to_path_buf(),
                });
            }

            for entry in walkdir::WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| !is_skipped_entry(e))
                .filter_map(std::result::Result::ok)
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let entry_path = entry.path();
                if entry_path.extension().is_none_or(|ext| ext != "tf") {
                    continue;
                }
                let path_str = entry_path.to_string_lossy();
                if exclude.iter().any(|pattern| pattern.matches(&path_str)) {
                    tracing::debug!(path = %path_str, "Excluded by pattern");
                    continue;
                }
                units.push(entry_path.to_path_buf());
            }
        }

        units.sort();
        Ok(units)
    }
}

/// Whether a walk entry is a state/cache directory or hidden file to skip.
fn is_skipped_entry(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.depth() > 0 && name.starts_with('.') {
        return true;
    }
    SKIP_FILES.iter().any(|skip| name.starts_with(skip))
}
