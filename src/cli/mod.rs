//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `split`: Carve aztfexport output into organized .tf files
//! - `graph`: Generate dependency graph visualizations
//! - `outputs`: Generate keyed locals.tf / outputs.tf
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Split an exported main.tf in place
//! tfcarve split ./rg-network/main.tf
//!
//! # Split a whole tree into a separate directory, JSON summary to a file
//! tfcarve split ./legacy-import --output-dir ./carved --format json -o summary.json
//!
//! # Generate a dependency graph
//! tfcarve graph ./rg-network --format mermaid --output deps.mmd
//!
//! # Generate catalog locals/outputs
//! tfcarve outputs ./rg-network/main.tf
//!
//! # Initialize configuration
//! tfcarve init
//!
//! # Validate configuration
//! tfcarve validate tfcarve.yaml
//! ```

use crate::types::{GraphFormat, ReportFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tfcarve - carve aztfexport Terraform output into organized, analyzable files.
#[derive(Parser, Debug)]
#[command(
    name = "tfcarve",
    author,
    version,
    about = "Carve aztfexport Terraform output into organized, analyzable files",
    long_about = "tfcarve takes the monolithic main.tf that aztfexport produces and splits it \
                  into conventionally organized files, builds resource dependency graphs, and \
                  generates keyed locals/outputs for catalog and cross-state consumption."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TFCARVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split exported Terraform files into organized buckets
    #[command(visible_alias = "s")]
    Split(SplitArgs),

    /// Generate dependency graph visualization
    #[command(visible_alias = "g")]
    Graph(GraphArgs),

    /// Generate keyed locals.tf and outputs.tf
    #[command(visible_alias = "o")]
    Outputs(OutputsArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the split command.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input paths (.tf files, or directories to scan for them)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory for the carved files (default: alongside each input)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the planned file layout without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Summary report format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Summary report file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Bucket for resource types with no mapping rule
    #[arg(long, value_name = "FILE")]
    pub default_file: Option<String>,

    /// Continue processing even if some units fail
    #[arg(long)]
    pub continue_on_error: bool,

    /// Patterns to exclude from scanning (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,
}

/// Arguments for the graph command.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Input paths (.tf files, or directories to scan for them)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format for the graph
    #[arg(short, long, default_value = "dot", value_enum)]
    pub format: GraphFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the outputs command.
#[derive(Args, Debug)]
pub struct OutputsArgs {
    /// Path to the exported main.tf (or a directory containing it)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Directory for the generated files (default: alongside the input)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print generated content to stdout instead of writing files
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "tfcarve.yaml")]
    pub config: PathBuf,
}
