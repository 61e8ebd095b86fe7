//! tfcarve CLI entry point.
//!
//! This binary provides the command-line interface for tfcarve.

use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tfcarve::cli::{Cli, Commands, GraphArgs, OutputsArgs, SplitArgs};
use tfcarve::reporter::{Reporter, UnitReport};
use tfcarve::{Carver, CarveError, Config, ParsedUnit, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e}");

            let mut causes = e.chain().skip(1).peekable();
            if causes.peek().is_some() {
                eprintln!("\nCaused by:");
                for (i, cause) in causes.enumerate() {
                    eprintln!("  {i}: {cause}");
                }
            }

            let code = e
                .downcast_ref::<CarveError>()
                .map_or(1, |carve| u8::try_from(carve.exit_code()).unwrap_or(1));
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,tfcarve={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Split(args) => Ok(run_split(config, args).await?),
        Commands::Graph(args) => Ok(run_graph(config, &args)?),
        Commands::Outputs(args) => Ok(run_outputs(config, args).await?),

        Commands::Init => {
            let config_path = Path::new("tfcarve.yaml");
            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            write_file(config_path, &Config::example_yaml())?;
            println!("Created example configuration: tfcarve.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => {
            let content = read_file(&args.config)?;
            match Config::from_yaml(&content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::from(0))
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

async fn run_split(mut config: Config, args: SplitArgs) -> Result<ExitCode> {
    config.merge_cli_args(&args);
    let carver = Carver::new(config);

    let results = carver.split_paths(&args.paths).await?;

    // Units sharing a destination (several .tf files next to each other, or
    // one --output-dir for the whole run) append into the same bucket files
    // instead of overwriting each other.
    let mut merged: BTreeMap<PathBuf, BTreeMap<String, String>> = BTreeMap::new();
    let mut reports = Vec::new();
    for (source, result) in &results {
        let out_dir = destination_dir(source, args.output_dir.as_deref());
        let buckets = merged.entry(out_dir).or_default();
        for (file, content) in &result.files {
            match buckets.get_mut(file) {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(content);
                }
                None => {
                    buckets.insert(file.clone(), content.clone());
                }
            }
        }

        reports.push(UnitReport {
            source: source.clone(),
            summary: result.summary.clone(),
        });
    }

    if args.dry_run {
        tracing::info!("Dry run, not writing files");
    } else {
        for (out_dir, buckets) in &merged {
            std::fs::create_dir_all(out_dir).map_err(|e| CarveError::io(out_dir, e))?;
            for (file, content) in buckets {
                let target = out_dir.join(file);
                write_file(&target, content)?;
                tracing::info!(path = %target.display(), "Wrote bucket file");
            }
        }
    }

    let report = Reporter::new(carver.config()).generate(&reports, args.format)?;
    if let Some(output_path) = args.output {
        write_file(&output_path, &report)?;
        tracing::info!(path = %output_path.display(), "Report written");
    } else {
        println!("{report}");
    }

    Ok(ExitCode::from(0))
}

fn run_graph(config: Config, args: &GraphArgs) -> Result<ExitCode> {
    let carver = Carver::new(config);

    // All units under the given paths are analyzed together, so
    // cross-file references within one resource group resolve.
    let unit = combine_units(&carver, &args.paths)?;
    let graph = carver.graph_for_unit(&unit);
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Dependency graph built"
    );

    let rendered = tfcarve::graph::export_graph(&graph, args.format, &carver.config().graph);

    if let Some(ref output_path) = args.output {
        write_file(output_path, &rendered)?;
        tracing::info!(path = %output_path.display(), "Graph written");
    } else {
        println!("{rendered}");
    }

    Ok(ExitCode::from(0))
}

async fn run_outputs(config: Config, args: OutputsArgs) -> Result<ExitCode> {
    let carver = Carver::new(config);

    let input = if args.path.is_dir() {
        args.path.join("main.tf")
    } else {
        args.path.clone()
    };

    let unit = carver.parse_unit(&input).await?;
    let generated = carver.generate_outputs(&unit);

    for address in &generated.summary.missing_key {
        tracing::warn!(address = %address, "Omitted from keyed output, no key attribute");
    }

    if args.dry_run {
        println!("# --- locals.tf ---");
        println!("{}", generated.locals_tf);
        println!("# --- outputs.tf ---");
        println!("{}", generated.outputs_tf);
    } else {
        let out_dir = destination_dir(&input, args.output_dir.as_deref());
        std::fs::create_dir_all(&out_dir).map_err(|e| CarveError::io(&out_dir, e))?;

        let locals_path = out_dir.join("locals.tf");
        let outputs_path = out_dir.join("outputs.tf");
        write_file(&locals_path, &generated.locals_tf)?;
        write_file(&outputs_path, &generated.outputs_tf)?;

        println!("Generated files:");
        println!("  {}", locals_path.display());
        println!("  {}", outputs_path.display());
    }

    Ok(ExitCode::from(0))
}

/// Parse every unit under `paths` and merge their blocks into one unit.
fn combine_units(carver: &Carver, paths: &[PathBuf]) -> Result<ParsedUnit> {
    let units = carver.discover_units(paths)?;

    let mut combined = ParsedUnit::default();
    for path in units {
        let content = read_file(&path)?;
        let unit = tfcarve::parser::BlockExtractor::new().extract(&content, &path);
        if combined.source.as_os_str().is_empty() {
            combined.source = path;
        }
        combined.blocks.extend(unit.blocks);
    }
    Ok(combined)
}

/// Destination directory: explicit override, else alongside the input.
fn destination_dir(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    output_dir.map_or_else(
        || source.parent().unwrap_or(Path::new(".")).to_path_buf(),
        Path::to_path_buf,
    )
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = read_file(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    let default_paths = ["tfcarve.yaml", "tfcarve.yml", ".tfcarve.yaml"];
    for path in &default_paths {
        if Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = read_file(Path::new(path))?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CarveError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CarveError::io(path, e)
        }
    })
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| CarveError::io(path, e))
}
