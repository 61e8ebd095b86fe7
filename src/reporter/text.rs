//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::{ReportGenerator, UnitReport};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            verbose: config.output.verbose,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, reports: &[UnitReport]) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push('\n');

        output.push_str(&self.format_summary(reports));
        output.push('\n');

        for report in reports {
            output.push_str(&self.format_unit(report));
            output.push('\n');
        }

        output.push_str(&self.format_footer(reports));

        Ok(output)
    }
}

impl TextReporter {
    /// Format the report header.
    fn format_header(&self) -> String {
        let title = "tfcarve Split Report";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        if self.use_colors {
            format!(
                "\n{} {} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                format!("({timestamp})").dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{title} {version} ({timestamp})\n{}\n", "=".repeat(80))
        }
    }

    /// Format the summary section across all units.
    fn format_summary(&self, reports: &[UnitReport]) -> String {
        let mut output = String::new();

        let section_title = if self.use_colors {
            "Summary".bright_cyan().bold().to_string()
        } else {
            "Summary".to_string()
        };

        output.push_str(&format!("\n{section_title}\n"));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        let total_blocks: usize = reports.iter().map(|r| r.summary.total_blocks).sum();
        let routed: usize = reports.iter().map(|r| r.summary.routed_blocks()).sum();
        let skipped: usize = reports.iter().map(|r| r.summary.skipped.len()).sum();
        let unclosed: usize = reports.iter().map(|r| r.summary.unclosed.len()).sum();

        output.push_str(&format!(
            "  {} units | {} blocks | {} routed\n",
            reports.len(),
            total_blocks,
            routed
        ));

        if self.use_colors {
            output.push_str(&format!(
                "  {} Skipped | {} Unclosed\n",
                skipped.to_string().yellow().bold(),
                unclosed.to_string().red().bold(),
            ));
        } else {
            output.push_str(&format!("  {skipped} Skipped | {unclosed} Unclosed\n"));
        }

        output
    }

    /// Format one unit's section: the bucket table plus any warnings.
    fn format_unit(&self, report: &UnitReport) -> String {
        let mut output = String::new();

        let source = report.source.display().to_string();
        let section_title = if self.use_colors {
            source.bright_cyan().bold().to_string()
        } else {
            source
        };

        output.push_str(&format!("\n{section_title}\n"));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["File", "Blocks"]);

        for (file, count) in &report.summary.files {
            table.add_row(vec![Cell::new(file), Cell::new(count)]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        if !report.summary.skipped.is_empty() {
            for skipped in &report.summary.skipped {
                let line = format!("  skipped: {}.{}", skipped.block_type, skipped.name);
                if self.use_colors {
                    output.push_str(&format!("{}\n", line.yellow()));
                } else {
                    output.push_str(&line);
                    output.push('\n');
                }
            }
        }

        if !report.summary.unclosed.is_empty() {
            for address in &report.summary.unclosed {
                let line = format!("  unclosed block: {address}");
                if self.use_colors {
                    output.push_str(&format!("{}\n", line.red()));
                } else {
                    output.push_str(&line);
                    output.push('\n');
                }
            }
        }

        if self.verbose && !report.summary.missing_key.is_empty() {
            for address in &report.summary.missing_key {
                output.push_str(&format!("  missing key attribute: {address}\n"));
            }
        }

        output
    }

    /// Format the report footer.
    fn format_footer(&self, reports: &[UnitReport]) -> String {
        let has_warnings = reports.iter().any(|r| r.summary.has_warnings());

        let status = if has_warnings {
            if self.use_colors {
                "COMPLETED with warnings".yellow().to_string()
            } else {
                "COMPLETED with warnings".to_string()
            }
        } else {
            "COMPLETED - No issues found".to_string()
        };

        format!("\n{status}\n\n")
    }
}
