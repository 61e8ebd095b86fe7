//! Report generation module.
//!
//! This module provides split-summary reports in multiple formats:
//! - Text: Human-readable CLI output
//! - JSON: Machine-readable structured output
//!
//! # Example
//!
//! ```rust,no_run
//! use tfcarve::reporter::Reporter;
//! use tfcarve::types::ReportFormat;
//! use tfcarve::Config;
//!
//! let config = Config::default();
//! let reporter = Reporter::new(&config);
//!
//! // let text = reporter.generate(&reports, ReportFormat::Text)?;
//! // let json = reporter.generate(&reports, ReportFormat::Json)?;
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{CarveSummary, ReportFormat};
use serde::Serialize;
use std::path::PathBuf;

pub use json::JsonReporter;
pub use text::TextReporter;

/// One unit's split outcome, as consumed by the reporters.
#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    /// The input unit this summary describes
    pub source: PathBuf,

    /// Processing summary for the unit
    pub summary: CarveSummary,
}

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, reports: &[UnitReport], format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(reports),
            ReportFormat::Text => TextReporter::new(&self.config).generate(reports),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from unit split summaries.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, reports: &[UnitReport]) -> Result<String>;
}
