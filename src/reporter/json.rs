//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::{ReportGenerator, UnitReport};
use serde::Serialize;

/// JSON report generator for machine-readable output.
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(_config: &Config) -> Self {
        Self
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: JsonMetadata,
    units: &'a [UnitReport],
}

#[derive(Serialize)]
struct JsonMetadata {
    version: String,
    generated_at: chrono::DateTime<chrono::Utc>,
    unit_count: usize,
    total_blocks: usize,
    routed_blocks: usize,
    has_warnings: bool,
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, reports: &[UnitReport]) -> Result<String> {
        let report = JsonReport {
            metadata: JsonMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: chrono::Utc::now(),
                unit_count: reports.len(),
                total_blocks: reports.iter().map(|r| r.summary.total_blocks).sum(),
                routed_blocks: reports.iter().map(|r| r.summary.routed_blocks()).sum(),
                has_warnings: reports.iter().any(|r| r.summary.has_warnings()),
            },
            units: reports,
        };

        Ok(serde_json::to_string_pretty(&report)?)
    }
}
