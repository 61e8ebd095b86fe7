//! Error types for tfcarve.
//!
//! This module defines the error hierarchy using `thiserror`. All errors
//! include context and can be propagated with the `?` operator.
//!
//! # Error Categories
//!
//! - **IO errors**: missing or unreadable input units, fatal for that unit
//! - **Config errors**: invalid mapping or schema documents
//! - **Report errors**: summary/graph serialization failures
//!
//! Structural anomalies (unclosed blocks), classification misses, and
//! attribute misses are deliberately *not* errors: they are accumulated into
//! a [`crate::types::CarveSummary`] and returned alongside successful output.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for tfcarve operations.
pub type Result<T> = std::result::Result<T, CarveError>;

/// The main error type for tfcarve.
#[derive(Error, Debug)]
pub enum CarveError {
    /// I/O error with path context.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input unit not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
    },

    /// Configuration parsing error (mapping, schema, or top-level config).
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Graph building error.
    #[error("Failed to build dependency graph: {message}")]
    GraphBuild {
        /// Error message
        message: String,
    },

    /// Report or output generation error.
    #[error("Failed to generate output: {message}")]
    ReportGeneration {
        /// Error message
        message: String,
    },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred ({count} total)")]
    Multiple {
        /// Number of errors
        count: usize,
        /// The individual errors
        errors: Vec<CarveError>,
    },
}

impl CarveError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConfigParse { message, source }
    }

    /// Determines if the error is recoverable (e.g., processing should
    /// continue with the remaining input units).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. } | Self::ConfigValue { .. } | Self::ReportGeneration { .. }
        )
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                13
            }
            Self::FileNotFound { .. } => 14,
            Self::DirectoryNotFound { .. } => 15,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            Self::Multiple { .. } => 21,
            _ => 1,
        }
    }

    /// Consolidates multiple errors into a single `CarveError::Multiple` if
    /// there is more than one. Otherwise returns the single error or `Ok(())`.
    pub fn collect(errors: Vec<Self>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.into_iter().next().unwrap())
        } else {
            Err(Self::Multiple {
                count: errors.len(),
                errors,
            })
        }
    }
}

impl From<serde_json::Error> for CarveError {
    fn from(source: serde_json::Error) -> Self {
        Self::ReportGeneration {
            message: format!("JSON serialization error: {source}"),
        }
    }
}

/// A utility for collecting multiple errors during processing.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<CarveError>,
}

impl ErrorCollector {
    /// Create a new error collector.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn add(&mut self, error: CarveError) {
        self.errors.push(error);
    }

    /// Get the number of collected errors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are any errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert to a Result, returning a `Multiple` error if there are any.
    pub fn into_result(self) -> Result<()> {
        CarveError::collect(self.errors)
    }
}
