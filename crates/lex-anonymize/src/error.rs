//! Custom error types for the anonymization pipeline.
//!
//! This module provides the error hierarchy using `thiserror`.
//! Each stage returns these errors so the CLI can show a descriptive
//! message instead of an unguarded lookup or arithmetic failure.
//!
//! Errors are serializable so they can be embedded in JSON output.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the anonymization pipeline.
#[derive(Error, Debug)]
pub enum AnonymizationError {
    /// Input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A declared column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Type conversion failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// Two columns compared by a metric have different lengths.
    #[error("Column '{column}' length mismatch: {left} vs {right}")]
    LengthMismatch {
        column: String,
        left: usize,
        right: usize,
    },

    /// Rendering a histogram image failed.
    #[error("Failed to render plot: {0}")]
    PlotFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnonymizationError>,
    },
}

impl From<ConfigValidationError> for AnonymizationError {
    fn from(err: ConfigValidationError) -> Self {
        AnonymizationError::InvalidConfig(err.to_string())
    }
}

impl AnonymizationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnonymizationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::PlotFailed(_) => "PLOT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the input dataset rather than the tool.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InputNotFound(_) | Self::ColumnNotFound(_) | Self::NoValidValues(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for AnonymizationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnonymizationError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for anonymization operations.
pub type Result<T> = std::result::Result<T, AnonymizationError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnonymizationError::Polars(e).with_context(context))
    }
}
