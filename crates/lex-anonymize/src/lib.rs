//! Financial Dataset Anonymization Library
//!
//! An anonymization pipeline for tabular financial data built with Rust and Polars.
//!
//! # Overview
//!
//! The pipeline runs once, top to bottom:
//!
//! - **Loading**: CSV input with a declared column schema checked up front
//! - **Cleaning**: Duplicate removal, median/sentinel imputation, numeric coercion
//! - **Anonymization**: Masking, range generalization and multiplicative noise
//! - **Reporting**: Descriptive statistics, uniqueness reduction, k-anonymity,
//!   correlation and histograms
//! - **Writing**: The anonymized table as CSV
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_anonymize::{AnonymizationConfig, Pipeline, ReportGenerator};
//!
//! let config = AnonymizationConfig::builder()
//!     .input_path("data/creditTest_sample.csv")
//!     .output_path("results/anonymized_credit_data.csv")
//!     .noise_level(0.1)
//!     .seed(42)
//!     .build()?;
//!
//! let result = Pipeline::builder().config(config).build()?.run()?;
//!
//! print!("{}", ReportGenerator::render_human_readable(&result.report));
//! ```
//!
//! # Configuration
//!
//! Use [`AnonymizationConfig`] to choose which columns get which strategy:
//!
//! ```rust,ignore
//! use lex_anonymize::config::*;
//!
//! let config = AnonymizationConfig::builder()
//!     .masked_columns(["account_id", "holder_name"])
//!     .generalize_column("balance", 1000)
//!     .noised_columns(["lat", "long"])
//!     .numeric_columns(["balance", "lat", "long"])
//!     .build()?;
//! ```
//!
//! A column may receive at most one strategy; overlapping sets are rejected
//! by [`AnonymizationConfig::validate`].
//!
//! # Reproducibility
//!
//! Noise draws from a [`rand::rngs::StdRng`]. Set a seed in the configuration
//! for identical output across runs, or inject any [`rand::Rng`] through
//! [`Pipeline::process_with_rng`].

pub mod anonymizer;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;
pub mod writer;

// Re-exports for convenient access
pub use anonymizer::{
    Anonymizer, add_noise, generalize_column, mask_column, parse_range_label, range_label,
};
pub use cleaner::DataCleaner;
pub use config::{
    AnonymizationConfig, AnonymizationConfigBuilder, ConfigValidationError, GeneralizedColumn,
};
pub use error::{AnonymizationError, Result as AnonymizationResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::{DatasetSchema, load_table};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use reporting::{
    AnonymizationReport, ColumnDescription, Histogram, PrivacyMetrics, ReportGenerator,
    ReportParams,
};
pub use types::PipelineResult;
pub use writer::write_table;
