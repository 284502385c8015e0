//! Report generation module.
//!
//! Read-only analysis comparing the cleaned original table with its
//! anonymized copy:
//!
//! - [`statistics`]: describe-style summaries per column
//! - [`metrics`]: uniqueness reduction, k-anonymity and correlation
//! - [`histogram`]: shared-bin histograms rendered as text
//! - `plots`: PNG histograms (requires the `plots` feature)
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_anonymize::reporting::{ReportGenerator, ReportParams};
//!
//! let report = ReportGenerator::build_report(
//!     ReportParams {
//!         original_df: &original,
//!         anonymized_df: &anonymized,
//!         rows_loaded: 1000,
//!         cleaning_actions: &cleaning_actions,
//!         anonymization_steps: &steps,
//!         input_file: "data/creditTest_sample.csv",
//!         output_file: Some("results/anonymized_credit_data.csv"),
//!     },
//!     &config,
//! )?;
//!
//! // Print the console report
//! print!("{}", ReportGenerator::render_human_readable(&report));
//!
//! // Or write to file
//! let generator = ReportGenerator::new(PathBuf::from("results"));
//! generator.write_report_to_file(&report, "creditTest_sample")?;
//! ```

mod generator;
pub mod histogram;
pub mod metrics;
#[cfg(feature = "plots")]
pub mod plots;
pub mod statistics;

pub use generator::{
    AnonymizationReport, ColumnStatistics, CorrelationMetric, KAnonymityMetric, PrivacyMetrics,
    ReportGenerator, ReportParams, UniquenessMetric,
};
pub use histogram::{Histogram, HistogramBin};
pub use statistics::{CategoricalSummary, ColumnDescription, NumericSummary, describe_series};
