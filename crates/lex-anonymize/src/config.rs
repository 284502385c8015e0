//! Configuration types for the anonymization pipeline.
//!
//! Every parameter of a run (paths, column sets, noise level, bucket widths)
//! lives here and is passed explicitly into each stage. Use the builder for
//! programmatic setup or deserialize from JSON for file-based setup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default input dataset location.
pub const DEFAULT_INPUT_PATH: &str = "data/creditTest_sample.csv";

/// Default anonymized output location.
pub const DEFAULT_OUTPUT_PATH: &str = "results/anonymized_credit_data.csv";

/// Token written into every masked cell.
pub const DEFAULT_MASK_TOKEN: &str = "XXXXXX";

/// Fill value for missing entries in non-numeric columns.
pub const DEFAULT_MISSING_SENTINEL: &str = "Unknown";

pub const DEFAULT_NOISE_LEVEL: f64 = 0.1;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// A column generalized into fixed-width numeric ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralizedColumn {
    /// Column name
    pub column: String,
    /// Width of each range bucket (must be at least 1)
    pub bucket_width: i64,
}

impl GeneralizedColumn {
    pub fn new(column: impl Into<String>, bucket_width: i64) -> Self {
        Self {
            column: column.into(),
            bucket_width,
        }
    }
}

fn default_masked_columns() -> Vec<String> {
    ["cc_num", "first", "last", "trans_num"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_generalized_columns() -> Vec<GeneralizedColumn> {
    vec![GeneralizedColumn::new("amt", 10)]
}

fn default_noised_columns() -> Vec<String> {
    ["lat", "long", "merch_lat", "merch_long"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_numeric_columns() -> Vec<String> {
    ["amt", "lat", "long", "merch_lat", "merch_long"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Configuration for the anonymization pipeline.
///
/// Use [`AnonymizationConfig::builder()`] to create a new configuration
/// with fluent API. Missing fields in a JSON config fall back to the defaults.
///
/// # Example
///
/// ```rust,ignore
/// use lex_anonymize::config::AnonymizationConfig;
///
/// let config = AnonymizationConfig::builder()
///     .input_path("data/transactions.csv")
///     .noise_level(0.05)
///     .seed(42)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizationConfig {
    /// CSV file to anonymize.
    /// Default: "data/creditTest_sample.csv"
    pub input_path: PathBuf,

    /// Where the anonymized CSV is written (overwritten if present).
    /// Default: "results/anonymized_credit_data.csv"
    pub output_path: PathBuf,

    /// Identifier columns replaced by the mask token.
    /// Default: cc_num, first, last, trans_num
    pub masked_columns: Vec<String>,

    /// Columns generalized into numeric ranges.
    /// Default: amt with bucket width 10
    pub generalized_columns: Vec<GeneralizedColumn>,

    /// Continuous columns perturbed with multiplicative noise.
    /// Default: lat, long, merch_lat, merch_long
    pub noised_columns: Vec<String>,

    /// Columns coerced to numeric during cleaning.
    /// Default: amt, lat, long, merch_lat, merch_long
    pub numeric_columns: Vec<String>,

    /// Half-width of the uniform noise factor (0.0 - 1.0).
    /// Default: 0.1
    pub noise_level: f64,

    /// Replacement for masked values.
    /// Default: "XXXXXX"
    pub mask_token: String,

    /// Fill value for missing non-numeric entries.
    /// Default: "Unknown"
    pub missing_sentinel: String,

    /// Number of bins per histogram.
    /// Default: 20
    pub histogram_bins: usize,

    /// Whether histograms are computed and shown.
    /// Default: true
    pub render_histograms: bool,

    /// Directory for PNG histograms (requires the `plots` feature).
    /// Default: None
    pub plot_dir: Option<PathBuf>,

    /// Seed for the noise generator. None draws from OS entropy.
    /// Default: None
    pub seed: Option<u64>,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            masked_columns: default_masked_columns(),
            generalized_columns: default_generalized_columns(),
            noised_columns: default_noised_columns(),
            numeric_columns: default_numeric_columns(),
            noise_level: DEFAULT_NOISE_LEVEL,
            mask_token: DEFAULT_MASK_TOKEN.to_string(),
            missing_sentinel: DEFAULT_MISSING_SENTINEL.to_string(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            render_histograms: true,
            plot_dir: None,
            seed: None,
        }
    }
}

impl AnonymizationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnonymizationConfigBuilder {
        AnonymizationConfigBuilder::default()
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AnonymizationConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Names of all generalized columns, in configured order.
    pub fn generalized_column_names(&self) -> Vec<String> {
        self.generalized_columns
            .iter()
            .map(|g| g.column.clone())
            .collect()
    }

    /// Every column the pipeline touches, deduplicated, in first-seen order.
    pub fn required_columns(&self) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        self.masked_columns
            .iter()
            .chain(self.generalized_columns.iter().map(|g| &g.column))
            .chain(self.noised_columns.iter())
            .chain(self.numeric_columns.iter())
            .filter(|name| seen.insert((*name).clone()))
            .cloned()
            .collect()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.noise_level.is_finite() || !(0.0..=1.0).contains(&self.noise_level) {
            return Err(ConfigValidationError::InvalidNoiseLevel(self.noise_level));
        }

        for generalized in &self.generalized_columns {
            if generalized.bucket_width < 1 {
                return Err(ConfigValidationError::InvalidBucketWidth {
                    column: generalized.column.clone(),
                    width: generalized.bucket_width,
                });
            }
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }

        if self.mask_token.is_empty() {
            return Err(ConfigValidationError::EmptyMaskToken);
        }

        // A column may receive at most one anonymization strategy.
        let mut assigned = HashSet::new();
        let transformed = self
            .masked_columns
            .iter()
            .chain(self.generalized_columns.iter().map(|g| &g.column))
            .chain(self.noised_columns.iter());
        for column in transformed {
            if !assigned.insert(column.as_str()) {
                return Err(ConfigValidationError::OverlappingColumns(column.clone()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid noise level: {0} (must be between 0.0 and 1.0)")]
    InvalidNoiseLevel(f64),

    #[error("Invalid bucket width for '{column}': {width} (must be at least 1)")]
    InvalidBucketWidth { column: String, width: i64 },

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error("Mask token must not be empty")]
    EmptyMaskToken,

    #[error("Column '{0}' is assigned to more than one anonymization strategy")]
    OverlappingColumns(String),
}

/// Builder for [`AnonymizationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnonymizationConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    masked_columns: Option<Vec<String>>,
    generalized_columns: Option<Vec<GeneralizedColumn>>,
    noised_columns: Option<Vec<String>>,
    numeric_columns: Option<Vec<String>>,
    noise_level: Option<f64>,
    mask_token: Option<String>,
    missing_sentinel: Option<String>,
    histogram_bins: Option<usize>,
    render_histograms: Option<bool>,
    plot_dir: Option<PathBuf>,
    seed: Option<u64>,
}

impl AnonymizationConfigBuilder {
    /// Start from an existing configuration, e.g. one loaded from JSON.
    pub fn from_config(config: AnonymizationConfig) -> Self {
        Self {
            input_path: Some(config.input_path),
            output_path: Some(config.output_path),
            masked_columns: Some(config.masked_columns),
            generalized_columns: Some(config.generalized_columns),
            noised_columns: Some(config.noised_columns),
            numeric_columns: Some(config.numeric_columns),
            noise_level: Some(config.noise_level),
            mask_token: Some(config.mask_token),
            missing_sentinel: Some(config.missing_sentinel),
            histogram_bins: Some(config.histogram_bins),
            render_histograms: Some(config.render_histograms),
            plot_dir: config.plot_dir,
            seed: config.seed,
        }
    }

    /// Set the CSV file to read.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the CSV file to write.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replace the list of masked columns.
    pub fn masked_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.masked_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of generalized columns.
    pub fn generalized_columns(mut self, columns: Vec<GeneralizedColumn>) -> Self {
        self.generalized_columns = Some(columns);
        self
    }

    /// Add a single generalized column on top of those already set.
    pub fn generalize_column(mut self, column: impl Into<String>, bucket_width: i64) -> Self {
        self.generalized_columns
            .get_or_insert_with(Vec::new)
            .push(GeneralizedColumn::new(column, bucket_width));
        self
    }

    /// Set the bucket width of every generalized column.
    ///
    /// Applies to the defaults when no generalized columns were set explicitly.
    pub fn bucket_width(mut self, width: i64) -> Self {
        let columns = self
            .generalized_columns
            .get_or_insert_with(default_generalized_columns);
        for column in columns.iter_mut() {
            column.bucket_width = width;
        }
        self
    }

    /// Replace the list of noised columns.
    pub fn noised_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.noised_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of columns coerced to numeric during cleaning.
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the noise level.
    ///
    /// # Arguments
    /// * `level` - Value between 0.0 and 1.0 (e.g., 0.1 = ±10%)
    pub fn noise_level(mut self, level: f64) -> Self {
        self.noise_level = Some(level);
        self
    }

    pub fn mask_token(mut self, token: impl Into<String>) -> Self {
        self.mask_token = Some(token.into());
        self
    }

    pub fn missing_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_sentinel = Some(sentinel.into());
        self
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Enable or disable histogram computation.
    pub fn render_histograms(mut self, render: bool) -> Self {
        self.render_histograms = Some(render);
        self
    }

    /// Write PNG histograms into this directory.
    pub fn plot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plot_dir = Some(dir.into());
        self
    }

    /// Seed the noise generator for reproducible output.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnonymizationConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnonymizationConfig, ConfigValidationError> {
        let config = AnonymizationConfig {
            input_path: self
                .input_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            masked_columns: self.masked_columns.unwrap_or_else(default_masked_columns),
            generalized_columns: self
                .generalized_columns
                .unwrap_or_else(default_generalized_columns),
            noised_columns: self.noised_columns.unwrap_or_else(default_noised_columns),
            numeric_columns: self.numeric_columns.unwrap_or_else(default_numeric_columns),
            noise_level: self.noise_level.unwrap_or(DEFAULT_NOISE_LEVEL),
            mask_token: self
                .mask_token
                .unwrap_or_else(|| DEFAULT_MASK_TOKEN.to_string()),
            missing_sentinel: self
                .missing_sentinel
                .unwrap_or_else(|| DEFAULT_MISSING_SENTINEL.to_string()),
            histogram_bins: self.histogram_bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
            render_histograms: self.render_histograms.unwrap_or(true),
            plot_dir: self.plot_dir,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
