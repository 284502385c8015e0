use crate::config::AnonymizationConfig;
use crate::error::Result;
use crate::reporting::histogram::{Histogram, histogram_values};
use crate::reporting::metrics::{k_anonymity, pearson_correlation, uniqueness_reduction};
use crate::reporting::statistics::{ColumnDescription, describe_series};
use crate::utils::get_series;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Full report of an anonymization run.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,

    // Shape
    /// Rows read from the input file
    pub rows_loaded: usize,
    /// Rows left after deduplication
    pub rows_after_cleaning: usize,
    /// Number of columns (unchanged by the pipeline)
    pub columns: usize,

    // Actions taken
    /// List of cleaning actions performed
    pub cleaning_actions: Vec<String>,
    /// List of anonymization steps executed
    pub anonymization_steps: Vec<String>,

    /// Descriptive statistics of the generalized and noised columns
    pub statistics: Vec<ColumnStatistics>,
    pub privacy_metrics: PrivacyMetrics,
    /// Empty when histograms are disabled
    pub histograms: Vec<Histogram>,
}

/// Before/after summaries for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub before: ColumnDescription,
    pub after: ColumnDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniquenessMetric {
    pub column: String,
    /// `None` when the original column had no distinct values
    pub reduction_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KAnonymityMetric {
    pub column: String,
    pub k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMetric {
    pub column: String,
    /// `None` when undefined (zero variance or fewer than two values)
    pub correlation: Option<f64>,
}

/// Privacy and utility metrics for the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivacyMetrics {
    /// Masked and generalized columns
    pub uniqueness_reduction: Vec<UniquenessMetric>,
    /// Generalized columns
    pub k_anonymity: Vec<KAnonymityMetric>,
    /// Noised columns
    pub correlation: Vec<CorrelationMetric>,
}

/// Inputs for building a report.
pub struct ReportParams<'a> {
    pub original_df: &'a DataFrame,
    pub anonymized_df: &'a DataFrame,
    pub rows_loaded: usize,
    pub cleaning_actions: &'a [String],
    pub anonymization_steps: &'a [String],
    pub input_file: &'a str,
    pub output_file: Option<&'a str>,
}

// ============================================================================
// Report Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./results"),
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator writing into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Compute statistics, metrics and histograms for a finished run.
    ///
    /// Both tables are only read.
    pub fn build_report(
        params: ReportParams<'_>,
        config: &AnonymizationConfig,
    ) -> Result<AnonymizationReport> {
        let ReportParams {
            original_df,
            anonymized_df,
            rows_loaded,
            cleaning_actions,
            anonymization_steps,
            input_file,
            output_file,
        } = params;

        let generalized = config.generalized_column_names();

        let mut statistics = Vec::new();
        for column in generalized.iter().chain(&config.noised_columns) {
            statistics.push(ColumnStatistics {
                column: column.clone(),
                before: describe_series(&get_series(original_df, column)?)?,
                after: describe_series(&get_series(anonymized_df, column)?)?,
            });
        }

        let mut privacy_metrics = PrivacyMetrics::default();
        for column in config.masked_columns.iter().chain(&generalized) {
            let reduction = uniqueness_reduction(
                &get_series(original_df, column)?,
                &get_series(anonymized_df, column)?,
            )?;
            privacy_metrics.uniqueness_reduction.push(UniquenessMetric {
                column: column.clone(),
                reduction_percent: reduction,
            });
        }
        for column in &generalized {
            privacy_metrics.k_anonymity.push(KAnonymityMetric {
                column: column.clone(),
                k: k_anonymity(&get_series(anonymized_df, column)?)?,
            });
        }
        for column in &config.noised_columns {
            let correlation = pearson_correlation(
                &get_series(original_df, column)?,
                &get_series(anonymized_df, column)?,
            )?;
            privacy_metrics.correlation.push(CorrelationMetric {
                column: column.clone(),
                correlation,
            });
        }

        let mut histograms = Vec::new();
        if config.render_histograms {
            for column in config.noised_columns.iter().chain(&generalized) {
                let before = histogram_values(&get_series(original_df, column)?)?;
                let after = histogram_values(&get_series(anonymized_df, column)?)?;
                match Histogram::build(column.as_str(), &before, &after, config.histogram_bins) {
                    Some(histogram) => histograms.push(histogram),
                    None => debug!("Skipping histogram for '{}': no values", column),
                }
            }
        }

        Ok(AnonymizationReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            rows_loaded,
            rows_after_cleaning: original_df.height(),
            columns: original_df.width(),
            cleaning_actions: cleaning_actions.to_vec(),
            anonymization_steps: anonymization_steps.to_vec(),
            statistics,
            privacy_metrics,
            histograms,
        })
    }

    /// Render the console report: statistics, privacy metrics and text histograms.
    pub fn render_human_readable(report: &AnonymizationReport) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "=== Pre and Post Anonymization Statistics ===");
        for stats in &report.statistics {
            let _ = writeln!(out, "\nColumn: {}", stats.column);
            let _ = write!(out, "Before:\n{}", stats.before);
            let _ = write!(out, "After:\n{}", stats.after);
        }

        let metrics = &report.privacy_metrics;
        let _ = writeln!(out, "\n=== Privacy Metrics ===");
        for m in &metrics.uniqueness_reduction {
            let value = m
                .reduction_percent
                .map(|r| format!("{:.2}%", r))
                .unwrap_or_else(|| "undefined".to_string());
            let _ = writeln!(out, "{} - Unique Values Reduced: {}", m.column, value);
        }
        for m in &metrics.k_anonymity {
            let value = m
                .k
                .map(|k| k.to_string())
                .unwrap_or_else(|| "undefined".to_string());
            let _ = writeln!(out, "{} - k-anonymity (smallest group size): {}", m.column, value);
        }
        for m in &metrics.correlation {
            let value = m
                .correlation
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "nan".to_string());
            let _ = writeln!(
                out,
                "{} - Correlation between original and anonymized: {}",
                m.column, value
            );
        }

        if !report.histograms.is_empty() {
            let _ = writeln!(out, "\n=== Histograms ===");
            for histogram in &report.histograms {
                let _ = write!(out, "\n{}", histogram.render_text());
            }
        }

        out
    }

    /// Write a report to a JSON file.
    ///
    /// For example, if `report_base_name` is "creditTest_sample", the file
    /// will be "creditTest_sample_report.json".
    pub fn write_report_to_file(
        &self,
        report: &AnonymizationReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::Anonymizer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config() -> AnonymizationConfig {
        AnonymizationConfig::builder()
            .masked_columns(["cc_num"])
            .generalize_column("amt", 10)
            .noised_columns(["lat"])
            .numeric_columns(["amt", "lat"])
            .noise_level(0.01)
            .histogram_bins(4)
            .build()
            .unwrap()
    }

    fn report_for(config: &AnonymizationConfig) -> AnonymizationReport {
        let original = df![
            "cc_num" => [11i64, 22, 33, 44, 55],
            "amt" => [5.0, 7.0, 12.0, 19.0, 25.0],
            "lat" => [36.07, 48.88, 42.18, 46.23, 38.42],
        ]
        .unwrap();
        let (anonymized, steps) =
            Anonymizer::apply(&original, config, &mut StdRng::seed_from_u64(3)).unwrap();

        ReportGenerator::build_report(
            ReportParams {
                original_df: &original,
                anonymized_df: &anonymized,
                rows_loaded: 6,
                cleaning_actions: &["Removed 1 duplicate rows (16.7%)".to_string()],
                anonymization_steps: &steps,
                input_file: "data/sample.csv",
                output_file: Some("results/out.csv"),
            },
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_build_report_metrics() {
        let report = report_for(&config());

        assert_eq!(report.rows_loaded, 6);
        assert_eq!(report.rows_after_cleaning, 5);
        assert_eq!(report.statistics.len(), 2);
        assert_eq!(report.statistics[0].column, "amt");
        assert!(matches!(report.statistics[0].before, ColumnDescription::Numeric(_)));
        assert!(matches!(report.statistics[0].after, ColumnDescription::Categorical(_)));

        let metrics = &report.privacy_metrics;
        assert_eq!(metrics.uniqueness_reduction[0].column, "cc_num");
        assert_eq!(metrics.uniqueness_reduction[0].reduction_percent, Some(80.0));
        assert_eq!(metrics.k_anonymity[0].k, Some(1));
        let corr = metrics.correlation[0].correlation.unwrap();
        assert!(corr > 0.9);

        assert_eq!(report.histograms.len(), 2);
        assert_eq!(report.histograms[0].column, "lat");
        assert_eq!(report.histograms[1].column, "amt");
    }

    #[test]
    fn test_build_report_without_histograms() {
        let mut config = config();
        config.render_histograms = false;
        let report = report_for(&config);
        assert!(report.histograms.is_empty());
    }

    #[test]
    fn test_render_human_readable() {
        let text = ReportGenerator::render_human_readable(&report_for(&config()));

        assert!(text.starts_with("=== Pre and Post Anonymization Statistics ==="));
        assert!(text.contains("\nColumn: amt\nBefore:\n"));
        assert!(text.contains("=== Privacy Metrics ==="));
        assert!(text.contains("cc_num - Unique Values Reduced: 80.00%"));
        assert!(text.contains("amt - k-anonymity (smallest group size): 1"));
        assert!(text.contains("lat - Correlation between original and anonymized: "));
        assert!(text.contains("lat - Original vs Anonymized"));
    }

    #[test]
    fn test_render_undefined_metrics() {
        let mut report = report_for(&config());
        report.privacy_metrics.uniqueness_reduction[0].reduction_percent = None;
        report.privacy_metrics.correlation[0].correlation = None;

        let text = ReportGenerator::render_human_readable(&report);
        assert!(text.contains("cc_num - Unique Values Reduced: undefined"));
        assert!(text.contains("lat - Correlation between original and anonymized: nan"));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("reports"));

        let path = generator
            .write_report_to_file(&report_for(&config()), "sample")
            .unwrap();

        assert_eq!(path, dir.path().join("reports").join("sample_report.json"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input_file"], "data/sample.csv");
        assert_eq!(json["privacy_metrics"]["k_anonymity"][0]["k"], 1);
    }
}
