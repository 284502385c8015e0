//! Main anonymization pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating load, clean, anonymize, report and write.

use crate::anonymizer::Anonymizer;
use crate::cleaner::DataCleaner;
use crate::config::{AnonymizationConfig, ConfigValidationError};
use crate::error::{Result, ResultExt};
use crate::loader::{DatasetSchema, load_table};
use crate::reporting::{AnonymizationReport, ReportGenerator, ReportParams};
use crate::types::PipelineResult;
use crate::writer::write_table;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The main anonymization pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_anonymize::{AnonymizationConfig, Pipeline};
///
/// // Read, anonymize and write using the configured paths
/// let result = Pipeline::builder()
///     .config(AnonymizationConfig::builder().seed(42).build()?)
///     .build()?
///     .run()?;
///
/// // Or work on a table already in memory
/// let result = Pipeline::builder().build()?.process(dataframe)?;
/// ```
pub struct Pipeline {
    config: AnonymizationConfig,
    cleaner: DataCleaner,
    reporter: ReportGenerator,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Random source for noise: seeded when the config has a seed,
    /// otherwise drawn from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Run the whole pipeline using the configured input and output paths.
    ///
    /// Loads the input, processes it, writes the anonymized table and,
    /// when a plot directory is configured, renders histogram images.
    pub fn run(&self) -> Result<PipelineResult> {
        let df = load_table(&self.config.input_path)?;
        let mut result = self.process(df)?;

        let output_path = self.config.output_path.clone();
        write_table(&mut result.anonymized, &output_path)?;
        result.report.output_file = Some(output_path.display().to_string());
        result.output_path = Some(output_path);

        self.render_plots(&result.report)?;

        Ok(result)
    }

    /// Process a loaded table with the pipeline's own random source.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        let mut rng = self.rng();
        self.process_with_rng(df, &mut rng)
    }

    /// Process a loaded table, drawing noise from `rng`.
    ///
    /// Nothing is written to disk; `output_path` of the result is `None`.
    pub fn process_with_rng<R: Rng + ?Sized>(
        &self,
        df: DataFrame,
        rng: &mut R,
    ) -> Result<PipelineResult> {
        self.process_internal(df, rng).inspect_err(|e| {
            error!("Pipeline error: {}", e);
        })
    }

    fn process_internal<R: Rng + ?Sized>(
        &self,
        df: DataFrame,
        rng: &mut R,
    ) -> Result<PipelineResult> {
        info!("Starting anonymization pipeline...");

        DatasetSchema::from_config(&self.config)
            .validate(&df)
            .context("Dataset does not match the declared schema")?;
        let rows_loaded = df.height();

        // Step 1: Clean
        info!("Step 1: Cleaning dataset...");
        let (original, cleaning_actions) = self.cleaner.clean(df, &self.config)?;

        // Step 2: Anonymize a copy of the cleaned table
        info!("Step 2: Anonymizing dataset...");
        let (anonymized, anonymization_steps) = Anonymizer::apply(&original, &self.config, rng)?;

        // Step 3: Report
        info!("Step 3: Building report...");
        let input_file = self.config.input_path.display().to_string();
        let report = ReportGenerator::build_report(
            ReportParams {
                original_df: &original,
                anonymized_df: &anonymized,
                rows_loaded,
                cleaning_actions: &cleaning_actions,
                anonymization_steps: &anonymization_steps,
                input_file: &input_file,
                output_file: None,
            },
            &self.config,
        )?;

        info!(
            "Pipeline complete: {} rows, {} columns",
            anonymized.height(),
            anonymized.width()
        );

        Ok(PipelineResult {
            original,
            anonymized,
            report,
            output_path: None,
        })
    }

    /// Write the report as `<report dir>/<base_name>_report.json`.
    pub fn write_report(&self, report: &AnonymizationReport, base_name: &str) -> Result<PathBuf> {
        self.reporter.write_report_to_file(report, base_name)
    }

    #[cfg(feature = "plots")]
    fn render_plots(&self, report: &AnonymizationReport) -> Result<()> {
        if let Some(dir) = &self.config.plot_dir {
            for histogram in &report.histograms {
                crate::reporting::plots::render_histogram_png(histogram, dir)?;
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "plots"))]
    fn render_plots(&self, _report: &AnonymizationReport) -> Result<()> {
        if self.config.plot_dir.is_some() {
            tracing::warn!("Histogram images need the `plots` feature; skipping");
        }
        Ok(())
    }
}

/// Directory reports are written to: next to the output file.
fn report_dir(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnonymizationConfig>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: AnonymizationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(report_dir(&config.output_path));

        Ok(Pipeline {
            config,
            cleaner: DataCleaner,
            reporter,
        })
    }
}
