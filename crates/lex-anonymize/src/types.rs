use crate::reporting::AnonymizationReport;
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Output of a pipeline run.
///
/// Holds both live tables: the cleaned original and its anonymized copy.
/// Row `i` of each refers to the same record.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Cleaned table before anonymization.
    pub original: DataFrame,
    /// Anonymized copy, as written to the output file.
    pub anonymized: DataFrame,
    pub report: AnonymizationReport,
    /// Where the anonymized table was written; `None` for in-memory runs.
    pub output_path: Option<PathBuf>,
}

impl PipelineResult {
    /// Number of rows removed as duplicates during cleaning.
    pub fn rows_removed(&self) -> usize {
        self.report
            .rows_loaded
            .saturating_sub(self.report.rows_after_cleaning)
    }
}
