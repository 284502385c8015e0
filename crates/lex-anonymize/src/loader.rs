//! Dataset loading and schema checks.

use crate::config::AnonymizationConfig;
use crate::error::{AnonymizationError, Result, ResultExt};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Number of rows polars samples when inferring column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Cell contents read as missing in addition to empty fields.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_options(quote_char: Option<u8>) -> CsvParseOptions {
    let tokens = MISSING_TOKENS.iter().map(|t| (*t).into()).collect();
    CsvParseOptions::default()
        .with_quote_char(quote_char)
        .with_null_values(Some(NullValues::AllColumns(tokens)))
}

/// Read a CSV file with a header row into a DataFrame.
///
/// Empty fields and the common missing-value markers (`NA`, `NaN`,
/// `null`, ...) are loaded as missing values.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AnonymizationError::InputNotFound(path.to_path_buf()));
    }

    info!("Loading dataset from: {}", path.display());

    // Standard loading with quote handling, then without it for files with
    // stray quote characters. The second pass splits quoted commas, so it
    // is announced loudly.
    let df = match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(parse_options(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => df,
        Err(e) => {
            warn!(
                "Standard loading of {} failed ({}); retrying without quote handling, \
                 quoted fields containing commas will be split",
                path.display(),
                e
            );
            CsvReadOptions::default()
                .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
                .with_has_header(true)
                .with_parse_options(parse_options(None))
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()
                .context(format!("Failed to read {}", path.display()))?
        }
    };

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// The set of columns a dataset must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    required: Vec<String>,
}

impl DatasetSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Schema covering every column the configuration transforms or coerces.
    pub fn from_config(config: &AnonymizationConfig) -> Self {
        Self::new(config.required_columns())
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required
    }

    /// Fail with [`AnonymizationError::ColumnNotFound`] on the first absent column.
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for column in &self.required {
            if !present.contains(column) {
                return Err(AnonymizationError::ColumnNotFound(column.clone()));
            }
        }

        debug!("Schema check passed for {} columns", self.required.len());
        Ok(())
    }
}
