//! Data cleaning module for preparing datasets before anonymization.
//!
//! This module provides functionality for:
//! - Removing duplicate rows
//! - Filling missing values (median for numeric, sentinel otherwise)
//! - Coercing configured columns to numeric

mod converters;

use crate::config::AnonymizationConfig;
use crate::error::{AnonymizationError, Result};
use crate::imputers::StatisticalImputer;
use crate::utils::{get_series, is_numeric_dtype};
use converters::{coerce_to_float, count_unparsable};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Data cleaner for the pre-anonymization stage.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a dataset.
    ///
    /// This includes:
    /// 1. Removing duplicate rows (first occurrence kept, order preserved)
    /// 2. Filling missing values per column
    /// 3. Coercing the configured numeric columns and re-filling with the median
    ///
    /// Returns the cleaned table and a list of the actions taken.
    pub fn clean(
        &self,
        df: DataFrame,
        config: &AnonymizationConfig,
    ) -> Result<(DataFrame, Vec<String>)> {
        let mut cleaning_actions = Vec::new();

        info!("Performing data cleaning...");

        let mut df = self.remove_duplicates(df, &mut cleaning_actions)?;
        self.fill_missing_values(&mut df, &config.missing_sentinel, &mut cleaning_actions)?;
        self.coerce_numeric_columns(&mut df, &config.numeric_columns, &mut cleaning_actions)?;

        Ok((df, cleaning_actions))
    }

    /// Remove exact-duplicate rows.
    pub fn remove_duplicates(
        &self,
        df: DataFrame,
        cleaning_actions: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let before = df.height();
        let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            cleaning_actions.push(format!(
                "Removed {} duplicate rows ({:.1}%)",
                removed, pct
            ));
            debug!("Removed {} duplicate rows", removed);
        } else {
            cleaning_actions.push("No duplicate rows found".to_string());
            debug!("No duplicate rows found");
        }

        Ok(df)
    }

    /// Fill missing values: median for numeric columns, sentinel for the rest.
    pub fn fill_missing_values(
        &self,
        df: &mut DataFrame,
        sentinel: &str,
        cleaning_actions: &mut Vec<String>,
    ) -> Result<()> {
        let columns: Vec<(String, DataType)> = df
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.dtype().clone()))
            .collect();

        for (name, dtype) in columns {
            if is_numeric_dtype(&dtype) {
                let median =
                    StatisticalImputer::apply_numeric_median(df, &name, cleaning_actions)?;
                if median.is_none() {
                    warn!("Column '{}' has no values to compute a median from", name);
                }
            } else {
                StatisticalImputer::apply_constant_imputation(
                    df,
                    &name,
                    sentinel,
                    cleaning_actions,
                )?;
            }
        }

        Ok(())
    }

    /// Coerce columns to Float64 and fill anything unparsable with the median.
    pub fn coerce_numeric_columns(
        &self,
        df: &mut DataFrame,
        columns: &[String],
        cleaning_actions: &mut Vec<String>,
    ) -> Result<()> {
        for name in columns {
            let series = get_series(df, name)?;

            let unparsable = count_unparsable(&series)?;
            let coerced = coerce_to_float(&series).map_err(|e| {
                AnonymizationError::TypeConversionFailed {
                    column: name.clone(),
                    target_type: "Float64".to_string(),
                    reason: e.to_string(),
                }
            })?;
            df.replace(name, coerced)?;

            if unparsable > 0 {
                warn!("{} values in '{}' could not be parsed as numbers", unparsable, name);
                cleaning_actions.push(format!(
                    "Coerced '{}' to numeric ({} unparsable values treated as missing)",
                    name, unparsable
                ));
            }

            let median = StatisticalImputer::apply_numeric_median(df, name, cleaning_actions)?;
            if median.is_none() {
                return Err(AnonymizationError::NoValidValues(name.clone()));
            }
        }

        Ok(())
    }
}
