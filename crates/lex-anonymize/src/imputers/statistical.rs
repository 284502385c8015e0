//! Statistical imputation methods.

use crate::error::Result;
use crate::utils::{fill_numeric_nulls, fill_string_nulls, nan_to_null};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing entries of a numeric column with its median.
    ///
    /// Float `NaN` entries count as missing. Returns the median used, or
    /// `None` when the column has no values to take a median from (the
    /// column is then left untouched). Columns without missing entries keep
    /// their dtype.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Option<f64>> {
        let series = nan_to_null(df.column(col_name)?.as_materialized_series())?;
        let Some(median_val) = series.median() else {
            return Ok(None);
        };

        let missing = series.null_count();
        if missing > 0 {
            let filled = fill_numeric_nulls(&series, median_val)?;
            df.replace(col_name, filled)?;
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with median: {:.2}",
                missing, col_name, median_val
            ));
            debug!("Filled '{}' with median {}", col_name, median_val);
        }

        Ok(Some(median_val))
    }

    /// Fill missing entries of a column with a constant string.
    pub fn apply_constant_imputation(
        df: &mut DataFrame,
        col_name: &str,
        sentinel: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let missing = series.null_count();
        if missing == 0 {
            return Ok(());
        }

        let filled = fill_string_nulls(&series, sentinel)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with constant value: '{}'",
            missing, col_name, sentinel
        ));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::series_to_strings;

    #[test]
    fn test_apply_numeric_median_basic() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0), None, Some(5.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let used = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps).unwrap();

        assert_eq!(used, Some(3.0));
        let values = df.column("values").unwrap();
        assert_eq!(values.null_count(), 0);
        assert_eq!(values.get(1).unwrap().try_extract::<f64>().unwrap(), 3.0);
        assert_eq!(values.get(3).unwrap().try_extract::<f64>().unwrap(), 3.0);
        assert!(steps[0].contains("median"));
    }

    #[test]
    fn test_apply_numeric_median_even_count() {
        let mut df = df![
            "values" => [Some(1.0), Some(2.0), None, Some(10.0), Some(3.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let used = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps).unwrap();

        // Median of [1, 2, 3, 10] = 2.5
        assert_eq!(used, Some(2.5));
        assert!(steps[0].contains("2.50"));
    }

    #[test]
    fn test_apply_numeric_median_no_nulls_keeps_dtype() {
        let mut df = df![
            "values" => [1i64, 2, 3],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps).unwrap();

        assert!(steps.is_empty());
        assert_eq!(df.column("values").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_apply_numeric_median_fills_nan() {
        let mut df = df![
            "values" => [Some(10.0), Some(f64::NAN), None, Some(20.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let used = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps).unwrap();

        assert_eq!(used, Some(15.0));
        let values: Vec<f64> = df
            .column("values")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(values, vec![10.0, 15.0, 15.0, 20.0]);
        assert!(steps[0].starts_with("Filled 2 missing values"));
    }

    #[test]
    fn test_apply_numeric_median_all_nulls() {
        let mut df = df![
            "values" => [Option::<f64>::None, None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let used = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps).unwrap();

        assert_eq!(used, None);
        assert!(steps.is_empty());
        assert_eq!(df.column("values").unwrap().null_count(), 3);
    }

    #[test]
    fn test_apply_numeric_median_nonexistent_column() {
        let mut df = df![
            "other" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let result = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut steps);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_constant_imputation_basic() {
        let mut df = df![
            "city" => [Some("Boston"), None, Some("Denver")],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_constant_imputation(&mut df, "city", "Unknown", &mut steps)
            .unwrap();

        let city = series_to_strings(df.column("city").unwrap().as_materialized_series()).unwrap();
        assert_eq!(city[0].as_deref(), Some("Boston"));
        assert_eq!(city[1].as_deref(), Some("Unknown"));
        assert!(steps[0].contains("Unknown"));
    }

    #[test]
    fn test_apply_constant_imputation_no_nulls() {
        let mut df = df![
            "city" => ["Boston", "Denver"],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_constant_imputation(&mut df, "city", "Unknown", &mut steps)
            .unwrap();

        assert!(steps.is_empty());
    }
}
