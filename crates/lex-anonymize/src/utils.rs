//! Shared utilities for the anonymization pipeline.
//!
//! Helpers for moving values between polars `Series` and plain Rust
//! vectors, plus the small numeric routines the cleaner and reporter share.

use crate::error::{AnonymizationError, Result};
use polars::prelude::*;

// =============================================================================
// Column Lookup
// =============================================================================

/// Clone a column out of a DataFrame as a Series.
///
/// Fails with [`AnonymizationError::ColumnNotFound`] instead of the generic
/// polars error when the column is absent.
pub fn get_series(df: &DataFrame, name: &str) -> Result<Series> {
    df.column(name)
        .map(|c| c.as_materialized_series().clone())
        .map_err(|_| AnonymizationError::ColumnNotFound(name.to_string()))
}

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds text.
#[inline]
pub fn is_string_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Parse a cell as a finite float.
///
/// Surrounding whitespace is ignored. Empty strings, `NaN`, infinities and
/// anything `f64::from_str` rejects yield `None`, so they end up missing.
///
/// ```rust,ignore
/// assert_eq!(parse_finite_f64(" 12.5 "), Some(12.5));
/// assert_eq!(parse_finite_f64("Unknown"), None);
/// ```
pub fn parse_finite_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Series Extraction Utilities
// =============================================================================

/// Collect a Series as optional floats, casting numeric types to Float64.
///
/// String columns are parsed cell by cell with [`parse_finite_f64`].
pub fn series_to_f64(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    if is_string_dtype(series.dtype()) {
        let as_str = series.cast(&DataType::String)?;
        return Ok(as_str
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_finite_f64))
            .collect());
    }

    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Collect the non-missing values of a Series as floats.
pub fn non_null_f64(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(series_to_f64(series)?.into_iter().flatten().collect())
}

/// Collect a Series as optional strings, casting other types to String.
pub fn series_to_strings(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Turn float `NaN` entries into nulls so they count as missing.
///
/// Non-float Series are returned unchanged.
pub fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    if !matches!(series.dtype(), DataType::Float32 | DataType::Float64) {
        return Ok(series.clone());
    }
    Ok(Series::new(series.name().clone(), series_to_f64(series)?))
}

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let values: Vec<f64> = series_to_f64(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a Series with a string, casting it to String first.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let values: Vec<String> = series_to_strings(series)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill_value.to_string()))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Sort floats ascending.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_series_missing_column() {
        let df = df!["amt" => [1.0, 2.0]].unwrap();
        assert_eq!(get_series(&df, "amt").unwrap().len(), 2);
        assert!(matches!(
            get_series(&df, "lat").unwrap_err(),
            AnonymizationError::ColumnNotFound(ref c) if c == "lat"
        ));
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_parse_finite_f64() {
        assert_eq!(parse_finite_f64("42"), Some(42.0));
        assert_eq!(parse_finite_f64("  -73.25 "), Some(-73.25));
        assert_eq!(parse_finite_f64("1e3"), Some(1000.0));
        assert_eq!(parse_finite_f64(""), None);
        assert_eq!(parse_finite_f64("Unknown"), None);
        assert_eq!(parse_finite_f64("NaN"), None);
        assert_eq!(parse_finite_f64("inf"), None);
        assert_eq!(parse_finite_f64("$12"), None);
    }

    #[test]
    fn test_series_to_f64_from_strings() {
        let series = Series::new("amt".into(), &[Some("1.5"), Some("oops"), None]);
        let values = series_to_f64(&series).unwrap();
        assert_eq!(values, vec![Some(1.5), None, None]);
    }

    #[test]
    fn test_series_to_f64_from_ints() {
        let series = Series::new("n".into(), &[1i64, 2, 3]);
        assert_eq!(non_null_f64(&series).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_series_to_strings_from_floats() {
        let series = Series::new("x".into(), &[Some(1.5f64), None]);
        let values = series_to_strings(&series).unwrap();
        assert_eq!(values[0].as_deref(), Some("1.5"));
        assert_eq!(values[1], None);
    }

    #[test]
    fn test_nan_to_null() {
        let series = Series::new("lat".into(), &[Some(40.1), Some(f64::NAN), None]);
        let cleaned = nan_to_null(&series).unwrap();
        assert_eq!(cleaned.null_count(), 2);
        assert_eq!(non_null_f64(&cleaned).unwrap(), vec![40.1]);

        let ints = Series::new("n".into(), &[1i64, 2]);
        assert_eq!(nan_to_null(&ints).unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(non_null_f64(&filled).unwrap(), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_fill_string_nulls_keeps_values_unquoted() {
        let series = Series::new("city".into(), &[Some("Boston"), None]);
        let filled = fill_string_nulls(&series, "Unknown").unwrap();
        let values = series_to_strings(&filled).unwrap();
        assert_eq!(
            values,
            vec![Some("Boston".to_string()), Some("Unknown".to_string())]
        );
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
    }
}
