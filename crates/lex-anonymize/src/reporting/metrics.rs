//! Privacy and utility metrics comparing original and anonymized columns.

use crate::error::{AnonymizationError, Result};
use crate::utils::series_to_f64;
use anofox_statistics::correlation::pearson;
use polars::prelude::*;
use tracing::debug;

/// Percentage of distinct values removed by anonymization.
///
/// Missing values are not counted as distinct. Returns `None` when the
/// original column has no distinct values, since the ratio is undefined.
pub fn uniqueness_reduction(original: &Series, anonymized: &Series) -> Result<Option<f64>> {
    let before = original.drop_nulls().n_unique()?;
    if before == 0 {
        return Ok(None);
    }
    let after = anonymized.drop_nulls().n_unique()?;
    Ok(Some((before as f64 - after as f64) / before as f64 * 100.0))
}

/// Smallest group size when grouping rows by this column's value alone.
///
/// Missing values form no group. Returns `None` if there is nothing to group.
pub fn k_anonymity(series: &Series) -> Result<Option<usize>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }

    let value_counts = non_null.value_counts(false, false, "count".into(), false)?;
    let smallest = value_counts
        .column("count")?
        .as_materialized_series()
        .min::<usize>()?;
    Ok(smallest)
}

/// Pearson correlation between an original column and its anonymized form.
///
/// Rows where either side is missing are skipped. Returns `None` with fewer
/// than three paired values or when either side has zero variance.
pub fn pearson_correlation(original: &Series, anonymized: &Series) -> Result<Option<f64>> {
    if original.len() != anonymized.len() {
        return Err(AnonymizationError::LengthMismatch {
            column: original.name().to_string(),
            left: original.len(),
            right: anonymized.len(),
        });
    }

    let (x, y): (Vec<f64>, Vec<f64>) = series_to_f64(original)?
        .into_iter()
        .zip(series_to_f64(anonymized)?)
        .filter_map(|(a, b)| Some((a?, b?)))
        .unzip();

    match pearson(&x, &y, None) {
        Ok(result) if result.estimate.is_finite() => Ok(Some(result.estimate)),
        Ok(_) => Ok(None),
        Err(e) => {
            debug!("Correlation for '{}' undefined: {}", original.name(), e);
            Ok(None)
        }
    }
}
