//! Type conversion functions for data cleaning.

use crate::utils::{is_numeric_dtype, nan_to_null, parse_finite_f64, series_to_f64};
use polars::prelude::*;

/// Coerce a Series to Float64.
///
/// Numeric columns are cast directly, with `NaN` turned into null. Text is
/// parsed strictly, so any value that is not a plain number (currency
/// symbols, sentinels, free text) becomes missing.
pub(crate) fn coerce_to_float(series: &Series) -> PolarsResult<Series> {
    if is_numeric_dtype(series.dtype()) {
        return nan_to_null(&series.cast(&DataType::Float64)?);
    }

    let values = series_to_f64(series)?;
    Ok(Series::new(series.name().clone(), values))
}

/// Count non-missing values that would be lost by [`coerce_to_float`].
pub(crate) fn count_unparsable(series: &Series) -> PolarsResult<usize> {
    if is_numeric_dtype(series.dtype()) {
        return Ok(0);
    }

    let as_str = series.cast(&DataType::String)?;
    Ok(as_str
        .str()?
        .into_iter()
        .flatten()
        .filter(|v| parse_finite_f64(v).is_none())
        .count())
}
