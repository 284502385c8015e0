//! Range generalization of numeric quasi-identifiers.
//!
//! A value `v` falls into the bucket starting at `floor(trunc(v) / w) * w`
//! and is replaced by the label `"{low}-{high}"`, where `high = low + w - 1`.

use crate::utils::series_to_f64;
use polars::prelude::*;

/// 2^63, the first `f64` above `i64::MAX`. Casting anything at or past it saturates.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Label of the bucket containing `value` for bucket width `width`.
///
/// The value is truncated toward zero first, so `19.99` and `10.0` share the
/// `"10-19"` bucket while `-0.5` lands in `"0-9"`. `width` must be at least 1.
/// Returns `None` when the bucket cannot be represented as `i64` bounds.
pub fn range_label(value: f64, width: i64) -> Option<String> {
    let (low, high) = bucket_bounds(value, width)?;
    Some(format!("{}-{}", low, high))
}

/// Lower and upper bound of the bucket containing `value`.
///
/// `None` for non-finite values and for buckets whose bounds overflow `i64`.
pub fn bucket_bounds(value: f64, width: i64) -> Option<(i64, i64)> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= I64_BOUND {
        return None;
    }
    let low = (truncated as i64).div_euclid(width).checked_mul(width)?;
    let high = low.checked_add(width - 1)?;
    Some((low, high))
}

/// Parse a label produced by [`range_label`] back into its bounds.
///
/// Handles negative bounds such as `"-10--1"`. Returns `None` for anything
/// that is not a `low-high` pair of integers.
pub fn parse_range_label(label: &str) -> Option<(i64, i64)> {
    let label = label.trim();
    // Skip a leading sign so the separator search starts after it.
    let split = label.get(1..)?.find('-')? + 1;
    let low = label[..split].parse().ok()?;
    let high = label[split + 1..].parse().ok()?;
    Some((low, high))
}

/// Replace each value of a numeric column with its range label.
///
/// Missing or unparsable values stay missing. Fails on a value whose bucket
/// falls outside the `i64` range.
pub fn generalize_column(series: &Series, width: i64) -> PolarsResult<Series> {
    let labels = series_to_f64(series)?
        .into_iter()
        .map(|v| match v {
            None => Ok(None),
            Some(x) => range_label(x, width).map(Some).ok_or_else(|| {
                PolarsError::ComputeError(
                    format!("value {} is out of range for buckets of width {}", x, width).into(),
                )
            }),
        })
        .collect::<PolarsResult<Vec<Option<String>>>>()?;
    Ok(Series::new(series.name().clone(), labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::series_to_strings;

    #[test]
    fn test_range_label_basic() {
        assert_eq!(range_label(5.0, 10).unwrap(), "0-9");
        assert_eq!(range_label(12.0, 10).unwrap(), "10-19");
        assert_eq!(range_label(19.99, 10).unwrap(), "10-19");
        assert_eq!(range_label(107.23, 10).unwrap(), "100-109");
        assert_eq!(range_label(4.97, 5).unwrap(), "0-4");
    }

    #[test]
    fn test_range_label_truncates_toward_zero() {
        // trunc(-0.5) == 0, so it stays in the first non-negative bucket.
        assert_eq!(range_label(-0.5, 10).unwrap(), "0-9");
        assert_eq!(range_label(-3.0, 10).unwrap(), "-10--1");
        assert_eq!(range_label(-10.0, 10).unwrap(), "-10--1");
        assert_eq!(range_label(-11.2, 10).unwrap(), "-20--11");
    }

    #[test]
    fn test_range_label_width_one() {
        assert_eq!(range_label(7.8, 1).unwrap(), "7-7");
    }

    #[test]
    fn test_range_label_out_of_i64_range() {
        assert_eq!(range_label(1e19, 10), None);
        assert_eq!(range_label(-1e19, 10), None);
        assert_eq!(range_label(f64::INFINITY, 10), None);
        // Largest f64 below 2^63: the bucket start fits but its end does not.
        assert_eq!(bucket_bounds(9_223_372_036_854_774_784.0, 10_000), None);
        assert!(range_label(9.0e18, 10).is_some());
    }

    #[test]
    fn test_bucket_bounds_property() {
        for (value, width) in [(0.0, 10), (37.5, 10), (999.0, 100), (-42.0, 7), (3.3, 3)] {
            let (low, high) = bucket_bounds(value, width).unwrap();
            let truncated = value.trunc() as i64;
            assert_eq!(low, (truncated as f64 / width as f64).floor() as i64 * width);
            assert_eq!(high, low + width - 1);
            assert!(low <= truncated && truncated <= high);
        }
    }

    #[test]
    fn test_parse_range_label() {
        assert_eq!(parse_range_label("0-9"), Some((0, 9)));
        assert_eq!(parse_range_label("100-109"), Some((100, 109)));
        assert_eq!(parse_range_label("-10--1"), Some((-10, -1)));
        assert_eq!(parse_range_label("-20--11"), Some((-20, -11)));
        assert_eq!(parse_range_label("7-7"), Some((7, 7)));
        assert_eq!(parse_range_label("Unknown"), None);
        assert_eq!(parse_range_label("12"), None);
        assert_eq!(parse_range_label(""), None);
    }

    #[test]
    fn test_generalize_column() {
        let series = Series::new("amt".into(), &[5.0, 7.0, 12.0, 19.0, 25.0]);
        let generalized = generalize_column(&series, 10).unwrap();

        assert_eq!(generalized.dtype(), &DataType::String);
        let labels: Vec<String> = series_to_strings(&generalized)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(labels, vec!["0-9", "0-9", "10-19", "10-19", "20-29"]);
    }

    #[test]
    fn test_generalize_column_rejects_huge_amount() {
        let series = Series::new("amt".into(), &[5.0, 1e19]);
        let err = generalize_column(&series, 10).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_generalize_column_keeps_nulls() {
        let series = Series::new("amt".into(), &[Some(1.0), None]);
        let generalized = generalize_column(&series, 10).unwrap();
        assert_eq!(generalized.null_count(), 1);
    }
}
