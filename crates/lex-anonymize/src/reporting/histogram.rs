//! Shared-bin histograms of original vs anonymized distributions.

use crate::anonymizer::parse_range_label;
use crate::error::Result;
use crate::utils::{is_string_dtype, non_null_f64, parse_finite_f64, series_to_strings};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Width of the longest bar in the text rendering.
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub original: usize,
    pub anonymized: usize,
}

/// Two distributions counted over the same bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

/// Numeric values of a column for binning.
///
/// Range labels such as `"10-19"` map to their lower bound; other text is
/// parsed as a number and skipped when it is not one.
pub fn histogram_values(series: &Series) -> Result<Vec<f64>> {
    if !is_string_dtype(series.dtype()) {
        return Ok(non_null_f64(series)?);
    }

    Ok(series_to_strings(series)?
        .into_iter()
        .flatten()
        .filter_map(|v| {
            parse_range_label(&v)
                .map(|(low, _)| low as f64)
                .or_else(|| parse_finite_f64(&v))
        })
        .collect())
}

impl Histogram {
    /// Count both distributions over `bin_count` equal bins spanning the
    /// combined range. Returns `None` when both sides are empty.
    ///
    /// A degenerate range (all values equal) is widened to `±0.5`.
    pub fn build(
        column: impl Into<String>,
        original: &[f64],
        anonymized: &[f64],
        bin_count: usize,
    ) -> Option<Self> {
        let bin_count = bin_count.max(1);
        let (mut min, mut max) = original
            .iter()
            .chain(anonymized)
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        if (max - min).abs() < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / bin_count as f64;

        let count = |values: &[f64]| {
            let mut counts = vec![0usize; bin_count];
            for value in values {
                let index = (((value - min) / width) as usize).min(bin_count - 1);
                counts[index] += 1;
            }
            counts
        };
        let original_counts = count(original);
        let anonymized_counts = count(anonymized);

        let bins = (0..bin_count)
            .map(|idx| HistogramBin {
                start: min + idx as f64 * width,
                end: min + (idx as f64 + 1.0) * width,
                original: original_counts[idx],
                anonymized: anonymized_counts[idx],
            })
            .collect();

        Some(Self {
            column: column.into(),
            bins,
        })
    }

    pub fn total_original(&self) -> usize {
        self.bins.iter().map(|b| b.original).sum()
    }

    pub fn total_anonymized(&self) -> usize {
        self.bins.iter().map(|b| b.anonymized).sum()
    }

    /// Render as a side-by-side text chart.
    pub fn render_text(&self) -> String {
        let peak = self
            .bins
            .iter()
            .map(|b| b.original.max(b.anonymized))
            .max()
            .unwrap_or(0)
            .max(1);
        let bar = |n: usize| "#".repeat((n * BAR_WIDTH).div_ceil(peak));

        let mut out = String::new();
        let _ = writeln!(out, "{} - Original vs Anonymized", self.column);
        let _ = writeln!(
            out,
            "  {:>25}  {:<w$}  {}",
            "bin",
            "original",
            "anonymized",
            w = BAR_WIDTH + 7
        );
        for b in &self.bins {
            let _ = writeln!(
                out,
                "  [{:>11.4}, {:>11.4})  {:>5} {:<w$}  {:>5} {}",
                b.start,
                b.end,
                b.original,
                bar(b.original),
                b.anonymized,
                bar(b.anonymized),
                w = BAR_WIDTH
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_shares_bins() {
        let hist = Histogram::build("lat", &[0.0, 1.0, 2.0], &[8.0, 10.0], 5).unwrap();

        assert_eq!(hist.bins.len(), 5);
        assert_eq!(hist.bins[0].start, 0.0);
        assert_eq!(hist.bins[4].end, 10.0);
        assert_eq!(hist.bins[0].original, 2);
        assert_eq!(hist.bins[1].original, 1);
        // The maximum lands in the last bin.
        assert_eq!(hist.bins[4].anonymized, 2);
        assert_eq!(hist.total_original(), 3);
        assert_eq!(hist.total_anonymized(), 2);
    }

    #[test]
    fn test_build_degenerate_range() {
        let hist = Histogram::build("amt", &[3.0, 3.0], &[3.0], 20).unwrap();
        assert_eq!(hist.bins.len(), 20);
        assert_eq!(hist.bins[0].start, 2.5);
        assert_eq!(hist.total_original(), 2);
        assert_eq!(hist.total_anonymized(), 1);
    }

    #[test]
    fn test_build_empty() {
        assert!(Histogram::build("amt", &[], &[], 20).is_none());
    }

    #[test]
    fn test_histogram_values_from_labels() {
        let series = Series::new("amt".into(), &["0-9", "10-19", "-10--1", "Unknown"]);
        assert_eq!(histogram_values(&series).unwrap(), vec![0.0, 10.0, -10.0]);
    }

    #[test]
    fn test_histogram_values_numeric() {
        let series = Series::new("lat".into(), &[Some(1.5), None, Some(2.5)]);
        assert_eq!(histogram_values(&series).unwrap(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_render_text() {
        let hist = Histogram::build("lat", &[1.0, 2.0], &[1.0, 2.0], 2).unwrap();
        let text = hist.render_text();

        assert!(text.starts_with("lat - Original vs Anonymized"));
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains('#'));
    }
}
