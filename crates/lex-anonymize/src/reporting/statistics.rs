//! Descriptive statistics for a single column.

use crate::error::Result;
use crate::utils::{is_numeric_dtype, non_null_f64, quantile_sorted, series_to_strings, sorted_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Summary of a numeric column.
///
/// `std` is the sample standard deviation and is `None` with fewer than two
/// values. All other fields are `None` for an empty column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Summary of a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDescription {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Describe a column; numeric dtypes get a numeric summary, all others a
/// categorical one.
pub fn describe_series(series: &Series) -> Result<ColumnDescription> {
    if is_numeric_dtype(series.dtype()) {
        Ok(ColumnDescription::Numeric(describe_numeric(&non_null_f64(series)?)))
    } else {
        let values: Vec<String> = series_to_strings(series)?.into_iter().flatten().collect();
        Ok(ColumnDescription::Categorical(describe_categorical(&values)))
    }
}

pub fn describe_numeric(values: &[f64]) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let sorted = sorted_values(values);
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count as f64 - 1.0);
        variance.sqrt()
    });

    NumericSummary {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        q25: Some(quantile_sorted(&sorted, 0.25)),
        median: Some(quantile_sorted(&sorted, 0.5)),
        q75: Some(quantile_sorted(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

pub fn describe_categorical(values: &[String]) -> CategoricalSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in values {
        let entry = counts.entry(value.as_str()).or_insert_with(|| {
            order.push(value.as_str());
            0
        });
        *entry += 1;
    }

    let mut top: Option<&str> = None;
    let mut freq = 0;
    for &value in &order {
        let n = counts[value];
        if n > freq {
            top = Some(value);
            freq = n;
        }
    }

    CategoricalSummary {
        count: values.len(),
        unique: counts.len(),
        top: top.map(str::to_string),
        freq,
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

impl fmt::Display for ColumnDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<(&str, String)> = match self {
            ColumnDescription::Numeric(s) => vec![
                ("count", format!("{:.6}", s.count as f64)),
                ("mean", fmt_stat(s.mean)),
                ("std", fmt_stat(s.std)),
                ("min", fmt_stat(s.min)),
                ("25%", fmt_stat(s.q25)),
                ("50%", fmt_stat(s.median)),
                ("75%", fmt_stat(s.q75)),
                ("max", fmt_stat(s.max)),
            ],
            ColumnDescription::Categorical(s) => vec![
                ("count", s.count.to_string()),
                ("unique", s.unique.to_string()),
                ("top", s.top.clone().unwrap_or_else(|| "NaN".to_string())),
                ("freq", s.freq.to_string()),
            ],
        };

        let width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        for (label, value) in rows {
            writeln!(f, "  {:<6} {:>width$}", label, value, width = width)?;
        }
        Ok(())
    }
}
