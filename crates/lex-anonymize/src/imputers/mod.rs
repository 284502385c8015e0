//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their median, everything else with a
//! constant sentinel.

mod statistical;

pub use statistical::StatisticalImputer;
