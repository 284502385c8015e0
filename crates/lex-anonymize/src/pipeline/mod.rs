//! Pipeline module.
//!
//! This module provides the anonymization pipeline and its builder.

mod builder;

pub use builder::{Pipeline, PipelineBuilder};
