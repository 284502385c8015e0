//! PNG rendering of histograms using [`plotters`].
//!
//! Charts are written with the bitmap backend at a fixed 900x600 resolution,
//! so they render in headless environments and never open a window.

use crate::error::{AnonymizationError, Result};
use crate::reporting::histogram::Histogram;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

const PLOT_SIZE: (u32, u32) = (900, 600);

fn plot_err(e: impl std::fmt::Display) -> AnonymizationError {
    AnonymizationError::PlotFailed(e.to_string())
}

/// Path of the image written for `column` inside `dir`.
pub fn histogram_path(dir: &Path, column: &str) -> PathBuf {
    dir.join(format!("{}_histogram.png", column))
}

/// Draw the original and anonymized distributions as overlaid bars.
///
/// Creates `dir` if needed and returns the path of the written file.
pub fn render_histogram_png(histogram: &Histogram, dir: &Path) -> Result<PathBuf> {
    let (Some(first), Some(last)) = (histogram.bins.first(), histogram.bins.last()) else {
        return Err(AnonymizationError::PlotFailed(format!(
            "histogram for '{}' has no bins",
            histogram.column
        )));
    };

    std::fs::create_dir_all(dir)?;
    let output_path = histogram_path(dir, &histogram.column);

    let root = BitMapBackend::new(&output_path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let peak = histogram
        .bins
        .iter()
        .map(|b| b.original.max(b.anonymized))
        .max()
        .unwrap_or(0)
        .max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} - Original vs Anonymized", histogram.column),
            ("sans-serif", 28),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(first.start..last.end, 0usize..peak + peak / 10 + 1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(histogram.column.as_str())
        .y_desc("Count")
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(plot_err)?;

    let original = BLUE.mix(0.5);
    let anonymized = RED.mix(0.5);

    chart
        .draw_series(histogram.bins.iter().map(|b| {
            Rectangle::new([(b.start, 0), (b.end, b.original)], original.filled())
        }))
        .map_err(plot_err)?
        .label("Original")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], original.filled()));

    chart
        .draw_series(histogram.bins.iter().map(|b| {
            Rectangle::new([(b.start, 0), (b.end, b.anonymized)], anonymized.filled())
        }))
        .map_err(plot_err)?
        .label("Anonymized")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], anonymized.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;

    info!("Histogram saved: {}", output_path.display());
    Ok(output_path)
}
