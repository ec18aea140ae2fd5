/// Pair coherence as an N×N image over acquisition numbers.
use anyhow::{Context, Result};
use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{FigureSettings, draw_colorbar, split_colorbar};
use crate::network::LoadedNetwork;
use crate::network::date::{date_list_from_date12, split_date12};
use crate::network::drop::DropInfo;

/// Symmetric coherence matrix over the acquisitions referenced by the pairs.
///
/// Cells without a pair, and the diagonal, are NaN. Dropped pairs are
/// removed from the lower triangle, so the upper triangle shows the full
/// network and the lower triangle only the kept one.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` for malformed pairs.
pub fn coherence_matrix(
    date12: &[String],
    coherence: &[f64],
    drop: &DropInfo,
) -> Result<(Vec<String>, Array2<f64>), crate::network::NetworkError> {
    let dates = date_list_from_date12(date12)?;
    let n = dates.len();
    let mut matrix = Array2::from_elem((n, n), f64::NAN);

    for (pair, &value) in date12.iter().zip(coherence) {
        let (d1, d2) = split_date12(pair)?;
        let i = dates.binary_search(&d1).unwrap_or_default();
        let j = dates.binary_search(&d2).unwrap_or_default();
        let (lo, hi) = (i.min(j), i.max(j));
        matrix[[lo, hi]] = value;
        if !drop.is_date12_dropped(pair) {
            matrix[[hi, lo]] = value;
        }
    }
    Ok((dates, matrix))
}

/// Draw the coherence matrix with a colorbar.
///
/// # Errors
///
/// Returns an error if the network has no coherence or on backend failures.
pub fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    network: &LoadedNetwork,
    settings: &FigureSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let coherence = network
        .coherence
        .as_deref()
        .context("coherence matrix needs coherence values")?;
    let (_, matrix) = coherence_matrix(&network.date12, coherence, &network.drop)?;
    let n = matrix.nrows();
    let size = n as f64;
    let scale = settings.color_scale();
    let font_px = settings.font_px();

    let (main, bar) = split_colorbar(root, settings);
    let mut chart = ChartBuilder::on(&main)
        .margin(font_px)
        .x_label_area_size(font_px * 3)
        .y_label_area_size(font_px * 3)
        .build_cartesian_2d(0.0..size, 0.0..size)?;

    let labels = n.clamp(2, 10);
    // Row 0 is at the top.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Image Number")
        .y_desc("Image Number")
        .x_labels(labels)
        .y_labels(labels)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{:.0}", size - v))
        .label_style(settings.font())
        .axis_desc_style(settings.font())
        .draw()?;

    chart.draw_series(matrix.indexed_iter().filter(|(_, v)| !v.is_nan()).map(
        |((row, col), &value)| {
            let (x, y) = (col as f64, size - row as f64);
            Rectangle::new([(x, y - 1.0), (x + 1.0, y)], scale.color(value).filled())
        },
    ))?;

    draw_colorbar(&bar, &scale, settings)
}
