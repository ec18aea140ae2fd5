/// Minimum and maximum coherence of the pairs touching each acquisition.
use std::collections::HashMap;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::axis::{date_axis_range, format_year, year_label_count};
use super::{FigureSettings, TIME_LABEL};
use crate::network::date::{date_list_from_date12, decimal_year, parse_date, split_date12};
use crate::network::{LoadedNetwork, NetworkError};

const MAX_COLOR: RGBColor = RGBColor(31, 119, 180);
const MIN_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Selects one end of a coherence range.
type Pick = fn(&DateCoherence) -> f64;

/// Bar width as a fraction of the most common acquisition interval.
const BAR_FILL: f64 = 0.75;

/// Coherence range of one acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct DateCoherence {
    /// 8-digit acquisition date.
    pub date: String,
    /// Lowest finite coherence of its pairs, NaN if none.
    pub min: f64,
    /// Highest finite coherence of its pairs, NaN if none.
    pub max: f64,
}

/// Coherence range of every acquisition referenced by the pairs.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` for malformed pairs.
pub fn coherence_range_per_date(
    date12: &[String],
    coherence: &[f64],
) -> Result<Vec<DateCoherence>, NetworkError> {
    let mut rows: Vec<DateCoherence> = date_list_from_date12(date12)?
        .into_iter()
        .map(|date| DateCoherence {
            date,
            min: f64::NAN,
            max: f64::NAN,
        })
        .collect();
    let index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.date.clone(), i))
        .collect();

    for (pair, &value) in date12.iter().zip(coherence) {
        if value.is_nan() {
            continue;
        }
        let (d1, d2) = split_date12(pair)?;
        for date in [d1, d2] {
            let row = &mut rows[index[&date]];
            row.min = if row.min.is_nan() { value } else { row.min.min(value) };
            row.max = if row.max.is_nan() { value } else { row.max.max(value) };
        }
    }
    Ok(rows)
}

/// Three quarters of the most common interval between consecutive
/// acquisitions, in years. Ties resolve to the shorter interval.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate` for malformed dates.
pub fn bar_width_years(dates: &[String]) -> Result<f64, NetworkError> {
    let days = dates
        .iter()
        .map(|d| parse_date(d))
        .collect::<Result<Vec<_>, _>>()?;
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for pair in days.windows(2) {
        *counts.entry((pair[1] - pair[0]).num_days()).or_default() += 1;
    }
    let mode = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map_or(12, |(d, _)| d);
    Ok(mode as f64 * BAR_FILL / 365.25)
}

/// Draw max and min coherence bars per acquisition.
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
        .context("coherence history needs coherence values")?;
    let rows = coherence_range_per_date(&network.date12, coherence)?;
    let dates: Vec<String> = rows.iter().map(|r| r.date.clone()).collect();
    let width = bar_width_years(&dates)?;
    let years = dates
        .iter()
        .map(|d| decimal_year(d))
        .collect::<Result<Vec<_>, _>>()?;

    let x_range = date_axis_range(&years);
    let x_labels = year_label_count(&x_range, settings.every_year);
    let font_px = settings.font_px();

    let mut chart = ChartBuilder::on(root)
        .margin(font_px)
        .x_label_area_size(font_px * 3)
        .y_label_area_size(font_px * 4)
        .build_cartesian_2d(x_range, 0.0..1.0)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(TIME_LABEL)
        .y_desc("Coherence")
        .x_labels(x_labels)
        .x_label_formatter(&format_year)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(settings.font())
        .axis_desc_style(settings.font())
        .draw()?;

    let legend_px = font_px as i32 / 2;
    for (label, color, pick) in [
        ("Max Coherence", MAX_COLOR, (|r: &DateCoherence| r.max) as Pick),
        ("Min Coherence", MIN_COLOR, (|r: &DateCoherence| r.min) as Pick),
    ] {
        chart
            .draw_series(
                rows.iter()
                    .zip(&years)
                    .filter(|(r, _)| !pick(r).is_nan())
                    .map(|(r, &x)| {
                        Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, pick(r))], color.filled())
                    }),
            )?
            .label(label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - legend_px), (x + 2 * legend_px, y + legend_px)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(settings.font())
        .draw()?;
    Ok(())
}
