/// Perpendicular baseline of every acquisition over time.
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::axis::{date_axis_range, format_year, value_axis_range, year_label_count};
use super::{BPERP_LABEL, DROPPED_COLOR, FigureSettings, TIME_LABEL, date_years};
use crate::network::LoadedNetwork;

/// An acquisition as drawn: (decimal year, baseline) and whether it is dropped.
type Point = ((f64, f64), bool);

/// Acquisitions in time order, without dropped ones unless `show_dropped`.
#[must_use]
pub fn shown_points(network: &LoadedNetwork, years: &[f64], show_dropped: bool) -> Vec<Point> {
    network
        .dates
        .iter()
        .zip(years.iter().copied().zip(network.bperp.iter().copied()))
        .map(|(date, xy)| (xy, network.drop.is_date_dropped(date)))
        .filter(|&(_, dropped)| show_dropped || !dropped)
        .collect()
}

/// Draw the baseline history: shown acquisitions joined in time order, kept
/// ones filled with the marker color and dropped ones in gray.
///
/// # Errors
///
/// Returns an error on malformed dates or backend failures.
pub fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    network: &LoadedNetwork,
    settings: &FigureSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let years = date_years(network)?;
    let points = shown_points(network, &years, settings.show_dropped);
    let shown_bperp: Vec<f64> = points.iter().map(|&((_, y), _)| y).collect();

    let x_range = date_axis_range(&years);
    let x_labels = year_label_count(&x_range, settings.every_year);
    let y_range = value_axis_range(&shown_bperp);
    let font_px = settings.font_px();

    let mut chart = ChartBuilder::on(root)
        .margin(font_px)
        .x_label_area_size(font_px * 3)
        .y_label_area_size(font_px * 4)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(TIME_LABEL)
        .y_desc(BPERP_LABEL)
        .x_labels(x_labels)
        .x_label_formatter(&format_year)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(settings.font())
        .axis_desc_style(settings.font())
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().map(|&(xy, _)| xy),
        BLACK.stroke_width(settings.line_px()),
    ))?;

    let radius = settings.marker_radius_px();
    let fill = |dropped: bool| if dropped { DROPPED_COLOR } else { settings.marker_color };
    chart.draw_series(
        points
            .iter()
            .map(|&(xy, dropped)| Circle::new(xy, radius, fill(dropped).filled())),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|&(xy, _)| Circle::new(xy, radius, BLACK.stroke_width(1))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::drop::DropInfo;

    fn network() -> LoadedNetwork {
        LoadedNetwork {
            dates: vec!["20070106".into(), "20070709".into(), "20070824".into()],
            bperp: vec![0.0, 900.0, 150.0],
            date12: vec!["070106-070824".into(), "070106-070709".into()],
            drop: DropInfo {
                dates: vec!["20070709".into()],
                date12: vec!["070106-070709".into()],
            },
            coherence: None,
        }
    }

    #[test]
    fn test_shown_points_keep_dropped() {
        let points = shown_points(&network(), &[2007.0, 2007.5, 2007.6], true);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], ((2007.5, 900.0), true));
        assert!(!points[0].1 && !points[2].1);
    }

    #[test]
    fn test_hidden_dropped_points_leave_the_line() {
        let points = shown_points(&network(), &[2007.0, 2007.5, 2007.6], false);
        assert_eq!(points, vec![((2007.0, 0.0), false), ((2007.6, 150.0), false)]);
    }
}
