/// The pair network: acquisitions at (time, baseline), pairs as edges.
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::axis::{date_axis_range, format_year, value_axis_range, year_label_count};
use super::colormap::ColorScale;
use super::{
    BPERP_LABEL, DROPPED_COLOR, FigureSettings, TIME_LABEL, date_years, draw_colorbar,
    split_colorbar,
};
use crate::network::{LoadedNetwork, NetworkError};

/// Dash and gap length of dropped pairs, in line widths.
const DASH_RATIO: f64 = 3.0;
const GAP_RATIO: f64 = 2.0;

/// One pair as a line between its two acquisitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Master acquisition (decimal year, baseline).
    pub from: (f64, f64),
    /// Slave acquisition (decimal year, baseline).
    pub to: (f64, f64),
    /// Pair coherence, when coherence is available.
    pub coherence: Option<f64>,
    /// Pair is marked as dropped.
    pub dropped: bool,
}

/// Edges in drawing order: dropped pairs first, then by increasing
/// coherence so the strongest pairs end up on top. NaN sorts lowest.
///
/// # Errors
///
/// Returns `NetworkError` if a pair references an unknown acquisition.
pub fn edges(network: &LoadedNetwork, years: &[f64]) -> Result<Vec<Edge>, NetworkError> {
    let mut edges = network
        .date12
        .iter()
        .enumerate()
        .map(|(k, pair)| {
            let (i, j) = network.pair_indices(pair)?;
            Ok(Edge {
                from: (years[i], network.bperp[i]),
                to: (years[j], network.bperp[j]),
                coherence: network.coherence.as_ref().map(|c| c[k]),
                dropped: network.drop.is_date12_dropped(pair),
            })
        })
        .collect::<Result<Vec<_>, NetworkError>>()?;

    let key = |e: &Edge| e.coherence.filter(|c| !c.is_nan()).unwrap_or(f64::NEG_INFINITY);
    edges.sort_by(|a, b| b.dropped.cmp(&a.dropped).then(key(a).total_cmp(&key(b))));
    Ok(edges)
}

/// Line color of an edge: dropped pairs are gray, kept pairs take their
/// coherence color, or black without coherence.
#[must_use]
pub fn edge_color(edge: &Edge, scale: &ColorScale) -> RGBColor {
    match (edge.dropped, edge.coherence) {
        (true, _) => DROPPED_COLOR,
        (false, Some(c)) => scale.color(c),
        (false, None) => BLACK,
    }
}

/// Split a segment into dashes, given its on-screen length in pixels.
///
/// Screen coordinates are affine in data coordinates, so dashes are spaced
/// evenly along the data-space segment.
#[must_use]
pub fn dash_segments(
    from: (f64, f64),
    to: (f64, f64),
    pixel_len: f64,
    dash_px: f64,
    gap_px: f64,
) -> Vec<[(f64, f64); 2]> {
    let period = dash_px + gap_px;
    if pixel_len <= dash_px || period <= 0.0 {
        return vec![[from, to]];
    }
    let lerp = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    let mut out = Vec::new();
    let mut start = 0.0;
    while start < pixel_len {
        let end = (start + dash_px).min(pixel_len);
        out.push([lerp(start / pixel_len), lerp(end / pixel_len)]);
        start += period;
    }
    out
}

/// Draw the network, with a coherence colorbar when coherence is available.
///
/// # Errors
///
/// Returns an error on malformed input or backend failures.
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
    let scale = settings.color_scale();
    let font_px = settings.font_px();

    let (main, bar) = if network.coherence.is_some() {
        let (main, bar) = split_colorbar(root, settings);
        (main, Some(bar))
    } else {
        (root.clone(), None)
    };

    let x_range = date_axis_range(&years);
    let x_labels = year_label_count(&x_range, settings.every_year);
    let y_range = value_axis_range(&network.bperp);

    let mut chart = ChartBuilder::on(&main)
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

    let line_px = settings.line_px();
    let dash_px = f64::from(line_px) * DASH_RATIO;
    let gap_px = f64::from(line_px) * GAP_RATIO;

    for edge in edges(network, &years)? {
        if edge.dropped && !settings.show_dropped {
            continue;
        }
        let color = edge_color(&edge, &scale);
        let style = color.stroke_width(line_px);

        if edge.dropped {
            let (p0, p1) = (chart.backend_coord(&edge.from), chart.backend_coord(&edge.to));
            let pixel_len = f64::from(p1.0 - p0.0).hypot(f64::from(p1.1 - p0.1));
            chart.draw_series(
                dash_segments(edge.from, edge.to, pixel_len, dash_px, gap_px)
                    .into_iter()
                    .map(|seg| PathElement::new(seg.to_vec(), style)),
            )?;
        } else {
            chart.draw_series(std::iter::once(PathElement::new(vec![edge.from, edge.to], style)))?;
        }
    }

    let radius = settings.marker_radius_px();
    let nodes = network
        .dates
        .iter()
        .zip(years.iter().copied().zip(network.bperp.iter().copied()))
        .filter_map(|(date, xy)| {
            let dropped = network.drop.is_date_dropped(date);
            if dropped && !settings.show_dropped {
                return None;
            }
            Some((xy, if dropped { DROPPED_COLOR } else { settings.marker_color }))
        })
        .collect::<Vec<_>>();
    chart.draw_series(nodes.iter().map(|&(xy, fill)| Circle::new(xy, radius, fill.filled())))?;
    chart.draw_series(nodes.iter().map(|&(xy, _)| Circle::new(xy, radius, BLACK.stroke_width(1))))?;

    if let Some(bar) = bar {
        draw_colorbar(&bar, &scale, settings)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::network::drop::DropInfo;

    fn network() -> LoadedNetwork {
        LoadedNetwork {
            dates: vec!["20070106".into(), "20070709".into(), "20070824".into()],
            bperp: vec![0.0, 100.0, 150.0],
            date12: vec![
                "070106-070709".into(),
                "070709-070824".into(),
                "070106-070824".into(),
            ],
            drop: DropInfo {
                dates: vec![],
                date12: vec!["070106-070824".into()],
            },
            coherence: Some(vec![0.9, f64::NAN, 0.4]),
        }
    }

    #[test]
    fn test_edges_order_dropped_then_coherence() {
        let net = network();
        let years = vec![2007.0, 2007.5, 2007.6];
        let e = edges(&net, &years).unwrap();
        assert!(e[0].dropped);
        assert_eq!(e[0].coherence, Some(0.4));
        assert!(e[1].coherence.unwrap().is_nan());
        assert_eq!(e[2].coherence, Some(0.9));
        assert_eq!(e[2].from, (2007.0, 0.0));
        assert_eq!(e[2].to, (2007.5, 100.0));
    }

    #[test]
    fn test_edges_without_coherence() {
        let mut net = network();
        net.coherence = None;
        let e = edges(&net, &[2007.0, 2007.5, 2007.6]).unwrap();
        assert!(e.iter().all(|e| e.coherence.is_none()));
        assert!(e[0].dropped && !e[1].dropped && !e[2].dropped);
    }

    #[test]
    fn test_edge_colors() {
        let scale = FigureSettings::default().color_scale();
        let edge = |coherence, dropped| Edge {
            from: (2007.0, 0.0),
            to: (2007.5, 100.0),
            coherence,
            dropped,
        };
        assert_eq!(edge_color(&edge(Some(0.9), true), &scale), DROPPED_COLOR);
        assert_eq!(edge_color(&edge(None, true), &scale), DROPPED_COLOR);
        assert_eq!(edge_color(&edge(Some(0.9), false), &scale), scale.color(0.9));
        assert_eq!(edge_color(&edge(None, false), &scale), BLACK);
    }

    #[test]
    fn test_dash_segments() {
        let segs = dash_segments((0.0, 0.0), (10.0, 0.0), 100.0, 6.0, 4.0);
        assert_eq!(segs.len(), 10);
        assert_abs_diff_eq!(segs[0][1].0, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(segs[1][0].0, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(segs[9][1].0, 9.6, epsilon = 1e-12);

        let short = dash_segments((0.0, 0.0), (1.0, 1.0), 3.0, 6.0, 4.0);
        assert_eq!(short, vec![[(0.0, 0.0), (1.0, 1.0)]]);
    }
}
