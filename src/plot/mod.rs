/// Figure rendering: baseline history, coherence matrix, coherence history
/// and the pair network, drawn with `plotters` onto bitmap or SVG backends.
pub mod axis;
pub mod baseline_history;
pub mod coherence_history;
pub mod coherence_matrix;
pub mod colormap;
pub mod network;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::network::LoadedNetwork;
use colormap::{ColorScale, Colormap};

/// Colorbar label of every coherence-colored figure.
pub const COLORBAR_LABEL: &str = "Average spatial coherence";

/// Points per inch; font, line and marker sizes are given in points.
const POINTS_PER_INCH: f64 = 72.0;

/// Color of dropped acquisitions and pairs.
pub const DROPPED_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Axis label of time axes.
const TIME_LABEL: &str = "Time [years]";

/// Axis label of baseline axes.
const BPERP_LABEL: &str = "Perpendicular Baseline [m]";

/// The figures this tool can produce, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    /// Baseline of each acquisition over time.
    BaselineHistory,
    /// Pair coherence indexed by acquisition number.
    CoherenceMatrix,
    /// Min/max coherence of the pairs touching each acquisition.
    CoherenceHistory,
    /// Acquisitions connected by their pairs.
    Network,
}

impl Figure {
    /// File stem of the saved figure.
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::BaselineHistory => "BperpHistory",
            Self::CoherenceMatrix => "CoherenceMatrix",
            Self::CoherenceHistory => "CoherenceHistory",
            Self::Network => "Network",
        }
    }

    /// Whether the figure needs coherence values.
    #[must_use]
    pub fn needs_coherence(self) -> bool {
        matches!(self, Self::CoherenceMatrix | Self::CoherenceHistory)
    }

    /// Figures to draw for a network, skipping coherence figures when no
    /// coherence is available.
    #[must_use]
    pub fn for_network(network: &LoadedNetwork) -> Vec<Self> {
        [
            Self::BaselineHistory,
            Self::CoherenceMatrix,
            Self::CoherenceHistory,
            Self::Network,
        ]
        .into_iter()
        .filter(|f| network.coherence.is_some() || !f.needs_coherence())
        .collect()
    }
}

/// Output image format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    /// PNG raster.
    Png,
    /// JPEG raster.
    Jpg,
    /// BMP raster.
    Bmp,
    /// SVG vector.
    Svg,
}

impl FigureFormat {
    /// File extension including the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpg => ".jpg",
            Self::Bmp => ".bmp",
            Self::Svg => ".svg",
        }
    }
}

impl FromStr for FigureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "bmp" => Ok(Self::Bmp),
            "svg" => Ok(Self::Svg),
            _ => Err(format!("unsupported figure extension '{s}' (use .png, .jpg, .bmp or .svg)")),
        }
    }
}

/// Display settings shared by all figures.
#[derive(Debug, Clone)]
pub struct FigureSettings {
    /// Lower end of the coherence color scale.
    pub vmin: f64,
    /// Upper end of the coherence color scale.
    pub vmax: f64,
    /// Colormap for coherence.
    pub colormap: Colormap,
    /// Coherence value at which to split the colormap.
    pub threshold: Option<f64>,
    /// Font size, points.
    pub fontsize: u32,
    /// Line width, points.
    pub linewidth: u32,
    /// Fill color of kept acquisition markers.
    pub marker_color: RGBColor,
    /// Marker size, points.
    pub marker_size: u32,
    /// Years between major ticks on time axes.
    pub every_year: u32,
    /// Dots per inch.
    pub dpi: u32,
    /// Figure width and height, inches.
    pub figsize: (f64, f64),
    /// Output format.
    pub format: FigureFormat,
    /// Output directory.
    pub outdir: PathBuf,
    /// Draw dropped acquisitions and pairs.
    pub show_dropped: bool,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            vmin: 0.2,
            vmax: 1.0,
            colormap: Colormap::default(),
            threshold: None,
            fontsize: 12,
            linewidth: 2,
            marker_color: RGBColor(255, 165, 0),
            marker_size: 16,
            every_year: 1,
            dpi: 150,
            figsize: (8.0, 6.0),
            format: FigureFormat::Png,
            outdir: PathBuf::from("."),
            show_dropped: true,
        }
    }
}

impl FigureSettings {
    /// Image size in pixels.
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.figsize.0 * dpi).round().max(1.0) as u32,
            (self.figsize.1 * dpi).round().max(1.0) as u32,
        )
    }

    /// Convert points to pixels at the current DPI.
    #[must_use]
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / POINTS_PER_INCH
    }

    /// Font size in pixels.
    #[must_use]
    pub fn font_px(&self) -> u32 {
        self.points_to_px(f64::from(self.fontsize)).round().max(1.0) as u32
    }

    /// Line width in pixels.
    #[must_use]
    pub fn line_px(&self) -> u32 {
        self.points_to_px(f64::from(self.linewidth)).round().max(1.0) as u32
    }

    /// Marker radius in pixels (marker size is a diameter in points).
    #[must_use]
    pub fn marker_radius_px(&self) -> i32 {
        (self.points_to_px(f64::from(self.marker_size)) / 2.0).round().max(1.0) as i32
    }

    /// Coherence color scale.
    #[must_use]
    pub fn color_scale(&self) -> ColorScale {
        ColorScale::new(&self.colormap, self.vmin, self.vmax, self.threshold)
    }

    /// Path a figure is saved to.
    #[must_use]
    pub fn figure_path(&self, figure: Figure) -> PathBuf {
        self.outdir
            .join(format!("{}{}", figure.file_stem(), self.format.extension()))
    }

    fn font(&self) -> TextStyle<'static> {
        TextStyle::from(("sans-serif", self.font_px()).into_font())
    }
}

/// Render one figure to its file and return the path written.
///
/// # Errors
///
/// Returns an error if the figure cannot be drawn or saved.
pub fn render_figure(
    figure: Figure,
    network: &LoadedNetwork,
    settings: &FigureSettings,
) -> Result<PathBuf> {
    let path = settings.figure_path(figure);
    let size = settings.pixel_size();
    match settings.format {
        FigureFormat::Svg => {
            let root = SVGBackend::new(&path, size).into_drawing_area();
            draw_figure(figure, &root, network, settings)?;
            root.present()?;
        }
        FigureFormat::Png | FigureFormat::Jpg | FigureFormat::Bmp => {
            let root = BitMapBackend::new(&path, size).into_drawing_area();
            draw_figure(figure, &root, network, settings)?;
            root.present()?;
        }
    }
    Ok(path)
}

fn draw_figure<DB>(
    figure: Figure,
    root: &DrawingArea<DB, Shift>,
    network: &LoadedNetwork,
    settings: &FigureSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    match figure {
        Figure::BaselineHistory => baseline_history::draw(root, network, settings),
        Figure::CoherenceMatrix => coherence_matrix::draw(root, network, settings),
        Figure::CoherenceHistory => coherence_history::draw(root, network, settings),
        Figure::Network => network::draw(root, network, settings),
    }
    .with_context(|| format!("drawing {}", figure.file_stem()))
}

/// Split a colorbar strip off the right edge of `root`.
fn split_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    settings: &FigureSettings,
) -> (DrawingArea<DB, Shift>, DrawingArea<DB, Shift>) {
    let width = root.dim_in_pixel().0;
    let bar_width = (settings.font_px() * 6).min(width / 3);
    root.split_horizontally(width - bar_width)
}

/// Vertical colorbar spanning `[vmin, vmax]`.
fn draw_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    scale: &ColorScale,
    settings: &FigureSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let font_px = settings.font_px();
    let mut bar = ChartBuilder::on(area)
        .margin_top(font_px)
        .margin_bottom(font_px * 3)
        .set_label_area_size(LabelAreaPosition::Left, 0)
        .set_label_area_size(LabelAreaPosition::Right, font_px * 4)
        .build_cartesian_2d(0.0..1.0, scale.vmin..scale.vmax)?;

    let steps = 100;
    let step = (scale.vmax - scale.vmin) / f64::from(steps);
    bar.draw_series((0..steps).map(|i| {
        let lo = scale.vmin + step * f64::from(i);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], scale.color(lo + step / 2.0).filled())
    }))?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_desc(COLORBAR_LABEL)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(settings.font())
        .axis_desc_style(settings.font())
        .draw()?;
    Ok(())
}

/// Decimal years of all acquisitions of a network.
fn date_years(network: &LoadedNetwork) -> Result<Vec<f64>> {
    network
        .dates
        .iter()
        .map(|d| crate::network::date::decimal_year(d).map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(with_coherence: bool) -> LoadedNetwork {
        LoadedNetwork {
            dates: vec!["20070106".into(), "20070709".into(), "20070824".into()],
            bperp: vec![0.0, 100.0, 150.0],
            date12: vec!["070106-070709".into(), "070709-070824".into()],
            coherence: with_coherence.then(|| vec![0.8, 0.4]),
            ..LoadedNetwork::default()
        }
    }

    #[test]
    fn test_figures_without_coherence() {
        assert_eq!(
            Figure::for_network(&network(false)),
            vec![Figure::BaselineHistory, Figure::Network]
        );
        assert_eq!(Figure::for_network(&network(true)).len(), 4);
    }

    #[test]
    fn test_figure_format_parsing() {
        assert_eq!(".png".parse::<FigureFormat>().unwrap(), FigureFormat::Png);
        assert_eq!("JPEG".parse::<FigureFormat>().unwrap(), FigureFormat::Jpg);
        assert!(".pdf".parse::<FigureFormat>().is_err());
        assert!("eps".parse::<FigureFormat>().is_err());
    }

    #[test]
    fn test_pixel_sizes() {
        let s = FigureSettings::default();
        assert_eq!(s.pixel_size(), (1200, 900));
        assert_eq!(s.font_px(), 25);
        assert_eq!(s.line_px(), 4);
        assert_eq!(s.marker_radius_px(), 17);
    }

    fn network_with_drops() -> LoadedNetwork {
        LoadedNetwork {
            dates: vec![
                "20070106".into(),
                "20070709".into(),
                "20070824".into(),
                "20080110".into(),
            ],
            bperp: vec![0.0, 2631.9, 2787.3, 2500.0],
            date12: vec![
                "070106-070709".into(),
                "070709-070824".into(),
                "070824-080110".into(),
                "070106-080110".into(),
            ],
            drop: crate::network::drop::DropInfo {
                dates: vec![],
                date12: vec!["070824-080110".into()],
            },
            coherence: Some(vec![0.85, f64::NAN, 0.3, 0.6]),
        }
    }

    fn render_all(network: &LoadedNetwork, settings: &FigureSettings) -> Vec<PathBuf> {
        Figure::for_network(network)
            .into_iter()
            .map(|figure| {
                let path = render_figure(figure, network, settings).unwrap();
                assert_eq!(path, settings.figure_path(figure));
                assert!(std::fs::metadata(&path).unwrap().len() > 0);
                path
            })
            .collect()
    }

    #[test]
    fn test_render_all_figures() {
        let dir = tempfile::tempdir().unwrap();
        let network = network_with_drops();
        for format in [FigureFormat::Png, FigureFormat::Svg] {
            let settings = FigureSettings {
                dpi: 50,
                threshold: Some(0.5),
                format,
                outdir: dir.path().to_path_buf(),
                ..FigureSettings::default()
            };
            assert_eq!(render_all(&network, &settings).len(), 4);
        }
    }

    #[test]
    fn test_render_hidden_drops_without_coherence() {
        let dir = tempfile::tempdir().unwrap();
        let network = LoadedNetwork {
            coherence: None,
            ..network_with_drops()
        };
        let settings = FigureSettings {
            dpi: 50,
            show_dropped: false,
            outdir: dir.path().to_path_buf(),
            ..FigureSettings::default()
        };
        let paths = render_all(&network, &settings);
        assert_eq!(
            paths,
            vec![
                dir.path().join("BperpHistory.png"),
                dir.path().join("Network.png"),
            ]
        );
        assert!(!dir.path().join("CoherenceMatrix.png").exists());
    }

    #[test]
    fn test_figure_path() {
        let s = FigureSettings {
            outdir: PathBuf::from("out"),
            format: FigureFormat::Svg,
            ..FigureSettings::default()
        };
        assert_eq!(
            s.figure_path(Figure::BaselineHistory),
            PathBuf::from("out/BperpHistory.svg")
        );
    }
}
