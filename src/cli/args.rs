/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use plotters::style::RGBColor;

use crate::plot::FigureFormat;
use crate::plot::colormap::{Colormap, parse_color};

/// netplot: plot the network of interferometric pairs.
#[derive(Debug, Parser)]
#[command(
    name = "netplot",
    about = "Plot the network of interferometric pairs of an InSAR time series",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Log at debug level and print stage timings to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON array or object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
    /// Aligned table with headers (human-readable).
    Table,
    /// Key only (date, date12 or figure path), one per line.
    Id,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render baseline history, coherence matrix, coherence history and network figures.
    Plot(PlotArgs),
    /// List acquisitions with their perpendicular baseline.
    Dates(InputArgs),
    /// List pairs with temporal/perpendicular baseline and coherence.
    Pairs(InputArgs),
}

/// Input files shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Pair network file: an ifgram stack (.h5) or a date12 list (.txt).
    pub file: PathBuf,

    /// Baseline list file, used with a date12 list input.
    #[arg(short = 'b', long = "baseline", value_name = "FILE", default_value = "bl_list.txt")]
    pub baseline: PathBuf,

    /// Coherence stack or spatial-average text file used to color pairs.
    /// Defaults to the input when it is a coherence stack, else coherence.h5.
    #[arg(long, value_name = "FILE")]
    pub coherence: Option<PathBuf>,

    /// Mask applied when averaging coherence; "no" for none.
    #[arg(long, value_name = "FILE", default_value = "mask.h5")]
    pub mask: String,

    /// Template file with pysar.network.* options (overrides the flags above).
    #[arg(short = 't', long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Do not show dropped acquisitions and pairs.
    #[arg(long)]
    pub nodrop: bool,
}

impl InputArgs {
    /// Mask file, `None` when disabled with "no".
    #[must_use]
    pub fn mask_file(&self) -> Option<PathBuf> {
        (self.mask != "no").then(|| PathBuf::from(&self.mask))
    }
}

/// Arguments for `netplot plot`.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Lower end of the coherence color scale.
    #[arg(short = 'm', long, value_name = "MIN", default_value_t = 0.2)]
    pub vmin: f64,

    /// Upper end of the coherence color scale.
    #[arg(short = 'M', long, value_name = "MAX", default_value_t = 1.0)]
    pub vmax: f64,

    /// Colormap for coherence: RdBu, jet, viridis, gray (append _r to reverse).
    #[arg(short = 'c', long = "colormap", value_name = "NAME", default_value = "RdBu")]
    pub colormap: Colormap,

    /// Coherence value splitting the colormap into low/high halves.
    #[arg(long, value_name = "COH")]
    pub threshold: Option<f64>,

    /// Font size in points.
    #[arg(long, value_name = "PT", default_value_t = 12)]
    pub fontsize: u32,

    /// Line width in points.
    #[arg(long = "linewidth", visible_alias = "lw", value_name = "PT", default_value_t = 2)]
    pub linewidth: u32,

    /// Marker color: a name or #rrggbb.
    #[arg(
        long = "markercolor",
        visible_alias = "mc",
        value_name = "COLOR",
        default_value = "orange",
        value_parser = parse_color
    )]
    pub marker_color: RGBColor,

    /// Marker size in points.
    #[arg(long = "markersize", visible_alias = "ms", value_name = "PT", default_value_t = 16)]
    pub marker_size: u32,

    /// Years between ticks on time axes.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub every_year: u32,

    /// Figure resolution in dots per inch.
    #[arg(long, value_name = "DPI", default_value_t = 150)]
    pub dpi: u32,

    /// Figure width and height in inches.
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [8.0, 6.0])]
    pub figsize: Vec<f64>,

    /// Figure file extension: .png, .jpg, .bmp or .svg.
    #[arg(long, value_name = "EXT", default_value = ".png")]
    pub figext: FigureFormat,

    /// Directory the figures are saved to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub outdir: PathBuf,

    /// Also save the pair list as <input>_date12_list.txt.
    #[arg(long)]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_defaults() {
        let cli = Cli::parse_from(["netplot", "plot", "ifgramStack.h5"]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.input.file, PathBuf::from("ifgramStack.h5"));
        assert_eq!(args.input.baseline, PathBuf::from("bl_list.txt"));
        assert_eq!(args.input.mask_file(), Some(PathBuf::from("mask.h5")));
        assert!(args.input.coherence.is_none());
        assert_eq!(args.colormap.name(), "RdBu");
        assert_eq!(args.figsize, vec![8.0, 6.0]);
        assert_eq!(args.figext, FigureFormat::Png);
        assert_eq!(args.marker_color, RGBColor(255, 165, 0));
        assert!(!args.list);
    }

    #[test]
    fn test_plot_short_flags() {
        let cli = Cli::parse_from([
            "netplot", "plot", "pairs.txt", "-b", "bl.txt", "-m", "0.4", "-M", "0.9", "-c",
            "jet_r", "--lw", "3", "--mc", "#ff0000", "--figsize", "10", "4", "--figext", "svg",
            "--mask", "no", "--nodrop",
        ]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.input.baseline, PathBuf::from("bl.txt"));
        assert!((args.vmin - 0.4).abs() < f64::EPSILON);
        assert!((args.vmax - 0.9).abs() < f64::EPSILON);
        assert_eq!(args.colormap.name(), "jet_r");
        assert_eq!(args.linewidth, 3);
        assert_eq!(args.marker_color, RGBColor(255, 0, 0));
        assert_eq!(args.figsize, vec![10.0, 4.0]);
        assert_eq!(args.figext, FigureFormat::Svg);
        assert_eq!(args.input.mask_file(), None);
        assert!(args.input.nodrop);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["netplot", "dates", "pairs.txt", "--json", "--debug"]);
        assert!(cli.json);
        assert!(cli.debug);
        assert!(matches!(cli.command, Command::Dates(_)));
    }

    #[test]
    fn test_rejects_pdf() {
        assert!(Cli::try_parse_from(["netplot", "plot", "x.h5", "--figext", ".pdf"]).is_err());
    }
}
