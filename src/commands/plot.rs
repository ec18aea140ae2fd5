/// `plot` command: render the network figures and optionally save the pair list.
use crate::cli::OutputCtx;
use crate::cli::args::PlotArgs;
use crate::cli::output::write_plot;
use crate::network::date12::{list_file_path, write_date12_file};
use crate::network::template::Template;
use crate::network::{LoadedNetwork, NetworkError};
use crate::plot::{Figure, FigureSettings, render_figure};
use crate::types::{FigureOutput, PlotOutput};

/// Run `netplot plot`.
///
/// # Errors
///
/// Returns `NetworkError` for unreadable inputs, an unwritable output
/// directory, or a figure that fails to render.
pub fn run(args: &PlotArgs, ctx: &OutputCtx) -> Result<(), NetworkError> {
    let (network, template) = super::load(&args.input, ctx)?;

    let mut settings = settings(args);
    if let Some(threshold) = template.as_ref().map(Template::min_coherence).transpose()?.flatten() {
        log::debug!("template coherence threshold: {threshold}");
        settings.threshold = Some(threshold);
    }
    log::debug!(
        "colormap {} over [{}, {}], threshold {:?}",
        settings.colormap.name(),
        settings.vmin,
        settings.vmax,
        settings.threshold
    );

    if args.input.nodrop && !network.drop.is_empty() {
        log::info!(
            "hiding {} dropped acquisition(s) and {} dropped pair(s)",
            network.drop.dates.len(),
            network.drop.date12.len()
        );
    }

    std::fs::create_dir_all(&settings.outdir).map_err(|e| NetworkError::io(&settings.outdir, e))?;

    let mut figures = Vec::new();
    for figure in Figure::for_network(&network) {
        let _t = ctx.timer(figure.file_stem());
        let path = render_figure(figure, &network, &settings).map_err(|e| NetworkError::Render {
            figure: figure.file_stem().to_owned(),
            message: format!("{e:#}"),
        })?;
        log::info!("save figure to {}", path.display());
        figures.push(FigureOutput {
            figure: figure.file_stem().to_owned(),
            path: path.display().to_string(),
        });
    }

    let date12_list = if args.list {
        let path = list_file_path(&args.input.file);
        write_date12_file(&path, &listed_pairs(&network, args.input.nodrop))?;
        log::info!("save pair list to {}", path.display());
        Some(path.display().to_string())
    } else {
        None
    };

    write_plot(
        &PlotOutput {
            acquisitions: network.dates.len(),
            pairs: network.date12.len(),
            dropped_pairs: network.drop.date12.len(),
            coherence: network.coherence.is_some(),
            figures,
            date12_list,
        },
        ctx,
    );
    Ok(())
}

/// Figure settings from the command-line options.
fn settings(args: &PlotArgs) -> FigureSettings {
    let defaults = FigureSettings::default();
    let figsize = match args.figsize[..] {
        [w, h] => (w, h),
        _ => defaults.figsize,
    };
    FigureSettings {
        vmin: args.vmin,
        vmax: args.vmax,
        colormap: args.colormap.clone(),
        threshold: args.threshold,
        fontsize: args.fontsize,
        linewidth: args.linewidth,
        marker_color: args.marker_color,
        marker_size: args.marker_size,
        every_year: args.every_year,
        dpi: args.dpi,
        figsize,
        format: args.figext,
        outdir: args.outdir.clone(),
        show_dropped: !args.input.nodrop,
    }
}

/// Pairs written by `--list`: every pair, or only kept pairs with `--nodrop`.
fn listed_pairs(network: &LoadedNetwork, nodrop: bool) -> Vec<String> {
    network
        .date12
        .iter()
        .filter(|p| !nodrop || !network.drop.is_date12_dropped(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::args::Command;
    use crate::cli::{Cli, OutputFormat};
    use crate::network::drop::DropInfo;
    use crate::plot::FigureFormat;

    fn plot_args(extra: &[&str]) -> PlotArgs {
        plot_args_for("pairs.txt", extra)
    }

    fn plot_args_for(input: &str, extra: &[&str]) -> PlotArgs {
        let mut argv = vec!["netplot", "plot", input];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Plot(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_settings_from_args() {
        let s = settings(&plot_args(&["--dpi", "100", "--figsize", "6", "4", "--figext", ".svg", "--nodrop"]));
        assert_eq!(s.pixel_size(), (600, 400));
        assert_eq!(s.format, FigureFormat::Svg);
        assert!(!s.show_dropped);
        assert_eq!(s.threshold, None);
    }

    #[test]
    fn test_listed_pairs() {
        let network = LoadedNetwork {
            date12: vec!["070106-070709".into(), "070709-070824".into()],
            drop: DropInfo {
                dates: vec![],
                date12: vec!["070709-070824".into()],
            },
            ..LoadedNetwork::default()
        };
        assert_eq!(listed_pairs(&network, false).len(), 2);
        assert_eq!(listed_pairs(&network, true), vec!["070106-070709".to_owned()]);
    }

    /// Pair list and baseline list in `dir`; returns the args for `plot`.
    fn pair_list_args(dir: &std::path::Path, coherence: &str, extra: &[&str]) -> PlotArgs {
        std::fs::write(dir.join("bl_list.txt"), "070106 0.0\n070709 2631.9\n070824 2787.3\n").unwrap();
        std::fs::write(dir.join("ifgram_list.txt"), "070106-070709\n070709-070824\n070106-070824\n").unwrap();
        let input = dir.join("ifgram_list.txt");
        let baseline = dir.join("bl_list.txt");
        let coherence = dir.join(coherence);
        let outdir = dir.join("pic");
        let mut argv = vec![
            "-b",
            baseline.to_str().unwrap(),
            "--coherence",
            coherence.to_str().unwrap(),
            "--mask",
            "no",
            "--outdir",
            outdir.to_str().unwrap(),
            "--dpi",
            "50",
        ];
        argv.extend_from_slice(extra);
        plot_args_for(input.to_str().unwrap(), &argv)
    }

    fn ctx() -> OutputCtx {
        OutputCtx::new(OutputFormat::Json, false, false, false)
    }

    #[test]
    fn test_run_without_coherence() {
        let dir = tempfile::tempdir().unwrap();
        let args = pair_list_args(dir.path(), "missing_spatialAverage.txt", &["--list"]);
        run(&args, &ctx()).unwrap();

        let pic = dir.path().join("pic");
        assert!(pic.join("BperpHistory.png").is_file());
        assert!(pic.join("Network.png").is_file());
        assert!(!pic.join("CoherenceMatrix.png").exists());
        assert!(!pic.join("CoherenceHistory.png").exists());

        let listed = std::fs::read_to_string(dir.path().join("ifgram_list_date12_list.txt")).unwrap();
        assert_eq!(listed.lines().count(), 3);
    }

    #[test]
    fn test_run_with_coherence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("coherence_spatialAverage.txt"),
            "# Mask file: None\n070106-070709 0.82\n070709-070824 0.41\n070106-070824 0.63\n",
        )
        .unwrap();
        let args = pair_list_args(
            dir.path(),
            "coherence_spatialAverage.txt",
            &["--figext", ".svg", "--threshold", "0.5"],
        );
        run(&args, &ctx()).unwrap();

        let pic = dir.path().join("pic");
        for stem in ["BperpHistory", "CoherenceMatrix", "CoherenceHistory", "Network"] {
            assert!(pic.join(format!("{stem}.svg")).is_file(), "{stem}");
        }
        assert!(!dir.path().join("ifgram_list_date12_list.txt").exists());
    }

    #[test]
    fn test_run_missing_baseline_list() {
        let dir = tempfile::tempdir().unwrap();
        let args = pair_list_args(dir.path(), "none.txt", &[]);
        std::fs::remove_file(dir.path().join("bl_list.txt")).unwrap();
        assert!(matches!(run(&args, &ctx()), Err(NetworkError::Io { .. })));
    }
}
