/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod dates;
pub mod pairs;
pub mod plot;

use std::path::Path;

use crate::cli::OutputCtx;
use crate::cli::args::{Command, InputArgs};
use crate::network::template::{Template, read_template};
use crate::network::{LoadOptions, LoadedNetwork, NetworkError, load_network};

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `NetworkError` on any command failure.
pub fn dispatch(command: &Command, ctx: &OutputCtx) -> Result<(), NetworkError> {
    match command {
        Command::Plot(args) => plot::run(args, ctx),
        Command::Dates(args) => dates::run(args, ctx),
        Command::Pairs(args) => pairs::run(args, ctx),
    }
}

/// Read the template, if any, and build the load options it overrides.
///
/// # Errors
///
/// Returns `NetworkError::Io` if the template cannot be read.
fn load_options(args: &InputArgs) -> Result<(LoadOptions, Option<Template>), NetworkError> {
    let template = args.template.as_deref().map(read_template).transpose()?;

    let mut opts = LoadOptions {
        input: args.file.clone(),
        baseline_file: args.baseline.clone(),
        coherence_file: args.coherence.clone(),
        mask_file: args.mask_file(),
    };

    if let Some(template) = &template {
        if let Some(file) = template.coherence_file() {
            log::debug!("template coherence file: {}", file.display());
            opts.coherence_file = Some(file);
        }
        let dir = args
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        if let Some(mask) = template.mask_file(dir) {
            log::debug!("template mask file: {mask:?}");
            opts.mask_file = mask;
        }
    }
    Ok((opts, template))
}

/// Load the network named by the shared input arguments.
///
/// # Errors
///
/// Returns `NetworkError` from the template or any read stage.
fn load(args: &InputArgs, ctx: &OutputCtx) -> Result<(LoadedNetwork, Option<Template>), NetworkError> {
    let (opts, template) = load_options(args)?;
    let _t = ctx.timer("load_network");
    let network = load_network(&opts)?;
    Ok((network, template))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn input(file: &str) -> InputArgs {
        InputArgs {
            file: PathBuf::from(file),
            baseline: PathBuf::from("bl_list.txt"),
            coherence: None,
            mask: "mask.h5".into(),
            template: None,
            nodrop: false,
        }
    }

    #[test]
    fn test_options_without_template() {
        let (opts, template) = load_options(&input("pairs.txt")).unwrap();
        assert!(template.is_none());
        assert_eq!(opts.input, PathBuf::from("pairs.txt"));
        assert_eq!(opts.mask_file, Some(PathBuf::from("mask.h5")));
        assert!(opts.coherence_file.is_none());
    }

    #[test]
    fn test_template_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let tmpl = dir.path().join("net.template");
        std::fs::write(
            &tmpl,
            "pysar.network.coherenceFile = auto\npysar.network.maskFile = no\n",
        )
        .unwrap();
        let mut args = input("pairs.txt");
        args.template = Some(tmpl);
        args.coherence = Some(PathBuf::from("other.h5"));

        let (opts, template) = load_options(&args).unwrap();
        assert!(template.is_some());
        assert_eq!(opts.coherence_file, Some(PathBuf::from("coherence.h5")));
        assert_eq!(opts.mask_file, None);
    }

    #[test]
    fn test_missing_template_is_io_error() {
        let mut args = input("pairs.txt");
        args.template = Some(PathBuf::from("/nonexistent/net.template"));
        assert!(matches!(load_options(&args), Err(NetworkError::Io { .. })));
    }
}
