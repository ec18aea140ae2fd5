/// Read stages of the pipeline: dates and baselines, pairs, drops, coherence.
use std::path::{Path, PathBuf};

use super::baseline::read_baseline_file;
use super::coherence::{
    CoherenceAlignment, CoherenceList, DisabledReason, align_coherence, is_spatial_average_file,
    read_spatial_average_file, spatial_average_path, write_spatial_average_file,
};
use super::date12::read_date12_file;
use super::date::{date_list_from_date12, split_date12};
use super::drop::DropInfo;
use super::errors::NetworkError;
use super::stack::IfgramStack;
use super::template::AUTO_COHERENCE_FILE;

/// Where the network is read from, decided by the input extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Multi-group HDF5 stack (`.h5`, `.he5`).
    Stack,
    /// Text date12 list, paired with a baseline list file.
    PairList,
}

impl InputKind {
    /// Classify an input path.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnsupportedInput` for any other extension.
    pub fn of(path: &Path) -> Result<Self, NetworkError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "h5" | "he5" => Ok(Self::Stack),
            "txt" | "list" => Ok(Self::PairList),
            _ => Err(NetworkError::UnsupportedInput {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Inputs of the read stages.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Stack or pair-list file.
    pub input: PathBuf,
    /// Baseline list, used with pair-list input.
    pub baseline_file: PathBuf,
    /// Coherence source. When unset, a coherence stack input is its own
    /// source, otherwise `coherence.h5` is tried.
    pub coherence_file: Option<PathBuf>,
    /// Mask applied when averaging coherence; ignored if missing on disk.
    pub mask_file: Option<PathBuf>,
}

/// Everything the figures need, with all value lists aligned to their keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedNetwork {
    /// Sorted 8-digit acquisition dates.
    pub dates: Vec<String>,
    /// Perpendicular baseline of each date.
    pub bperp: Vec<f64>,
    /// Pairs in input order.
    pub date12: Vec<String>,
    /// Dropped dates and pairs.
    pub drop: DropInfo,
    /// Coherence of each pair, when available for every pair.
    pub coherence: Option<Vec<f64>>,
}

impl LoadedNetwork {
    /// Index of an acquisition date.
    #[must_use]
    pub fn date_index(&self, date8: &str) -> Option<usize> {
        self.dates.binary_search_by(|d| d.as_str().cmp(date8)).ok()
    }

    /// Indices of both acquisitions of a pair.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidDate12` for a malformed pair and
    /// `NetworkError::MissingBaseline` if an endpoint is not a known date.
    pub fn pair_indices(&self, date12: &str) -> Result<(usize, usize), NetworkError> {
        let (d1, d2) = split_date12(date12)?;
        let i = self
            .date_index(&d1)
            .ok_or(NetworkError::MissingBaseline { date: d1 })?;
        let j = self
            .date_index(&d2)
            .ok_or(NetworkError::MissingBaseline { date: d2 })?;
        Ok((i, j))
    }
}

/// Run all read stages.
///
/// # Errors
///
/// Returns `NetworkError` for unsupported or unreadable inputs, malformed
/// content, or pairs referencing unknown acquisitions.
pub fn load_network(opts: &LoadOptions) -> Result<LoadedNetwork, NetworkError> {
    let kind = InputKind::of(&opts.input)?;

    let (mut network, coherence_file) = match kind {
        InputKind::Stack => {
            let stack = read_stack(&opts.input)?;
            let coherence_file = opts.coherence_file.clone().unwrap_or_else(|| {
                if stack.is_coherence() {
                    opts.input.clone()
                } else {
                    PathBuf::from(AUTO_COHERENCE_FILE)
                }
            });
            let net = stack.network()?;
            let network = LoadedNetwork {
                dates: net.dates,
                bperp: net.bperp,
                date12: net.date12,
                drop: net.drop,
                coherence: None,
            };
            (network, coherence_file)
        }
        InputKind::PairList => {
            log::info!(
                "reading date and perpendicular baseline from baseline list file: {}",
                opts.baseline_file.display()
            );
            let baselines = read_baseline_file(&opts.baseline_file)?;
            if baselines.is_empty() {
                log::warn!("no acquisitions in {}", opts.baseline_file.display());
            }
            log::debug!("{} acquisitions in baseline list", baselines.len());

            log::info!("reading pairs info from file: {}", opts.input.display());
            let date12 = read_date12_file(&opts.input)?;
            baselines.lookup(&date_list_from_date12(&date12)?)?;

            let mut rows: Vec<(String, f64)> =
                baselines.dates.into_iter().zip(baselines.bperp).collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            let (dates, bperp) = rows.into_iter().unzip();
            let network = LoadedNetwork {
                dates,
                bperp,
                date12,
                ..LoadedNetwork::default()
            };
            let coherence_file = opts
                .coherence_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(AUTO_COHERENCE_FILE));
            (network, coherence_file)
        }
    };
    log::info!("number of acquisitions  : {}", network.dates.len());
    log::info!("number of interferograms: {}", network.date12.len());

    network.coherence = load_coherence(&coherence_file, opts.mask_file.as_deref(), &network.date12)?;
    Ok(network)
}

/// Read a coherence source and align it with `date12`.
///
/// Returns `None` when the source is missing or unusable for this network.
///
/// # Errors
///
/// Returns `NetworkError` if an existing source cannot be read.
pub fn load_coherence(
    coherence_file: &Path,
    mask_file: Option<&Path>,
    date12: &[String],
) -> Result<Option<Vec<f64>>, NetworkError> {
    if !coherence_file.is_file() {
        log::debug!("no coherence file at {}", coherence_file.display());
        return Ok(None);
    }
    let mask_file = mask_file.filter(|m| {
        let exists = m.is_file();
        if !exists {
            log::debug!("mask file {} not found, using all pixels", m.display());
        }
        exists
    });

    let source = match read_coherence(coherence_file, mask_file, Path::new(".")) {
        Ok(source) => source,
        Err(NetworkError::Hdf5Disabled { path }) => {
            log::warn!(
                "cannot read coherence from {} without HDF5 support, continuing without coherence",
                path.display()
            );
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match align_coherence(date12, &source) {
        CoherenceAlignment::Aligned(values) => {
            if source.date12.len() > date12.len() {
                log::info!("extract coherence value for all pair/date12 in input file");
            }
            Ok(Some(values))
        }
        CoherenceAlignment::Disabled(DisabledReason::AllNan) => {
            log::warn!("all coherence values are NaN, continuing without coherence");
            Ok(None)
        }
        CoherenceAlignment::Disabled(DisabledReason::Incomplete { missing }) => {
            log::warn!(
                "{} pair(s) from input file are not in coherence file (e.g. {}), \
                 turning off coherence coloring",
                missing.len(),
                missing[0]
            );
            Ok(None)
        }
    }
}

/// Read coherence from a spatial-average text file, or average a stack,
/// reusing a fresh cache in `cache_dir` computed with the same mask.
fn read_coherence(
    path: &Path,
    mask_file: Option<&Path>,
    cache_dir: &Path,
) -> Result<CoherenceList, NetworkError> {
    if is_spatial_average_file(path) {
        log::info!("reading spatial average coherence from {}", path.display());
        return Ok(read_spatial_average_file(path)?.list);
    }

    let cache = cache_dir.join(spatial_average_path(path));
    if cache_is_fresh(&cache, path) {
        let cached = read_spatial_average_file(&cache)?;
        let wanted = mask_file.map(|m| m.display().to_string());
        if cached.mask_file == wanted {
            log::info!("reading cached spatial average from {}", cache.display());
            return Ok(cached.list);
        }
    }

    let list = average_stack(path, mask_file)?;
    write_spatial_average_file(&cache, &list, mask_file)?;
    log::info!("save spatial average coherence to {}", cache.display());
    Ok(list)
}

fn cache_is_fresh(cache: &Path, source: &Path) -> bool {
    let modified = |p: &Path| std::fs::metadata(p).and_then(|m| m.modified()).ok();
    match (modified(cache), modified(source)) {
        (Some(c), Some(s)) => c >= s,
        _ => false,
    }
}

#[cfg(feature = "hdf5")]
fn read_stack(path: &Path) -> Result<IfgramStack, NetworkError> {
    super::h5::read_stack(path)
}

#[cfg(not(feature = "hdf5"))]
fn read_stack(path: &Path) -> Result<IfgramStack, NetworkError> {
    Err(NetworkError::Hdf5Disabled {
        path: path.to_path_buf(),
    })
}

#[cfg(feature = "hdf5")]
fn average_stack(path: &Path, mask_file: Option<&Path>) -> Result<CoherenceList, NetworkError> {
    log::info!("calculating spatial average coherence from {}", path.display());
    super::h5::spatial_average(path, mask_file)
}

#[cfg(not(feature = "hdf5"))]
fn average_stack(path: &Path, _mask_file: Option<&Path>) -> Result<CoherenceList, NetworkError> {
    Err(NetworkError::Hdf5Disabled {
        path: path.to_path_buf(),
    })
}
