/// Coherence lists and their alignment with a pair list.
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use ndarray::ArrayView2;

use super::date::normalize_date12;
use super::errors::NetworkError;

/// Suffix of spatial-average text files.
pub const SPATIAL_AVERAGE_SUFFIX: &str = "_spatialAverage.txt";

/// Coherence values keyed by pair, positionally aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoherenceList {
    /// Canonical date12 identifiers.
    pub date12: Vec<String>,
    /// Spatially averaged coherence of each pair (may be NaN).
    pub values: Vec<f64>,
}

/// Why coherence coloring was turned off.
#[derive(Debug, Clone, PartialEq)]
pub enum DisabledReason {
    /// Every coherence value is NaN.
    AllNan,
    /// The coherence source does not cover every target pair.
    Incomplete {
        /// Target pairs absent from the coherence source.
        missing: Vec<String>,
    },
}

/// Outcome of matching a coherence source against the target pair list.
#[derive(Debug, Clone, PartialEq)]
pub enum CoherenceAlignment {
    /// Coherence values in target order.
    Aligned(Vec<f64>),
    /// Coherence is unusable for this network.
    Disabled(DisabledReason),
}

impl CoherenceAlignment {
    /// The aligned values, if any.
    #[must_use]
    pub fn values(self) -> Option<Vec<f64>> {
        match self {
            Self::Aligned(values) => Some(values),
            Self::Disabled(_) => None,
        }
    }
}

/// Reorder `source` to match `target`.
///
/// Coherence is disabled when all source values are NaN, or when the source
/// pair set is not a superset of the target pair set. Otherwise each target
/// pair takes the value of its first occurrence in the source.
#[must_use]
pub fn align_coherence(target: &[String], source: &CoherenceList) -> CoherenceAlignment {
    if source.values.iter().all(|v| v.is_nan()) {
        return CoherenceAlignment::Disabled(DisabledReason::AllNan);
    }

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(source.date12.len());
    for (i, d) in source.date12.iter().enumerate() {
        index.entry(d.as_str()).or_insert(i);
    }

    let missing: Vec<String> = target
        .iter()
        .filter(|d| !index.contains_key(d.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return CoherenceAlignment::Disabled(DisabledReason::Incomplete { missing });
    }

    CoherenceAlignment::Aligned(
        target
            .iter()
            .map(|d| source.values[index[d.as_str()]])
            .collect(),
    )
}

/// Mean of the finite values of a 2-D coherence image, restricted to
/// `mask` when given. NaN when no pixel qualifies.
#[must_use]
pub fn nan_mean(data: ArrayView2<'_, f32>, mask: Option<ArrayView2<'_, bool>>) -> f64 {
    let mut sum = 0.0_f64;
    let mut count = 0_usize;
    let mut accumulate = |v: f32| {
        if v.is_finite() {
            sum += f64::from(v);
            count += 1;
        }
    };
    match mask {
        Some(mask) if mask.dim() == data.dim() => {
            for (v, keep) in data.iter().zip(mask.iter()) {
                if *keep {
                    accumulate(*v);
                }
            }
        }
        Some(mask) => {
            log::warn!(
                "mask shape {:?} does not match data shape {:?}, ignoring mask",
                mask.dim(),
                data.dim()
            );
            data.iter().copied().for_each(&mut accumulate);
        }
        None => data.iter().copied().for_each(&mut accumulate),
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// A spatial-average text file together with the mask it was computed with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialAverageFile {
    /// Value of the `# Mask file:` header; `None` when absent or `None`.
    pub mask_file: Option<String>,
    /// The averaged coherence list.
    pub list: CoherenceList,
}

/// Cache path of the spatial average of `coherence_file`: the file stem plus
/// `_spatialAverage.txt`, in the working directory.
#[must_use]
pub fn spatial_average_path(coherence_file: &Path) -> PathBuf {
    let stem = coherence_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}{SPATIAL_AVERAGE_SUFFIX}"))
}

/// Whether `path` is a spatial-average text file rather than a stack.
#[must_use]
pub fn is_spatial_average_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Read a spatial-average text file (`date12  mean` rows, `#` headers).
///
/// # Errors
///
/// Returns `NetworkError::Io` if unreadable, `NetworkError::Parse` for a bad
/// row.
pub fn read_spatial_average_file(path: &Path) -> Result<SpatialAverageFile, NetworkError> {
    let text = std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
    let mut out = SpatialAverageFile::default();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('#') {
            if let Some(mask) = header.trim().strip_prefix("Mask file:") {
                let mask = mask.trim();
                out.mask_file = (mask != "None" && !mask.is_empty()).then(|| mask.to_owned());
            }
            continue;
        }

        let parse_err = |message: String| NetworkError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            message,
        };
        let mut cols = line.split_whitespace();
        let (Some(date12), Some(value)) = (cols.next(), cols.next()) else {
            return Err(parse_err("expected date12 and mean columns".to_owned()));
        };
        let date12 = normalize_date12(date12).map_err(|e| parse_err(e.to_string()))?;
        let value: f64 = value
            .parse()
            .map_err(|_| parse_err(format!("invalid coherence '{value}'")))?;
        out.list.date12.push(date12);
        out.list.values.push(value);
    }
    Ok(out)
}

/// Write a spatial-average text file with its mask/AOI header.
///
/// # Errors
///
/// Returns `NetworkError::Io` if the file cannot be written.
pub fn write_spatial_average_file(
    path: &Path,
    list: &CoherenceList,
    mask_file: Option<&Path>,
) -> Result<(), NetworkError> {
    let mask = mask_file.map_or_else(|| "None".to_owned(), |m| m.display().to_string());
    let mut text = String::new();
    let _ = writeln!(text, "# Mask file: {mask}");
    let _ = writeln!(text, "# AOI box: None");
    let _ = writeln!(text, "# Epoch    Mean");
    for (date12, value) in list.date12.iter().zip(&list.values) {
        let _ = writeln!(text, "{date12}    {value:.4}");
    }
    std::fs::write(path, text).map_err(|e| NetworkError::io(path, e))
}
