/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout, either as JSON or rendered
/// as a table. They are decoupled from the internal `LoadedNetwork` type.
use serde::{Deserialize, Serialize};

use crate::network::{LoadedNetwork, NetworkError};
use crate::network::date::{split_date12, temporal_baseline_days};

/// One acquisition of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionOutput {
    /// 8-digit acquisition date.
    pub date: String,
    /// Perpendicular baseline, meters.
    pub bperp: f64,
    /// Number of pairs touching this acquisition.
    pub pairs: usize,
    /// Whether no kept pair touches this acquisition.
    pub dropped: bool,
}

/// One pair of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairOutput {
    /// Pair identifier, `YYMMDD-YYMMDD`.
    pub date12: String,
    /// Master acquisition date.
    pub date1: String,
    /// Slave acquisition date.
    pub date2: String,
    /// Temporal baseline, days.
    pub temporal_baseline: i64,
    /// Perpendicular baseline (slave minus master), meters.
    pub bperp: f64,
    /// Average spatial coherence, or null when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherence: Option<f64>,
    /// Whether the pair is marked as dropped.
    pub dropped: bool,
}

/// A figure written by `plot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureOutput {
    /// Figure name, e.g. `Network`.
    pub figure: String,
    /// Path of the saved file.
    pub path: String,
}

/// Summary of a `plot` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOutput {
    /// Number of acquisitions.
    pub acquisitions: usize,
    /// Number of pairs.
    pub pairs: usize,
    /// Number of dropped pairs.
    pub dropped_pairs: usize,
    /// Whether pairs were colored by coherence.
    pub coherence: bool,
    /// Figures written, in rendering order.
    pub figures: Vec<FigureOutput>,
    /// Saved date12 list, when `--list` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date12_list: Option<String>,
}

impl AcquisitionOutput {
    /// One row per acquisition of `network`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if a pair identifier is malformed.
    pub fn from_network(network: &LoadedNetwork) -> Result<Vec<Self>, NetworkError> {
        let mut counts = vec![0_usize; network.dates.len()];
        for pair in &network.date12 {
            let (i, j) = network.pair_indices(pair)?;
            counts[i] += 1;
            counts[j] += 1;
        }
        Ok(network
            .dates
            .iter()
            .zip(&network.bperp)
            .zip(counts)
            .map(|((date, &bperp), pairs)| Self {
                date: date.clone(),
                bperp,
                pairs,
                dropped: network.drop.is_date_dropped(date),
            })
            .collect())
    }
}

impl PairOutput {
    /// One row per pair of `network`, in input order.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if a pair identifier is malformed or references
    /// an unknown acquisition.
    pub fn from_network(network: &LoadedNetwork) -> Result<Vec<Self>, NetworkError> {
        network
            .date12
            .iter()
            .enumerate()
            .map(|(k, pair)| {
                let (i, j) = network.pair_indices(pair)?;
                let (date1, date2) = split_date12(pair)?;
                Ok(Self {
                    date12: pair.clone(),
                    date1,
                    date2,
                    temporal_baseline: temporal_baseline_days(pair)?,
                    bperp: network.bperp[j] - network.bperp[i],
                    coherence: network.coherence.as_ref().map(|c| c[k]),
                    dropped: network.drop.is_date12_dropped(pair),
                })
            })
            .collect()
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `NetworkError`.
    #[must_use]
    pub fn from_network_error(err: &NetworkError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::drop::DropInfo;

    fn network() -> LoadedNetwork {
        let dates: Vec<String> = vec!["20070106".into(), "20070709".into(), "20070824".into()];
        let date12: Vec<String> = vec!["070106-070709".into(), "070709-070824".into()];
        let drop = DropInfo::from_kept(&dates, &date12, &date12[..1]).unwrap();
        LoadedNetwork {
            dates,
            bperp: vec![0.0, 100.0, 150.0],
            date12,
            drop,
            coherence: Some(vec![0.8, 0.3]),
        }
    }

    #[test]
    fn test_acquisition_rows() {
        let rows = AcquisitionOutput::from_network(&network()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].pairs, 2);
        assert!(!rows[0].dropped);
        assert!(rows[2].dropped);
    }

    #[test]
    fn test_pair_rows() {
        let rows = PairOutput::from_network(&network()).unwrap();
        assert_eq!(rows[0].date1, "20070106");
        assert_eq!(rows[0].date2, "20070709");
        assert_eq!(rows[0].temporal_baseline, 184);
        assert!((rows[1].bperp - 50.0).abs() < 1e-9);
        assert_eq!(rows[1].coherence, Some(0.3));
        assert!(!rows[0].dropped);
        assert!(rows[1].dropped);
    }

    #[test]
    fn test_error_envelope() {
        let err = NetworkError::InvalidDate("2007".into());
        let out = ErrorOutput::from_network_error(&err);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], err.code());
        assert!(json["error"]["message"].as_str().unwrap().contains("2007"));
    }
}
