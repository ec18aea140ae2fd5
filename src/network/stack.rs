/// In-memory view of a multi-group ifgram stack: one entry per pair with its
/// header baselines and drop flag.
use super::bperp::{invert_baselines, pair_baseline};
use super::drop::DropInfo;
use super::errors::NetworkError;

/// Stack file types that carry one group per pair.
pub const MULTI_GROUP_TYPES: [&str; 3] = ["interferograms", "coherence", "wrapped"];

/// File type whose datasets are coherence images.
pub const COHERENCE_TYPE: &str = "coherence";

/// Metadata of one pair in a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackPair {
    /// Group name inside the stack.
    pub name: String,
    /// Canonical date12.
    pub date12: String,
    /// `P_BASELINE_TOP_HDR`, meters.
    pub bperp_top: f64,
    /// `P_BASELINE_BOTTOM_HDR`, meters.
    pub bperp_bottom: f64,
    /// `drop_ifgram == "yes"`.
    pub dropped: bool,
}

/// A multi-group stack, pairs sorted by group name.
#[derive(Debug, Clone, PartialEq)]
pub struct IfgramStack {
    /// One of [`MULTI_GROUP_TYPES`].
    pub file_type: String,
    /// Pairs in group-name order.
    pub pairs: Vec<StackPair>,
}

/// Dates, baselines, pairs and drops derived from a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackNetwork {
    /// Sorted 8-digit acquisition dates.
    pub dates: Vec<String>,
    /// Baseline of each date relative to the first.
    pub bperp: Vec<f64>,
    /// All pairs in stack order.
    pub date12: Vec<String>,
    /// Dropped dates and pairs.
    pub drop: DropInfo,
}

impl IfgramStack {
    /// Reject file types that do not hold one group per pair.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::UnsupportedFileType`.
    pub fn check_file_type(file_type: &str) -> Result<(), NetworkError> {
        if MULTI_GROUP_TYPES.contains(&file_type) {
            Ok(())
        } else {
            Err(NetworkError::UnsupportedFileType {
                found: file_type.to_owned(),
                supported: MULTI_GROUP_TYPES.iter().map(|s| (*s).to_owned()).collect(),
            })
        }
    }

    /// Whether the stack holds coherence images.
    #[must_use]
    pub fn is_coherence(&self) -> bool {
        self.file_type == COHERENCE_TYPE
    }

    /// All pairs, in stack order.
    #[must_use]
    pub fn date12_list(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.date12.clone()).collect()
    }

    /// Pairs not marked as dropped.
    #[must_use]
    pub fn kept_date12(&self) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|p| !p.dropped)
            .map(|p| p.date12.clone())
            .collect()
    }

    /// Resolve acquisition baselines and drop sets.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidDate12` if a pair is malformed.
    pub fn network(&self) -> Result<StackNetwork, NetworkError> {
        let date12 = self.date12_list();
        let pair_bperp: Vec<f64> = self
            .pairs
            .iter()
            .map(|p| pair_baseline(p.bperp_top, p.bperp_bottom))
            .collect();
        let (dates, bperp) = invert_baselines(&date12, &pair_bperp)?;

        let kept = self.kept_date12();
        let drop = DropInfo::from_kept(&dates, &date12, &kept)?;
        log::info!("number of interferograms marked as dropped: {}", drop.date12.len());
        log::info!("number of interferograms marked as kept   : {}", kept.len());
        log::info!("number of acquisitions marked as dropped: {}", drop.dates.len());

        Ok(StackNetwork {
            dates,
            bperp,
            date12,
            drop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(date12: &str, bperp: f64, dropped: bool) -> StackPair {
        StackPair {
            name: format!("filt_{date12}-sim_HDR_4rlks_c10.unw"),
            date12: date12.to_owned(),
            bperp_top: bperp + 2.0,
            bperp_bottom: bperp - 2.0,
            dropped,
        }
    }

    fn stack() -> IfgramStack {
        IfgramStack {
            file_type: "interferograms".to_owned(),
            pairs: vec![
                pair("070106-070709", 100.0, false),
                pair("070106-070824", 150.0, true),
                pair("070709-070824", 50.0, false),
                pair("070824-071009", -20.0, true),
            ],
        }
    }

    #[test]
    fn test_check_file_type() {
        assert!(IfgramStack::check_file_type("coherence").is_ok());
        assert!(matches!(
            IfgramStack::check_file_type("timeseries"),
            Err(NetworkError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_network_from_stack() {
        let net = stack().network().unwrap();
        assert_eq!(
            net.dates,
            vec!["20070106", "20070709", "20070824", "20071009"]
        );
        assert!((net.bperp[1] - 100.0).abs() < 1e-9);
        assert!((net.bperp[3] - 130.0).abs() < 1e-9);
        assert_eq!(net.drop.date12, vec!["070106-070824", "070824-071009"]);
        assert_eq!(net.drop.dates, vec!["20071009"]);
    }

    #[test]
    fn test_kept_excludes_dropped() {
        assert_eq!(stack().kept_date12(), vec!["070106-070709", "070709-070824"]);
        assert!(!stack().is_coherence());
    }
}
