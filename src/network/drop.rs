/// Dropped acquisitions and pairs.
///
/// A stack marks each pair as kept or dropped. Dropped pairs are the set
/// difference of all pairs and kept pairs; dropped acquisitions are those no
/// longer referenced by any kept pair.
use std::collections::BTreeSet;

use super::date::split_date12;
use super::errors::NetworkError;

/// Acquisitions and pairs excluded from further processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropInfo {
    /// Dropped 8-digit acquisition dates, sorted.
    pub dates: Vec<String>,
    /// Dropped date12 identifiers, sorted.
    pub date12: Vec<String>,
}

impl DropInfo {
    /// Derive the dropped sets from the full lists and the kept pairs.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidDate12` if a kept pair is malformed.
    pub fn from_kept(
        dates: &[String],
        date12_list: &[String],
        kept_date12: &[String],
    ) -> Result<Self, NetworkError> {
        Ok(Self {
            dates: dropped_dates(dates, kept_date12)?,
            date12: dropped_date12(date12_list, kept_date12),
        })
    }

    /// Whether an acquisition was dropped.
    #[must_use]
    pub fn is_date_dropped(&self, date: &str) -> bool {
        self.dates.binary_search_by(|d| d.as_str().cmp(date)).is_ok()
    }

    /// Whether a pair was dropped.
    #[must_use]
    pub fn is_date12_dropped(&self, date12: &str) -> bool {
        self.date12.binary_search_by(|d| d.as_str().cmp(date12)).is_ok()
    }

    /// Whether nothing was dropped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.date12.is_empty()
    }
}

/// Pairs in `all` that are not in `kept`, sorted.
#[must_use]
pub fn dropped_date12(all: &[String], kept: &[String]) -> Vec<String> {
    let kept: BTreeSet<&str> = kept.iter().map(String::as_str).collect();
    let dropped: BTreeSet<&str> = all
        .iter()
        .map(String::as_str)
        .filter(|d| !kept.contains(d))
        .collect();
    dropped.into_iter().map(str::to_owned).collect()
}

/// Dates not used by any kept pair, sorted.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` if a kept pair is malformed.
pub fn dropped_dates(dates: &[String], kept_date12: &[String]) -> Result<Vec<String>, NetworkError> {
    let mut used = BTreeSet::new();
    for date12 in kept_date12 {
        let (d1, d2) = split_date12(date12)?;
        used.insert(d1);
        used.insert(d2);
    }
    let dropped: BTreeSet<&String> = dates.iter().filter(|d| !used.contains(*d)).collect();
    Ok(dropped.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_dropped_date12_is_sorted_difference() {
        let all = strings(&["070824-071009", "070709-101017", "070709-100901"]);
        let kept = strings(&["070709-100901"]);
        assert_eq!(
            dropped_date12(&all, &kept),
            strings(&["070709-101017", "070824-071009"])
        );
    }

    #[test]
    fn test_nothing_dropped_when_all_kept() {
        let all = strings(&["070709-100901", "070824-071009"]);
        assert!(dropped_date12(&all, &all).is_empty());
    }

    #[test]
    fn test_dropped_dates_unreferenced_by_kept_pairs() {
        let dates = strings(&["20070709", "20070824", "20071009", "20100901"]);
        let kept = strings(&["070709-100901"]);
        assert_eq!(
            dropped_dates(&dates, &kept).unwrap(),
            strings(&["20070824", "20071009"])
        );
    }

    #[test]
    fn test_drop_info_lookup() {
        let dates = strings(&["20070709", "20070824", "20071009", "20100901"]);
        let all = strings(&["070709-100901", "070824-071009"]);
        let kept = strings(&["070709-100901"]);
        let info = DropInfo::from_kept(&dates, &all, &kept).unwrap();
        assert!(info.is_date12_dropped("070824-071009"));
        assert!(!info.is_date12_dropped("070709-100901"));
        assert!(info.is_date_dropped("20071009"));
        assert!(!info.is_date_dropped("20100901"));
        assert!(!info.is_empty());
    }
}
