/// Baseline list text files (`bl_list.txt`).
///
/// One acquisition per line, whitespace separated:
///
/// ```text
/// 070106     0.0   0.03  0.0000000  0.00000000000 2155.2 /scratch/SLC/070106/
/// 070709  2631.9   0.07  0.0000000  0.00000000000 2155.2 /scratch/SLC/070709/
/// ```
///
/// Only the first two columns (date, perpendicular baseline in meters) are
/// used; trailing Doppler/PRF/SLC columns are tolerated and ignored.
use std::path::Path;

use super::date::widen_date;
use super::errors::NetworkError;

/// Acquisition dates and their perpendicular baselines, positionally aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineList {
    /// 8-digit acquisition dates in file order.
    pub dates: Vec<String>,
    /// Perpendicular baseline of each date, in meters.
    pub bperp: Vec<f64>,
}

impl BaselineList {
    /// Baselines for `dates`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::MissingBaseline` for the first date not in the list.
    pub fn lookup(&self, dates: &[String]) -> Result<Vec<f64>, NetworkError> {
        dates
            .iter()
            .map(|date| {
                self.dates
                    .iter()
                    .position(|d| d == date)
                    .map(|i| self.bperp[i])
                    .ok_or_else(|| NetworkError::MissingBaseline { date: date.clone() })
            })
            .collect()
    }

    /// Number of acquisitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the list holds no acquisitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Read a baseline list file.
///
/// # Errors
///
/// Returns `NetworkError::Io` if the file cannot be read, or
/// `NetworkError::Parse` for a line with a bad date or baseline.
pub fn read_baseline_file(path: &Path) -> Result<BaselineList, NetworkError> {
    let text = std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
    parse_baseline_list(&text, path)
}

fn parse_baseline_list(text: &str, path: &Path) -> Result<BaselineList, NetworkError> {
    let mut list = BaselineList::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_err = |message: String| NetworkError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            message,
        };

        let mut cols = line.split_whitespace();
        let (Some(date), Some(bperp)) = (cols.next(), cols.next()) else {
            return Err(parse_err("expected at least date and baseline columns".to_owned()));
        };
        let date = widen_date(date).map_err(|e| parse_err(e.to_string()))?;
        let bperp: f64 = bperp
            .parse()
            .map_err(|_| parse_err(format!("invalid baseline '{bperp}'")))?;

        if list.dates.contains(&date) {
            log::warn!("duplicate acquisition {date} in {}, keeping first", path.display());
            continue;
        }
        list.dates.push(date);
        list.bperp.push(bperp);
    }
    Ok(list)
}
