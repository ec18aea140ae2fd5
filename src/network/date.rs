/// Acquisition dates and `date12` pair identifiers.
///
/// Acquisition dates are carried as 8-digit `YYYYMMDD` strings. Pair
/// identifiers are canonicalized to `YYMMDD-YYMMDD` so that lists read from
/// different sources compare equal by string.
use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::errors::NetworkError;

/// Separator used in canonical date12 strings.
pub const DATE12_SEP: char = '-';

/// Two-digit years below this pivot are 20xx, the rest 19xx.
const CENTURY_PIVOT: u32 = 50;

/// A date pair embedded in a file or group name, e.g.
/// `filt_100901-101017-sim_HDR_4rlks_c10.unw`.
#[cfg_attr(not(feature = "hdf5"), allow(dead_code))]
static DATE12_IN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{6}|\d{8})[-_](\d{6}|\d{8})(?:\D|$)").expect("static regex")
});

/// Widen a 6- or 8-digit date to a validated 8-digit `YYYYMMDD` string.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate` for anything that is not a real
/// calendar date in one of those two forms.
pub fn widen_date(s: &str) -> Result<String, NetworkError> {
    let s = s.trim();
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(NetworkError::InvalidDate(s.to_owned()));
    }
    let date8 = match s.len() {
        8 => s.to_owned(),
        6 => {
            let yy: u32 = s[..2]
                .parse()
                .map_err(|_| NetworkError::InvalidDate(s.to_owned()))?;
            let century = if yy < CENTURY_PIVOT { "20" } else { "19" };
            format!("{century}{s}")
        }
        _ => return Err(NetworkError::InvalidDate(s.to_owned())),
    };
    parse_date(&date8)?;
    Ok(date8)
}

/// Parse an 8-digit date into a `NaiveDate`.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate` if the string is not `YYYYMMDD`.
pub fn parse_date(date8: &str) -> Result<NaiveDate, NetworkError> {
    NaiveDate::parse_from_str(date8, "%Y%m%d").map_err(|_| NetworkError::InvalidDate(date8.to_owned()))
}

/// Normalize a pair identifier to canonical `YYMMDD-YYMMDD` form.
///
/// Accepts `-` or `_` as separator and 6- or 8-digit endpoints.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` if the string does not hold two
/// valid dates.
pub fn normalize_date12(s: &str) -> Result<String, NetworkError> {
    let (d1, d2) = split_date12(s)?;
    Ok(format!("{}{DATE12_SEP}{}", &d1[2..], &d2[2..]))
}

/// Split a pair identifier into its two 8-digit endpoint dates.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` on malformed input.
pub fn split_date12(s: &str) -> Result<(String, String), NetworkError> {
    let s = s.trim();
    let invalid = || NetworkError::InvalidDate12(s.to_owned());
    let (a, b) = s
        .split_once(DATE12_SEP)
        .or_else(|| s.split_once('_'))
        .ok_or_else(invalid)?;
    let d1 = widen_date(a).map_err(|_| invalid())?;
    let d2 = widen_date(b).map_err(|_| invalid())?;
    Ok((d1, d2))
}

/// Extract and normalize the date12 embedded in an interferogram name.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` if the name holds no date pair.
#[cfg_attr(not(feature = "hdf5"), allow(dead_code))]
pub fn date12_from_name(name: &str) -> Result<String, NetworkError> {
    let caps = DATE12_IN_NAME
        .captures(name)
        .ok_or_else(|| NetworkError::InvalidDate12(name.to_owned()))?;
    normalize_date12(&format!("{}-{}", &caps[1], &caps[2]))
        .map_err(|_| NetworkError::InvalidDate12(name.to_owned()))
}

/// Fractional year of an 8-digit date, used as the time axis of the plots.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate` on malformed input.
pub fn decimal_year(date8: &str) -> Result<f64, NetworkError> {
    let date = parse_date(date8)?;
    let days_in_year = NaiveDate::from_ymd_opt(date.year(), 12, 31).map_or(365, |d| d.ordinal());
    Ok(f64::from(date.year()) + f64::from(date.ordinal0()) / f64::from(days_in_year))
}

/// Days between the two acquisitions of a pair.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` on malformed input.
pub fn temporal_baseline_days(date12: &str) -> Result<i64, NetworkError> {
    let (d1, d2) = split_date12(date12)?;
    Ok((parse_date(&d2)? - parse_date(&d1)?).num_days())
}

/// Sorted unique 8-digit acquisition dates referenced by a pair list.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` if any pair is malformed.
pub fn date_list_from_date12(date12_list: &[String]) -> Result<Vec<String>, NetworkError> {
    let mut dates = BTreeSet::new();
    for date12 in date12_list {
        let (d1, d2) = split_date12(date12)?;
        dates.insert(d1);
        dates.insert(d2);
    }
    Ok(dates.into_iter().collect())
}
