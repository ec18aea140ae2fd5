/// Axis ranges and ticks shared by the figures.
use std::ops::Range;

/// Fraction of the data span added on each side of an axis.
const PAD_RATIO: f64 = 0.1;

/// Time axis range in decimal years: data span padded by 10 %, at least
/// 0.1 year on each side.
#[must_use]
pub fn date_axis_range(years: &[f64]) -> Range<f64> {
    let (lo, hi) = finite_bounds(years).unwrap_or((2000.0, 2001.0));
    let pad = ((hi - lo) * PAD_RATIO).max(0.1);
    (lo - pad)..(hi + pad)
}

/// Value axis range: data span padded by 10 %, at least 1 unit on each side.
#[must_use]
pub fn value_axis_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = finite_bounds(values).unwrap_or((0.0, 1.0));
    let pad = ((hi - lo) * PAD_RATIO).max(1.0);
    (lo - pad)..(hi + pad)
}

/// Whole-year tick positions inside `range`, every `every_year` years.
#[must_use]
pub fn year_ticks(range: &Range<f64>, every_year: u32) -> Vec<f64> {
    let step = every_year.max(1) as usize;
    let first = range.start.ceil() as i32;
    let last = range.end.floor() as i32;
    (first..=last).step_by(step).map(f64::from).collect()
}

/// Number of time-axis labels to request for `range`.
#[must_use]
pub fn year_label_count(range: &Range<f64>, every_year: u32) -> usize {
    year_ticks(range, every_year).len().max(2)
}

/// Time-axis label: whole years without decimals.
#[must_use]
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn format_year(year: &f64) -> String {
    if (year - year.round()).abs() < 1e-6 {
        format!("{year:.0}")
    } else {
        format!("{year:.1}")
    }
}

fn finite_bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_date_axis_pads_span() {
        let r = date_axis_range(&[2007.0, 2011.0]);
        assert_relative_eq!(r.start, 2006.6);
        assert_relative_eq!(r.end, 2011.4);
    }

    #[test]
    fn test_single_date_gets_minimum_pad() {
        let r = date_axis_range(&[2007.5]);
        assert_relative_eq!(r.end - r.start, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_value_axis_ignores_nan() {
        let r = value_axis_range(&[f64::NAN, -100.0, 100.0]);
        assert_relative_eq!(r.start, -120.0);
        assert_relative_eq!(r.end, 120.0);
    }

    #[test]
    fn test_year_ticks() {
        assert_eq!(year_ticks(&(2006.6..2011.4), 1), vec![2007.0, 2008.0, 2009.0, 2010.0, 2011.0]);
        assert_eq!(year_ticks(&(2006.6..2011.4), 2), vec![2007.0, 2009.0, 2011.0]);
        assert_eq!(year_ticks(&(2006.6..2011.4), 0).len(), 5);
        assert_eq!(year_label_count(&(2006.6..2011.4), 2), 3);
        assert_eq!(year_label_count(&(2007.4..2007.6), 1), 2);
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(&2007.0), "2007");
        assert_eq!(format_year(&2007.5), "2007.5");
    }
}
