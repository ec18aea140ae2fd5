/// Per-acquisition perpendicular baselines from per-pair baselines.
///
/// Each pair baseline is modelled as `bperp[slave] - bperp[master]`, with the
/// first acquisition as reference (`bperp = 0`). The system is solved in the
/// least-squares sense through its normal equations; free unknowns of a
/// disconnected network are pinned to 0.
use ndarray::{Array1, Array2};

use super::date::{date_list_from_date12, split_date12};
use super::errors::NetworkError;

/// Pivots smaller than this are treated as zero.
const PIVOT_EPS: f64 = 1e-10;

/// Baseline of one pair from the top and bottom header baselines.
#[must_use]
pub fn pair_baseline(top: f64, bottom: f64) -> f64 {
    (top + bottom) / 2.0
}

/// Invert pair baselines into acquisition baselines.
///
/// Returns the sorted 8-digit acquisition dates referenced by `date12_list`
/// and their baselines relative to the first date.
///
/// # Errors
///
/// Returns `NetworkError::InvalidDate12` for a malformed pair.
pub fn invert_baselines(
    date12_list: &[String],
    pair_bperp: &[f64],
) -> Result<(Vec<String>, Vec<f64>), NetworkError> {
    let dates = date_list_from_date12(date12_list)?;
    if dates.len() < 2 {
        return Ok((dates.clone(), vec![0.0; dates.len()]));
    }

    // Unknowns exclude the reference date at index 0.
    let size = dates.len() - 1;
    let mut normal = Array2::<f64>::zeros((size, size));
    let mut rhs = Array1::<f64>::zeros(size);

    for (date12, &b) in date12_list.iter().zip(pair_bperp) {
        let (d1, d2) = split_date12(date12)?;
        // Both dates come from the same list, so the lookups cannot miss.
        let m = dates.binary_search(&d1).unwrap_or_default();
        let s = dates.binary_search(&d2).unwrap_or_default();
        // Row of the design matrix: -1 at master, +1 at slave.
        let row = [(m, -1.0), (s, 1.0)];
        for &(i, ci) in &row {
            if i == 0 {
                continue;
            }
            rhs[i - 1] += ci * b;
            for &(j, cj) in &row {
                if j != 0 {
                    normal[[i - 1, j - 1]] += ci * cj;
                }
            }
        }
    }

    let x = solve_reduced(normal, rhs);
    let mut bperp = Vec::with_capacity(dates.len());
    bperp.push(0.0);
    bperp.extend(x.iter().copied());
    Ok((dates, bperp))
}

/// Gauss-Jordan elimination with partial pivoting. Columns without a pivot
/// are free and set to 0.
fn solve_reduced(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let size = b.len();
    let mut pivot_row = vec![None; size];
    let mut row = 0;

    for col in 0..size {
        if row == size {
            break;
        }
        let (best, best_abs) = (row..size)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((row, 0.0), |acc, cand| if cand.1 > acc.1 { cand } else { acc });
        if best_abs < PIVOT_EPS {
            continue;
        }
        if best != row {
            for k in 0..size {
                a.swap([best, k], [row, k]);
            }
            b.swap(best, row);
        }

        let p = a[[row, col]];
        for k in 0..size {
            a[[row, k]] /= p;
        }
        b[row] /= p;

        for r in 0..size {
            if r == row {
                continue;
            }
            let f = a[[r, col]];
            if f == 0.0 {
                continue;
            }
            for k in 0..size {
                a[[r, k]] -= f * a[[row, k]];
            }
            b[r] -= f * b[row];
        }

        pivot_row[col] = Some(row);
        row += 1;
    }

    pivot_row
        .iter()
        .map(|p| p.map_or(0.0, |r| b[r]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_consistent_network() {
        let pairs = strings(&["070106-070709", "070709-070824", "070106-070824"]);
        let (dates, bperp) = invert_baselines(&pairs, &[100.0, 50.0, 150.0]).unwrap();
        assert_eq!(dates, vec!["20070106", "20070709", "20070824"]);
        assert_abs_diff_eq!(bperp[0], 0.0);
        assert_abs_diff_eq!(bperp[1], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bperp[2], 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_least_squares_on_inconsistent_loop() {
        // Loop misclosure of 30 m is spread evenly over the three pairs.
        let pairs = strings(&["070106-070709", "070709-070824", "070106-070824"]);
        let (_, bperp) = invert_baselines(&pairs, &[100.0, 50.0, 180.0]).unwrap();
        assert_abs_diff_eq!(bperp[1], 110.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bperp[2], 170.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disconnected_network_pins_free_unknowns() {
        let pairs = strings(&["070106-070709", "070824-071009"]);
        let (dates, bperp) = invert_baselines(&pairs, &[100.0, 30.0]).unwrap();
        assert_eq!(dates.len(), 4);
        assert_abs_diff_eq!(bperp[1], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bperp[3] - bperp[2], 30.0, epsilon = 1e-9);
        assert!(bperp.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn test_pair_baseline_is_mean() {
        assert_abs_diff_eq!(pair_baseline(120.0, 80.0), 100.0);
    }
}
