//! Trailing-window rank and correlation.
//!
//! Outputs are aligned with their inputs. A position holds `None` until a
//! full window is available; there is no partial-window fallback.

use crate::error::{check_window, FactorError, Result};
use crate::stats;

/// Rolling ordinal rank of the newest value within each trailing window.
///
/// Position `i >= window - 1` holds the 1-based rank of `values[i]` among
/// `values[i + 1 - window..=i]`. Ties are broken by order of appearance, so
/// the newest value ranks above every earlier value equal to it. A NaN
/// newest value gives `None`; NaN values elsewhere in the window are left
/// out of the ranking.
pub fn rolling_rank(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    check_window(window)?;

    let mut out = vec![None; values.len()];
    if window > values.len() {
        return Ok(out);
    }

    for i in (window - 1)..values.len() {
        let current = values[i];
        if current.is_nan() {
            continue;
        }
        let earlier = &values[i + 1 - window..i];
        let below = earlier.iter().filter(|v| !v.is_nan() && **v <= current).count();
        out[i] = Some((below + 1) as f64);
    }

    Ok(out)
}

/// Rolling Pearson correlation over trailing windows of two aligned series.
///
/// A window containing any absent value, or in which either side is
/// constant, yields `None`.
pub fn rolling_corr(x: &[Option<f64>], y: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>> {
    check_window(window)?;
    if x.len() != y.len() {
        return Err(FactorError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let mut out = vec![None; x.len()];
    if window > x.len() {
        return Ok(out);
    }

    let mut xs = Vec::with_capacity(window);
    let mut ys = Vec::with_capacity(window);
    for end in (window - 1)..x.len() {
        xs.clear();
        ys.clear();
        let start = end + 1 - window;
        let complete = x[start..=end]
            .iter()
            .zip(&y[start..=end])
            .all(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => {
                    xs.push(*a);
                    ys.push(*b);
                    true
                }
                _ => false,
            });

        if complete {
            out[end] = stats::pearson(&xs, &ys);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_rank_basic() {
        let ranks = rolling_rank(&[3.0, 1.0, 2.0, 5.0, 4.0], 3).unwrap();
        assert_eq!(ranks, vec![None, None, Some(2.0), Some(3.0), Some(2.0)]);
    }

    #[test]
    fn test_rank_ties_first_occurrence() {
        // Newest equal value ranks above the earlier ones.
        let ranks = rolling_rank(&[5.0, 5.0, 5.0], 3).unwrap();
        assert_eq!(ranks[2], Some(3.0));

        let ranks = rolling_rank(&[1.0, 5.0, 5.0, 2.0], 4).unwrap();
        assert_eq!(ranks[3], Some(2.0));

        let ranks = rolling_rank(&[5.0, 1.0, 5.0], 3).unwrap();
        assert_eq!(ranks[2], Some(3.0));
    }

    #[test]
    fn test_rank_window_one() {
        let ranks = rolling_rank(&[9.0, 1.0, 4.0], 1).unwrap();
        assert_eq!(ranks, vec![Some(1.0); 3]);
    }

    #[test]
    fn test_rank_window_longer_than_series() {
        let ranks = rolling_rank(&[1.0, 2.0], 3).unwrap();
        assert_eq!(ranks, vec![None, None]);
    }

    #[test]
    fn test_rank_zero_window() {
        assert!(matches!(rolling_rank(&[1.0], 0), Err(FactorError::InvalidWindow(0))));
    }

    #[test]
    fn test_rank_nan_handling() {
        let ranks = rolling_rank(&[2.0, f64::NAN, 1.0, f64::NAN], 3).unwrap();
        assert_eq!(ranks[2], Some(1.0));
        assert_eq!(ranks[3], None);
    }

    #[test]
    fn test_corr_perfect() {
        let x = some(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = some(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        let z = some(&[5.0, 4.0, 3.0, 2.0, 1.0]);

        let up = rolling_corr(&x, &y, 3).unwrap();
        assert_eq!(up[..2], [None, None]);
        assert!(up[2..].iter().all(|c| (c.unwrap() - 1.0).abs() < 1e-12));

        let down = rolling_corr(&x, &z, 3).unwrap();
        assert!(down[2..].iter().all(|c| (c.unwrap() + 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_corr_requires_full_window() {
        let x = vec![None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let y = some(&[1.0, 2.0, 3.0, 4.0, 6.0]);
        let out = rolling_corr(&x, &y, 3).unwrap();
        assert_eq!(out[2], None);
        assert!(out[3].is_some());
        assert!(out[4].is_some());
    }

    #[test]
    fn test_corr_constant_window_is_none() {
        let x = some(&[1.0, 1.0, 1.0, 2.0]);
        let y = some(&[1.0, 2.0, 3.0, 4.0]);
        let out = rolling_corr(&x, &y, 3).unwrap();
        assert_eq!(out[2], None);
        assert!(out[3].is_some());
    }

    #[test]
    fn test_corr_length_mismatch() {
        let err = rolling_corr(&some(&[1.0]), &some(&[1.0, 2.0]), 1).unwrap_err();
        assert!(matches!(err, FactorError::LengthMismatch { left: 1, right: 2 }));
    }

    /// Reference rank: sort (value, position) pairs and locate the newest.
    fn reference_rank(window: &[f64]) -> usize {
        let last = window.len() - 1;
        let mut idx: Vec<usize> = (0..window.len()).collect();
        idx.sort_by(|&a, &b| window[a].total_cmp(&window[b]).then(a.cmp(&b)));
        idx.iter().position(|&i| i == last).unwrap() + 1
    }

    proptest! {
        #[test]
        fn prop_rank_matches_stable_sort(
            values in prop::collection::vec(0i32..8, 1..40),
            window in 1usize..12,
        ) {
            let values: Vec<f64> = values.into_iter().map(f64::from).collect();
            let ranks = rolling_rank(&values, window).unwrap();
            prop_assert_eq!(ranks.len(), values.len());
            for (i, rank) in ranks.iter().enumerate() {
                if i + 1 < window {
                    prop_assert!(rank.is_none());
                } else {
                    let r = rank.unwrap();
                    prop_assert!(r >= 1.0 && r <= window as f64);
                    prop_assert_eq!(r as usize, reference_rank(&values[i + 1 - window..=i]));
                }
            }
        }

        #[test]
        fn prop_corr_bounded(
            pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 2..60),
            window in 2usize..15,
        ) {
            let x: Vec<Option<f64>> = pairs.iter().map(|p| Some(p.0)).collect();
            let y: Vec<Option<f64>> = pairs.iter().map(|p| Some(p.1)).collect();
            for c in rolling_corr(&x, &y, window).unwrap().into_iter().flatten() {
                prop_assert!((-1.0..=1.0).contains(&c));
            }
        }
    }
}
