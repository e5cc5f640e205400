//! IC statistics over aligned factor / forward-return observations.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use zero_common::config::FactorConfig;

use super::AlignedObservation;
use crate::stats;

/// Rank IC of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIc {
    pub year: i32,
    pub month: u32,
    /// Paired observations in the month
    pub observations: usize,
    /// Spearman correlation of factor and forward return
    pub ic: f64,
}

impl MonthlyIc {
    /// `YYYY-MM` label
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Aggregate statistics over a sequence of monthly ICs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IcSummary {
    pub ic_mean: Option<f64>,
    pub ic_std: Option<f64>,
    pub ic_ir: Option<f64>,
    pub t_stat: Option<f64>,
    pub p_value: Option<f64>,
}

impl IcSummary {
    /// Summarise monthly ICs.
    ///
    /// With fewer than `min_months` values the mean falls back to
    /// `fallback_mean` (the whole-sample rank IC) and the dispersion and
    /// significance fields stay `None`.
    pub fn from_monthly(ics: &[f64], min_months: usize, fallback_mean: Option<f64>) -> Self {
        if ics.len() < min_months.max(2) {
            return Self {
                ic_mean: fallback_mean,
                ..Self::default()
            };
        }

        let mean = stats::mean(ics);
        let std = stats::sample_std(ics);
        let ir = match (mean, std) {
            (Some(m), Some(s)) if s != 0.0 => Some(m / s),
            _ => None,
        };
        let test = match (mean, std) {
            (Some(m), Some(s)) => t_test(m, s, ics.len()),
            _ => None,
        };

        Self {
            ic_mean: mean,
            ic_std: std,
            ic_ir: ir,
            t_stat: test.map(|(t, _)| t),
            p_value: test.map(|(_, p)| p),
        }
    }
}

/// One-sample t-test of a mean against zero.
///
/// Returns `(t, p)` where `t = mean / (std / sqrt(n))` and `p` is the
/// two-tailed p-value of Student's t with `n - 1` degrees of freedom.
/// `None` when `n < 2` or `std` is zero or not finite.
pub fn t_test(mean: f64, std: f64, n: usize) -> Option<(f64, f64)> {
    if n < 2 || std == 0.0 || !std.is_finite() || !mean.is_finite() {
        return None;
    }

    let t = mean / (std / (n as f64).sqrt());
    let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64).ok()?;
    let p = (2.0 * dist.cdf(-t.abs())).min(1.0);

    Some((t, p))
}

/// Full IC evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcStatistics {
    /// Aligned observations used
    pub observations: usize,
    /// Whole-sample Spearman IC
    pub rank_ic: Option<f64>,
    /// Whole-sample Pearson IC
    pub pearson_ic: Option<f64>,
    /// Monthly rank ICs in calendar order (undefined months dropped)
    pub monthly: Vec<MonthlyIc>,
    /// Aggregate of the monthly ICs
    pub summary: IcSummary,
}

/// Evaluates IC statistics with fixed sample thresholds.
#[derive(Debug, Clone, Copy)]
pub struct IcEvaluator {
    min_samples: usize,
    min_months: usize,
}

impl Default for IcEvaluator {
    fn default() -> Self {
        Self {
            min_samples: 3,
            min_months: 2,
        }
    }
}

impl IcEvaluator {
    pub fn new(min_samples: usize, min_months: usize) -> Self {
        Self {
            min_samples: min_samples.max(2),
            min_months: min_months.max(2),
        }
    }

    pub fn from_config(config: &FactorConfig) -> Self {
        Self::new(config.min_samples, config.min_months)
    }

    /// Whole-sample `(spearman, pearson)`; both `None` below `min_samples` rows.
    pub fn whole_sample(&self, rows: &[AlignedObservation]) -> (Option<f64>, Option<f64>) {
        if rows.len() < self.min_samples {
            return (None, None);
        }
        let (x, y) = columns(rows);
        (stats::spearman(&x, &y), stats::pearson(&x, &y))
    }

    /// Spearman IC per calendar month, in chronological order.
    ///
    /// Months with fewer than `min_samples` rows, or with an undefined
    /// correlation, are dropped.
    pub fn monthly(&self, rows: &[AlignedObservation]) -> Vec<MonthlyIc> {
        let mut buckets: BTreeMap<(i32, u32), Vec<AlignedObservation>> = BTreeMap::new();
        for row in rows {
            buckets
                .entry((row.date.year(), row.date.month()))
                .or_default()
                .push(*row);
        }

        buckets
            .into_iter()
            .filter(|(_, month_rows)| month_rows.len() >= self.min_samples)
            .filter_map(|((year, month), month_rows)| {
                let (x, y) = columns(&month_rows);
                stats::spearman(&x, &y).map(|ic| MonthlyIc {
                    year,
                    month,
                    observations: month_rows.len(),
                    ic,
                })
            })
            .collect()
    }

    /// Run the full evaluation.
    pub fn evaluate(&self, rows: &[AlignedObservation]) -> IcStatistics {
        let (rank_ic, pearson_ic) = self.whole_sample(rows);
        let monthly = self.monthly(rows);
        let ics: Vec<f64> = monthly.iter().map(|m| m.ic).collect();
        let summary = IcSummary::from_monthly(&ics, self.min_months, rank_ic);

        debug!(
            observations = rows.len(),
            months = monthly.len(),
            rank_ic = ?rank_ic,
            ic_mean = ?summary.ic_mean,
            "IC evaluation complete"
        );

        IcStatistics {
            observations: rows.len(),
            rank_ic,
            pearson_ic,
            monthly,
            summary,
        }
    }
}

fn columns(rows: &[AlignedObservation]) -> (Vec<f64>, Vec<f64>) {
    rows.iter().map(|r| (r.factor, r.forward_return)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(y: i32, m: u32, d: u32, factor: f64, fwd: f64) -> AlignedObservation {
        AlignedObservation {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            factor,
            forward_return: fwd,
        }
    }

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_two_rows_undefined() {
        let rows = [obs(2024, 1, 2, 0.1, 0.02), obs(2024, 1, 3, 0.3, 0.05)];
        let stats = IcEvaluator::default().evaluate(&rows);
        assert_eq!(stats.rank_ic, None);
        assert_eq!(stats.pearson_ic, None);
        assert!(stats.monthly.is_empty());
        assert_eq!(stats.summary, IcSummary::default());
    }

    #[test]
    fn test_whole_sample_perfect_rank() {
        let rows = [
            obs(2024, 1, 2, 0.1, 0.01),
            obs(2024, 1, 3, 0.2, 0.04),
            obs(2024, 1, 4, 0.3, 0.09),
            obs(2024, 1, 5, 0.4, 0.16),
        ];
        let (spearman, pearson) = IcEvaluator::default().whole_sample(&rows);
        assert!(approx(spearman.unwrap(), 1.0, 1e-12));
        assert!(pearson.unwrap() < 1.0 && pearson.unwrap() > 0.9);
    }

    #[test]
    fn test_monthly_grouping_drops_thin_months() {
        let rows = [
            // January: 3 rows, perfectly ranked
            obs(2024, 1, 2, 0.1, 0.01),
            obs(2024, 1, 3, 0.2, 0.02),
            obs(2024, 1, 4, 0.3, 0.03),
            // February: 2 rows, dropped
            obs(2024, 2, 1, 0.1, 0.05),
            obs(2024, 2, 2, 0.2, 0.01),
            // March: 3 rows, inversely ranked
            obs(2024, 3, 1, 0.1, 0.03),
            obs(2024, 3, 4, 0.2, 0.02),
            obs(2024, 3, 5, 0.3, 0.01),
        ];
        let monthly = IcEvaluator::default().monthly(&rows);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].label(), "2024-01");
        assert!(approx(monthly[0].ic, 1.0, 1e-12));
        assert_eq!(monthly[1].label(), "2024-03");
        assert!(approx(monthly[1].ic, -1.0, 1e-12));
    }

    #[test]
    fn test_monthly_flat_month_dropped() {
        let rows = [
            obs(2024, 1, 2, 0.5, 0.01),
            obs(2024, 1, 3, 0.5, 0.02),
            obs(2024, 1, 4, 0.5, 0.03),
        ];
        assert!(IcEvaluator::default().monthly(&rows).is_empty());
    }

    #[test]
    fn test_monthly_same_month_different_years() {
        let rows = [
            obs(2023, 5, 2, 0.1, 0.01),
            obs(2023, 5, 3, 0.2, 0.02),
            obs(2023, 5, 4, 0.3, 0.03),
            obs(2024, 5, 2, 0.1, 0.03),
            obs(2024, 5, 3, 0.2, 0.02),
            obs(2024, 5, 6, 0.3, 0.01),
        ];
        let monthly = IcEvaluator::default().monthly(&rows);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].year, 2023);
        assert_eq!(monthly[1].year, 2024);
    }

    #[test]
    fn test_summary_four_months() {
        let summary = IcSummary::from_monthly(&[0.05, 0.03, 0.07, 0.01], 2, None);
        assert!(approx(summary.ic_mean.unwrap(), 0.04, 1e-12));
        // sqrt(0.002 / 3)
        assert!(approx(summary.ic_std.unwrap(), 0.025_819_888_974_716_1, 1e-12));
        assert!(approx(summary.ic_ir.unwrap(), 1.549_193_338_482_966_7, 1e-9));
        assert!(approx(summary.t_stat.unwrap(), 3.098_386_676_965_933_4, 1e-9));
        assert!(approx(summary.p_value.unwrap(), 0.0534, 2e-4));
    }

    #[test]
    fn test_summary_single_month_falls_back() {
        let summary = IcSummary::from_monthly(&[0.08], 2, Some(0.12));
        assert_eq!(summary.ic_mean, Some(0.12));
        assert_eq!(summary.ic_std, None);
        assert_eq!(summary.ic_ir, None);
        assert_eq!(summary.t_stat, None);
        assert_eq!(summary.p_value, None);
    }

    #[test]
    fn test_evaluate_single_month_falls_back_to_rank_ic() {
        let rows = [
            // February: only qualifying month
            obs(2024, 2, 1, 0.1, 0.01),
            obs(2024, 2, 2, 0.2, 0.03),
            obs(2024, 2, 5, 0.3, 0.02),
            obs(2024, 2, 6, 0.4, 0.05),
            // March: two rows, dropped
            obs(2024, 3, 1, 0.5, 0.04),
            obs(2024, 3, 4, 0.6, 0.06),
        ];
        let stats = IcEvaluator::default().evaluate(&rows);

        assert_eq!(stats.monthly.len(), 1);
        assert!(stats.rank_ic.is_some());
        assert_eq!(stats.summary.ic_mean, stats.rank_ic);
        assert_ne!(stats.summary.ic_mean, Some(stats.monthly[0].ic));
        assert_eq!(stats.summary.ic_std, None);
        assert_eq!(stats.summary.ic_ir, None);
        assert_eq!(stats.summary.t_stat, None);
        assert_eq!(stats.summary.p_value, None);
    }

    #[test]
    fn test_summary_zero_std() {
        let summary = IcSummary::from_monthly(&[0.25, 0.25, 0.25], 2, None);
        assert_eq!(summary.ic_mean, Some(0.25));
        assert_eq!(summary.ic_std, Some(0.0));
        assert_eq!(summary.ic_ir, None);
        assert_eq!(summary.t_stat, None);
        assert_eq!(summary.p_value, None);
    }

    #[test]
    fn test_t_test_known_values() {
        // t = 2.0 with 10 degrees of freedom: two-tailed p ≈ 0.0734
        let (t, p) = t_test(2.0, 11f64.sqrt(), 11).unwrap();
        assert!(approx(t, 2.0, 1e-12));
        assert!(approx(p, 0.0734, 5e-4));

        let (_, p) = t_test(0.0, 1.0, 5).unwrap();
        assert!(approx(p, 1.0, 1e-12));

        assert_eq!(t_test(1.0, 0.0, 5), None);
        assert_eq!(t_test(1.0, 1.0, 1), None);
    }

    #[test]
    fn test_t_test_symmetric() {
        let (t_pos, p_pos) = t_test(0.03, 0.02, 6).unwrap();
        let (t_neg, p_neg) = t_test(-0.03, 0.02, 6).unwrap();
        assert!(approx(t_pos, -t_neg, 1e-12));
        assert!(approx(p_pos, p_neg, 1e-12));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let rows: Vec<AlignedObservation> = (0..90)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i);
                let f = ((i * 7) % 13) as f64 / 13.0 - 0.5;
                let r = ((i * 5) % 11) as f64 / 100.0 - 0.05;
                AlignedObservation { date, factor: f, forward_return: r }
            })
            .collect();
        let evaluator = IcEvaluator::default();
        let a = evaluator.evaluate(&rows);
        let b = evaluator.evaluate(&rows);
        assert_eq!(a, b);
        assert_eq!(a.observations, 90);
        assert!(a.monthly.len() >= 2);
        assert!(a.summary.ic_std.is_some());
    }
}
