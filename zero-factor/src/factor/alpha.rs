//! Rank-volume correlation factor (WorldQuant Alpha#3 shape).
//!
//! `-1 * correlation(rank(open), rank(volume), 10)`: positive when opening
//! prices and volume have recently moved against each other.

use tracing::debug;

use zero_common::config::FactorConfig;

use super::rolling::{rolling_corr, rolling_rank};
use super::Factor;
use crate::data::TimeSeries;
use crate::error::{check_window, Result};

/// Negated rolling correlation of the rolling ranks of open and volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankVolumeCorrelation {
    rank_window: usize,
    corr_window: usize,
}

impl RankVolumeCorrelation {
    pub fn new(rank_window: usize, corr_window: usize) -> Result<Self> {
        check_window(rank_window)?;
        check_window(corr_window)?;
        Ok(Self {
            rank_window,
            corr_window,
        })
    }

    pub fn from_config(config: &FactorConfig) -> Result<Self> {
        Self::new(config.rank_window, config.corr_window)
    }

    /// Compute directly from open and volume columns.
    pub fn compute_columns(&self, opens: &[f64], volumes: &[f64]) -> Result<Vec<Option<f64>>> {
        let rank_open = rolling_rank(opens, self.rank_window)?;
        let rank_volume = rolling_rank(volumes, self.rank_window)?;
        let corr = rolling_corr(&rank_open, &rank_volume, self.corr_window)?;

        Ok(corr.into_iter().map(|c| c.map(|v| -v)).collect())
    }
}

impl Default for RankVolumeCorrelation {
    fn default() -> Self {
        Self {
            rank_window: 10,
            corr_window: 10,
        }
    }
}

impl Factor for RankVolumeCorrelation {
    fn name(&self) -> &str {
        "alpha003"
    }

    fn description(&self) -> String {
        if self.rank_window == self.corr_window {
            format!("-1 * correlation(rank(open), rank(volume), {})", self.corr_window)
        } else {
            format!(
                "-1 * correlation(rank(open, {r}), rank(volume, {r}), {c})",
                r = self.rank_window,
                c = self.corr_window
            )
        }
    }

    fn warmup(&self) -> usize {
        self.rank_window + self.corr_window - 2
    }

    fn compute(&self, series: &TimeSeries) -> Result<Vec<Option<f64>>> {
        let values = self.compute_columns(&series.opens(), &series.volumes())?;

        debug!(
            symbol = series.symbol(),
            bars = series.len(),
            defined = values.iter().filter(|v| v.is_some()).count(),
            "Computed {}",
            self.name()
        );

        Ok(values)
    }
}
