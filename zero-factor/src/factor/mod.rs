//! Factor computation stage.
//!
//! A factor maps one instrument's daily bars to a signal series aligned with
//! the bars' dates, `None` wherever the signal is not yet defined.

mod alpha;
mod returns;
pub mod rolling;

pub use alpha::RankVolumeCorrelation;
pub use returns::forward_returns;
pub use rolling::{rolling_corr, rolling_rank};

use crate::data::TimeSeries;
use crate::error::Result;

/// A time-series factor over one instrument's bars.
pub trait Factor {
    /// Short identifier (e.g., "alpha003")
    fn name(&self) -> &str;

    /// Formula as shown in reports
    fn description(&self) -> String;

    /// Number of leading observations that are always undefined
    fn warmup(&self) -> usize;

    /// Compute the factor, one value per bar.
    fn compute(&self, series: &TimeSeries) -> Result<Vec<Option<f64>>>;
}
