//! Information Coefficient evaluation.
//!
//! Measures how well a factor predicts forward returns: whole-sample rank and
//! linear IC, monthly rank IC, and a t-test on the mean monthly IC.

mod evaluator;
mod report;

pub use evaluator::{t_test, IcEvaluator, IcStatistics, IcSummary, MonthlyIc};
pub use report::IcReport;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FactorError, Result};

/// A date on which both the factor and the forward return are defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedObservation {
    pub date: NaiveDate,
    pub factor: f64,
    pub forward_return: f64,
}

/// Pair factor values with forward returns on identical date indices,
/// dropping every row where either side is absent.
pub fn align(
    dates: &[NaiveDate],
    factor: &[Option<f64>],
    forward_returns: &[Option<f64>],
) -> Result<Vec<AlignedObservation>> {
    if dates.len() != factor.len() {
        return Err(FactorError::LengthMismatch {
            left: dates.len(),
            right: factor.len(),
        });
    }
    if factor.len() != forward_returns.len() {
        return Err(FactorError::LengthMismatch {
            left: factor.len(),
            right: forward_returns.len(),
        });
    }

    Ok(dates
        .iter()
        .zip(factor)
        .zip(forward_returns)
        .filter_map(|((date, f), r)| match (f, r) {
            (Some(f), Some(r)) => Some(AlignedObservation {
                date: *date,
                factor: *f,
                forward_return: *r,
            }),
            _ => None,
        })
        .collect())
}
