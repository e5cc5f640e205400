//! Forward returns, the prediction target of the IC evaluation.

use crate::error::{FactorError, Result};

/// `close[i + horizon] / close[i] - 1` for every bar.
///
/// The last `horizon` positions are `None` (no look-ahead available), as is
/// any position whose base close is not a positive finite number.
pub fn forward_returns(closes: &[f64], horizon: usize) -> Result<Vec<Option<f64>>> {
    if horizon == 0 {
        return Err(FactorError::InvalidHorizon(horizon));
    }

    Ok((0..closes.len())
        .map(|i| {
            let base = closes[i];
            let future = *closes.get(i + horizon)?;
            if !(base.is_finite() && base > 0.0) || !future.is_finite() {
                return None;
            }
            Some(future / base - 1.0)
        })
        .collect())
}
