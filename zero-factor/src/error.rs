//! Error types for factor computation and evaluation.
//!
//! Only contract violations are raised. Data insufficiency (short windows,
//! flat windows, thin months) degrades to `None` inside the computations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::ProviderError;

/// Result type alias using the factor error type.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors raised by the factor pipeline.
#[derive(Error, Debug)]
pub enum FactorError {
    /// A rolling window of zero observations was requested
    #[error("Invalid window: {0} (must be at least 1)")]
    InvalidWindow(usize),

    /// A forward-return horizon of zero bars was requested
    #[error("Invalid horizon: {0} (must be at least 1)")]
    InvalidHorizon(usize),

    /// Two sequences that must be aligned have different lengths
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// No bars were supplied
    #[error("Empty time series for {0}")]
    EmptySeries(String),

    /// Dates are not strictly ascending
    #[error("Dates out of order at index {index}: {previous} followed by {current}")]
    UnorderedDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// Ingestion collaborator failed
    #[error("Data provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl FactorError {
    /// Check if the error originated in the data provider rather than the core.
    pub fn is_ingestion(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::EmptySeries(_))
    }
}

/// Reject a zero window.
pub(crate) fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(FactorError::InvalidWindow(window));
    }
    Ok(())
}
