//! Data provider abstraction for daily market data.
//!
//! Defines the `DataProvider` trait the pipeline fetches through. The factor
//! core never sees a provider; it only receives a validated `TimeSeries`.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

use super::{Bar, Symbol};

// ============================================================================
// Provider Error
// ============================================================================

/// Errors specific to data providers.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// Network error (connection failed, timeout, non-2xx status)
    Network(String),
    /// Data not available for the requested symbol/range
    DataNotAvailable(String),
    /// Invalid request parameters
    InvalidRequest(String),
    /// Internal provider error (bad payload, API error code)
    Internal(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::DataNotAvailable(msg) => write!(f, "Data not available: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Check if the error is recoverable (worth retrying on a later run)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// ============================================================================
// Data Provider Trait
// ============================================================================

/// Trait for daily market data providers.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Get the provider name (e.g., "eastmoney")
    fn name(&self) -> &'static str;

    /// Check if the provider is reachable.
    ///
    /// Should be a lightweight check (e.g., a one-bar request).
    async fn health_check(&self) -> Result<(), ProviderError>;

    /// Fetch daily bars for a symbol, ascending by date.
    ///
    /// # Arguments
    /// * `symbol` - Normalised stock symbol
    /// * `start_date` - Inclusive start date
    /// * `end_date` - Inclusive end date
    async fn get_daily_bars(
        &self,
        symbol: &Symbol,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, ProviderError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::DataNotAvailable("000001.SZ".into());
        assert_eq!(err.to_string(), "Data not available: 000001.SZ");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ProviderError::Network("timeout".into()).is_recoverable());
        assert!(!ProviderError::InvalidRequest("bad symbol".into()).is_recoverable());
        assert!(!ProviderError::Internal("rc=102".into()).is_recoverable());
    }
}
