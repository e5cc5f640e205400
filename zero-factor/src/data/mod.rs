//! Market data for A-shares.
//!
//! Holds the daily bar model consumed by the factor core and the ingestion
//! side that produces it.
//!
//! # Data Sources
//! - **Eastmoney**: keyless kline API, forward-adjusted daily bars

mod eastmoney;
mod provider;
pub mod symbol;

pub use eastmoney::EastmoneyAdapter;
pub use provider::{DataProvider, ProviderError};
pub use symbol::{Exchange, Symbol};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FactorError, Result};

// ============================================================================
// Core Data Types
// ============================================================================

/// One trading day for one instrument (OHLCV)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: f64,
    /// Amount (turnover in currency)
    #[serde(default)]
    pub amount: f64,
}

impl Bar {
    /// Create a bar without turnover
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            amount: 0.0,
        }
    }

    /// Closed at or above the open (drawn red on A-share charts)
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    /// Get the candle body size
    pub fn body_size(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Lower edge of the candle body
    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Get the full range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

// ============================================================================
// Time Series
// ============================================================================

/// Daily bars for one instrument, strictly ascending by date.
///
/// Gaps (weekends, holidays, suspensions) are allowed; duplicates and
/// reordering are not.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl TimeSeries {
    /// Build a series from bars that must already be in ascending date order.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(FactorError::EmptySeries(symbol));
        }

        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(FactorError::UnorderedDates {
                    index: index + 1,
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    /// Build a series from bars in any order, keeping the first bar seen per date.
    pub fn from_unsorted(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self> {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self::new(symbol, bars)
    }

    /// Instrument identifier
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All bars in date order
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars (never zero)
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// First trading date in the series
    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    /// Last trading date in the series
    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

// ============================================================================
// Tests
// ============================================================================
