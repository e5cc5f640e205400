//! Zero Factor Library
//!
//! Single-instrument factor research for A-shares: fetch daily bars, compute
//! the rank-volume correlation factor, and measure its predictive power with
//! Information Coefficient statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────────────┐
//! │  Ingestion   │──▶│  Factor stage    │──▶│  IC evaluation       │
//! │  (data)      │   │  rank + corr     │   │  Spearman / Pearson  │
//! │  Eastmoney   │   │  forward returns │   │  monthly IC, t-test  │
//! └──────────────┘   └──────────────────┘   └──────────┬───────────┘
//!                                                      │
//!                                   report / chart data ▼
//! ```
//!
//! # Key Concepts
//!
//! - **Factor**: `-1 * correlation(rank(open), rank(volume), 10)`
//! - **Forward return**: `close[t + 20] / close[t] - 1`
//! - **IC**: correlation between factor values and forward returns
//! - **IC_IR**: mean monthly IC divided by its standard deviation
//!
//! Absent values are `Option<f64>` throughout; data insufficiency degrades to
//! `None` and is never raised as an error.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod chart;
pub mod data;
pub mod error;
pub mod factor;
pub mod ic;
pub mod pipeline;
pub mod stats;

pub use chart::{CandleChart, IcScatter};
pub use data::{Bar, DataProvider, EastmoneyAdapter, ProviderError, Symbol, TimeSeries};
pub use error::{FactorError, Result};
pub use factor::{forward_returns, rolling_corr, rolling_rank, Factor, RankVolumeCorrelation};
pub use ic::{align, AlignedObservation, IcEvaluator, IcReport, IcStatistics, MonthlyIc};
pub use pipeline::{FactorPipeline, PipelineOutput};
