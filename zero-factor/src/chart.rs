//! Chart data preparation.
//!
//! Produces the numeric sequences a plotting collaborator draws: the IC
//! scatter with its fitted line and the daily candlestick chart with moving
//! averages. Nothing here renders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::TimeSeries;
use crate::error::{check_window, Result};
use crate::ic::AlignedObservation;
use crate::stats;

/// Strict trailing simple moving average; `None` until `window` values exist.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    check_window(window)?;

    let mut out = vec![None; values.len()];
    for i in window.saturating_sub(1)..values.len() {
        let avg = values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
        out[i] = avg.is_finite().then_some(avg);
    }
    Ok(out)
}

/// Factor versus forward-return scatter with its least-squares line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcScatter {
    /// `(factor, forward_return)` pairs
    pub points: Vec<(f64, f64)>,
    pub slope: f64,
    pub intercept: f64,
    /// Fitted line evaluated at the smallest and largest factor value
    pub line: [(f64, f64); 2],
}

impl IcScatter {
    /// `None` when there are no aligned observations.
    pub fn from_aligned(rows: &[AlignedObservation]) -> Option<Self> {
        let (x, y): (Vec<f64>, Vec<f64>) = rows.iter().map(|r| (r.factor, r.forward_return)).unzip();
        let (slope, intercept) = stats::linear_fit(&x, &y)?;

        let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            points: x.into_iter().zip(y).collect(),
            slope,
            intercept,
            line: [
                (x_min, slope * x_min + intercept),
                (x_max, slope * x_max + intercept),
            ],
        })
    }

    /// Title in the form used by the scatter plot.
    pub fn title(symbol: &str, rank_ic: Option<f64>, pearson_ic: Option<f64>) -> String {
        let fmt = |v: Option<f64>| v.map_or_else(|| "NaN".to_string(), |v| format!("{:.3}", v));
        format!(
            "IC收益率散点图: {}  (Spearman={}, Pearson={})",
            symbol,
            fmt(rank_ic),
            fmt(pearson_ic)
        )
    }
}

/// One candlestick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close at or above open (drawn red on A-share charts)
    pub up: bool,
    pub body_bottom: f64,
    pub body_height: f64,
}

/// A labelled moving-average overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageLine {
    pub window: usize,
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Candlestick chart data for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleChart {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub moving_averages: Vec<MovingAverageLine>,
}

impl CandleChart {
    pub fn from_series(series: &TimeSeries, ma_windows: &[usize]) -> Result<Self> {
        let candles = series
            .bars()
            .iter()
            .map(|bar| Candle {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                up: bar.is_up(),
                body_bottom: bar.body_bottom(),
                body_height: bar.body_size(),
            })
            .collect();

        let closes = series.closes();
        let moving_averages = ma_windows
            .iter()
            .map(|&window| {
                Ok(MovingAverageLine {
                    window,
                    label: format!("MA{}", window),
                    values: moving_average(&closes, window)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            symbol: series.symbol().to_string(),
            candles,
            moving_averages,
        })
    }

    pub fn title(&self) -> String {
        format!("{} 最近一年K线图", self.symbol)
    }
}
