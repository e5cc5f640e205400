//! Eastmoney adapter for A-share daily bars.
//!
//! Uses the public kline endpoint (no API key). Prices are forward-adjusted
//! (前复权) unless configured otherwise.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use zero_common::config::DataSourceConfig;

use super::provider::{DataProvider, ProviderError};
use super::{Bar, Symbol};

// ============================================================================
// Constants
// ============================================================================

/// Eastmoney historical data API
const EASTMONEY_KLINE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";

/// klt parameter for daily candles
const DAILY_KLT: i32 = 101;

/// Map an adjustment mode to the eastmoney fqt parameter.
///
/// 0 = 不复权, 1 = 前复权, 2 = 后复权
fn adjust_to_fqt(adjust: &str) -> i32 {
    match adjust.to_lowercase().as_str() {
        "hfq" => 2,
        "none" => 0,
        _ => 1,
    }
}

// ============================================================================
// Eastmoney Adapter
// ============================================================================

/// Daily bar provider backed by the eastmoney kline API.
pub struct EastmoneyAdapter {
    /// HTTP client
    client: reqwest::Client,
    /// Kline endpoint
    base_url: String,
    /// fqt parameter
    fqt: i32,
}

impl EastmoneyAdapter {
    /// Create a forward-adjusted adapter with a 30s timeout
    pub fn new() -> Self {
        Self::from_config(&DataSourceConfig::default())
    }

    /// Create from the data source section of the config
    pub fn from_config(config: &DataSourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| EASTMONEY_KLINE_URL.to_string()),
            fqt: adjust_to_fqt(&config.adjust),
        }
    }

    /// Fetch daily K-line rows from eastmoney
    async fn fetch_kline(
        &self,
        symbol: &Symbol,
        limit: usize,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, ProviderError> {
        let start_str = start_date.map(|d| d.format("%Y%m%d").to_string());
        let end_str = end_date.map(|d| d.format("%Y%m%d").to_string());

        let url = format!(
            "{}?secid={}&klt={}&fqt={}&lmt={}&fields1=f1,f2,f3,f4,f5,f6&fields2=f51,f52,f53,f54,f55,f56,f57{}{}",
            self.base_url,
            symbol.eastmoney_secid(),
            DAILY_KLT,
            self.fqt,
            limit,
            start_str.as_ref().map(|s| format!("&beg={}", s)).unwrap_or_default(),
            end_str.as_ref().map(|s| format!("&end={}", s)).unwrap_or_default(),
        );

        debug!(url = %url, symbol = %symbol, "Fetching kline from eastmoney");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::Network(format!("HTTP {}", status)));
        }

        let data: EastmoneyKlineResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Internal(format!("Failed to parse response: {}", e)))?;

        if data.rc != 0 {
            return Err(ProviderError::Internal(format!(
                "Eastmoney API error: rc={}",
                data.rc
            )));
        }

        let klines = data.data.and_then(|d| d.klines).unwrap_or_default();
        parse_kline_rows(&klines)
    }
}

impl Default for EastmoneyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse eastmoney kline strings into bars.
///
/// Row format: `date,open,close,high,low,volume,amount,...`. Rows with a
/// non-positive close (suspended days) are dropped. Output is ascending and
/// holds one bar per date.
fn parse_kline_rows(klines: &[String]) -> Result<Vec<Bar>, ProviderError> {
    let mut bars = Vec::with_capacity(klines.len());

    for line in klines {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 7 {
            warn!(line = line.as_str(), "Invalid kline format, skipping");
            continue;
        }

        let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d")
            .map_err(|e| ProviderError::Internal(format!("Failed to parse date: {}", e)))?;
        let field = |idx: usize, name: &str| {
            parts[idx]
                .parse::<f64>()
                .map_err(|e| ProviderError::Internal(format!("Failed to parse {}: {}", name, e)))
        };

        let open = field(1, "open")?;
        let close = field(2, "close")?;
        let high = field(3, "high")?;
        let low = field(4, "low")?;
        let volume = field(5, "volume")?;
        let amount = field(6, "amount")?;

        if close <= 0.0 {
            debug!(date = %date, "Dropping bar with non-positive close");
            continue;
        }

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
            amount,
        });
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    Ok(bars)
}

// ============================================================================
// DataProvider Implementation
// ============================================================================

#[async_trait]
impl DataProvider for EastmoneyAdapter {
    fn name(&self) -> &'static str {
        "eastmoney"
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let probe = Symbol::parse("000001.SZ")?;
        let bars = self.fetch_kline(&probe, 1, None, None).await?;

        if bars.is_empty() {
            return Err(ProviderError::DataNotAvailable(
                "Health check returned no data".into(),
            ));
        }

        Ok(())
    }

    async fn get_daily_bars(
        &self,
        symbol: &Symbol,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, ProviderError> {
        if start_date > end_date {
            return Err(ProviderError::InvalidRequest(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )));
        }

        // The range bounds the result; lmt only needs to exceed it.
        let span_days = (end_date - start_date).num_days().max(0) as usize + 1;
        self.fetch_kline(symbol, span_days, Some(start_date), Some(end_date))
            .await
    }
}

// ============================================================================
// Eastmoney API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct EastmoneyKlineResponse {
    /// Return code (0 = success)
    rc: i32,
    /// Data
    data: Option<EastmoneyKlineData>,
}

#[derive(Debug, Deserialize)]
struct EastmoneyKlineData {
    /// K-line data as strings
    klines: Option<Vec<String>>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_adjust_to_fqt() {
        assert_eq!(adjust_to_fqt("qfq"), 1);
        assert_eq!(adjust_to_fqt("HFQ"), 2);
        assert_eq!(adjust_to_fqt("none"), 0);
    }

    #[test]
    fn test_parse_kline_rows_field_order() {
        let bars =
            parse_kline_rows(&rows(&["2024-01-02,10.50,10.70,10.80,10.40,1000000,10500000,3.8"]))
                .unwrap();
        assert_eq!(bars.len(), 1);
        let bar = &bars[0];
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bar.open, 10.50);
        assert_eq!(bar.close, 10.70);
        assert_eq!(bar.high, 10.80);
        assert_eq!(bar.low, 10.40);
        assert_eq!(bar.volume, 1_000_000.0);
        assert_eq!(bar.amount, 10_500_000.0);
    }

    #[test]
    fn test_parse_kline_rows_sorts_dedups_and_drops_suspended() {
        let bars = parse_kline_rows(&rows(&[
            "2024-01-04,11,11.2,11.3,10.9,500,5500",
            "2024-01-02,10,10.1,10.2,9.9,400,4000",
            "2024-01-03,0,0,0,0,0,0",
            "2024-01-02,10,10.1,10.2,9.9,400,4000",
            "garbage",
        ]))
        .unwrap();
        let dates: Vec<String> = bars.iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-04"]);
    }

    #[test]
    fn test_parse_kline_rows_bad_number() {
        let err = parse_kline_rows(&rows(&["2024-01-02,x,10,10,10,1,1"])).unwrap_err();
        assert!(matches!(err, ProviderError::Internal(_)));
    }

    #[test]
    fn test_from_config_base_url() {
        let config = DataSourceConfig {
            base_url: Some("http://127.0.0.1:9/kline".into()),
            adjust: "none".into(),
            ..Default::default()
        };
        let adapter = EastmoneyAdapter::from_config(&config);
        assert_eq!(adapter.base_url, "http://127.0.0.1:9/kline");
        assert_eq!(adapter.fqt, 0);
        assert_eq!(adapter.name(), "eastmoney");
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let adapter = EastmoneyAdapter::new();
        let symbol = Symbol::parse("000001.SZ").unwrap();
        let err = adapter
            .get_daily_bars(
                &symbol,
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    // Integration tests require network access

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_daily_bars() {
        let adapter = EastmoneyAdapter::new();
        let symbol = Symbol::parse("000001.SZ").unwrap();
        let end = chrono::Local::now().date_naive();
        let start = end - chrono::Duration::days(30);
        let bars = adapter.get_daily_bars(&symbol, start, end).await.unwrap();

        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_health_check() {
        let adapter = EastmoneyAdapter::new();
        assert!(adapter.health_check().await.is_ok());
    }
}
