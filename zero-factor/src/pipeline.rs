//! Factor evaluation pipeline.
//!
//! ingestion → factor → forward returns → alignment → IC statistics →
//! report and chart data. Each stage receives its parameters explicitly.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use zero_common::config::FactorConfig;

use crate::chart::{CandleChart, IcScatter};
use crate::data::{DataProvider, ProviderError, Symbol, TimeSeries};
use crate::error::{FactorError, Result};
use crate::factor::{forward_returns, Factor, RankVolumeCorrelation};
use crate::ic::{align, AlignedObservation, IcEvaluator, IcReport, IcStatistics};

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    /// Factor value per bar
    pub factor: Vec<Option<f64>>,
    /// Forward return per bar
    pub forward_returns: Vec<Option<f64>>,
    pub aligned: Vec<AlignedObservation>,
    pub statistics: IcStatistics,
    pub report: IcReport,
    /// `None` when no row aligned
    pub scatter: Option<IcScatter>,
    pub candles: CandleChart,
}

/// Single-instrument factor evaluation.
pub struct FactorPipeline {
    factor: Box<dyn Factor + Send + Sync>,
    horizon: usize,
    evaluator: IcEvaluator,
    ma_windows: Vec<usize>,
}

impl FactorPipeline {
    pub fn new(
        factor: Box<dyn Factor + Send + Sync>,
        horizon: usize,
        evaluator: IcEvaluator,
        ma_windows: Vec<usize>,
    ) -> Result<Self> {
        if horizon == 0 {
            return Err(FactorError::InvalidHorizon(horizon));
        }
        Ok(Self {
            factor,
            horizon,
            evaluator,
            ma_windows,
        })
    }

    /// Rank-volume correlation factor with windows, horizon and thresholds
    /// from config.
    pub fn from_config(config: &FactorConfig) -> Result<Self> {
        Self::new(
            Box::new(RankVolumeCorrelation::from_config(config)?),
            config.horizon,
            IcEvaluator::from_config(config),
            config.ma_windows.clone(),
        )
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn factor(&self) -> &dyn Factor {
        self.factor.as_ref()
    }

    /// Run every stage after ingestion.
    pub fn run(&self, series: &TimeSeries) -> Result<PipelineOutput> {
        let factor = self.factor.compute(series)?;
        let forward = forward_returns(&series.closes(), self.horizon)?;
        let dates = series.dates();
        let aligned = align(&dates, &factor, &forward)?;

        debug!(
            symbol = series.symbol(),
            bars = series.len(),
            aligned = aligned.len(),
            "Aligned factor with {}-day forward returns",
            self.horizon
        );

        let statistics = self.evaluator.evaluate(&aligned);
        let report = IcReport::generate(
            series.symbol(),
            self.factor.description(),
            self.horizon,
            &aligned,
            &statistics,
        );
        let scatter = IcScatter::from_aligned(&aligned);
        let candles = CandleChart::from_series(series, &self.ma_windows)?;

        info!(
            symbol = series.symbol(),
            factor = self.factor.name(),
            observations = statistics.observations,
            months = statistics.monthly.len(),
            rank_ic = ?statistics.rank_ic,
            ic_mean = ?statistics.summary.ic_mean,
            p_value = ?statistics.summary.p_value,
            "Factor evaluation complete"
        );

        Ok(PipelineOutput {
            symbol: series.symbol().to_string(),
            dates,
            factor,
            forward_returns: forward,
            aligned,
            statistics,
            report,
            scatter,
            candles,
        })
    }

    /// Fetch bars through `provider` and run the pipeline.
    ///
    /// A provider failure or an empty result aborts before the factor core
    /// runs.
    pub async fn evaluate(
        &self,
        provider: &dyn DataProvider,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PipelineOutput> {
        info!(
            provider = provider.name(),
            symbol = %symbol,
            %start,
            %end,
            "Fetching daily bars"
        );

        let bars = match provider.get_daily_bars(symbol, start, end).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!(provider = provider.name(), symbol = %symbol, error = %e, "Ingestion failed");
                return Err(e.into());
            }
        };

        if bars.is_empty() {
            warn!(provider = provider.name(), symbol = %symbol, "No bars returned");
            return Err(ProviderError::DataNotAvailable(format!(
                "{} returned no bars for {} between {} and {}",
                provider.name(),
                symbol,
                start,
                end
            ))
            .into());
        }

        let series = TimeSeries::from_unsorted(symbol.to_string(), bars)?;
        debug!(
            symbol = %symbol,
            bars = series.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            "Loaded time series"
        );

        self.run(&series)
    }
}
