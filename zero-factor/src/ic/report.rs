//! IC report generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AlignedObservation, IcStatistics, MonthlyIc};

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════════\n";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────────\n";

/// Flat record handed to reporting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcReport {
    pub symbol: String,
    /// Factor formula
    pub factor: String,
    /// Forward-return horizon in trading days
    pub horizon: usize,
    /// First aligned date
    pub period_start: Option<NaiveDate>,
    /// Last aligned date
    pub period_end: Option<NaiveDate>,
    pub observations: usize,
    pub months: usize,
    pub rank_ic: Option<f64>,
    pub pearson_ic: Option<f64>,
    pub ic_mean: Option<f64>,
    pub ic_std: Option<f64>,
    pub ic_ir: Option<f64>,
    pub t_stat: Option<f64>,
    pub p_value: Option<f64>,
    pub monthly: Vec<MonthlyIc>,
}

impl IcReport {
    /// Build the report from evaluation results.
    pub fn generate(
        symbol: impl Into<String>,
        factor: impl Into<String>,
        horizon: usize,
        aligned: &[AlignedObservation],
        stats: &IcStatistics,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            factor: factor.into(),
            horizon,
            period_start: aligned.first().map(|r| r.date),
            period_end: aligned.last().map(|r| r.date),
            observations: stats.observations,
            months: stats.monthly.len(),
            rank_ic: stats.rank_ic,
            pearson_ic: stats.pearson_ic,
            ic_mean: stats.summary.ic_mean,
            ic_std: stats.summary.ic_std,
            ic_ir: stats.summary.ic_ir,
            t_stat: stats.summary.t_stat,
            p_value: stats.summary.p_value,
            monthly: stats.monthly.clone(),
        }
    }

    /// Whether the mean monthly IC is significant at `alpha`.
    /// `None` when no p-value is available.
    pub fn significant_at(&self, alpha: f64) -> Option<bool> {
        self.p_value.map(|p| p < alpha)
    }

    fn period(&self) -> String {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => format!("{} 至 {}", start, end),
            _ => "无有效样本".to_string(),
        }
    }

    /// Boxed plain-text report; undefined statistics print as `NaN`.
    pub fn text_report(&self) -> String {
        let mut report = String::new();

        report.push_str(RULE_HEAVY);
        report.push_str(&format!("                    {} 因子IC报告\n", self.symbol));
        report.push_str(RULE_HEAVY);
        report.push('\n');

        report.push_str(&format!("🧮 因子: {}\n", self.factor));
        report.push_str(&format!("📅 样本区间: {}\n", self.period()));
        report.push_str(&format!("⏩ 预测周期: {} 个交易日\n\n", self.horizon));

        report.push_str("📊 全样本IC\n");
        report.push_str(RULE_LIGHT);
        report.push_str(&format!("  有效样本数:     {:>12}\n", self.observations));
        report.push_str(&format!("  秩相关IC:       {:>12}\n", fmt_opt(self.rank_ic)));
        report.push_str(&format!("  线性相关IC:     {:>12}\n\n", fmt_opt(self.pearson_ic)));

        report.push_str("📈 月度IC统计\n");
        report.push_str(RULE_LIGHT);
        report.push_str(&format!("  月份数:         {:>12}\n", self.months));
        report.push_str(&format!("  IC均值:         {:>12}\n", fmt_opt(self.ic_mean)));
        report.push_str(&format!("  IC标准差:       {:>12}\n", fmt_opt(self.ic_std)));
        report.push_str(&format!("  IC_IR:          {:>12}\n", fmt_opt(self.ic_ir)));
        report.push_str(&format!("  t统计量:        {:>12}\n", fmt_opt(self.t_stat)));
        report.push_str(&format!("  p值:            {:>12}\n\n", fmt_opt(self.p_value)));

        if !self.monthly.is_empty() {
            report.push_str("🗓️ 月度IC明细\n");
            report.push_str(RULE_LIGHT);
            for m in &self.monthly {
                let sign = if m.ic >= 0.0 { "🟢" } else { "🔴" };
                report.push_str(&format!(
                    "  {} {} | IC: {:>8.4} | 样本: {}\n",
                    sign,
                    m.label(),
                    m.ic,
                    m.observations
                ));
            }
        }

        report.push('\n');
        report.push_str(RULE_HEAVY);

        report
    }

    /// Short Markdown summary for chat channels.
    pub fn to_markdown(&self) -> String {
        format!(
            "📊 *因子IC报告* `{}`\n\n\
            *因子:* {}\n\
            *区间:* {}\n\n\
            秩相关IC: {}\n\
            线性相关IC: {}\n\
            IC均值: {}\n\
            IC标准差: {}\n\
            IC_IR: {}\n\
            t统计量: {}\n\
            p值: {}",
            self.symbol,
            self.factor,
            self.period(),
            fmt_opt(self.rank_ic),
            fmt_opt(self.pearson_ic),
            fmt_opt(self.ic_mean),
            fmt_opt(self.ic_std),
            fmt_opt(self.ic_ir),
            fmt_opt(self.t_stat),
            fmt_opt(self.p_value),
        )
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "NaN".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
