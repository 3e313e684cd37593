//! Plain-text rendering of the dashboard panels for the CLI.
//!
//! Each panel renders independently; aggregation failures surface as a
//! "not enough data" placeholder in the affected panel only.

use crate::domain::chart::{BarEntry, BoxSeries};
use crate::domain::kpi::KpiPanel;
use crate::domain::stats::{sample_stddev, VolatilityTrendPoint};
use crate::domain::table::{ClusterSummaryRow, RiskSummaryRow};

pub const PLACEHOLDER: &str = "not enough data";

const BAR_WIDTH: usize = 40;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_kpi_panel(panel: &KpiPanel) -> String {
    let mut out = String::from("== Key Metrics ==\n");
    out.push_str(&format!(
        "Sharpe Proxy (mean/std PnL): {}\n",
        fmt_opt(panel.sharpe_proxy, 2)
    ));
    out.push_str(&format!(
        "PnL Volatility (std dev):    {}\n",
        fmt_opt(panel.pnl_volatility, 0)
    ));
    out.push_str(&format!("Active Days:                 {}\n", panel.active_days));
    out.push_str(&format!(
        "Dominant Regime:             {}\n",
        panel.dominant_regime.as_deref().unwrap_or(PLACEHOLDER)
    ));
    out
}

/// Per-regime distribution summary, the text stand-in for the box plot.
pub fn format_regime_distribution(series: &[BoxSeries]) -> String {
    let mut out = String::from("== PnL Distribution by Regime ==\n");
    if series.is_empty() {
        out.push_str(PLACEHOLDER);
        out.push('\n');
        return out;
    }

    out.push_str(&format!(
        "{:<12} {:>6} {:>12} {:>12} {:>12} {:>12}\n",
        "regime", "days", "mean", "std", "min", "max"
    ));
    for s in series {
        let n = s.values.len();
        let mean = s.values.iter().sum::<f64>() / n as f64;
        let min = s.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = s.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        out.push_str(&format!(
            "{:<12} {:>6} {:>12.2} {:>12} {:>12.2} {:>12.2}\n",
            s.label,
            n,
            mean,
            fmt_opt(sample_stddev(&s.values), 2),
            min,
            max
        ));
    }
    out
}

/// ASCII horizontal bars, ascending by importance.
pub fn format_importance_bars(bars: &[BarEntry]) -> String {
    let mut out = String::from("== Volatility Drivers ==\n");
    if bars.is_empty() {
        out.push_str("no feature importances\n");
        return out;
    }

    let max = bars
        .iter()
        .map(|b| b.value)
        .fold(f64::NEG_INFINITY, f64::max);
    for bar in bars {
        let filled = if max > 0.0 {
            ((bar.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<20} {:<width$} {:.4}\n",
            bar.label,
            "#".repeat(filled.min(BAR_WIDTH)),
            bar.value,
            width = BAR_WIDTH
        ));
    }
    out
}

pub fn format_cluster_table(clusters: &[ClusterSummaryRow]) -> String {
    let mut out = String::from("== Behavioral Archetypes ==\n");
    out.push_str(&format!(
        "{:<10} {:>18} {:>18} {:>16}\n",
        "cluster", "avg_trade_size_usd", "daily_trade_count", "pnl_volatility"
    ));
    for c in clusters {
        out.push_str(&format!(
            "{:<10} {:>18.2} {:>18.2} {:>16.2}\n",
            c.cluster, c.avg_trade_size_usd, c.daily_trade_count, c.pnl_volatility
        ));
    }
    out
}

pub fn format_risk_table(risk: &[RiskSummaryRow]) -> String {
    let mut out = String::from("== Regime Risk Summary ==\n");
    out.push_str(&format!(
        "{:<12} {:>20} {:>14} {:>12}\n",
        "regime", "risk_adjusted_score", "avg_daily_pnl", "pnl_std"
    ));
    for r in risk {
        out.push_str(&format!(
            "{:<12} {:>20.4} {:>14} {:>12}\n",
            r.sentiment_group,
            r.risk_adjusted_score,
            fmt_opt(r.avg_daily_pnl, 2),
            fmt_opt(r.pnl_std, 2)
        ));
    }
    out
}

pub fn format_volatility_trend(trend: &[VolatilityTrendPoint]) -> String {
    let mut out = String::from("== Regime Volatility Trend ==\n");
    if trend.is_empty() {
        out.push_str(PLACEHOLDER);
        out.push('\n');
        return out;
    }
    for point in trend {
        match point.volatility {
            Some(v) => out.push_str(&format!("{}  {:>12.2}\n", point.date, v)),
            None => out.push_str(&format!("{}  {:>12}\n", point.date, "-")),
        }
    }
    out
}
