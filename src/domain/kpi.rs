//! KPI panel: the four headline values of the dashboard.

use super::stats;
use super::table::DailyMetricRow;

/// Headline figures for the current filtered view. A `None` means the
/// underlying aggregation reported `InsufficientData`; renderers show a
/// "not enough data" placeholder for it instead of failing the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiPanel {
    pub sharpe_proxy: Option<f64>,
    pub pnl_volatility: Option<f64>,
    pub active_days: usize,
    pub dominant_regime: Option<String>,
}

impl KpiPanel {
    pub fn compute(rows: &[DailyMetricRow]) -> Self {
        KpiPanel {
            sharpe_proxy: stats::sharpe_proxy(rows).ok(),
            pnl_volatility: stats::pnl_volatility(rows).ok(),
            active_days: stats::active_count(rows),
            dominant_regime: stats::dominant_regime(rows).ok(),
        }
    }
}
