//! Typed row representations of the four analytics tables.

use chrono::NaiveDate;

/// One observed trading day under a sentiment regime. Source of truth for
/// per-day performance; immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetricRow {
    pub date: NaiveDate,
    pub sentiment_group: String,
    pub daily_pnl: f64,
    pub daily_win_rate: f64,
}

/// Per-regime risk figures computed upstream. Optional columns are read
/// when the source table carries them and `None` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSummaryRow {
    pub sentiment_group: String,
    pub risk_adjusted_score: f64,
    pub avg_daily_pnl: Option<f64>,
    pub pnl_std: Option<f64>,
}

/// One behavioral trader archetype. Cluster ids are opaque labels, not
/// ordinals.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummaryRow {
    pub cluster: String,
    pub avg_trade_size_usd: f64,
    pub daily_trade_count: f64,
    pub pnl_volatility: f64,
}

/// Relative weight of one predictor in the upstream volatility model.
/// Importances need not sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportanceRow {
    pub feature: String,
    pub importance: f64,
}

/// The loaded dataset: all four tables, read-only for the rest of the
/// session. The only mutable derivative is the filtered view and its
/// downstream aggregates, recomputed on every selection change.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub daily: Vec<DailyMetricRow>,
    pub risk: Vec<RiskSummaryRow>,
    pub clusters: Vec<ClusterSummaryRow>,
    pub features: Vec<FeatureImportanceRow>,
}
