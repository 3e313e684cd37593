#![allow(dead_code)]

use chrono::NaiveDate;
use regimescope::domain::error::RegimescopeError;
pub use regimescope::domain::table::{
    ClusterSummaryRow, DailyMetricRow, FeatureImportanceRow, RiskSummaryRow,
};
use regimescope::ports::table_port::TablePort;

/// In-memory table port: preloaded rows, with optional per-table failures.
pub struct MockTablePort {
    pub daily: Result<Vec<DailyMetricRow>, String>,
    pub risk: Result<Vec<RiskSummaryRow>, String>,
    pub clusters: Result<Vec<ClusterSummaryRow>, String>,
    pub features: Result<Vec<FeatureImportanceRow>, String>,
}

impl MockTablePort {
    pub fn new() -> Self {
        Self {
            daily: Ok(Vec::new()),
            risk: Ok(Vec::new()),
            clusters: Ok(Vec::new()),
            features: Ok(Vec::new()),
        }
    }

    pub fn with_daily(mut self, rows: Vec<DailyMetricRow>) -> Self {
        self.daily = Ok(rows);
        self
    }

    pub fn with_risk(mut self, rows: Vec<RiskSummaryRow>) -> Self {
        self.risk = Ok(rows);
        self
    }

    pub fn with_clusters(mut self, rows: Vec<ClusterSummaryRow>) -> Self {
        self.clusters = Ok(rows);
        self
    }

    pub fn with_features(mut self, rows: Vec<FeatureImportanceRow>) -> Self {
        self.features = Ok(rows);
        self
    }

    /// Make the risk table fail with a schema mismatch.
    pub fn with_broken_risk(mut self, column: &str) -> Self {
        self.risk = Err(column.to_string());
        self
    }
}

fn schema_err(table: &str, column: &str) -> RegimescopeError {
    RegimescopeError::SchemaMismatch {
        table: table.to_string(),
        column: column.to_string(),
    }
}

impl TablePort for MockTablePort {
    fn load_daily(&self) -> Result<Vec<DailyMetricRow>, RegimescopeError> {
        self.daily
            .clone()
            .map_err(|c| schema_err("daily_metrics", &c))
    }

    fn load_risk(&self) -> Result<Vec<RiskSummaryRow>, RegimescopeError> {
        self.risk.clone().map_err(|c| schema_err("risk_summary", &c))
    }

    fn load_clusters(&self) -> Result<Vec<ClusterSummaryRow>, RegimescopeError> {
        self.clusters
            .clone()
            .map_err(|c| schema_err("cluster_summary", &c))
    }

    fn load_features(&self) -> Result<Vec<FeatureImportanceRow>, RegimescopeError> {
        self.features
            .clone()
            .map_err(|c| schema_err("feature_importance", &c))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn daily_row(day: u32, group: &str, pnl: f64, win_rate: f64) -> DailyMetricRow {
    DailyMetricRow {
        date: date(2024, 1, day),
        sentiment_group: group.to_string(),
        daily_pnl: pnl,
        daily_win_rate: win_rate,
    }
}

pub fn risk_row(group: &str, score: f64) -> RiskSummaryRow {
    RiskSummaryRow {
        sentiment_group: group.to_string(),
        risk_adjusted_score: score,
        avg_daily_pnl: None,
        pnl_std: None,
    }
}

pub fn cluster_row(id: &str, size: f64, count: f64, vol: f64) -> ClusterSummaryRow {
    ClusterSummaryRow {
        cluster: id.to_string(),
        avg_trade_size_usd: size,
        daily_trade_count: count,
        pnl_volatility: vol,
    }
}

pub fn feature_row(name: &str, importance: f64) -> FeatureImportanceRow {
    FeatureImportanceRow {
        feature: name.to_string(),
        importance,
    }
}
