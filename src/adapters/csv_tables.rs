//! CSV table adapter: loads the four analytics tables from disk or from a
//! caller-supplied byte stream.
//!
//! Coercion rules are explicit: `date` columns parse as `%Y-%m-%d`, numeric
//! columns parse as `f64`, everything else is kept as a string. Columns not
//! named by a schema are ignored. A missing required column is a
//! `SchemaMismatch`; a malformed cell is a `CsvParse`.

use crate::domain::error::RegimescopeError;
use crate::domain::table::{
    ClusterSummaryRow, DailyMetricRow, FeatureImportanceRow, RiskSummaryRow,
};
use crate::ports::table_port::TablePort;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

pub const DAILY_METRICS_FILE: &str = "daily_metrics_full.csv";
pub const RISK_SUMMARY_FILE: &str = "risk_summary.csv";
pub const CLUSTER_SUMMARY_FILE: &str = "cluster_summary.csv";
pub const FEATURE_IMPORTANCE_FILE: &str = "feature_importance.csv";

#[derive(Debug)]
pub struct CsvTableAdapter {
    base_path: PathBuf,
    daily_file: String,
    risk_file: String,
    cluster_file: String,
    feature_file: String,
}

impl CsvTableAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            daily_file: DAILY_METRICS_FILE.to_string(),
            risk_file: RISK_SUMMARY_FILE.to_string(),
            cluster_file: CLUSTER_SUMMARY_FILE.to_string(),
            feature_file: FEATURE_IMPORTANCE_FILE.to_string(),
        }
    }

    /// Override the daily-metrics filename, e.g. to point at
    /// `daily_metrics_summary.csv` instead of the full table.
    pub fn with_daily_file(mut self, name: &str) -> Self {
        self.daily_file = name.to_string();
        self
    }

    pub fn with_risk_file(mut self, name: &str) -> Self {
        self.risk_file = name.to_string();
        self
    }

    pub fn with_cluster_file(mut self, name: &str) -> Self {
        self.cluster_file = name.to_string();
        self
    }

    pub fn with_feature_file(mut self, name: &str) -> Self {
        self.feature_file = name.to_string();
        self
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn open(&self, file: &str) -> Result<File, RegimescopeError> {
        let path = self.base_path.join(file);
        File::open(&path).map_err(|e| RegimescopeError::DataUnavailable {
            source_id: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl TablePort for CsvTableAdapter {
    fn load_daily(&self) -> Result<Vec<DailyMetricRow>, RegimescopeError> {
        parse_daily_metrics(self.open(&self.daily_file)?)
    }

    fn load_risk(&self) -> Result<Vec<RiskSummaryRow>, RegimescopeError> {
        parse_risk_summary(self.open(&self.risk_file)?)
    }

    fn load_clusters(&self) -> Result<Vec<ClusterSummaryRow>, RegimescopeError> {
        parse_cluster_summary(self.open(&self.cluster_file)?)
    }

    fn load_features(&self) -> Result<Vec<FeatureImportanceRow>, RegimescopeError> {
        parse_feature_importance(self.open(&self.feature_file)?)
    }
}

struct TableReader {
    table: &'static str,
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
}

impl TableReader {
    fn from_reader<R: Read>(table: &'static str, reader: R) -> Result<Self, RegimescopeError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| RegimescopeError::CsvParse {
                table: table.to_string(),
                reason: e.to_string(),
            })?
            .clone();

        let mut records = Vec::new();
        for result in rdr.records() {
            records.push(result.map_err(|e| RegimescopeError::CsvParse {
                table: table.to_string(),
                reason: e.to_string(),
            })?);
        }

        Ok(Self {
            table,
            headers,
            records,
        })
    }

    fn require(&self, column: &str) -> Result<usize, RegimescopeError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| RegimescopeError::SchemaMismatch {
                table: self.table.to_string(),
                column: column.to_string(),
            })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    fn string(&self, record: &csv::StringRecord, idx: usize) -> String {
        record.get(idx).unwrap_or("").to_string()
    }

    fn f64(&self, record: &csv::StringRecord, idx: usize, column: &str) -> Result<f64, RegimescopeError> {
        let raw = record.get(idx).unwrap_or("");
        raw.trim()
            .parse()
            .map_err(|_| RegimescopeError::CsvParse {
                table: self.table.to_string(),
                reason: format!("invalid numeric value '{}' in column '{}'", raw, column),
            })
    }

    fn date(&self, record: &csv::StringRecord, idx: usize, column: &str) -> Result<NaiveDate, RegimescopeError> {
        let raw = record.get(idx).unwrap_or("");
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RegimescopeError::CsvParse {
            table: self.table.to_string(),
            reason: format!("invalid date '{}' in column '{}', expected YYYY-MM-DD", raw, column),
        })
    }
}

/// Parse a daily-metrics table from any byte stream with a header row.
/// Used both for the on-disk table and for user-supplied uploads.
pub fn parse_daily_metrics<R: Read>(reader: R) -> Result<Vec<DailyMetricRow>, RegimescopeError> {
    let t = TableReader::from_reader("daily_metrics", reader)?;
    let date = t.require("date")?;
    let group = t.require("sentiment_group")?;
    let pnl = t.require("daily_pnl")?;
    let win_rate = t.require("daily_win_rate")?;

    let mut rows = Vec::with_capacity(t.records.len());
    for record in &t.records {
        rows.push(DailyMetricRow {
            date: t.date(record, date, "date")?,
            sentiment_group: t.string(record, group),
            daily_pnl: t.f64(record, pnl, "daily_pnl")?,
            daily_win_rate: t.f64(record, win_rate, "daily_win_rate")?,
        });
    }
    Ok(rows)
}

pub fn parse_risk_summary<R: Read>(reader: R) -> Result<Vec<RiskSummaryRow>, RegimescopeError> {
    let t = TableReader::from_reader("risk_summary", reader)?;
    let group = t.require("sentiment_group")?;
    let score = t.require("risk_adjusted_score")?;
    let avg_pnl = t.optional("avg_daily_pnl");
    let pnl_std = t.optional("pnl_std");

    let mut rows = Vec::with_capacity(t.records.len());
    for record in &t.records {
        rows.push(RiskSummaryRow {
            sentiment_group: t.string(record, group),
            risk_adjusted_score: t.f64(record, score, "risk_adjusted_score")?,
            avg_daily_pnl: match avg_pnl {
                Some(idx) => Some(t.f64(record, idx, "avg_daily_pnl")?),
                None => None,
            },
            pnl_std: match pnl_std {
                Some(idx) => Some(t.f64(record, idx, "pnl_std")?),
                None => None,
            },
        });
    }
    Ok(rows)
}

pub fn parse_cluster_summary<R: Read>(reader: R) -> Result<Vec<ClusterSummaryRow>, RegimescopeError> {
    let t = TableReader::from_reader("cluster_summary", reader)?;
    let cluster = t.require("cluster")?;
    let size = t.require("avg_trade_size_usd")?;
    let count = t.require("daily_trade_count")?;
    let vol = t.require("pnl_volatility")?;

    let mut rows = Vec::with_capacity(t.records.len());
    for record in &t.records {
        rows.push(ClusterSummaryRow {
            cluster: t.string(record, cluster),
            avg_trade_size_usd: t.f64(record, size, "avg_trade_size_usd")?,
            daily_trade_count: t.f64(record, count, "daily_trade_count")?,
            pnl_volatility: t.f64(record, vol, "pnl_volatility")?,
        });
    }
    Ok(rows)
}

pub fn parse_feature_importance<R: Read>(
    reader: R,
) -> Result<Vec<FeatureImportanceRow>, RegimescopeError> {
    let t = TableReader::from_reader("feature_importance", reader)?;
    let feature = t.require("feature")?;
    let importance = t.require("importance")?;

    let mut rows = Vec::with_capacity(t.records.len());
    for record in &t.records {
        rows.push(FeatureImportanceRow {
            feature: t.string(record, feature),
            importance: t.f64(record, importance, "importance")?,
        });
    }
    Ok(rows)
}
