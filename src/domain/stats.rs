//! Aggregation engine: pure statistics over the daily metrics table.
//!
//! All dispersion measures use the sample standard deviation (n−1
//! denominator). Every function that is undefined for empty or singleton
//! input returns an explicit `InsufficientData` error instead of dividing
//! by zero or panicking.

use super::error::RegimescopeError;
use super::table::DailyMetricRow;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// One point of the regime volatility trend. `volatility` is `None` for
/// dates with a single observation, where the sample stddev is undefined;
/// the trend line shows a gap there rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityTrendPoint {
    pub date: NaiveDate,
    pub volatility: Option<f64>,
}

/// Sample standard deviation. `None` for fewer than two values.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

fn pnl_values(rows: &[DailyMetricRow]) -> Vec<f64> {
    rows.iter().map(|r| r.daily_pnl).collect()
}

/// mean(daily_pnl) / sample_stddev(daily_pnl), a crude risk-adjusted-return
/// measure. Errors on fewer than two rows and on zero variance.
pub fn sharpe_proxy(rows: &[DailyMetricRow]) -> Result<f64, RegimescopeError> {
    let pnl = pnl_values(rows);
    let stddev = sample_stddev(&pnl).ok_or_else(|| RegimescopeError::InsufficientData {
        reason: format!("sharpe proxy needs at least 2 rows, have {}", rows.len()),
    })?;
    if stddev == 0.0 {
        return Err(RegimescopeError::InsufficientData {
            reason: format!("zero PnL variance across {} rows", rows.len()),
        });
    }
    let mean = pnl.iter().sum::<f64>() / pnl.len() as f64;
    Ok(mean / stddev)
}

/// Sample standard deviation of daily_pnl. Errors on fewer than two rows.
pub fn pnl_volatility(rows: &[DailyMetricRow]) -> Result<f64, RegimescopeError> {
    sample_stddev(&pnl_values(rows)).ok_or_else(|| RegimescopeError::InsufficientData {
        reason: format!("volatility needs at least 2 rows, have {}", rows.len()),
    })
}

/// Number of observed days in the (filtered) table. Total: 0 for empty.
pub fn active_count(rows: &[DailyMetricRow]) -> usize {
    rows.len()
}

/// Most frequent sentiment_group, ties broken by first encounter in input
/// order (stable mode). Errors on empty input.
pub fn dominant_regime(rows: &[DailyMetricRow]) -> Result<String, RegimescopeError> {
    if rows.is_empty() {
        return Err(RegimescopeError::InsufficientData {
            reason: "dominant regime is undefined for 0 rows".into(),
        });
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for row in rows {
        let entry = counts.entry(row.sentiment_group.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(row.sentiment_group.as_str());
        }
        *entry += 1;
    }

    let mut best = order[0];
    for &label in &order[1..] {
        if counts[label] > counts[best] {
            best = label;
        }
    }
    Ok(best.to_string())
}

/// Group rows by date and compute the sample stddev of daily_pnl per group,
/// one point per distinct date, ascending.
pub fn volatility_trend(rows: &[DailyMetricRow]) -> Vec<VolatilityTrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for row in rows {
        by_date.entry(row.date).or_default().push(row.daily_pnl);
    }

    by_date
        .into_iter()
        .map(|(date, pnl)| VolatilityTrendPoint {
            date,
            volatility: sample_stddev(&pnl),
        })
        .collect()
}

/// Arithmetic mean of an extracted numeric field. Errors on empty input.
pub fn mean_by<F>(rows: &[DailyMetricRow], field: F) -> Result<f64, RegimescopeError>
where
    F: Fn(&DailyMetricRow) -> f64,
{
    if rows.is_empty() {
        return Err(RegimescopeError::InsufficientData {
            reason: "mean is undefined for 0 rows".into(),
        });
    }
    Ok(rows.iter().map(field).sum::<f64>() / rows.len() as f64)
}

/// Average daily win rate over the filtered table.
pub fn avg_win_rate(rows: &[DailyMetricRow]) -> Result<f64, RegimescopeError> {
    mean_by(rows, |r| r.daily_win_rate)
}
