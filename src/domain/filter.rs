//! Regime selection over the daily metrics table.

use super::table::DailyMetricRow;
use std::collections::HashSet;

/// Distinct sentiment labels in first-encounter order. The observed values
/// ARE the universe of selectable regimes; there is no external enum.
pub fn regime_universe(rows: &[DailyMetricRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut universe = Vec::new();
    for row in rows {
        if seen.insert(row.sentiment_group.as_str()) {
            universe.push(row.sentiment_group.clone());
        }
    }
    universe
}

/// Restrict `rows` to those whose sentiment_group is in `selected`,
/// preserving input order. The source table is never mutated; the result is
/// a fresh view. An empty selection yields an empty table by policy: zero
/// selected labels match zero rows.
pub fn filter_by_regimes(rows: &[DailyMetricRow], selected: &HashSet<String>) -> Vec<DailyMetricRow> {
    rows.iter()
        .filter(|r| selected.contains(&r.sentiment_group))
        .cloned()
        .collect()
}
