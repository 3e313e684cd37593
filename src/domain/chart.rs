//! Chart-spec shaping: maps engine outputs and summary tables into the
//! declarative structures a rendering layer consumes. No statistics are
//! computed here beyond reordering and relabelling.

use super::table::{ClusterSummaryRow, DailyMetricRow, FeatureImportanceRow};

/// One box-plot category: a regime label and the daily PnL values observed
/// under it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
}

/// One bubble of the archetype map. `size` drives the marker radius.
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Bubble-scatter series with axis bindings resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub points: Vec<BubblePoint>,
    pub log_x: bool,
}

/// Group daily PnL by regime for the distribution box plot. Categories keep
/// first-encounter order so the chart is stable across recomputes.
pub fn pnl_by_regime(rows: &[DailyMetricRow]) -> Vec<BoxSeries> {
    let mut series: Vec<BoxSeries> = Vec::new();
    for row in rows {
        match series.iter_mut().find(|s| s.label == row.sentiment_group) {
            Some(s) => s.values.push(row.daily_pnl),
            None => series.push(BoxSeries {
                label: row.sentiment_group.clone(),
                values: vec![row.daily_pnl],
            }),
        }
    }
    series
}

/// Horizontal importance bars, sorted ascending so the strongest driver
/// renders at the top of a bottom-up bar chart.
pub fn importance_bars(features: &[FeatureImportanceRow]) -> Vec<BarEntry> {
    let mut bars: Vec<BarEntry> = features
        .iter()
        .map(|f| BarEntry {
            label: f.feature.clone(),
            value: f.importance,
        })
        .collect();
    bars.sort_by(|a, b| a.value.total_cmp(&b.value));
    bars
}

/// Archetype map: x = average trade size (log scale), y = daily trade
/// count, bubble size = PnL volatility, one point per cluster.
pub fn cluster_scatter(clusters: &[ClusterSummaryRow]) -> ScatterSpec {
    ScatterSpec {
        points: clusters
            .iter()
            .map(|c| BubblePoint {
                label: c.cluster.clone(),
                x: c.avg_trade_size_usd,
                y: c.daily_trade_count,
                size: c.pnl_volatility,
            })
            .collect(),
        log_x: true,
    }
}
