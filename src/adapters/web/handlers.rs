//! HTTP request handlers for the web adapter.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::adapters::text_report::PLACEHOLDER;
use crate::cli::resolve_selection;
use crate::domain::chart::{cluster_scatter, importance_bars, pnl_by_regime};
use crate::domain::error::RegimescopeError;
use crate::domain::filter::{filter_by_regimes, regime_universe};
use crate::domain::kpi::KpiPanel;
use crate::domain::stats;
use crate::domain::table::Tables;

use super::templates::{
    BasePage, ClusterRowView, DashboardTemplate, ExplorerTemplate, RegimeOption, RiskRowView,
};
use super::{is_htmx_request, svg, AppState, WebError};

#[derive(Debug, serde::Deserialize)]
pub struct DashboardQuery {
    pub regimes: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ExplorerQuery {
    pub regime: Option<String>,
}

fn respond<T: Template>(template: &T, title: &str, headers: &HeaderMap) -> Result<Response, WebError> {
    let content = template
        .render()
        .map_err(|e| WebError::internal(e.to_string()))?;
    if is_htmx_request(headers) {
        Ok(Html(content).into_response())
    } else {
        let page = BasePage {
            title: title.to_string(),
            content,
        };
        let html = page.render().map_err(|e| WebError::internal(e.to_string()))?;
        Ok(Html(html).into_response())
    }
}

/// Fetch the dataset through the session cache. A missing source blocks the
/// whole render; a schema or parse failure in one table blanks only that
/// panel, with a notice, and the rest proceeds uncached.
fn load_tables(state: &AppState) -> Result<(Arc<Tables>, Vec<String>), WebError> {
    match state.cache.get_or_load(&state.source, || state.tables.load_all()) {
        Ok(tables) => Ok((tables, Vec::new())),
        Err(e @ RegimescopeError::DataUnavailable { .. }) => Err(e.into()),
        Err(_) => {
            let mut tables = Tables::default();
            let mut notices = Vec::new();

            match state.tables.load_daily() {
                Ok(rows) => tables.daily = rows,
                Err(e @ RegimescopeError::DataUnavailable { .. }) => return Err(e.into()),
                Err(e) => notices.push(format!("daily metrics panel unavailable: {e}")),
            }
            match state.tables.load_risk() {
                Ok(rows) => tables.risk = rows,
                Err(e @ RegimescopeError::DataUnavailable { .. }) => return Err(e.into()),
                Err(e) => notices.push(format!("risk panel unavailable: {e}")),
            }
            match state.tables.load_clusters() {
                Ok(rows) => tables.clusters = rows,
                Err(e @ RegimescopeError::DataUnavailable { .. }) => return Err(e.into()),
                Err(e) => notices.push(format!("archetype panel unavailable: {e}")),
            }
            match state.tables.load_features() {
                Ok(rows) => tables.features = rows,
                Err(e @ RegimescopeError::DataUnavailable { .. }) => return Err(e.into()),
                Err(e) => notices.push(format!("volatility drivers panel unavailable: {e}")),
            }

            Ok((Arc::new(tables), notices))
        }
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => PLACEHOLDER.to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let (tables, notices) = load_tables(&state)?;

    let universe = regime_universe(&tables.daily);
    let selected = resolve_selection(query.regimes.as_deref(), &universe);
    let filtered = filter_by_regimes(&tables.daily, &selected);

    let kpi = KpiPanel::compute(&filtered);
    let trend = stats::volatility_trend(&filtered);

    let template = DashboardTemplate {
        regimes: universe
            .iter()
            .map(|label| RegimeOption {
                checked: selected.contains(label),
                label: label.clone(),
            })
            .collect(),
        sharpe: fmt_opt(kpi.sharpe_proxy, 2),
        volatility: fmt_opt(kpi.pnl_volatility, 0),
        active_days: kpi.active_days,
        dominant: kpi.dominant_regime.unwrap_or_else(|| PLACEHOLDER.to_string()),
        win_rate: fmt_pct(stats::avg_win_rate(&filtered).ok()),
        box_svg: svg::box_plot_svg(&pnl_by_regime(&filtered)),
        bars_svg: svg::importance_bars_svg(&importance_bars(&tables.features)),
        scatter_svg: svg::cluster_scatter_svg(&cluster_scatter(&tables.clusters)),
        trend_svg: svg::trend_line_svg(&trend),
        risk_rows: tables
            .risk
            .iter()
            .map(|r| RiskRowView {
                regime: r.sentiment_group.clone(),
                score: format!("{:.4}", r.risk_adjusted_score),
                avg_pnl: fmt_opt(r.avg_daily_pnl, 2),
                pnl_std: fmt_opt(r.pnl_std, 2),
            })
            .collect(),
        cluster_rows: tables
            .clusters
            .iter()
            .map(|c| ClusterRowView {
                cluster: c.cluster.clone(),
                trade_size: format!("{:.2}", c.avg_trade_size_usd),
                trade_count: format!("{:.2}", c.daily_trade_count),
                volatility: format!("{:.2}", c.pnl_volatility),
            })
            .collect(),
        notices,
    };

    respond(&template, "Regime Intelligence Terminal", &headers)
}

pub async fn explorer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ExplorerQuery>,
) -> Result<Response, WebError> {
    let (tables, _notices) = load_tables(&state)?;

    let universe = regime_universe(&tables.daily);
    let regime = match query.regime {
        Some(r) if !r.is_empty() => r,
        _ => universe
            .first()
            .cloned()
            .ok_or_else(|| WebError::bad_request("no regimes observed in daily metrics"))?,
    };
    if !universe.contains(&regime) {
        return Err(WebError::bad_request(format!(
            "unknown regime '{}'",
            regime
        )));
    }

    let selected = std::iter::once(regime.clone()).collect();
    let filtered = filter_by_regimes(&tables.daily, &selected);
    let kpi = KpiPanel::compute(&filtered);

    let template = ExplorerTemplate {
        universe,
        sharpe: fmt_opt(kpi.sharpe_proxy, 2),
        volatility: fmt_opt(kpi.pnl_volatility, 0),
        active_days: kpi.active_days,
        dominant: kpi.dominant_regime.unwrap_or_else(|| PLACEHOLDER.to_string()),
        win_rate: fmt_pct(stats::avg_win_rate(&filtered).ok()),
        trend_svg: svg::trend_line_svg(&stats::volatility_trend(&filtered)),
        regime,
    };

    respond(&template, "Regime Explorer", &headers)
}

pub async fn not_found() -> WebError {
    WebError::not_found("page not found")
}
