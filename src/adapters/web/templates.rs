//! HTML templates using Askama.

use askama::Template;

pub struct RegimeOption {
    pub label: String,
    pub checked: bool,
}

pub struct RiskRowView {
    pub regime: String,
    pub score: String,
    pub avg_pnl: String,
    pub pnl_std: String,
}

pub struct ClusterRowView {
    pub cluster: String,
    pub trade_size: String,
    pub trade_count: String,
    pub volatility: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub regimes: Vec<RegimeOption>,
    pub sharpe: String,
    pub volatility: String,
    pub active_days: usize,
    pub dominant: String,
    pub win_rate: String,
    pub box_svg: String,
    pub bars_svg: String,
    pub scatter_svg: String,
    pub trend_svg: String,
    pub risk_rows: Vec<RiskRowView>,
    pub cluster_rows: Vec<ClusterRowView>,
    pub notices: Vec<String>,
}

#[derive(Template)]
#[template(path = "explorer.html")]
pub struct ExplorerTemplate {
    pub regime: String,
    pub universe: Vec<String>,
    pub sharpe: String,
    pub volatility: String,
    pub active_days: usize,
    pub dominant: String,
    pub win_rate: String,
    pub trend_svg: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub status: u16,
}

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage {
    pub title: String,
    pub content: String,
}
