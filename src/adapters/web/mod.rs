//! Web dashboard adapter.
//!
//! Axum server with an HTMX frontend rendering the regime intelligence
//! terminal: KPI cards, PnL distribution, volatility drivers, archetype
//! map and the regime volatility trend.

mod error;
mod handlers;
mod svg;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use svg::*;
pub use templates::*;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::adapters::cache::{SourceKey, TableCache};
use crate::ports::table_port::TablePort;

pub struct AppState {
    pub tables: Arc<dyn TablePort + Send + Sync>,
    pub cache: TableCache,
    pub source: SourceKey,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/explorer", get(handlers::explorer))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
