#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Dashboard renders KPI cards, charts and tables
//! - Regime query parameter drives the filtered view
//! - Explorer renders a single-regime view and rejects unknown labels
//! - Panel-local degradation when one table is broken
//! - HTMX fragment vs full page responses

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::*;
use http_body_util::BodyExt;
use regimescope::adapters::cache::{SourceKey, TableCache};
use regimescope::adapters::web::{build_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn sample_port() -> MockTablePort {
    MockTablePort::new()
        .with_daily(vec![
            daily_row(1, "Greed", 100.0, 0.6),
            daily_row(1, "Fear", -50.0, 0.4),
            daily_row(2, "Greed", 200.0, 0.7),
            daily_row(2, "Fear", -100.0, 0.3),
        ])
        .with_risk(vec![risk_row("Greed", 1.5), risk_row("Fear", -0.8)])
        .with_clusters(vec![
            cluster_row("0", 800.0, 15.0, 120.0),
            cluster_row("1", 90_000.0, 1.2, 2500.0),
        ])
        .with_features(vec![feature_row("volume", 0.12), feature_row("atr", 0.41)])
}

fn app(port: MockTablePort) -> Router {
    let state = AppState {
        tables: Arc::new(port),
        cache: TableCache::new(),
        source: SourceKey::Upload("test".to_string()),
    };
    build_router(state)
}

async fn get_body(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn dashboard_renders_all_panels() {
    let (status, body) = get_body(app(sample_port()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Regime Intelligence Terminal"));
    assert!(body.contains("Sharpe Proxy"));
    assert!(body.contains("Dominant Regime"));
    assert!(body.contains("Volatility Drivers"));
    assert!(body.contains("Behavioral Archetype Mapping"));
    assert!(body.contains("<svg"));
    assert!(body.contains("Greed"));
    assert!(body.contains("Fear"));
}

#[tokio::test]
async fn dashboard_filters_by_regime_query() {
    let (status, body) = get_body(app(sample_port()), "/?regimes=Greed").await;
    assert_eq!(status, StatusCode::OK);
    // Two Greed rows remain active.
    assert!(body.contains(r#"<div class="value">2</div>"#));
}

#[tokio::test]
async fn dashboard_empty_selection_shows_placeholders() {
    let (status, body) = get_body(app(sample_port()), "/?regimes=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("not enough data"));
    assert!(body.contains(r#"<div class="value">0</div>"#));
}

#[tokio::test]
async fn dashboard_degrades_broken_risk_panel() {
    let port = sample_port().with_broken_risk("risk_adjusted_score");
    let (status, body) = get_body(app(port), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("risk panel unavailable"));
    // Other panels still render.
    assert!(body.contains("Volatility Drivers"));
    assert!(body.contains("Sharpe Proxy"));
}

#[tokio::test]
async fn explorer_defaults_to_first_regime() {
    let (status, body) = get_body(app(sample_port()), "/explorer").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Regime Explorer: Greed"));
}

#[tokio::test]
async fn explorer_renders_selected_regime() {
    let (status, body) = get_body(app(sample_port()), "/explorer?regime=Fear").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Regime Explorer: Fear"));
}

#[tokio::test]
async fn explorer_rejects_unknown_regime() {
    let (status, body) = get_body(app(sample_port()), "/explorer?regime=Euphoria").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("unknown regime"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _body) = get_body(app(sample_port()), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn htmx_request_gets_fragment_without_page_chrome() {
    let router = app(sample_port());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/")
                .header("HX-Request", "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Sharpe Proxy"));
}

#[tokio::test]
async fn full_page_request_gets_base_chrome() {
    let (status, body) = get_body(app(sample_port()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("regimescope"));
}
