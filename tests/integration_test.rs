//! Integration tests driving CSV fixtures on disk through the full
//! load → filter → aggregate → shape pipeline.

mod common;

use common::*;
use regimescope::adapters::cache::{upload_key, SourceKey, TableCache};
use regimescope::adapters::csv_tables::{
    self, CsvTableAdapter, CLUSTER_SUMMARY_FILE, DAILY_METRICS_FILE, FEATURE_IMPORTANCE_FILE,
    RISK_SUMMARY_FILE,
};
use regimescope::domain::chart::{cluster_scatter, importance_bars, pnl_by_regime};
use regimescope::domain::error::RegimescopeError;
use regimescope::domain::filter::{filter_by_regimes, regime_universe};
use regimescope::domain::kpi::KpiPanel;
use regimescope::domain::stats;
use regimescope::ports::table_port::TablePort;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DAILY_CSV: &str = "date,sentiment_group,daily_pnl,daily_win_rate\n\
    2024-01-01,Greed,100.0,0.6\n\
    2024-01-01,Fear,-50.0,0.4\n\
    2024-01-02,Greed,200.0,0.7\n\
    2024-01-02,Fear,-100.0,0.3\n";

fn write_fixture_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_path_buf();

    fs::write(path.join(DAILY_METRICS_FILE), DAILY_CSV).unwrap();
    fs::write(
        path.join(RISK_SUMMARY_FILE),
        "sentiment_group,risk_adjusted_score\nGreed,1.5\nFear,-0.8\n",
    )
    .unwrap();
    fs::write(
        path.join(CLUSTER_SUMMARY_FILE),
        "cluster,avg_trade_size_usd,daily_trade_count,pnl_volatility\n\
         0,800.0,15.0,120.0\n1,4000.0,3.0,300.0\n2,90000.0,1.2,2500.0\n",
    )
    .unwrap();
    fs::write(
        path.join(FEATURE_IMPORTANCE_FILE),
        "feature,importance\nvolume,0.12\natr,0.41\nspread,0.25\n",
    )
    .unwrap();

    (dir, path)
}

fn select(labels: &[&str]) -> HashSet<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

mod full_pipeline {
    use super::*;

    #[test]
    fn load_filter_aggregate_round_trip() {
        let (_dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path);

        let daily = adapter.load_daily().unwrap();
        assert_eq!(daily.len(), 4);

        // Round-trip: full-universe filter preserves the row count.
        let universe: HashSet<String> = regime_universe(&daily).into_iter().collect();
        let all = filter_by_regimes(&daily, &universe);
        assert_eq!(stats::active_count(&all), 4);
        assert_eq!(all, daily);
    }

    #[test]
    fn greed_selection_is_independent_of_fear_rows() {
        let (_dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path);
        let daily = adapter.load_daily().unwrap();

        let greed = filter_by_regimes(&daily, &select(&["Greed"]));
        assert_eq!(stats::active_count(&greed), 2);

        // Sharpe proxy computed strictly from the two Greed rows:
        // mean 150, sample stddev sqrt(5000).
        let expected = 150.0 / 5000.0_f64.sqrt();
        let actual = stats::sharpe_proxy(&greed).unwrap();
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn kpi_panel_over_fixture() {
        let (_dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path);
        let daily = adapter.load_daily().unwrap();

        let panel = KpiPanel::compute(&daily);
        assert_eq!(panel.active_days, 4);
        assert!(panel.sharpe_proxy.is_some());
        assert!(panel.pnl_volatility.is_some());
        // Greed and Fear tie at 2 rows each; Greed was observed first.
        assert_eq!(panel.dominant_regime.as_deref(), Some("Greed"));
    }

    #[test]
    fn volatility_trend_per_date_over_fixture() {
        let (_dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path);
        let daily = adapter.load_daily().unwrap();

        let trend = stats::volatility_trend(&daily);
        assert_eq!(trend.len(), 2);
        // Day 1: stddev of [100, -50]; day 2: stddev of [200, -100].
        assert!((trend[0].volatility.unwrap() - 11250.0_f64.sqrt()).abs() < 1e-9);
        assert!((trend[1].volatility.unwrap() - 45000.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_blanks_every_kpi() {
        let (_dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path);
        let daily = adapter.load_daily().unwrap();

        let filtered = filter_by_regimes(&daily, &HashSet::new());
        let panel = KpiPanel::compute(&filtered);
        assert_eq!(panel.active_days, 0);
        assert!(panel.sharpe_proxy.is_none());
        assert!(panel.pnl_volatility.is_none());
        assert!(panel.dominant_regime.is_none());
    }

    #[test]
    fn chart_shaping_over_fixture() {
        let (_dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path);
        let tables = adapter.load_all().unwrap();

        let boxes = pnl_by_regime(&tables.daily);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].label, "Greed");

        let bars = importance_bars(&tables.features);
        assert_eq!(bars[0].label, "volume");
        assert_eq!(bars[2].label, "atr");

        let scatter = cluster_scatter(&tables.clusters);
        assert_eq!(scatter.points.len(), 3);
        assert!(scatter.log_x);
    }
}

mod panel_isolation {
    use super::*;

    #[test]
    fn broken_risk_table_leaves_other_tables_loadable() {
        let (_dir, path) = write_fixture_dir();
        fs::write(path.join(RISK_SUMMARY_FILE), "regime,score\nGreed,1.0\n").unwrap();

        let adapter = CsvTableAdapter::new(path);
        assert!(matches!(
            adapter.load_risk(),
            Err(RegimescopeError::SchemaMismatch { .. })
        ));
        assert!(adapter.load_daily().is_ok());
        assert!(adapter.load_clusters().is_ok());
        assert!(adapter.load_features().is_ok());
    }

    #[test]
    fn missing_directory_is_data_unavailable_for_all() {
        let adapter = CsvTableAdapter::new(PathBuf::from("/nonexistent/tables"));
        assert!(matches!(
            adapter.load_daily(),
            Err(RegimescopeError::DataUnavailable { .. })
        ));
        assert!(matches!(
            adapter.load_features(),
            Err(RegimescopeError::DataUnavailable { .. })
        ));
    }
}

mod caching {
    use super::*;

    #[test]
    fn cache_survives_fixture_deletion() {
        let (dir, path) = write_fixture_dir();
        let adapter = CsvTableAdapter::new(path.clone());
        let cache = TableCache::new();
        let key = SourceKey::Path(path);

        let first = cache.get_or_load(&key, || adapter.load_all()).unwrap();
        assert_eq!(first.daily.len(), 4);

        // Deleting the files does not invalidate the cached entry.
        drop(dir);
        let second = cache.get_or_load(&key, || adapter.load_all()).unwrap();
        assert_eq!(second.daily.len(), 4);
    }

    #[test]
    fn upload_identity_matches_parsed_content() {
        let key = upload_key(DAILY_CSV.as_bytes());
        let rows = csv_tables::parse_daily_metrics(DAILY_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(key, upload_key(DAILY_CSV.as_bytes()));
    }
}

mod mock_port {
    use super::*;

    #[test]
    fn load_all_composes_the_four_tables() {
        let port = MockTablePort::new()
            .with_daily(vec![daily_row(1, "Greed", 10.0, 0.5)])
            .with_risk(vec![risk_row("Greed", 1.0)])
            .with_clusters(vec![cluster_row("0", 100.0, 5.0, 20.0)])
            .with_features(vec![feature_row("atr", 0.4)]);

        let tables = port.load_all().unwrap();
        assert_eq!(tables.daily.len(), 1);
        assert_eq!(tables.risk.len(), 1);
        assert_eq!(tables.clusters.len(), 1);
        assert_eq!(tables.features.len(), 1);
    }

    #[test]
    fn load_all_propagates_a_broken_table() {
        let port = MockTablePort::new()
            .with_daily(vec![daily_row(1, "Greed", 10.0, 0.5)])
            .with_broken_risk("risk_adjusted_score");

        assert!(matches!(
            port.load_all(),
            Err(RegimescopeError::SchemaMismatch { .. })
        ));
    }
}
