//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::cache::upload_key;
use crate::adapters::csv_tables::{self, CsvTableAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report;
use crate::domain::chart::{cluster_scatter, importance_bars, pnl_by_regime};
use crate::domain::error::RegimescopeError;
use crate::domain::filter::{filter_by_regimes, regime_universe};
use crate::domain::kpi::KpiPanel;
use crate::domain::stats;
use crate::domain::table::DailyMetricRow;
use crate::ports::config_port::ConfigPort;
use crate::ports::table_port::TablePort;

#[derive(Parser, Debug)]
#[command(name = "regimescope", about = "Trader regime intelligence dashboards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the regime dashboard as text
    Report {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated regime labels; default is every observed label
        #[arg(long)]
        regimes: Option<String>,
    },
    /// Ad-hoc explorer for a single regime
    Explore {
        #[arg(long)]
        regime: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate a user-supplied daily-metrics CSV
    Validate {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show row counts and date ranges for the configured tables
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            data_dir,
            regimes,
        } => run_report(config.as_ref(), data_dir.as_deref(), regimes.as_deref()),
        Command::Explore {
            regime,
            config,
            data_dir,
        } => run_explore(&regime, config.as_ref(), data_dir.as_deref()),
        Command::Validate { file } => run_validate(&file),
        Command::Info { config, data_dir } => run_info(config.as_ref(), data_dir.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = RegimescopeError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Resolve the data directory and per-table filename overrides into a CSV
/// adapter. `--data-dir` wins over `[data] dir`; with neither the adapter
/// cannot be built.
pub fn build_table_adapter(
    config: Option<&dyn ConfigPort>,
    data_dir_override: Option<&Path>,
) -> Result<CsvTableAdapter, RegimescopeError> {
    let dir = match data_dir_override {
        Some(d) => d.to_path_buf(),
        None => config
            .and_then(|c| c.get_string("data", "dir"))
            .map(PathBuf::from)
            .ok_or_else(|| RegimescopeError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            })?,
    };

    let mut adapter = CsvTableAdapter::new(dir);
    if let Some(config) = config {
        if let Some(name) = config.get_string("data", "daily_metrics") {
            adapter = adapter.with_daily_file(&name);
        }
        if let Some(name) = config.get_string("data", "risk_summary") {
            adapter = adapter.with_risk_file(&name);
        }
        if let Some(name) = config.get_string("data", "cluster_summary") {
            adapter = adapter.with_cluster_file(&name);
        }
        if let Some(name) = config.get_string("data", "feature_importance") {
            adapter = adapter.with_feature_file(&name);
        }
    }
    Ok(adapter)
}

/// Turn a `--regimes` argument into the selected label set. `None` selects
/// the whole observed universe; an explicit empty string selects nothing.
pub fn resolve_selection(arg: Option<&str>, universe: &[String]) -> HashSet<String> {
    match arg {
        None => universe.iter().cloned().collect(),
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

fn resolve_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    match path {
        Some(p) => load_config(p).map(Some),
        None => Ok(None),
    }
}

fn build_adapter_or_exit(
    config: Option<&PathBuf>,
    data_dir: Option<&Path>,
) -> Result<CsvTableAdapter, ExitCode> {
    let config = resolve_config(config)?;
    build_table_adapter(config.as_ref().map(|c| c as &dyn ConfigPort), data_dir).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Load one summary table, distinguishing session-fatal failures from
/// panel-local ones: a missing file aborts, a schema or parse problem only
/// blanks the affected panel.
fn load_panel<T>(
    name: &str,
    result: Result<Vec<T>, RegimescopeError>,
) -> Result<Option<Vec<T>>, ExitCode> {
    match result {
        Ok(rows) => Ok(Some(rows)),
        Err(e @ RegimescopeError::DataUnavailable { .. }) => {
            eprintln!("error: {e}");
            Err(ExitCode::from(&e))
        }
        Err(e) => {
            eprintln!("warning: {name} panel unavailable: {e}");
            Ok(None)
        }
    }
}

fn render_daily_panels(rows: &[DailyMetricRow]) {
    println!("{}", text_report::format_kpi_panel(&KpiPanel::compute(rows)));
    match stats::avg_win_rate(rows) {
        Ok(rate) => println!("Avg Daily Win Rate: {:.1}%\n", rate * 100.0),
        Err(_) => println!("Avg Daily Win Rate: {}\n", text_report::PLACEHOLDER),
    }
    println!("{}", text_report::format_regime_distribution(&pnl_by_regime(rows)));
    println!(
        "{}",
        text_report::format_volatility_trend(&stats::volatility_trend(rows))
    );
}

fn run_report(
    config: Option<&PathBuf>,
    data_dir: Option<&Path>,
    regimes: Option<&str>,
) -> ExitCode {
    let adapter = match build_adapter_or_exit(config, data_dir) {
        Ok(a) => a,
        Err(code) => return code,
    };

    eprintln!("Loading tables from {}", adapter.base_path().display());

    let daily = match load_panel("daily metrics", adapter.load_daily()) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let risk = match load_panel("risk summary", adapter.load_risk()) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let clusters = match load_panel("archetype", adapter.load_clusters()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let features = match load_panel("volatility drivers", adapter.load_features()) {
        Ok(f) => f,
        Err(code) => return code,
    };

    if let Some(daily) = &daily {
        let universe = regime_universe(daily);
        let selected = resolve_selection(regimes, &universe);
        eprintln!(
            "Regimes: {} observed, {} selected",
            universe.len(),
            selected.len()
        );
        let filtered = filter_by_regimes(daily, &selected);
        render_daily_panels(&filtered);
    }

    if let Some(features) = &features {
        println!("{}", text_report::format_importance_bars(&importance_bars(features)));
    }
    if let Some(clusters) = &clusters {
        // Scatter axes collapse to a table in text mode.
        let _ = cluster_scatter(clusters);
        println!("{}", text_report::format_cluster_table(clusters));
    }
    if let Some(risk) = &risk {
        println!("{}", text_report::format_risk_table(risk));
    }

    ExitCode::SUCCESS
}

fn run_explore(regime: &str, config: Option<&PathBuf>, data_dir: Option<&Path>) -> ExitCode {
    let adapter = match build_adapter_or_exit(config, data_dir) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let daily = match adapter.load_daily() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let universe = regime_universe(&daily);
    if !universe.iter().any(|r| r == regime) {
        let err = RegimescopeError::InsufficientData {
            reason: format!(
                "regime '{}' not observed; available: {}",
                regime,
                universe.join(", ")
            ),
        };
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }

    let selected: HashSet<String> = [regime.to_string()].into();
    let filtered = filter_by_regimes(&daily, &selected);

    println!("== Regime Explorer: {} ==\n", regime);
    render_daily_panels(&filtered);
    ExitCode::SUCCESS
}

fn run_validate(file: &PathBuf) -> ExitCode {
    let bytes = match fs::read(file) {
        Ok(b) => b,
        Err(e) => {
            let err = RegimescopeError::DataUnavailable {
                source_id: file.display().to_string(),
                reason: e.to_string(),
            };
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    match csv_tables::parse_daily_metrics(bytes.as_slice()) {
        Ok(rows) => {
            let universe = regime_universe(&rows);
            println!("{}: valid daily-metrics table", file.display());
            println!("rows: {}", rows.len());
            println!("regimes: {}", universe.join(", "));
            println!("cache key: {:?}", upload_key(&bytes));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_info(config: Option<&PathBuf>, data_dir: Option<&Path>) -> ExitCode {
    let adapter = match build_adapter_or_exit(config, data_dir) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match adapter.load_daily() {
        Ok(rows) => {
            let min = rows.iter().map(|r| r.date).min();
            let max = rows.iter().map(|r| r.date).max();
            match (min, max) {
                (Some(min), Some(max)) => {
                    println!("daily_metrics: {} rows, {} to {}", rows.len(), min, max)
                }
                _ => println!("daily_metrics: 0 rows"),
            }
        }
        Err(e) => eprintln!("daily_metrics: {e}"),
    }
    match adapter.load_risk() {
        Ok(rows) => println!("risk_summary: {} rows", rows.len()),
        Err(e) => eprintln!("risk_summary: {e}"),
    }
    match adapter.load_clusters() {
        Ok(rows) => println!("cluster_summary: {} rows", rows.len()),
        Err(e) => eprintln!("cluster_summary: {e}"),
    }
    match adapter.load_features() {
        Ok(rows) => println!("feature_importance: {} rows", rows.len()),
        Err(e) => eprintln!("feature_importance: {e}"),
    }

    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::cache::{SourceKey, TableCache};
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let adapter = match build_table_adapter(Some(&config), None) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        let addr: SocketAddr = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        eprintln!("Starting web server on {}", addr);

        let source = SourceKey::Path(adapter.base_path().clone());
        let state = AppState {
            tables: Arc::new(adapter),
            cache: TableCache::new(),
            source,
        };

        let router = build_router(state);

        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async {
                let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
                axum::serve(listener, router).await.unwrap();
            });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
