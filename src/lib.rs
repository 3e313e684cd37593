//! regimescope — trader regime intelligence dashboards.
//!
//! Renders precomputed trading-behavior analytics (regime-conditioned PnL
//! risk, volatility-driver importance, trader-archetype clusters) from flat
//! CSV tables. Hexagonal architecture: domain logic in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
