//! Core domain types and logic.

pub mod table;
pub mod filter;
pub mod stats;
pub mod kpi;
pub mod chart;
pub mod error;
