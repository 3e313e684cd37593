//! Port traits decoupling domain logic from concrete adapters.

pub mod table_port;
pub mod config_port;
