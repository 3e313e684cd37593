//! Domain error types.

/// Top-level error type for regimescope.
#[derive(Debug, thiserror::Error)]
pub enum RegimescopeError {
    #[error("data unavailable from {source_id}: {reason}")]
    DataUnavailable { source_id: String, reason: String },

    #[error("schema mismatch in {table}: required column '{column}' is absent")]
    SchemaMismatch { table: String, column: String },

    #[error("CSV parse error in {table}: {reason}")]
    CsvParse { table: String, reason: String },

    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RegimescopeError {
    /// True for conditions recovered locally as a "not enough data"
    /// placeholder instead of aborting the whole render.
    pub fn is_insufficient(&self) -> bool {
        matches!(self, RegimescopeError::InsufficientData { .. })
    }
}

impl From<&RegimescopeError> for std::process::ExitCode {
    fn from(err: &RegimescopeError) -> Self {
        let code: u8 = match err {
            RegimescopeError::Io(_) => 1,
            RegimescopeError::ConfigParse { .. }
            | RegimescopeError::ConfigMissing { .. }
            | RegimescopeError::ConfigInvalid { .. } => 2,
            RegimescopeError::DataUnavailable { .. } => 3,
            RegimescopeError::SchemaMismatch { .. } | RegimescopeError::CsvParse { .. } => 4,
            RegimescopeError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
