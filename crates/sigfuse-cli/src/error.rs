use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] sigfuse_core::ValidationError),

    #[error("invalid batch entry '{0}', expected COIN or COIN:PAIR")]
    BatchEntry(String),

    #[error("strict mode failed: no source answered for {coin}/{pair}")]
    DegradedSignal { coin: String, pair: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] sigfuse_core::ConfigError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::BatchEntry(_) => 2,
            Self::DegradedSignal { .. } => 3,
            Self::Serialization(_) => 4,
            Self::Config(_) => 11,
        }
    }
}
