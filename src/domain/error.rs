//! Domain error types.

/// An error raised by a strategy's `init` or `generate_signal` hook.
///
/// Always fatal for the run that produced it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("strategy {strategy} failed: {reason}")]
pub struct StrategyError {
    pub strategy: String,
    pub reason: String,
}

impl StrategyError {
    pub fn new(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        StrategyError {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for stratbench.
#[derive(Debug, thiserror::Error)]
pub enum StratbenchError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("unknown strategy '{name}'")]
    UnknownStrategy { name: String },

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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratbenchError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        StratbenchError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&StratbenchError> for std::process::ExitCode {
    fn from(err: &StratbenchError) -> Self {
        let code: u8 = match err {
            StratbenchError::Io(_) => 1,
            StratbenchError::ConfigParse { .. }
            | StratbenchError::ConfigMissing { .. }
            | StratbenchError::ConfigInvalid { .. } => 2,
            StratbenchError::Data { .. } | StratbenchError::NoData { .. } => 3,
            StratbenchError::Strategy(_) | StratbenchError::UnknownStrategy { .. } => 4,
            StratbenchError::InvalidInput { .. } => 5,
            StratbenchError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
