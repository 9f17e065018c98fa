//! Domain error types.

/// Top-level error type for crosstrader.
#[derive(Debug, thiserror::Error)]
pub enum CrossError {
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

    #[error("data error for {symbol}: {reason}")]
    Data { symbol: String, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data provider error: {reason}")]
    Provider { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrossError {
    pub(crate) fn data(symbol: &str, reason: impl Into<String>) -> Self {
        CrossError::Data {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        CrossError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&CrossError> for std::process::ExitCode {
    fn from(err: &CrossError) -> Self {
        let code: u8 = match err {
            CrossError::Io(_) | CrossError::Report { .. } => 1,
            CrossError::ConfigParse { .. }
            | CrossError::ConfigMissing { .. }
            | CrossError::ConfigInvalid { .. } => 2,
            CrossError::Provider { .. } => 3,
            CrossError::Data { .. } | CrossError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
