//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Chart rendering error
    #[error("Chart error: {0}")]
    ChartError(String),

    /// LLM narration error
    #[error("LLM error: {0}")]
    LlmError(#[from] advisor_llm::LlmError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Convert AdvisorError to advisor_core::Error
impl From<AdvisorError> for advisor_core::Error {
    fn from(err: AdvisorError) -> Self {
        advisor_core::Error::ProcessingFailed(err.to_string())
    }
}

/// Convert advisor_core::Error to AdvisorError
impl From<advisor_core::Error> for AdvisorError {
    fn from(err: advisor_core::Error) -> Self {
        AdvisorError::Other(err.to_string())
    }
}
