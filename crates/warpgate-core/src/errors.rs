//! Error types for Warpgate

use thiserror::Error;

/// Core errors that can occur in Warpgate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Ledger read errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger unreachable at {url}")]
    Unreachable { url: String },

    #[error("Ledger returned error: {message}")]
    ApiError { message: String },

    #[error("Pool does not exist between {token_a} and {token_b}")]
    PoolNotFound { token_a: String, token_b: String },

    #[error("Malformed response from {function}: {reason}")]
    MalformedResponse { function: String, reason: String },

    #[error("Ledger request timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Address parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Address is not valid hex: {address}")]
    InvalidHex { address: String },

    #[error("Address account exceeds 32 bytes: {address}")]
    TooLong { address: String },

    #[error("Address has an empty type path: {address}")]
    InvalidTypePath { address: String },
}

/// Result type alias for Warpgate operations
pub type Result<T> = std::result::Result<T, Error>;

impl LedgerError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "ledger_unreachable",
            Self::ApiError { .. } => "ledger_api_error",
            Self::PoolNotFound { .. } => "pool_not_found",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Timeout { .. } => "ledger_timeout",
        }
    }

    /// Whether the failure is transient and the read may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unreachable { .. } | Self::Timeout { .. } | Self::ApiError { .. }
        )
    }
}
