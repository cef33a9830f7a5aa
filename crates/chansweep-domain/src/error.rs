//! Error types for parsing domain values

use thiserror::Error;

/// Errors raised when a domain value cannot be parsed from its text form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Channel id is not a decimal u64
    #[error("Invalid channel id '{0}'")]
    InvalidChanId(String),

    /// Channel point is not of the form `txid:vout`
    #[error("Invalid channel point '{0}': {1}")]
    InvalidChannelPoint(String, &'static str),
}
