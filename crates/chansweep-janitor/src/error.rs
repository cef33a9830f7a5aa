//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
///
/// Only the inspection path returns errors. Close failures are captured per
/// channel in [`CloseOutcome`](chansweep_domain::CloseOutcome) instead.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// A snapshot stream could not be retrieved; no partial classification is made
    #[error("Failed to fetch {stream}: {reason}")]
    Fetch {
        /// Which stream failed (channels, edges, invoices, payments, forwards)
        stream: &'static str,
        /// Underlying client error
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio task failures)
    #[error("Worker error: {0}")]
    Worker(String),
}
