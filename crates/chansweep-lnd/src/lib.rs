//! chansweep node client layer
//!
//! Implementations of the `NodeClient` trait from `chansweep-domain`.
//!
//! # Clients
//!
//! - `LndRestClient`: LND REST proxy with macaroon authentication
//! - `MockNode`: In-memory node for deterministic testing
//!
//! # Examples
//!
//! ```
//! use chansweep_domain::traits::NodeClient;
//! use chansweep_domain::{ChanId, Channel};
//! use chansweep_lnd::MockNode;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let node = MockNode::new().with_channel(Channel::new(ChanId::new(1), "abcd:0"));
//! let channels = node.list_channels().await.unwrap();
//! assert_eq!(channels.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod mock;
pub mod rest;
mod wire;

use thiserror::Error;

pub use config::LndConfig;
pub use mock::{MockNode, MockStream};
pub use rest::LndRestClient;

/// Errors that can occur talking to a node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Network or transport failure (connect, TLS, timeout)
    #[error("Communication error: {0}")]
    Communication(String),

    /// Node answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message from the node
        message: String,
    },

    /// Macaroon rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}
