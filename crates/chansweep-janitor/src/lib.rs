//! chansweep Janitor
//!
//! Finds Lightning channels with no recent activity and closes them.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Snapshot gathering**: fetching channels, graph edges, invoices, payments and forwards
//! - **Classification**: partitioning open channels into hot (active) and cold (dormant)
//! - **Closing**: closing every dormant channel concurrently, one task per channel
//! - **Reporting**: a per-channel outcome plus counts for every close run
//!
//! # Activity Evidence
//!
//! A channel is hot if any of these happened inside the activity window:
//!
//! | Evidence | Source | Channel marked |
//! |----------|--------|----------------|
//! | **Policy** | channel graph edge | the edge's channel, if `last_update` is after the window start |
//! | **Invoice** | settled or accepted invoices | the incoming channel of each HTLC |
//! | **Payment** | succeeded payments | the first hop of every attempt |
//! | **Forward** | forwarding history | both incoming and outgoing channel |
//!
//! Every other open channel is cold.
//!
//! # Usage
//!
//! ```no_run
//! use chansweep_janitor::{Janitor, JanitorConfig};
//! use chansweep_lnd::{LndConfig, LndRestClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lnd = LndConfig::new("https://127.0.0.1:8080").with_macaroon_path("admin.macaroon");
//!     let client = Arc::new(LndRestClient::from_config(&lnd)?);
//!     let janitor = Janitor::new(JanitorConfig::default());
//!
//!     let inspection = janitor.inspect(Arc::clone(&client)).await?;
//!     let report = janitor.close(client, &inspection.dormant_ids()).await;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use chansweep_janitor::JanitorConfig;
//!
//! // Default: two-week lookback, cooperative closes
//! let config = JanitorConfig::default();
//!
//! // Rehearsal: resolve everything, close nothing
//! let config = JanitorConfig::rehearsal();
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! lookback_days = 14
//! dry_run = false
//! force_close = false
//! sat_per_vbyte = 2
//! close_timeout_secs = 120
//! ```

#![warn(missing_docs)]

mod classifier;
mod closer;
mod config;
mod error;
mod janitor;
mod report;

pub use classifier::classify;
pub use closer::Closer;
pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{Inspection, Janitor};
pub use report::CloseReport;
