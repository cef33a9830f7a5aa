//! chansweep Domain Layer
//!
//! This crate contains the shared data model for chansweep: the snapshot
//! records read from a Lightning node, the activity window, the hot/cold
//! classification result and the per-channel close outcome. It also defines
//! the [`traits::NodeClient`] boundary that node adapters implement.
//!
//! ## Key Concepts
//!
//! - **Channel**: an open channel, identified by a [`ChanId`] and funded by a [`ChannelPoint`]
//! - **Evidence records**: invoices, payments and forwarding events that prove recent use
//! - **Activity window**: a single threshold timestamp fixed for a whole run
//! - **Classification**: the hot (active) / cold (dormant) partition of the open channels
//! - **Close outcome**: closed, failed, skipped (unresolved) or dry run, per dormant channel
//!
//! ## Architecture
//!
//! - No I/O, no runtime dependency
//! - Pure data and small invariant-preserving helpers
//! - Infrastructure implementations (LND REST, mocks) live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chan_id;
pub mod channel;
pub mod classification;
pub mod error;
pub mod evidence;
pub mod node;
pub mod outcome;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use chan_id::ChanId;
pub use channel::{Channel, ChannelGraphEdge, ChannelPoint};
pub use classification::{ClassificationResult, Evidence};
pub use error::DomainError;
pub use evidence::{ForwardingEvent, Hop, HtlcAttempt, Invoice, InvoiceState, Payment, PaymentStatus, Route};
pub use node::{CloseOptions, NodeInfo};
pub use outcome::{CloseOutcome, CloseStatus};
pub use window::ActivityWindow;
