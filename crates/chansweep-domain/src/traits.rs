//! Trait definitions for external interactions
//!
//! These traits define the boundary between the classification/closure logic
//! and the node. Implementations live in other crates (chansweep-lnd).

use crate::{
    ChanId, Channel, ChannelGraphEdge, ChannelPoint, CloseOptions, ForwardingEvent, Invoice,
    NodeInfo, Payment,
};
use async_trait::async_trait;

/// Authenticated read/write access to a Lightning node
///
/// Shared by many concurrent close pipelines, so implementations must be
/// `Send + Sync` and usable through a shared reference.
///
/// Implemented by the infrastructure layer (chansweep-lnd)
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Error type for node operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Node identity and sync state
    async fn get_info(&self) -> Result<NodeInfo, Self::Error>;

    /// Currently open channels
    async fn list_channels(&self) -> Result<Vec<Channel>, Self::Error>;

    /// Graph edge for a channel; `Ok(None)` if the graph has no such edge
    async fn get_channel_graph_edge(
        &self,
        chan_id: ChanId,
    ) -> Result<Option<ChannelGraphEdge>, Self::Error>;

    /// Invoice HTLC records created at or after `since` (unix seconds)
    async fn list_invoices(&self, since: u64) -> Result<Vec<Invoice>, Self::Error>;

    /// Outgoing payments created at or after `since` (unix seconds)
    async fn list_payments(&self, since: u64) -> Result<Vec<Payment>, Self::Error>;

    /// Forwarding events at or after `since` (unix seconds)
    async fn list_forwarding_events(&self, since: u64) -> Result<Vec<ForwardingEvent>, Self::Error>;

    /// Request a close of the channel funded at `point`
    ///
    /// Returns once the node has accepted the request; does not wait for the
    /// closing transaction to confirm.
    async fn close_channel(
        &self,
        point: &ChannelPoint,
        options: &CloseOptions,
    ) -> Result<String, Self::Error>;
}
