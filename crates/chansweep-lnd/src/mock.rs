//! In-memory node for deterministic testing
//!
//! `MockNode` answers every `NodeClient` call from seeded data without any
//! network access. Failures and latency can be injected per channel or per
//! stream, and close calls are recorded so tests can assert on them.

use crate::NodeError;
use async_trait::async_trait;
use chansweep_domain::traits::NodeClient;
use chansweep_domain::{
    ChanId, Channel, ChannelGraphEdge, ChannelPoint, CloseOptions, ForwardingEvent, Invoice,
    NodeInfo, Payment,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Snapshot streams whose retrieval can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockStream {
    /// `list_channels`
    Channels,
    /// `get_channel_graph_edge` (for every id)
    Edges,
    /// `list_invoices`
    Invoices,
    /// `list_payments`
    Payments,
    /// `list_forwarding_events`
    Forwards,
}

#[derive(Debug, Default)]
struct MockState {
    info: NodeInfo,
    channels: Vec<Channel>,
    edges: HashMap<ChanId, ChannelGraphEdge>,
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    forwards: Vec<ForwardingEvent>,
    failing_streams: HashSet<MockStream>,
    failing_edges: HashMap<ChanId, String>,
    failing_closes: HashMap<String, String>,
    close_delays: HashMap<String, Duration>,
    close_response: String,
    close_calls: Vec<(ChannelPoint, CloseOptions)>,
    edge_lookups: Vec<ChanId>,
    since_requests: Vec<u64>,
}

/// Mock node for deterministic testing
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions while the code under test owns another.
///
/// # Examples
///
/// ```
/// use chansweep_domain::{ChanId, Channel, ChannelGraphEdge};
/// use chansweep_lnd::{MockNode, MockStream};
///
/// let node = MockNode::new()
///     .with_channel(Channel::new(ChanId::new(3), "abcd:0"))
///     .with_edge(ChannelGraphEdge {
///         chan_id: ChanId::new(3),
///         last_update: 0,
///         chan_point: Some("abcd:0".to_string()),
///     })
///     .failing_stream(MockStream::Payments);
/// assert!(node.close_calls().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    state: Arc<Mutex<MockState>>,
}

impl MockNode {
    /// Create an empty mock node
    pub fn new() -> Self {
        let node = Self::default();
        node.state().close_response = r#"{"result":{"close_pending":{}}}"#.to_string();
        node
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls from others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Set the node info returned by `get_info`
    pub fn with_info(self, info: NodeInfo) -> Self {
        self.state().info = info;
        self
    }

    /// Add an open channel
    pub fn with_channel(self, channel: Channel) -> Self {
        self.state().channels.push(channel);
        self
    }

    /// Add a graph edge
    pub fn with_edge(self, edge: ChannelGraphEdge) -> Self {
        self.state().edges.insert(edge.chan_id, edge);
        self
    }

    /// Add an invoice record
    pub fn with_invoice(self, invoice: Invoice) -> Self {
        self.state().invoices.push(invoice);
        self
    }

    /// Add a payment
    pub fn with_payment(self, payment: Payment) -> Self {
        self.state().payments.push(payment);
        self
    }

    /// Add a forwarding event
    pub fn with_forward(self, event: ForwardingEvent) -> Self {
        self.state().forwards.push(event);
        self
    }

    /// Make every call for `stream` fail
    pub fn failing_stream(self, stream: MockStream) -> Self {
        self.state().failing_streams.insert(stream);
        self
    }

    /// Make the edge lookup for one channel fail
    pub fn failing_edge(self, chan_id: ChanId, reason: impl Into<String>) -> Self {
        self.state().failing_edges.insert(chan_id, reason.into());
        self
    }

    /// Make closing the channel at `point` (`txid:vout`) fail
    pub fn failing_close(self, point: impl Into<String>, reason: impl Into<String>) -> Self {
        self.state().failing_closes.insert(point.into(), reason.into());
        self
    }

    /// Delay the close of the channel at `point` (`txid:vout`)
    pub fn delayed_close(self, point: impl Into<String>, delay: Duration) -> Self {
        self.state().close_delays.insert(point.into(), delay);
        self
    }

    /// Close requests received so far, in arrival order
    pub fn close_calls(&self) -> Vec<(ChannelPoint, CloseOptions)> {
        self.state().close_calls.clone()
    }

    /// Edge lookups received so far, in arrival order
    pub fn edge_lookups(&self) -> Vec<ChanId> {
        self.state().edge_lookups.clone()
    }

    /// `since` values passed to the invoice, payment and forward listings
    pub fn since_requests(&self) -> Vec<u64> {
        self.state().since_requests.clone()
    }

    fn check_stream(&self, stream: MockStream) -> Result<(), NodeError> {
        if self.state().failing_streams.contains(&stream) {
            return Err(NodeError::Communication(format!("mock {:?} unavailable", stream)));
        }
        Ok(())
    }
}

#[async_trait]
impl NodeClient for MockNode {
    type Error = NodeError;

    async fn get_info(&self) -> Result<NodeInfo, NodeError> {
        Ok(self.state().info.clone())
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, NodeError> {
        self.check_stream(MockStream::Channels)?;
        Ok(self.state().channels.clone())
    }

    async fn get_channel_graph_edge(
        &self,
        chan_id: ChanId,
    ) -> Result<Option<ChannelGraphEdge>, NodeError> {
        self.state().edge_lookups.push(chan_id);
        self.check_stream(MockStream::Edges)?;

        let state = self.state();
        if let Some(reason) = state.failing_edges.get(&chan_id) {
            return Err(NodeError::Communication(reason.clone()));
        }
        Ok(state.edges.get(&chan_id).cloned())
    }

    async fn list_invoices(&self, since: u64) -> Result<Vec<Invoice>, NodeError> {
        self.state().since_requests.push(since);
        self.check_stream(MockStream::Invoices)?;
        Ok(self.state().invoices.clone())
    }

    async fn list_payments(&self, since: u64) -> Result<Vec<Payment>, NodeError> {
        self.state().since_requests.push(since);
        self.check_stream(MockStream::Payments)?;
        Ok(self.state().payments.clone())
    }

    async fn list_forwarding_events(&self, since: u64) -> Result<Vec<ForwardingEvent>, NodeError> {
        self.state().since_requests.push(since);
        self.check_stream(MockStream::Forwards)?;
        Ok(self.state().forwards.clone())
    }

    async fn close_channel(
        &self,
        point: &ChannelPoint,
        options: &CloseOptions,
    ) -> Result<String, NodeError> {
        let key = point.to_string();
        let delay = {
            let mut state = self.state();
            state.close_calls.push((point.clone(), options.clone()));
            state.close_delays.get(&key).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        match state.failing_closes.get(&key) {
            Some(reason) => Err(NodeError::Communication(reason.clone())),
            None => Ok(state.close_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: u64, point: Option<&str>) -> ChannelGraphEdge {
        ChannelGraphEdge {
            chan_id: ChanId::new(id),
            last_update: 0,
            chan_point: point.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_mock_edges() {
        let node = MockNode::new().with_edge(edge(1, Some("aa:0")));

        assert!(node.get_channel_graph_edge(ChanId::new(1)).await.unwrap().is_some());
        assert!(node.get_channel_graph_edge(ChanId::new(2)).await.unwrap().is_none());
        assert_eq!(node.edge_lookups(), vec![ChanId::new(1), ChanId::new(2)]);
    }

    #[tokio::test]
    async fn test_mock_failing_stream() {
        let node = MockNode::new().failing_stream(MockStream::Invoices);

        assert!(node.list_invoices(10).await.is_err());
        assert!(node.list_payments(10).await.is_ok());
        assert_eq!(node.since_requests(), vec![10, 10]);
    }

    #[tokio::test]
    async fn test_mock_close_records_calls() {
        let node = MockNode::new().failing_close("bb:1", "peer offline");
        let options = CloseOptions::default();

        assert!(node.close_channel(&ChannelPoint::new("aa", 0), &options).await.is_ok());
        let err = node
            .close_channel(&ChannelPoint::new("bb", 1), &options)
            .await
            .unwrap_err();
        assert_eq!(err, NodeError::Communication("peer offline".to_string()));
        assert_eq!(node.close_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_clone_shares_state() {
        let node = MockNode::new();
        let handle = node.clone();

        node.close_channel(&ChannelPoint::new("aa", 0), &CloseOptions::default())
            .await
            .unwrap();
        assert_eq!(handle.close_calls().len(), 1);
    }
}
