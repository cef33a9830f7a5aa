//! Concurrent closure of dormant channels
//!
//! One task per channel id runs resolve -> close -> capture. Every task
//! reaches a terminal [`CloseOutcome`]; no task's failure reaches its
//! siblings or the caller.

use chansweep_domain::traits::NodeClient;
use chansweep_domain::{ChanId, ChannelPoint, CloseOptions, CloseOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Closes batches of channels through a shared node client
///
/// # Examples
///
/// ```
/// use chansweep_domain::{ChanId, ChannelGraphEdge};
/// use chansweep_janitor::Closer;
/// use chansweep_lnd::MockNode;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let node = MockNode::new().with_edge(ChannelGraphEdge {
///     chan_id: ChanId::new(3),
///     last_update: 0,
///     chan_point: Some("abcd:0".to_string()),
/// });
/// let closer = Closer::new(Arc::new(node));
///
/// let outcomes = closer.close_all(&[ChanId::new(3), ChanId::new(4)]).await;
/// assert!(outcomes[0].is_closed());
/// assert!(outcomes[1].is_skipped());
/// # }
/// ```
pub struct Closer<C> {
    client: Arc<C>,
    options: CloseOptions,
    dry_run: bool,
    timeout: Option<Duration>,
}

impl<C> Closer<C>
where
    C: NodeClient + 'static,
{
    /// Closer issuing cooperative closes with no per-channel timeout
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            options: CloseOptions::default(),
            dry_run: false,
            timeout: None,
        }
    }

    /// Set the options sent with every close request
    pub fn with_options(mut self, options: CloseOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve channel points but skip the close request
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Bound each channel's pipeline; an expired pipeline fails that channel only
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Close every channel in `ids` concurrently
    ///
    /// Returns one outcome per input id, `outcomes[i]` belonging to `ids[i]`,
    /// after every pipeline has finished. An empty input returns immediately
    /// without contacting the node.
    pub async fn close_all(&self, ids: &[ChanId]) -> Vec<CloseOutcome> {
        if ids.is_empty() {
            return Vec::new();
        }

        tracing::info!("Closing {} channel(s)", ids.len());

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let pipeline = Pipeline {
                    client: Arc::clone(&self.client),
                    chan_id: id,
                    options: self.options.clone(),
                    dry_run: self.dry_run,
                    deadline: self
                        .timeout
                        .and_then(|limit| Some((Instant::now().checked_add(limit)?, limit))),
                };
                tokio::spawn(pipeline.run())
            })
            .collect();

        let mut outcomes = Vec::with_capacity(ids.len());
        for (&id, handle) in ids.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("Close task for channel {} aborted: {}", id, e);
                    CloseOutcome::failed(id, None, format!("channel {}: task aborted: {}", id, e))
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}

/// State owned by a single channel's close task
struct Pipeline<C> {
    client: Arc<C>,
    chan_id: ChanId,
    options: CloseOptions,
    dry_run: bool,
    /// Instant the whole pipeline must finish by, with the limit it came from
    deadline: Option<(Instant, Duration)>,
}

impl<C: NodeClient> Pipeline<C> {
    async fn run(self) -> CloseOutcome {
        let id = self.chan_id;

        let resolved = match self.bounded(self.resolve()).await {
            Ok(resolved) => resolved,
            Err(limit) => {
                tracing::warn!("Resolving channel {} timed out after {:?}", id, limit);
                return CloseOutcome::failed(
                    id,
                    None,
                    format!("channel {}: resolve timed out after {:?}", id, limit),
                );
            }
        };

        let point = match resolved {
            Ok(Some(point)) => point,
            Ok(None) => {
                tracing::info!("Channel {} has no resolvable channel point, skipping", id);
                return CloseOutcome::skipped(id);
            }
            Err(reason) => {
                tracing::warn!("Resolving channel {} failed: {}", id, reason);
                return CloseOutcome::failed(id, None, format!("channel {}: {}", id, reason));
            }
        };

        if self.dry_run {
            tracing::info!("DRY RUN: Would close channel {} at {}", id, point);
            return CloseOutcome::dry_run(id, point);
        }

        // The request may already be with the node when the deadline passes,
        // so a timed-out close still reports the point it was sent for.
        match self.bounded(self.client.close_channel(&point, &self.options)).await {
            Ok(Ok(response)) => {
                tracing::info!("Close of channel {} at {} accepted", id, point);
                CloseOutcome::closed(id, point, response)
            }
            Ok(Err(e)) => {
                tracing::warn!("Closing channel {} at {} failed: {}", id, point, e);
                CloseOutcome::failed(id, Some(point), format!("channel {}: close failed: {}", id, e))
            }
            Err(limit) => {
                tracing::warn!("Closing channel {} at {} timed out after {:?}", id, point, limit);
                let reason = format!("channel {}: close timed out after {:?}", id, limit);
                CloseOutcome::failed(id, Some(point), reason)
            }
        }
    }

    /// Run `fut` against the pipeline deadline, yielding the limit on expiry
    async fn bounded<F: Future>(&self, fut: F) -> Result<F::Output, Duration> {
        match self.deadline {
            Some((deadline, limit)) => tokio::time::timeout_at(deadline, fut).await.map_err(|_| limit),
            None => Ok(fut.await),
        }
    }

    /// Look up the funding outpoint through the channel graph
    async fn resolve(&self) -> Result<Option<ChannelPoint>, String> {
        let edge = self
            .client
            .get_channel_graph_edge(self.chan_id)
            .await
            .map_err(|e| format!("resolve failed: {}", e))?;

        match edge {
            Some(edge) => edge.channel_point().map_err(|e| e.to_string()),
            None => Ok(None),
        }
    }
}
