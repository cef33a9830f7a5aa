//! Core Janitor implementation: snapshot gathering, classification and closing

use crate::{classify, CloseReport, Closer, JanitorConfig, JanitorError};
use chansweep_domain::traits::NodeClient;
use chansweep_domain::window::unix_now;
use chansweep_domain::{ActivityWindow, ChanId, Channel, ClassificationResult};
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Result of one inspection run
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Window used for every query and comparison in this run
    pub window: ActivityWindow,

    /// Open channels at the time of the run
    pub channels: Vec<Channel>,

    /// Hot/cold partition of `channels`
    pub classification: ClassificationResult,
}

impl Inspection {
    /// Ids of channels with no activity in the window, ascending
    pub fn dormant_ids(&self) -> Vec<ChanId> {
        self.classification.cold_ids()
    }

    /// Channels with no activity in the window, in snapshot order
    pub fn dormant_channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels
            .iter()
            .filter(|c| self.classification.is_cold(c.chan_id))
    }
}

/// Janitor service for finding and closing dormant channels
///
/// # Examples
///
/// ```
/// use chansweep_domain::{ChanId, Channel, ChannelGraphEdge};
/// use chansweep_janitor::Janitor;
/// use chansweep_lnd::MockNode;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let node = Arc::new(
///     MockNode::new()
///         .with_channel(Channel::new(ChanId::new(3), "abcd:0"))
///         .with_edge(ChannelGraphEdge {
///             chan_id: ChanId::new(3),
///             last_update: 0,
///             chan_point: Some("abcd:0".to_string()),
///         }),
/// );
/// let janitor = Janitor::default_config();
///
/// let inspection = janitor.inspect(Arc::clone(&node)).await?;
/// assert_eq!(inspection.dormant_ids(), vec![ChanId::new(3)]);
///
/// let report = janitor.close(node, &inspection.dormant_ids()).await;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self { config }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Get the active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Gather snapshots from the node and classify its channels
    ///
    /// Any stream failure aborts the run; no partial classification is
    /// returned.
    pub async fn inspect<C>(&self, client: Arc<C>) -> Result<Inspection, JanitorError>
    where
        C: NodeClient + 'static,
    {
        self.inspect_at(client, unix_now()).await
    }

    /// Same as [`inspect`](Self::inspect) with an explicit current time
    pub async fn inspect_at<C>(&self, client: Arc<C>, now: u64) -> Result<Inspection, JanitorError>
    where
        C: NodeClient + 'static,
    {
        self.config.validate()?;

        let window = self.config.activity_window(now);
        let since = window.since();
        tracing::info!("Inspecting channels for activity since {}", since);

        let (channels, invoices, payments, forwards) = tokio::try_join!(
            fetch("channels", client.list_channels()),
            fetch("invoices", client.list_invoices(since)),
            fetch("payments", client.list_payments(since)),
            fetch("forwards", client.list_forwarding_events(since)),
        )?;

        tracing::debug!(
            "Fetched {} channels, {} invoice records, {} payments, {} forwards",
            channels.len(),
            invoices.len(),
            payments.len(),
            forwards.len()
        );

        let mut lookups = JoinSet::new();
        for channel in &channels {
            let client = Arc::clone(&client);
            let id = channel.chan_id;
            lookups.spawn(async move {
                let edge = client
                    .get_channel_graph_edge(id)
                    .await
                    .map_err(|e| e.to_string());
                (id, edge)
            });
        }

        // Dropping the set on error aborts the remaining lookups
        let mut edges = HashMap::with_capacity(channels.len());
        while let Some(joined) = lookups.join_next().await {
            let (id, edge) = joined.map_err(|e| JanitorError::Worker(e.to_string()))?;
            match edge.map_err(|reason| JanitorError::Fetch {
                stream: "edges",
                reason,
            })? {
                Some(edge) => {
                    edges.insert(id, edge);
                }
                None => tracing::debug!("No graph edge for channel {}", id),
            }
        }

        let classification = classify(&channels, &edges, &invoices, &payments, &forwards, window);

        tracing::info!(
            "Found {} active and {} inactive channels out of {}",
            classification.hot().len(),
            classification.cold().len(),
            channels.len()
        );

        Ok(Inspection {
            window,
            channels,
            classification,
        })
    }

    /// Close `ids` concurrently using the configured close options
    ///
    /// Never fails as a whole; per-channel failures are in the report.
    pub async fn close<C>(&self, client: Arc<C>, ids: &[ChanId]) -> CloseReport
    where
        C: NodeClient + 'static,
    {
        let start = Instant::now();

        let outcomes = Closer::new(client)
            .with_options(self.config.close_options())
            .with_dry_run(self.config.dry_run)
            .with_timeout(self.config.close_timeout())
            .close_all(ids)
            .await;

        let report = CloseReport::new(outcomes, start.elapsed());

        tracing::info!(
            "Close run finished: {} closed, {} failed, {} skipped",
            report.closed(),
            report.failed(),
            report.skipped()
        );

        report
    }
}

async fn fetch<T, E, F>(stream: &'static str, request: F) -> Result<T, JanitorError>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    request.await.map_err(|e| {
        tracing::warn!("Fetching {} failed: {}", stream, e);
        JanitorError::Fetch {
            stream,
            reason: e.to_string(),
        }
    })
}
