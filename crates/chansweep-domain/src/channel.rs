//! Channel module - open channels, their funding outpoints and graph edges

use crate::{ChanId, DomainError};
use std::fmt;
use std::str::FromStr;

/// On-chain funding reference of a channel, `txid:vout`
///
/// # Examples
///
/// ```
/// use chansweep_domain::ChannelPoint;
///
/// let point: ChannelPoint = "abcd:0".parse().unwrap();
/// assert_eq!(point.txid, "abcd");
/// assert_eq!(point.vout, 0);
/// assert_eq!(point.to_string(), "abcd:0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelPoint {
    /// Funding transaction id (hex, display byte order)
    pub txid: String,

    /// Funding output index
    pub vout: u32,
}

impl ChannelPoint {
    /// Create a channel point from its parts
    pub fn new(txid: impl Into<String>, vout: u32) -> Self {
        Self {
            txid: txid.into(),
            vout,
        }
    }
}

impl fmt::Display for ChannelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

impl FromStr for ChannelPoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, vout) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| DomainError::InvalidChannelPoint(s.to_string(), "missing ':'"))?;

        if txid.is_empty() {
            return Err(DomainError::InvalidChannelPoint(s.to_string(), "empty txid"));
        }

        let vout = vout
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidChannelPoint(s.to_string(), "output index is not a number"))?;

        Ok(Self::new(txid, vout))
    }
}

/// An open channel as reported by the node
///
/// Read-only snapshot fetched once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Short channel id
    pub chan_id: ChanId,

    /// Funding outpoint, `txid:vout` as reported by the node
    pub channel_point: String,

    /// Public key of the channel peer
    pub remote_pubkey: String,

    /// Total capacity in satoshis
    pub capacity: u64,

    /// Whether the peer is currently online and the channel usable
    pub active: bool,

    /// Seconds the channel has been monitored by the node
    pub lifetime: u64,

    /// Seconds of `lifetime` during which the peer was online
    pub uptime: u64,
}

impl Channel {
    /// Create a channel with only an id and channel point (remaining fields zeroed)
    pub fn new(chan_id: ChanId, channel_point: impl Into<String>) -> Self {
        Self {
            chan_id,
            channel_point: channel_point.into(),
            remote_pubkey: String::new(),
            capacity: 0,
            active: false,
            lifetime: 0,
            uptime: 0,
        }
    }

    /// Seconds the peer was offline while monitored
    ///
    /// Informational only; it plays no part in activity classification.
    pub fn downtime(&self) -> u64 {
        self.lifetime.saturating_sub(self.uptime)
    }
}

/// Channel graph edge for a single channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGraphEdge {
    /// Short channel id the edge describes
    pub chan_id: ChanId,

    /// Last time either side updated its routing policy (unix seconds)
    pub last_update: u64,

    /// Funding outpoint, when the graph knows it
    pub chan_point: Option<String>,
}

impl ChannelGraphEdge {
    /// Parse the edge's channel point, if present
    ///
    /// Returns `Ok(None)` when the edge carries no (or an empty) channel point
    /// and an error when one is present but malformed.
    pub fn channel_point(&self) -> Result<Option<ChannelPoint>, DomainError> {
        match self.chan_point.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_point_parse() {
        let point: ChannelPoint = "f00d:1".parse().unwrap();
        assert_eq!(point, ChannelPoint::new("f00d", 1));
    }

    #[test]
    fn test_channel_point_rejects_malformed() {
        assert!("f00d".parse::<ChannelPoint>().is_err());
        assert!(":1".parse::<ChannelPoint>().is_err());
        assert!("f00d:x".parse::<ChannelPoint>().is_err());
        assert!("f00d:-1".parse::<ChannelPoint>().is_err());
    }

    #[test]
    fn test_downtime_saturates() {
        let mut channel = Channel::new(ChanId::new(1), "abcd:0");
        channel.lifetime = 100;
        channel.uptime = 40;
        assert_eq!(channel.downtime(), 60);

        channel.uptime = 150;
        assert_eq!(channel.downtime(), 0);
    }

    #[test]
    fn test_edge_channel_point() {
        let mut edge = ChannelGraphEdge {
            chan_id: ChanId::new(3),
            last_update: 0,
            chan_point: Some("abcd:0".to_string()),
        };
        assert_eq!(edge.channel_point().unwrap(), Some(ChannelPoint::new("abcd", 0)));

        edge.chan_point = Some(String::new());
        assert_eq!(edge.channel_point().unwrap(), None);

        edge.chan_point = None;
        assert_eq!(edge.channel_point().unwrap(), None);

        edge.chan_point = Some("bogus".to_string());
        assert!(edge.channel_point().is_err());
    }
}
