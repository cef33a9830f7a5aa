//! Per-channel result of a close attempt

use crate::{ChanId, ChannelPoint};
use std::fmt;

/// Terminal state of one channel's close pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseStatus {
    /// Close request accepted by the node (not yet confirmed on-chain)
    Closed {
        /// First update returned by the node
        response: String,
    },

    /// Resolution or close request failed
    Failed {
        /// Captured error, labelled with the channel id
        reason: String,
    },

    /// No channel point could be resolved, no close was attempted
    Skipped,

    /// Channel point resolved, close suppressed by dry-run mode
    DryRun,
}

impl CloseStatus {
    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            CloseStatus::Closed { .. } => "closed",
            CloseStatus::Failed { .. } => "failed",
            CloseStatus::Skipped => "skipped",
            CloseStatus::DryRun => "dry run",
        }
    }
}

impl fmt::Display for CloseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseStatus::Closed { .. } => write!(f, "closed"),
            CloseStatus::Failed { reason } => write!(f, "failed: {}", reason),
            CloseStatus::Skipped => write!(f, "skipped: unresolved"),
            CloseStatus::DryRun => write!(f, "dry run"),
        }
    }
}

/// Outcome of closing a single dormant channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    /// Channel the outcome belongs to
    pub chan_id: ChanId,

    /// Resolved funding outpoint, `None` if unresolved
    pub channel_point: Option<ChannelPoint>,

    /// Terminal status
    pub status: CloseStatus,
}

impl CloseOutcome {
    /// Close request accepted
    pub fn closed(chan_id: ChanId, point: ChannelPoint, response: impl Into<String>) -> Self {
        Self {
            chan_id,
            channel_point: Some(point),
            status: CloseStatus::Closed {
                response: response.into(),
            },
        }
    }

    /// Pipeline failed; `point` is whatever was resolved before the failure
    pub fn failed(chan_id: ChanId, point: Option<ChannelPoint>, reason: impl Into<String>) -> Self {
        Self {
            chan_id,
            channel_point: point,
            status: CloseStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// No channel point could be resolved
    pub fn skipped(chan_id: ChanId) -> Self {
        Self {
            chan_id,
            channel_point: None,
            status: CloseStatus::Skipped,
        }
    }

    /// Resolved but not closed because of dry-run mode
    pub fn dry_run(chan_id: ChanId, point: ChannelPoint) -> Self {
        Self {
            chan_id,
            channel_point: Some(point),
            status: CloseStatus::DryRun,
        }
    }

    /// Whether the close request was accepted
    pub fn is_closed(&self) -> bool {
        matches!(self.status, CloseStatus::Closed { .. })
    }

    /// Whether the pipeline failed
    pub fn is_failed(&self) -> bool {
        matches!(self.status, CloseStatus::Failed { .. })
    }

    /// Whether the channel was skipped as unresolved
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, CloseStatus::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let id = ChanId::new(5);
        assert_eq!(
            CloseOutcome::failed(id, None, "channel 5: timeout").status.to_string(),
            "failed: channel 5: timeout"
        );
        assert_eq!(CloseOutcome::skipped(id).status.to_string(), "skipped: unresolved");
        assert_eq!(
            CloseOutcome::closed(id, ChannelPoint::new("abcd", 0), "{}").status.to_string(),
            "closed"
        );
    }

    #[test]
    fn test_predicates() {
        let id = ChanId::new(1);
        assert!(CloseOutcome::skipped(id).is_skipped());
        assert!(!CloseOutcome::skipped(id).is_failed());
        assert!(CloseOutcome::dry_run(id, ChannelPoint::new("aa", 1)).channel_point.is_some());
        assert_eq!(CloseStatus::DryRun.label(), "dry run");
    }
}
