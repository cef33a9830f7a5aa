//! Summary of a close run

use chansweep_domain::{CloseOutcome, CloseStatus};
use std::time::Duration;

/// Outcomes of one close run, in the order the ids were requested
#[derive(Debug, Clone, Default)]
pub struct CloseReport {
    /// One outcome per requested channel
    pub outcomes: Vec<CloseOutcome>,

    /// Wall-clock time from first spawn to last join
    pub elapsed: Duration,
}

impl CloseReport {
    /// Create a report from finished outcomes
    pub fn new(outcomes: Vec<CloseOutcome>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    /// Channels whose close request was accepted
    pub fn closed(&self) -> usize {
        self.count(|s| matches!(s, CloseStatus::Closed { .. }))
    }

    /// Channels that failed to resolve or close
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CloseStatus::Failed { .. }))
    }

    /// Channels with no resolvable channel point
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CloseStatus::Skipped))
    }

    /// Channels resolved but left open because of dry-run
    pub fn dry_run(&self) -> usize {
        self.count(|s| matches!(s, CloseStatus::DryRun))
    }

    /// Number of outcomes
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True if nothing was requested
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True if no channel failed
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&CloseStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Close Summary".to_string(),
            "=============".to_string(),
            format!("Channels: {}", self.len()),
            format!("Elapsed: {:.2}s", self.elapsed.as_secs_f64()),
            String::new(),
        ];

        for outcome in &self.outcomes {
            lines.push(format!("  {}: {}", outcome.chan_id, outcome.status));
        }
        if !self.is_empty() {
            lines.push(String::new());
        }

        lines.push(format!("Closed: {}", self.closed()));
        lines.push(format!("Failed: {}", self.failed()));
        lines.push(format!("Skipped: {}", self.skipped()));
        if self.dry_run() > 0 {
            lines.push(format!("Dry run: {}", self.dry_run()));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chansweep_domain::{ChanId, ChannelPoint};

    fn sample() -> CloseReport {
        CloseReport::new(
            vec![
                CloseOutcome::closed(ChanId::new(1), ChannelPoint::new("aa", 0), "{}"),
                CloseOutcome::skipped(ChanId::new(2)),
                CloseOutcome::failed(ChanId::new(3), None, "channel 3: close failed: boom"),
                CloseOutcome::closed(ChanId::new(4), ChannelPoint::new("bb", 1), "{}"),
            ],
            Duration::from_millis(1500),
        )
    }

    #[test]
    fn test_empty_report() {
        let report = CloseReport::default();
        assert!(report.is_empty());
        assert!(report.all_succeeded());
        assert_eq!(report.closed(), 0);
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.len(), 4);
        assert_eq!(report.closed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.dry_run(), 0);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert!(summary.contains("Channels: 4"));
        assert!(summary.contains("Elapsed: 1.50s"));
        assert!(summary.contains("2: skipped: unresolved"));
        assert!(summary.contains("3: failed: channel 3: close failed: boom"));
        assert!(summary.contains("Closed: 2"));
        assert!(summary.contains("Failed: 1"));
        assert!(!summary.contains("Dry run"));
    }

    #[test]
    fn test_summary_dry_run() {
        let report = CloseReport::new(
            vec![CloseOutcome::dry_run(ChanId::new(9), ChannelPoint::new("cc", 2))],
            Duration::ZERO,
        );
        assert_eq!(report.dry_run(), 1);
        assert!(report.summary().contains("Dry run: 1"));
    }
}
