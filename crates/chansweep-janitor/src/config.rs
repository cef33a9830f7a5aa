//! Configuration for Janitor operations
//!
//! Defines the activity lookback and how dormant channels are closed.

use crate::JanitorError;
use chansweep_domain::window::DEFAULT_LOOKBACK_DAYS;
use chansweep_domain::{ActivityWindow, CloseOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Janitor service
///
/// Immutable for the duration of a run; the activity window derived from it
/// is computed once per inspection.
///
/// # Examples
///
/// ```
/// use chansweep_janitor::JanitorConfig;
///
/// // Default configuration: two-week lookback, cooperative closes
/// let config = JanitorConfig::default();
/// assert_eq!(config.lookback_days, 14);
/// assert!(!config.force_close);
///
/// // Report what would be closed without closing anything
/// let config = JanitorConfig::rehearsal();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// How far back activity counts as recent (in days)
    /// Default: 14 days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u64,

    /// Dry-run mode: resolve channel points but do not issue closes
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Force-close (unilateral) instead of cooperative close
    /// Default: false
    #[serde(default)]
    pub force_close: bool,

    /// Fee rate for closing transactions; node default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat_per_vbyte: Option<u64>,

    /// Upper bound on a single channel's resolve + close pipeline (in seconds)
    /// Default: unbounded (the transport timeout still applies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_timeout_secs: Option<u64>,
}

fn default_lookback_days() -> u64 {
    DEFAULT_LOOKBACK_DAYS
}

impl Default for JanitorConfig {
    /// Two-week lookback, cooperative closes at the node's fee estimate
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            dry_run: false,
            force_close: false,
            sat_per_vbyte: None,
            close_timeout_secs: None,
        }
    }
}

const SECS_PER_DAY: u64 = 86_400;

impl JanitorConfig {
    /// Default settings with dry-run enabled
    pub fn rehearsal() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Reject settings that would make every channel look dormant
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.lookback_days == 0 {
            return Err(JanitorError::Config(
                "lookback_days must be at least 1".to_string(),
            ));
        }
        if self.lookback_days.checked_mul(SECS_PER_DAY).is_none() {
            return Err(JanitorError::Config(format!(
                "lookback_days {} is too large",
                self.lookback_days
            )));
        }
        if self.close_timeout_secs == Some(0) {
            return Err(JanitorError::Config(
                "close_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get lookback as Duration
    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_days.saturating_mul(SECS_PER_DAY))
    }

    /// Activity window ending at `now` (unix seconds)
    pub fn activity_window(&self, now: u64) -> ActivityWindow {
        ActivityWindow::ending_at(now, self.lookback())
    }

    /// Options passed with every close request
    pub fn close_options(&self) -> CloseOptions {
        CloseOptions {
            force: self.force_close,
            sat_per_vbyte: self.sat_per_vbyte,
        }
    }

    /// Get the per-channel pipeline timeout as Duration
    pub fn close_timeout(&self) -> Option<Duration> {
        self.close_timeout_secs.map(Duration::from_secs)
    }
}
