//! Hot/cold partition of the open channels

use crate::ChanId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Which evidence streams marked a channel as active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Evidence {
    /// Routing policy updated inside the window
    pub policy: bool,
    /// Received funds through a settled or accepted invoice
    pub invoice: bool,
    /// First hop of a succeeded outgoing payment
    pub payment: bool,
    /// Incoming or outgoing side of a forward
    pub forward: bool,
}

impl Evidence {
    /// Whether any stream fired
    pub fn any(&self) -> bool {
        self.policy || self.invoice || self.payment || self.forward
    }

    /// Merge another set of flags into this one
    pub fn merge(&mut self, other: Evidence) {
        self.policy |= other.policy;
        self.invoice |= other.invoice;
        self.payment |= other.payment;
        self.forward |= other.forward;
    }

    /// Names of the streams that fired, e.g. `"policy, forward"`
    pub fn describe(&self) -> String {
        let mut names = Vec::new();
        if self.policy {
            names.push("policy");
        }
        if self.invoice {
            names.push("invoice");
        }
        if self.payment {
            names.push("payment");
        }
        if self.forward {
            names.push("forward");
        }
        names.join(", ")
    }
}

/// Result of classifying the open channels
///
/// `hot` and `cold` always partition the channel universe the result was
/// built from: every id is in exactly one of them and no id outside the
/// universe appears in either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    hot: BTreeSet<ChanId>,
    cold: BTreeSet<ChanId>,
    evidence: BTreeMap<ChanId, Evidence>,
}

impl ClassificationResult {
    /// Partition `universe` using the collected evidence
    ///
    /// Evidence for ids outside the universe (closed channels still present
    /// in payment or forwarding history) is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use chansweep_domain::{ChanId, ClassificationResult, Evidence};
    /// use std::collections::HashMap;
    ///
    /// let mut evidence = HashMap::new();
    /// evidence.insert(ChanId::new(1), Evidence { forward: true, ..Default::default() });
    /// evidence.insert(ChanId::new(42), Evidence { forward: true, ..Default::default() });
    ///
    /// let result = ClassificationResult::partition([ChanId::new(1), ChanId::new(2)], &evidence);
    /// assert!(result.is_hot(ChanId::new(1)));
    /// assert!(result.is_cold(ChanId::new(2)));
    /// assert!(!result.is_hot(ChanId::new(42)));
    /// ```
    pub fn partition(
        universe: impl IntoIterator<Item = ChanId>,
        evidence: &HashMap<ChanId, Evidence>,
    ) -> Self {
        let mut result = Self::default();

        for id in universe {
            match evidence.get(&id).filter(|e| e.any()) {
                Some(found) => {
                    result.hot.insert(id);
                    result.evidence.insert(id, *found);
                }
                None => {
                    result.cold.insert(id);
                }
            }
        }

        result
    }

    /// Channels with activity inside the window
    pub fn hot(&self) -> &BTreeSet<ChanId> {
        &self.hot
    }

    /// Channels with no activity inside the window
    pub fn cold(&self) -> &BTreeSet<ChanId> {
        &self.cold
    }

    /// Dormant ids in ascending order
    pub fn cold_ids(&self) -> Vec<ChanId> {
        self.cold.iter().copied().collect()
    }

    /// Whether the channel is classified hot
    pub fn is_hot(&self, id: ChanId) -> bool {
        self.hot.contains(&id)
    }

    /// Whether the channel is classified cold
    pub fn is_cold(&self, id: ChanId) -> bool {
        self.cold.contains(&id)
    }

    /// Evidence that made a hot channel hot
    pub fn evidence(&self, id: ChanId) -> Option<Evidence> {
        self.evidence.get(&id).copied()
    }

    /// Total number of channels classified
    pub fn len(&self) -> usize {
        self.hot.len() + self.cold.len()
    }

    /// Whether no channels were classified
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(policy: bool, forward: bool) -> Evidence {
        Evidence {
            policy,
            forward,
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_empty_universe() {
        let mut evidence = HashMap::new();
        evidence.insert(ChanId::new(9), flags(true, false));

        let result = ClassificationResult::partition(Vec::new(), &evidence);
        assert!(result.is_empty());
        assert!(result.hot().is_empty());
        assert!(result.cold().is_empty());
    }

    #[test]
    fn test_partition_ignores_empty_flags() {
        let mut evidence = HashMap::new();
        evidence.insert(ChanId::new(1), Evidence::default());

        let result = ClassificationResult::partition([ChanId::new(1)], &evidence);
        assert!(result.is_cold(ChanId::new(1)));
        assert_eq!(result.evidence(ChanId::new(1)), None);
    }

    #[test]
    fn test_partition_collapses_duplicate_universe_ids() {
        let result =
            ClassificationResult::partition([ChanId::new(3), ChanId::new(3)], &HashMap::new());
        assert_eq!(result.cold_ids(), vec![ChanId::new(3)]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_evidence_merge_and_describe() {
        let mut e = flags(true, false);
        e.merge(flags(false, true));
        assert_eq!(e.describe(), "policy, forward");
        assert!(e.any());
        assert!(!Evidence::default().any());
        assert_eq!(Evidence::default().describe(), "");
    }
}
