//! Short channel identifier

use crate::DomainError;
use std::fmt;
use std::str::FromStr;

/// Short channel id used in routing and graph data
///
/// Distinct from the [`ChannelPoint`](crate::ChannelPoint): the chan_id packs
/// the funding transaction's block height, transaction index and output index
/// into a single `u64` (BOLT 7 `short_channel_id`).
///
/// # Examples
///
/// ```
/// use chansweep_domain::ChanId;
///
/// let id: ChanId = "245191093059585".parse().unwrap();
/// assert_eq!(id.value(), 245191093059585);
/// assert_eq!(id.to_string(), "245191093059585");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChanId(u64);

impl ChanId {
    /// Wrap a raw u64 channel id
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw u64 value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Block height of the funding transaction
    pub fn block_height(&self) -> u32 {
        (self.0 >> 40) as u32
    }

    /// Index of the funding transaction within its block
    pub fn tx_index(&self) -> u32 {
        ((self.0 >> 16) & 0xFF_FFFF) as u32
    }

    /// Output index of the funding output
    pub fn output_index(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Human-readable `BLOCKxTXxOUT` form
    ///
    /// ```
    /// use chansweep_domain::ChanId;
    ///
    /// let id = ChanId::new((223u64 << 40) | (1 << 16));
    /// assert_eq!(id.short_form(), "223x1x0");
    /// ```
    pub fn short_form(&self) -> String {
        format!("{}x{}x{}", self.block_height(), self.tx_index(), self.output_index())
    }
}

impl From<u64> for ChanId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChanId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidChanId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: ChanId = "231996953526273".parse().unwrap();
        assert_eq!(id.value(), 231996953526273);
        assert_eq!(id.to_string(), "231996953526273");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ChanId>().is_err());
        assert!("12x3x0".parse::<ChanId>().is_err());
        assert!("-1".parse::<ChanId>().is_err());
    }

    #[test]
    fn test_short_form_components() {
        // 211x1x0 on regtest
        let id = ChanId::new(231996953526272);
        assert_eq!(id.block_height(), 211);
        assert_eq!(id.tx_index(), 1);
        assert_eq!(id.output_index(), 0);
        assert_eq!(id.short_form(), "211x1x0");
    }

    #[test]
    fn test_ordering_matches_value() {
        assert!(ChanId::new(1) < ChanId::new(2));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: short form components reassemble to the original id
        #[test]
        fn test_short_form_reassembles(value: u64) {
            let id = ChanId::new(value);
            let rebuilt = ((id.block_height() as u64) << 40)
                | ((id.tx_index() as u64) << 16)
                | id.output_index() as u64;
            prop_assert_eq!(rebuilt, value);
        }
    }
}
