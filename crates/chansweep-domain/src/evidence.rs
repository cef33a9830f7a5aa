//! Activity evidence records: invoices, payments and forwarding events

use crate::ChanId;

/// Lifecycle state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceState {
    /// Created, not yet paid
    Open,
    /// Paid and settled
    Settled,
    /// Cancelled before payment
    Canceled,
    /// HTLCs accepted, hold invoice awaiting settlement
    Accepted,
    /// State the client does not recognise
    Unknown,
}

impl InvoiceState {
    /// Parse the node's upper-case state name; anything unrecognised is `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => InvoiceState::Open,
            "SETTLED" => InvoiceState::Settled,
            "CANCELED" => InvoiceState::Canceled,
            "ACCEPTED" => InvoiceState::Accepted,
            _ => InvoiceState::Unknown,
        }
    }

    /// Whether liquidity actually moved into the node
    pub fn moved_funds(&self) -> bool {
        matches!(self, InvoiceState::Settled | InvoiceState::Accepted)
    }
}

/// An incoming payment against one of the node's invoices
///
/// One record per incoming HTLC; an invoice paid over several channels
/// produces one record per channel, all sharing the invoice state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Channel the payment arrived on
    pub chan_id: ChanId,

    /// Invoice state
    pub state: InvoiceState,
}

/// Final status of an outgoing payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Status not reported
    Unknown,
    /// At least one HTLC still pending
    InFlight,
    /// Preimage obtained
    Succeeded,
    /// All attempts failed
    Failed,
    /// Created but no HTLC dispatched yet
    Initiated,
}

impl PaymentStatus {
    /// Parse the node's upper-case status name; anything unrecognised is `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "IN_FLIGHT" => PaymentStatus::InFlight,
            "SUCCEEDED" => PaymentStatus::Succeeded,
            "FAILED" => PaymentStatus::Failed,
            "INITIATED" => PaymentStatus::Initiated,
            _ => PaymentStatus::Unknown,
        }
    }
}

/// One hop of a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// Channel used for this hop
    pub chan_id: ChanId,
}

/// Route taken by an HTLC attempt, hops ordered from the local node outward
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Hops, first hop leaves the local node
    pub hops: Vec<Hop>,
}

impl Route {
    /// Build a route from channel ids, in hop order
    pub fn through(chan_ids: impl IntoIterator<Item = ChanId>) -> Self {
        Self {
            hops: chan_ids.into_iter().map(|chan_id| Hop { chan_id }).collect(),
        }
    }

    /// The local node's outgoing channel
    pub fn first_hop(&self) -> Option<ChanId> {
        self.hops.first().map(|hop| hop.chan_id)
    }
}

/// A single HTLC attempt of a payment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtlcAttempt {
    /// Route the attempt was sent along
    pub route: Route,
}

/// An outgoing payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Payment status
    pub status: PaymentStatus,

    /// HTLC attempts in dispatch order
    pub htlcs: Vec<HtlcAttempt>,
}

impl Payment {
    /// First-hop channel of every attempt that has a route
    pub fn first_hops(&self) -> impl Iterator<Item = ChanId> + '_ {
        self.htlcs.iter().filter_map(|htlc| htlc.route.first_hop())
    }
}

/// A payment routed through the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingEvent {
    /// Channel the HTLC arrived on
    pub chan_id_in: ChanId,

    /// Channel the HTLC left on
    pub chan_id_out: ChanId,

    /// When the forward settled (unix seconds)
    pub timestamp: u64,
}
