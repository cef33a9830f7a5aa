//! Activity classification
//!
//! Merges four independent evidence streams into a single hot/cold
//! partition of the open channels:
//!
//! | Stream | Marks hot |
//! |--------|-----------|
//! | Graph edge | `last_update` strictly after the window start |
//! | Invoice | incoming channel of a settled or accepted invoice |
//! | Payment | first hop of every attempt of a succeeded payment |
//! | Forward | both the incoming and outgoing channel |
//!
//! Invoices, payments and forwards are expected to be pre-filtered to the
//! window by the node query; only edge timestamps are compared here.

use chansweep_domain::{
    ActivityWindow, ChanId, Channel, ChannelGraphEdge, ClassificationResult, Evidence,
    ForwardingEvent, Invoice, Payment, PaymentStatus,
};
use std::collections::HashMap;

/// Partition `channels` into hot and cold
///
/// Pure and order-independent: permuting any input yields the same result.
/// A channel without a graph edge simply gets no policy evidence.
///
/// # Examples
///
/// ```
/// use chansweep_domain::{ActivityWindow, ChanId, Channel, Invoice, InvoiceState};
/// use chansweep_janitor::classify;
/// use std::collections::HashMap;
///
/// let channels = vec![
///     Channel::new(ChanId::new(1), "aa:0"),
///     Channel::new(ChanId::new(2), "bb:0"),
/// ];
/// let invoices = vec![Invoice { chan_id: ChanId::new(2), state: InvoiceState::Settled }];
///
/// let result = classify(&channels, &HashMap::new(), &invoices, &[], &[], ActivityWindow::starting_at(0));
/// assert_eq!(result.cold_ids(), vec![ChanId::new(1)]);
/// ```
pub fn classify(
    channels: &[Channel],
    edges: &HashMap<ChanId, ChannelGraphEdge>,
    invoices: &[Invoice],
    payments: &[Payment],
    forwards: &[ForwardingEvent],
    window: ActivityWindow,
) -> ClassificationResult {
    let mut evidence: HashMap<ChanId, Evidence> = HashMap::new();
    let mut mark = |id: ChanId, found: Evidence| evidence.entry(id).or_default().merge(found);

    for (id, edge) in edges {
        if window.is_fresh(edge.last_update) {
            mark(*id, Evidence { policy: true, ..Default::default() });
        }
    }

    for invoice in invoices.iter().filter(|i| i.state.moved_funds()) {
        mark(invoice.chan_id, Evidence { invoice: true, ..Default::default() });
    }

    for payment in payments.iter().filter(|p| p.status == PaymentStatus::Succeeded) {
        for hop in payment.first_hops() {
            mark(hop, Evidence { payment: true, ..Default::default() });
        }
    }

    for event in forwards {
        mark(event.chan_id_in, Evidence { forward: true, ..Default::default() });
        mark(event.chan_id_out, Evidence { forward: true, ..Default::default() });
    }

    let result = ClassificationResult::partition(channels.iter().map(|c| c.chan_id), &evidence);

    tracing::debug!(
        "Classified {} channels: {} hot, {} cold",
        result.len(),
        result.hot().len(),
        result.cold().len()
    );

    result
}
