//! JSON shapes of the LND REST proxy and their mapping onto domain types
//!
//! LND's REST gateway encodes 64-bit integers as JSON strings, so every such
//! field goes through [`u64_str`], which also accepts plain numbers.

use chansweep_domain::{
    ChanId, Channel, ChannelGraphEdge, ForwardingEvent, HtlcAttempt, Invoice, InvoiceState, NodeInfo,
    Payment, PaymentStatus, Route,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a u64 sent either as a decimal string or as a number
pub(crate) fn u64_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) if s.is_empty() => Ok(0),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Error body returned by the gateway for failed calls
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RestError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: String,
}

impl RestError {
    /// Best-effort human message from an error body
    pub fn message_from(body: &str) -> String {
        match serde_json::from_str::<RestError>(body) {
            Ok(e) if !e.message.is_empty() => e.message,
            Ok(e) if !e.error.is_empty() => e.error,
            _ => body.trim().to_string(),
        }
    }
}

/// Streaming responses wrap each update as `{"result": ...}` or `{"error": ...}`
#[derive(Debug, Deserialize)]
pub(crate) struct StreamUpdate {
    #[serde(default)]
    pub error: Option<RestError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetInfoResponse {
    #[serde(default)]
    identity_pubkey: String,
    #[serde(default)]
    alias: String,
    #[serde(default)]
    num_active_channels: u32,
    #[serde(default)]
    block_height: u32,
    #[serde(default)]
    synced_to_chain: bool,
}

impl From<GetInfoResponse> for NodeInfo {
    fn from(r: GetInfoResponse) -> Self {
        NodeInfo {
            identity_pubkey: r.identity_pubkey,
            alias: r.alias,
            num_active_channels: r.num_active_channels,
            block_height: r.block_height,
            synced_to_chain: r.synced_to_chain,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListChannelsResponse {
    #[serde(default)]
    pub channels: Vec<WireChannel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChannel {
    #[serde(deserialize_with = "u64_str")]
    chan_id: u64,
    #[serde(default)]
    channel_point: String,
    #[serde(default)]
    remote_pubkey: String,
    #[serde(default, deserialize_with = "u64_str")]
    capacity: u64,
    #[serde(default)]
    active: bool,
    #[serde(default, deserialize_with = "u64_str")]
    lifetime: u64,
    #[serde(default, deserialize_with = "u64_str")]
    uptime: u64,
}

impl From<WireChannel> for Channel {
    fn from(c: WireChannel) -> Self {
        Channel {
            chan_id: ChanId::new(c.chan_id),
            channel_point: c.channel_point,
            remote_pubkey: c.remote_pubkey,
            capacity: c.capacity,
            active: c.active,
            lifetime: c.lifetime,
            uptime: c.uptime,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WirePolicy {
    #[serde(default)]
    last_update: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEdge {
    #[serde(default, deserialize_with = "u64_str")]
    channel_id: u64,
    #[serde(default)]
    chan_point: String,
    #[serde(default)]
    last_update: u64,
    #[serde(default)]
    node1_policy: Option<WirePolicy>,
    #[serde(default)]
    node2_policy: Option<WirePolicy>,
}

impl WireEdge {
    /// Convert, falling back to the requested id when the edge omits it
    pub fn into_edge(self, requested: ChanId) -> ChannelGraphEdge {
        // The edge-level timestamp is deprecated upstream; newer nodes only
        // keep the per-direction policy timestamps current.
        let last_update = [
            Some(self.last_update),
            self.node1_policy.map(|p| p.last_update),
            self.node2_policy.map(|p| p.last_update),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0);

        let chan_id = if self.channel_id == 0 {
            requested
        } else {
            ChanId::new(self.channel_id)
        };

        ChannelGraphEdge {
            chan_id,
            last_update,
            chan_point: Some(self.chan_point).filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListInvoiceResponse {
    #[serde(default)]
    pub invoices: Vec<WireInvoice>,
    #[serde(default, deserialize_with = "u64_str")]
    pub last_index_offset: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireInvoice {
    #[serde(default)]
    state: String,
    #[serde(default)]
    htlcs: Vec<WireInvoiceHtlc>,
}

#[derive(Debug, Deserialize)]
struct WireInvoiceHtlc {
    #[serde(default, deserialize_with = "u64_str")]
    chan_id: u64,
}

impl WireInvoice {
    /// One domain record per incoming HTLC
    pub fn into_records(self) -> impl Iterator<Item = Invoice> {
        let state = InvoiceState::parse(&self.state);
        self.htlcs
            .into_iter()
            .filter(|htlc| htlc.chan_id != 0)
            .map(move |htlc| Invoice {
                chan_id: ChanId::new(htlc.chan_id),
                state,
            })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListPaymentsResponse {
    #[serde(default)]
    pub payments: Vec<WirePayment>,
    #[serde(default, deserialize_with = "u64_str")]
    pub last_index_offset: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePayment {
    #[serde(default)]
    status: String,
    #[serde(default)]
    htlcs: Vec<WireHtlcAttempt>,
}

#[derive(Debug, Deserialize)]
struct WireHtlcAttempt {
    #[serde(default)]
    route: Option<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    #[serde(default)]
    hops: Vec<WireHop>,
}

#[derive(Debug, Deserialize)]
struct WireHop {
    #[serde(deserialize_with = "u64_str")]
    chan_id: u64,
}

impl From<WirePayment> for Payment {
    fn from(p: WirePayment) -> Self {
        Payment {
            status: PaymentStatus::parse(&p.status),
            htlcs: p
                .htlcs
                .into_iter()
                .map(|htlc| HtlcAttempt {
                    route: htlc
                        .route
                        .map(|r| Route::through(r.hops.into_iter().map(|h| ChanId::new(h.chan_id))))
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Request body for `POST /v1/switch`
#[derive(Debug, Serialize)]
pub(crate) struct ForwardingHistoryRequest {
    pub start_time: String,
    pub index_offset: u32,
    pub num_max_events: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForwardingHistoryResponse {
    #[serde(default)]
    pub forwarding_events: Vec<WireForward>,
    #[serde(default)]
    pub last_offset_index: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireForward {
    #[serde(deserialize_with = "u64_str")]
    chan_id_in: u64,
    #[serde(deserialize_with = "u64_str")]
    chan_id_out: u64,
    #[serde(default, deserialize_with = "u64_str")]
    timestamp: u64,
}

impl From<WireForward> for ForwardingEvent {
    fn from(f: WireForward) -> Self {
        ForwardingEvent {
            chan_id_in: ChanId::new(f.chan_id_in),
            chan_id_out: ChanId::new(f.chan_id_out),
            timestamp: f.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_decodes_string_integers() {
        let json = r#"{
            "chan_id": "245191093059585",
            "channel_point": "abcd:1",
            "remote_pubkey": "02aa",
            "capacity": "1000000",
            "active": true,
            "lifetime": "3600",
            "uptime": 1800
        }"#;
        let channel: Channel = serde_json::from_str::<WireChannel>(json).unwrap().into();
        assert_eq!(channel.chan_id, ChanId::new(245191093059585));
        assert_eq!(channel.capacity, 1_000_000);
        assert_eq!(channel.downtime(), 1800);
        assert!(channel.active);
    }

    #[test]
    fn test_edge_takes_newest_policy_timestamp() {
        let json = r#"{
            "channel_id": "7",
            "chan_point": "beef:0",
            "last_update": 100,
            "node1_policy": {"last_update": 300},
            "node2_policy": {"last_update": 200}
        }"#;
        let edge = serde_json::from_str::<WireEdge>(json).unwrap().into_edge(ChanId::new(7));
        assert_eq!(edge.last_update, 300);
        assert_eq!(edge.chan_point.as_deref(), Some("beef:0"));
    }

    #[test]
    fn test_edge_without_point() {
        let edge = serde_json::from_str::<WireEdge>(r#"{"last_update": 5}"#)
            .unwrap()
            .into_edge(ChanId::new(11));
        assert_eq!(edge.chan_id, ChanId::new(11));
        assert_eq!(edge.chan_point, None);
    }

    #[test]
    fn test_invoice_flattens_htlcs() {
        let json = r#"{
            "state": "SETTLED",
            "htlcs": [{"chan_id": "1"}, {"chan_id": "2"}]
        }"#;
        let records: Vec<Invoice> = serde_json::from_str::<WireInvoice>(json)
            .unwrap()
            .into_records()
            .collect();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.state == InvoiceState::Settled));
        assert_eq!(records[1].chan_id, ChanId::new(2));
    }

    #[test]
    fn test_payment_routes() {
        let json = r#"{
            "status": "SUCCEEDED",
            "htlcs": [
                {"route": {"hops": [{"chan_id": "9"}, {"chan_id": "10"}]}},
                {"route": null}
            ]
        }"#;
        let payment: Payment = serde_json::from_str::<WirePayment>(json).unwrap().into();
        assert_eq!(payment.status, PaymentStatus::Succeeded);
        assert_eq!(payment.first_hops().collect::<Vec<_>>(), vec![ChanId::new(9)]);
    }

    #[test]
    fn test_rest_error_message() {
        assert_eq!(
            RestError::message_from(r#"{"code": 2, "message": "edge not found"}"#),
            "edge not found"
        );
        assert_eq!(RestError::message_from(r#"{"error": "boom"}"#), "boom");
        assert_eq!(RestError::message_from("plain text\n"), "plain text");
    }
}
