//! LND REST client
//!
//! Implements [`NodeClient`] against LND's REST proxy (`lnd --restlisten`).
//!
//! # Features
//!
//! - Macaroon authentication via the `Grpc-Metadata-macaroon` header
//! - Custom trust root (`tls.cert`) or, for regtest, no verification
//! - Pagination of invoices, payments and forwarding history
//! - Per-request timeout
//!
//! # Examples
//!
//! ```no_run
//! use chansweep_domain::traits::NodeClient;
//! use chansweep_lnd::{LndConfig, LndRestClient};
//!
//! # async fn demo() -> Result<(), chansweep_lnd::NodeError> {
//! let config = LndConfig::new("https://127.0.0.1:8080")
//!     .with_macaroon_path("/home/me/.lnd/data/chain/bitcoin/regtest/admin.macaroon");
//! let client = LndRestClient::from_config(&config)?;
//!
//! let info = client.get_info().await?;
//! println!("connected to {}", info.identity_pubkey);
//! # Ok(())
//! # }
//! ```

use crate::wire::{
    ForwardingHistoryRequest, ForwardingHistoryResponse, GetInfoResponse, ListChannelsResponse,
    ListInvoiceResponse, ListPaymentsResponse, RestError, StreamUpdate, WireEdge,
};
use crate::{LndConfig, NodeError};
use async_trait::async_trait;
use chansweep_domain::traits::NodeClient;
use chansweep_domain::{
    ChanId, Channel, ChannelGraphEdge, ChannelPoint, CloseOptions, ForwardingEvent, Invoice,
    NodeInfo, Payment,
};
use reqwest::{Certificate, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Header carrying the hex-encoded macaroon
pub const MACAROON_HEADER: &str = "Grpc-Metadata-macaroon";

/// Error message LND returns when the graph has no such edge
const EDGE_NOT_FOUND: &str = "edge not found";

/// LND REST API client
///
/// Cheap to share: wrap in an `Arc` and hand to as many concurrent tasks as
/// needed. The underlying `reqwest::Client` pools connections internally.
pub struct LndRestClient {
    base_url: String,
    macaroon: String,
    client: reqwest::Client,
    page_size: u32,
}

impl LndRestClient {
    /// Build a client from validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::Config`] if the configuration is invalid, the
    /// macaroon or certificate cannot be read, or the TLS stack rejects the
    /// certificate.
    pub fn from_config(config: &LndConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let macaroon = config.macaroon()?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(path) = &config.tls_cert_path {
            let pem = std::fs::read(path).map_err(|e| {
                NodeError::Config(format!("failed to read TLS cert {}: {}", path.display(), e))
            })?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| NodeError::Config(format!("invalid TLS cert: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| NodeError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.rest_host.trim().trim_end_matches('/').to_string(),
            macaroon,
            client,
            page_size: config.page_size,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, route))
            .header(MACAROON_HEADER, &self.macaroon)
    }

    async fn send(&self, request: RequestBuilder, route: &str) -> Result<Response, NodeError> {
        tracing::debug!("LND request {}", route);
        let response = request
            .send()
            .await
            .map_err(|e| NodeError::Communication(format!("{}: {}", route, e)))?;
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, route: &str) -> Result<T, NodeError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(response, route).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| NodeError::InvalidResponse(format!("{}: {}", route, e)))
    }

    async fn status_error(response: Response, route: &str) -> NodeError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = RestError::message_from(&body);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return NodeError::Auth(message);
        }
        NodeError::Http {
            status: status.as_u16(),
            message: format!("{}: {}", route, message),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<T, NodeError> {
        let response = self
            .send(self.request(Method::GET, route).query(query), route)
            .await?;
        Self::decode(response, route).await
    }
}

#[async_trait]
impl NodeClient for LndRestClient {
    type Error = NodeError;

    async fn get_info(&self) -> Result<NodeInfo, NodeError> {
        let info: GetInfoResponse = self.get("/v1/getinfo", &[]).await?;
        Ok(info.into())
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, NodeError> {
        let response: ListChannelsResponse = self.get("/v1/channels", &[]).await?;
        Ok(response.channels.into_iter().map(Into::into).collect())
    }

    async fn get_channel_graph_edge(
        &self,
        chan_id: ChanId,
    ) -> Result<Option<ChannelGraphEdge>, NodeError> {
        let route = format!("/v1/graph/edge/{}", chan_id);
        let response = self.send(self.request(Method::GET, &route), &route).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return match Self::status_error(response, &route).await {
                NodeError::Http { message, .. } if message.contains(EDGE_NOT_FOUND) => Ok(None),
                other => Err(other),
            };
        }

        let edge: WireEdge = response
            .json()
            .await
            .map_err(|e| NodeError::InvalidResponse(format!("{}: {}", route, e)))?;
        Ok(Some(edge.into_edge(chan_id)))
    }

    async fn list_invoices(&self, since: u64) -> Result<Vec<Invoice>, NodeError> {
        let mut records = Vec::new();
        let mut offset = 0u64;

        loop {
            let page: ListInvoiceResponse = self
                .get(
                    "/v1/invoices",
                    &[
                        ("creation_date_start", since.to_string()),
                        ("index_offset", offset.to_string()),
                        ("num_max_invoices", self.page_size.to_string()),
                    ],
                )
                .await?;

            let count = page.invoices.len();
            records.extend(page.invoices.into_iter().flat_map(|i| i.into_records()));

            if count < self.page_size as usize || page.last_index_offset <= offset {
                break;
            }
            offset = page.last_index_offset;
        }

        tracing::debug!("Fetched {} invoice HTLC records since {}", records.len(), since);
        Ok(records)
    }

    async fn list_payments(&self, since: u64) -> Result<Vec<Payment>, NodeError> {
        let mut payments = Vec::new();
        let mut offset = 0u64;

        loop {
            let page: ListPaymentsResponse = self
                .get(
                    "/v1/payments",
                    &[
                        ("creation_date_start", since.to_string()),
                        ("index_offset", offset.to_string()),
                        ("max_payments", self.page_size.to_string()),
                        ("include_incomplete", "false".to_string()),
                    ],
                )
                .await?;

            let count = page.payments.len();
            payments.extend(page.payments.into_iter().map(Payment::from));

            if count < self.page_size as usize || page.last_index_offset <= offset {
                break;
            }
            offset = page.last_index_offset;
        }

        tracing::debug!("Fetched {} payments since {}", payments.len(), since);
        Ok(payments)
    }

    async fn list_forwarding_events(&self, since: u64) -> Result<Vec<ForwardingEvent>, NodeError> {
        let route = "/v1/switch";
        let mut events = Vec::new();
        let mut offset = 0u32;

        loop {
            let body = ForwardingHistoryRequest {
                start_time: since.to_string(),
                index_offset: offset,
                num_max_events: self.page_size,
            };
            let response = self
                .send(self.request(Method::POST, route).json(&body), route)
                .await?;
            let page: ForwardingHistoryResponse = Self::decode(response, route).await?;

            let count = page.forwarding_events.len();
            events.extend(page.forwarding_events.into_iter().map(ForwardingEvent::from));

            if count < self.page_size as usize || page.last_offset_index <= offset {
                break;
            }
            offset = page.last_offset_index;
        }

        tracing::debug!("Fetched {} forwarding events since {}", events.len(), since);
        Ok(events)
    }

    async fn close_channel(
        &self,
        point: &ChannelPoint,
        options: &CloseOptions,
    ) -> Result<String, NodeError> {
        let route = format!("/v1/channels/{}/{}", point.txid, point.vout);

        let mut query = vec![("force", options.force.to_string())];
        if let Some(rate) = options.sat_per_vbyte {
            query.push(("sat_per_vbyte", rate.to_string()));
        }

        let mut response = self
            .send(self.request(Method::DELETE, &route).query(&query), &route)
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response, &route).await);
        }

        // The close streams updates until the channel is fully closed; the
        // first update (close_pending) is the acceptance we report.
        let first = response
            .chunk()
            .await
            .map_err(|e| NodeError::Communication(format!("{}: {}", route, e)))?;
        let text = first
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .unwrap_or_default();

        if let Ok(StreamUpdate { error: Some(err) }) = serde_json::from_str::<StreamUpdate>(&text) {
            let message = if err.message.is_empty() { err.error } else { err.message };
            return Err(NodeError::Http {
                status: StatusCode::OK.as_u16(),
                message: format!("{}: {}", route, message),
            });
        }

        Ok(text)
    }
}
