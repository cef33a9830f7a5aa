//! Connection settings for an LND REST endpoint

use crate::NodeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for a single REST request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of records fetched per paginated request
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// How to reach and authenticate to an LND node's REST proxy
///
/// # Examples
///
/// ```
/// use chansweep_lnd::LndConfig;
///
/// let config = LndConfig::new("https://127.0.0.1:8080").with_macaroon_hex("0201");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LndConfig {
    /// REST base URL, e.g. `https://127.0.0.1:8080`
    pub rest_host: String,

    /// Hex-encoded macaroon; takes precedence over `macaroon_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaroon_hex: Option<String>,

    /// Path to a binary macaroon file (e.g. `admin.macaroon`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaroon_path: Option<PathBuf>,

    /// PEM certificate to trust (LND's `tls.cert`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<PathBuf>,

    /// Skip certificate verification (self-signed regtest nodes)
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Records requested per page for invoices, payments and forwards
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Permit plain `http://` hosts (local test servers only)
    #[serde(default)]
    pub allow_insecure_http: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl LndConfig {
    /// Configuration for `rest_host` with defaults and no credentials
    pub fn new(rest_host: impl Into<String>) -> Self {
        Self {
            rest_host: rest_host.into(),
            macaroon_hex: None,
            macaroon_path: None,
            tls_cert_path: None,
            accept_invalid_certs: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            allow_insecure_http: false,
        }
    }

    /// Set a hex-encoded macaroon
    pub fn with_macaroon_hex(mut self, macaroon: impl Into<String>) -> Self {
        self.macaroon_hex = Some(macaroon.into());
        self
    }

    /// Set a macaroon file path
    pub fn with_macaroon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.macaroon_path = Some(path.into());
        self
    }

    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the settings without touching the network or the filesystem
    pub fn validate(&self) -> Result<(), NodeError> {
        let host = self.rest_host.trim();
        if host.is_empty() {
            return Err(NodeError::Config("rest_host is empty".to_string()));
        }
        if !host.starts_with("https://") {
            let plain_http_ok = self.allow_insecure_http && host.starts_with("http://");
            if !plain_http_ok {
                return Err(NodeError::Config(format!(
                    "Invalid host '{}', must be https://",
                    host
                )));
            }
        }
        if self.macaroon_hex.is_none() && self.macaroon_path.is_none() {
            return Err(NodeError::Config(
                "no macaroon configured (set macaroon_hex or macaroon_path)".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(NodeError::Config("page_size must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Hex-encoded macaroon for the auth header
    ///
    /// Reads and encodes `macaroon_path` when no hex value is configured.
    pub fn macaroon(&self) -> Result<String, NodeError> {
        if let Some(hex_value) = &self.macaroon_hex {
            let trimmed = hex_value.trim();
            hex::decode(trimmed)
                .map_err(|e| NodeError::Config(format!("macaroon is not valid hex: {}", e)))?;
            if trimmed.is_empty() {
                return Err(NodeError::Config("macaroon is empty".to_string()));
            }
            return Ok(trimmed.to_string());
        }

        let path = self
            .macaroon_path
            .as_ref()
            .ok_or_else(|| NodeError::Config("no macaroon configured".to_string()))?;
        let bytes = std::fs::read(path).map_err(|e| {
            NodeError::Config(format!("failed to read macaroon {}: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(NodeError::Config(format!("macaroon {} is empty", path.display())));
        }
        Ok(hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = LndConfig::new("https://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size, 1000);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_validate_requires_https() {
        let config = LndConfig::new("http://localhost:8080").with_macaroon_hex("00");
        assert!(matches!(config.validate(), Err(NodeError::Config(_))));

        let mut config = config;
        config.allow_insecure_http = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_macaroon() {
        let config = LndConfig::new("https://localhost:8080");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_macaroon_hex_checked() {
        let config = LndConfig::new("https://localhost:8080").with_macaroon_hex("zz");
        assert!(config.macaroon().is_err());

        let config = LndConfig::new("https://localhost:8080").with_macaroon_hex(" 0201ab ");
        assert_eq!(config.macaroon().unwrap(), "0201ab");
    }

    #[test]
    fn test_macaroon_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x02, 0x01, 0xff]).unwrap();

        let config = LndConfig::new("https://localhost:8080").with_macaroon_path(file.path());
        assert_eq!(config.macaroon().unwrap(), "0201ff");
    }

    #[test]
    fn test_serde_defaults_applied() {
        let config: LndConfig = serde_json::from_str(r#"{"rest_host": "https://node:8080"}"#).unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.macaroon_hex.is_none());
    }
}
