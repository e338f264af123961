//! # Client Configuration
//!
//! Plain serde struct so settings can come from code, JSON text, or a file.
//! Every field has a default; a JSON document only needs the keys it changes.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rkv_common::{SdkError, SdkResult, Ttl};

use crate::pool::PoolConfig;

/// Configuration for [`CacheClient`](crate::CacheClient) and its pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address, e.g. "127.0.0.1:6379".
    pub addr: String,
    /// Maximum idle connections kept in the pool.
    pub max_idle: usize,
    /// Maximum total connections (idle + in-use).
    pub max_total: usize,
    /// Optional TCP read timeout in milliseconds.
    pub read_timeout_ms: Option<u64>,
    /// Optional TCP write timeout in milliseconds.
    pub write_timeout_ms: Option<u64>,
    /// Optional TCP connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
    /// TTL applied by `set` when the caller passes none.
    pub default_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            addr: "127.0.0.1:6379".to_string(),
            max_idle: 8,
            max_total: 16,
            read_timeout_ms: None,
            write_timeout_ms: None,
            connect_timeout_ms: None,
            default_ttl_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> SdkResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| SdkError::invalid_argument(format!("invalid client config: {}", err)))
    }

    /// Reads and parses a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            SdkError::invalid_argument(format!(
                "cannot read client config {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// Default item TTL as a [`Ttl`].
    pub fn default_ttl(&self) -> Ttl {
        Ttl::from(Duration::from_secs(self.default_ttl_secs))
    }

    pub(crate) fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            addr: self.addr.clone(),
            max_idle: self.max_idle,
            max_total: self.max_total,
            read_timeout: self.read_timeout_ms.map(Duration::from_millis),
            write_timeout: self.write_timeout_ms.map(Duration::from_millis),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkv_common::ErrorKind;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ClientConfig::from_json_str(r#"{"addr": "10.0.0.1:7000", "read_timeout_ms": 250}"#)
                .unwrap();
        assert_eq!(config.addr, "10.0.0.1:7000");
        assert_eq!(config.max_total, 16);
        assert_eq!(
            config.pool_config().read_timeout,
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.pool_config().write_timeout, None);
    }

    #[test]
    fn roundtrips_through_json() {
        let config = ClientConfig {
            default_ttl_secs: 5,
            ..ClientConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ClientConfig::from_json_str(&json).unwrap(), config);
        assert_eq!(config.default_ttl(), Ttl::from_secs(5));
    }

    #[test]
    fn bad_json_is_invalid_argument() {
        let err = ClientConfig::from_json_str(r#"{"max_idle": "lots"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = ClientConfig::from_json_file("/nonexistent/rkv.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
