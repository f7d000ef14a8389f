//! Chain API Adapter
//!
//! Implements `ChainQuery` over HTTP with reqwest.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::SyncConfig;
use crate::domain::{Height, RawBlock, SyncError};
use crate::ports::outbound::ChainQuery;

/// HTTP chain client.
///
/// Fetches blocks from a node's RPC port by default. REST gateways also
/// parse, but serve producer tokens as base64, which never renders an address.
pub struct HttpChainClient {
    http_client: reqwest::Client,
    base_url: String,
    latest_path: String,
    height_path: String,
}

impl HttpChainClient {
    /// Create a client from the sync configuration.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SyncError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            latest_path: config.latest_path.clone(),
            height_path: config.height_path.clone(),
        })
    }

    /// URL of the latest-block endpoint.
    pub fn latest_url(&self) -> String {
        join_url(&self.base_url, &self.latest_path)
    }

    /// URL of the block at `height`.
    pub fn height_url(&self, height: Height) -> String {
        let path = self.height_path.replace("{height}", &height.to_string());
        join_url(&self.base_url, &path)
    }

    async fn fetch(&self, url: String) -> Result<RawBlock, SyncError> {
        debug!("[pw-02] GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;

        extract_block(body)
    }
}

#[async_trait]
impl ChainQuery for HttpChainClient {
    async fn latest_block(&self) -> Result<RawBlock, SyncError> {
        self.fetch(self.latest_url()).await
    }

    async fn block_at(&self, height: Height) -> Result<RawBlock, SyncError> {
        self.fetch(self.height_url(height)).await
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Pull the block out of a response body.
///
/// Accepts `{"result": {"block": ..}}`, `{"block": ..}` or the bare block.
pub fn extract_block(body: Value) -> Result<RawBlock, SyncError> {
    let block = match body {
        Value::Object(mut map) => {
            if let Some(Value::Object(mut result)) = map.remove("result") {
                result
                    .remove("block")
                    .ok_or_else(|| SyncError::Decode("result has no block".to_string()))?
            } else if let Some(block) = map.remove("block") {
                block
            } else if map.contains_key("header") {
                Value::Object(map)
            } else {
                return Err(SyncError::Decode("response has no block".to_string()));
            }
        }
        other => {
            return Err(SyncError::Decode(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    serde_json::from_value(block).map_err(|e| SyncError::Decode(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{BlockProcessor, ProcessorSettings};
    use crate::domain::ValidatorDirectory;
    use serde_json::json;
    use std::sync::Arc;

    fn client(base: &str) -> HttpChainClient {
        HttpChainClient::new(&SyncConfig {
            api_url: base.to_string(),
            ..SyncConfig::for_testing()
        })
        .unwrap()
    }

    fn block_json(height: &str) -> Value {
        json!({
            "header": {
                "height": height,
                "time": "2024-05-01T12:00:00Z",
                "proposer_address": "AABB",
                "chain_id": "test-1"
            },
            "data": { "txs": [] }
        })
    }

    #[test]
    fn test_urls() {
        let c = client("https://rpc.example.org/");
        assert_eq!(c.latest_url(), "https://rpc.example.org/block");
        assert_eq!(c.height_url(42), "https://rpc.example.org/block?height=42");
        assert_eq!(c.endpoint(), "https://rpc.example.org");
    }

    #[test]
    fn test_default_endpoint_renders_producer_address() {
        const TOKEN: &str = "000102030405060708090A0B0C0D0E0F10111213";
        let config = SyncConfig {
            target_producer: Some(TOKEN.to_string()),
            ..SyncConfig::default()
        };
        let c = HttpChainClient::new(&config).unwrap();
        assert_eq!(c.latest_url(), "http://localhost:26657/block");
        assert_eq!(c.height_url(9), "http://localhost:26657/block?height=9");

        let body = json!({
            "jsonrpc": "2.0",
            "id": -1,
            "result": {
                "block_id": { "hash": "AB" },
                "block": {
                    "header": {
                        "chain_id": "cosmoshub-4",
                        "height": "9",
                        "time": "2024-05-01T12:00:00.5Z",
                        "proposer_address": TOKEN
                    },
                    "data": { "txs": ["dHgx"] }
                }
            }
        });
        let raw = extract_block(body).unwrap();
        let processor = BlockProcessor::new(
            Arc::new(ValidatorDirectory::default()),
            ProcessorSettings::from(&config),
        );
        let record = processor.normalize(&raw).unwrap();
        assert!(record
            .producer_address
            .as_deref()
            .is_some_and(|a| a.starts_with(&format!("{}1", config.address_prefix))));
        assert!(record.is_tracked_producer);
        assert_eq!(record.transaction_count, 1);
    }

    #[test]
    fn test_custom_paths() {
        let c = HttpChainClient::new(&SyncConfig {
            api_url: "http://node:26657".to_string(),
            latest_path: "block".to_string(),
            height_path: "block?height={height}".to_string(),
            ..SyncConfig::for_testing()
        })
        .unwrap();
        assert_eq!(c.latest_url(), "http://node:26657/block");
        assert_eq!(c.height_url(7), "http://node:26657/block?height=7");
    }

    #[test]
    fn test_extract_gateway_envelope() {
        let block = extract_block(json!({ "block_id": {}, "block": block_json("10") })).unwrap();
        assert_eq!(block.height(), Some(10));
    }

    #[test]
    fn test_extract_rpc_envelope() {
        let body = json!({ "jsonrpc": "2.0", "id": -1, "result": { "block": block_json("11") } });
        assert_eq!(extract_block(body).unwrap().height(), Some(11));
    }

    #[test]
    fn test_extract_bare_block() {
        assert_eq!(extract_block(block_json("12")).unwrap().height(), Some(12));
    }

    #[test]
    fn test_extract_rejects_other_shapes() {
        assert!(matches!(
            extract_block(json!({ "error": "not found" })),
            Err(SyncError::Decode(_))
        ));
        assert!(matches!(extract_block(json!([1, 2])), Err(SyncError::Decode(_))));
        assert!(extract_block(json!({ "result": { "height": "1" } })).is_err());
        assert!(extract_block(json!({ "block": "oops" })).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        let c = client("http://127.0.0.1:1");
        let err = c.latest_block().await.unwrap_err();
        assert!(err.is_transient());
    }
}
