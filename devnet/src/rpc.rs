//! Authenticated JSON-RPC client for L1/L2 nodes.

use alloy_primitives::Address;
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder},
    rpc_params,
};
use serde_json::Value;

use crate::{error::DevnetError, jwt};

/// JSON-RPC client for a single endpoint, with optional bearer auth.
///
/// When a shared secret is supplied, every request carries a short-lived
/// signed token. Retry policy lives in the readiness prober, not here;
/// each call is issued exactly once.
#[derive(Debug)]
pub struct RpcClient {
    client: HttpClient,
    url: String,
}

impl RpcClient {
    /// Creates a client for `url`, signing a bearer token when a non-empty
    /// secret is given.
    pub fn new(url: &str, jwt_secret: Option<&str>) -> Result<Self, DevnetError> {
        let mut builder = HttpClientBuilder::default();

        if let Some(secret) = jwt_secret.filter(|s| !s.is_empty()) {
            let token = jwt::sign_token(secret)?;
            let mut headers = HeaderMap::new();
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| DevnetError::InvalidEndpoint(url.to_string()))?;
            headers.insert("authorization", value);
            builder = builder.set_headers(headers);
        }

        let client =
            builder.build(url).map_err(|_| DevnetError::InvalidEndpoint(url.to_string()))?;
        Ok(Self { client, url: url.to_string() })
    }

    /// Endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Chain ID of the node, as the hex string the node reports.
    pub async fn chain_id(&self) -> Result<String, DevnetError> {
        Ok(self.client.request("eth_chainId", rpc_params![]).await?)
    }

    /// Accounts the node can sign for, in the node's order.
    pub async fn accounts(&self) -> Result<Vec<Address>, DevnetError> {
        Ok(self.client.request("eth_accounts", rpc_params![]).await?)
    }

    /// Full state dump of the latest block, for genesis-allocation
    /// extraction.
    pub async fn dump_block_latest(&self) -> Result<Value, DevnetError> {
        Ok(self.client.request("debug_dumpBlock", rpc_params!["latest"]).await?)
    }
}
