//! Readiness probes gating each bring-up step on observable state.

use std::time::Duration;

use jsonrpsee::core::ClientError;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::{error::DevnetError, rpc::RpcClient};

/// Pause between RPC readiness attempts.
const RPC_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Waits for a TCP port to accept connections.
///
/// Makes exactly `retries` connection attempts, sleeping `interval`
/// between failures, then fails with [`DevnetError::Timeout`] carrying the
/// attempt count.
pub async fn wait_for_port(
    host: &str,
    port: u16,
    retries: u64,
    interval: Duration,
) -> Result<(), DevnetError> {
    for attempt in 1..=retries {
        debug!(host, port, attempt, "Trying port");
        match TcpStream::connect((host, port)).await {
            Ok(_) => {
                info!(host, port, "Connected");
                return Ok(());
            }
            Err(_) => tokio::time::sleep(interval).await,
        }
    }

    Err(DevnetError::Timeout { what: format!("port {host}:{port}"), attempts: retries })
}

/// Blocks until an RPC endpoint answers.
///
/// Issues `eth_chainId` through `client` and retries on transport failure.
/// An RPC-level error in a decoded response still counts as ready: the
/// endpoint is serving, which is all bring-up gates on. `max_attempts:
/// None` retries forever, matching the historical contract; callers that
/// need a deadline pass a bound and get [`DevnetError::Timeout`].
pub async fn wait_for_rpc(
    client: &RpcClient,
    max_attempts: Option<u64>,
) -> Result<(), DevnetError> {
    let mut attempts: u64 = 0;
    loop {
        attempts += 1;
        match client.chain_id().await {
            Ok(_) => {
                info!(url = client.url(), "RPC server ready");
                return Ok(());
            }
            Err(DevnetError::Transport(
                err @ (ClientError::Transport(_) | ClientError::RequestTimeout),
            )) => {
                warn!(url = client.url(), error = %err, "Unable to connect to RPC");
                if max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(DevnetError::Timeout {
                        what: format!("rpc {}", client.url()),
                        attempts,
                    });
                }
                tokio::time::sleep(RPC_RETRY_INTERVAL).await;
            }
            // Any decoded response proves the server is up.
            Err(_) => {
                info!(url = client.url(), "RPC server ready");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    /// Binds then drops a listener to get a port that refuses connections.
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_wait_for_port_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        wait_for_port("127.0.0.1", port, 3, Duration::ZERO).await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_port_times_out_after_exact_attempts() {
        let port = closed_port().await;

        let err = wait_for_port("127.0.0.1", port, 3, Duration::ZERO).await.unwrap_err();
        match err {
            DevnetError::Timeout { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected timeout, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_wait_for_rpc_bounded_times_out() {
        let port = closed_port().await;
        let client = RpcClient::new(&format!("http://127.0.0.1:{port}"), None).unwrap();

        let err = wait_for_rpc(&client, Some(2)).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
