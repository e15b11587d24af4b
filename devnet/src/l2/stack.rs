//! L2 service bring-up.
//!
//! Sequential state machine over the rollup's service containers. Every
//! phase is gated on the observable readiness of the previous one: the
//! genesis artifacts must exist before they are read, the execution
//! client must answer RPC before the node/proposer/batcher group starts.
//! Container lifetime past the initial readiness wait belongs to the
//! external process manager.

use std::{collections::HashMap, time::Duration};

use eyre::{Result, WrapErr, eyre};
use tracing::info;
use url::Url;

use crate::{
    artifacts::{AddressBook, RollupConfig},
    compose::ContainerRuntime,
    l2::generate_l2_genesis,
    paths::DevnetPaths,
    readiness::{wait_for_port, wait_for_rpc},
    rpc::RpcClient,
};

/// Attempts made waiting for the execution client's port.
const PORT_RETRIES: u64 = 10;
/// Pause between port attempts.
const PORT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Contract the bring-up extracts for the proposer.
const L2_OUTPUT_ORACLE: &str = "L2OutputOracleProxy";

/// Parameters for one L2 bring-up.
#[derive(Debug, Clone)]
pub struct BringUpOptions {
    /// Compose service prefix of this rollup (e.g. `op1`).
    pub l2: String,
    /// Chain ID of this rollup; also namespaces the compose project.
    pub l2_chain_id: u64,
    /// HTTP endpoint the execution client will serve.
    pub l2_provider_url: String,
    /// Sequencer endpoint (chain ID is the last path segment).
    pub seq_url: String,
    /// Layering onto an L1/sequencer that already serves another rollup.
    pub deploy_l2: bool,
}

impl BringUpOptions {
    /// Compose project name; prefixes volumes and containers so several
    /// rollups can coexist on one host.
    pub fn project_name(&self) -> String {
        format!("op-devnet_{}", self.l2_chain_id)
    }

    /// Chain ID of the sequencer network, the last path segment of its
    /// endpoint.
    pub fn seq_chain_id(&self) -> String {
        self.seq_url.rsplit('/').next().unwrap_or_default().to_string()
    }

    /// Port the execution client serves on.
    pub fn l2_provider_port(&self) -> Result<u16> {
        let url: Url = self
            .l2_provider_url
            .parse()
            .wrap_err_with(|| format!("invalid L2 provider URL `{}`", self.l2_provider_url))?;
        url.port_or_known_default()
            .ok_or_else(|| eyre!("L2 provider URL `{}` has no port", self.l2_provider_url))
    }
}

/// Brings up the full L2 service stack.
pub async fn bring_up<R: ContainerRuntime>(
    runtime: &R,
    paths: &DevnetPaths,
    opts: &BringUpOptions,
) -> Result<()> {
    generate_l2_genesis(paths).await?;

    let rollup_config = RollupConfig::load(&paths.rollup_config_path)?;
    let addresses = AddressBook::load(&paths.addresses_json_path)?;
    let l2_output_oracle = addresses.require(L2_OUTPUT_ORACLE)?;
    let batch_inbox_address = rollup_config.batch_inbox_address;

    let l2_port = opts.l2_provider_port()?;
    info!(url = %opts.l2_provider_url, port = l2_port, "L2 provider endpoint");

    let execution_services = vec![format!("{}-l2", opts.l2), format!("{}-geth-proxy", opts.l2)];
    if matches!(runtime.is_running(&execution_services[0]).await, Ok(true)) {
        info!(service = %execution_services[0], "Execution client already running");
    }

    info!("Bringing up L2.");
    runtime.start(&execution_services, &execution_env(paths, opts, l2_port), false).await?;

    wait_for_port("127.0.0.1", l2_port, PORT_RETRIES, PORT_RETRY_INTERVAL).await?;
    let client = RpcClient::new(&opts.l2_provider_url, None)?;
    wait_for_rpc(&client, None).await?;

    info!(address = %l2_output_oracle, "Using L2OutputOracle");
    info!(address = %batch_inbox_address, "Using batch inbox");

    info!("Bringing up `op-node`, `op-proposer` and `op-batcher`.");
    let rollup_services = vec![
        format!("{}-node", opts.l2),
        format!("{}-proposer", opts.l2),
        format!("{}-batcher", opts.l2),
    ];
    let env = rollup_env(
        paths,
        opts,
        &l2_output_oracle.to_string(),
        &batch_inbox_address.to_string(),
    );
    // On a shared L1, already-running services must not be recreated out
    // from under the rollup that owns them.
    runtime.start(&rollup_services, &env, opts.deploy_l2).await?;

    info!("Devnet ready.");
    Ok(())
}

/// Environment for the execution client and its RPC proxy.
fn execution_env(
    paths: &DevnetPaths,
    opts: &BringUpOptions,
    l2_port: u16,
) -> HashMap<String, String> {
    HashMap::from([
        ("PWD".to_string(), paths.ops_bedrock_dir.display().to_string()),
        ("DEVNET_DIR".to_string(), paths.devnet_dir.display().to_string()),
        ("SEQ_ADDR".to_string(), opts.seq_url.clone()),
        ("SEQ_CHAIN_ID".to_string(), opts.seq_chain_id()),
        ("OP1_L2_RPC_PORT".to_string(), l2_port.to_string()),
        ("COMPOSE_PROJECT_NAME".to_string(), opts.project_name()),
    ])
}

/// Environment for the node/proposer/batcher group.
fn rollup_env(
    paths: &DevnetPaths,
    opts: &BringUpOptions,
    l2_output_oracle: &str,
    batch_inbox_address: &str,
) -> HashMap<String, String> {
    HashMap::from([
        ("PWD".to_string(), paths.ops_bedrock_dir.display().to_string()),
        ("DEVNET_DIR".to_string(), paths.devnet_dir.display().to_string()),
        ("L2OO_ADDRESS".to_string(), l2_output_oracle.to_string()),
        ("SEQUENCER_BATCH_INBOX_ADDRESS".to_string(), batch_inbox_address.to_string()),
        ("SEQ_ADDR".to_string(), opts.seq_url.clone()),
        ("SEQ_CHAIN_ID".to_string(), opts.seq_chain_id()),
        ("L1RPC".to_string(), paths.l1_rpc_url.clone()),
        ("L1WS".to_string(), paths.l1_ws_url.clone()),
        ("COMPOSE_PROJECT_NAME".to_string(), opts.project_name()),
    ])
}
