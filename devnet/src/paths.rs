//! Resolved filesystem locations and endpoints for one devnet run.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

use crate::cli::DevnetArgs;

/// Immutable bundle of every path and endpoint the launcher touches.
///
/// Built once at startup from the CLI arguments and passed by reference
/// into every component; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct DevnetPaths {
    /// Root of the monorepo checkout.
    pub monorepo_dir: PathBuf,
    /// Directory holding generated devnet artifacts.
    pub devnet_dir: PathBuf,
    /// contracts-bedrock package directory (forge project root).
    pub contracts_bedrock_dir: PathBuf,
    /// Deployment output directory for the active deployment context.
    pub deployment_dir: PathBuf,
    /// Address book emitted by the deployment tool (`.deploy`).
    pub l1_deployments_path: PathBuf,
    /// Live deploy config consumed by deployment and genesis generation.
    pub devnet_config_path: PathBuf,
    /// Deploy config template the live config is materialized from.
    pub devnet_config_template_path: PathBuf,
    /// op-node directory (genesis generator).
    pub op_node_dir: PathBuf,
    /// ops-bedrock directory (compose project root).
    pub ops_bedrock_dir: PathBuf,
    /// op-chain-ops directory (check-l2 tool).
    pub ops_chain_ops_dir: PathBuf,
    /// SDK package directory (hardhat deposit tasks).
    pub sdk_dir: PathBuf,
    /// Generated L1 genesis file.
    pub genesis_l1_path: PathBuf,
    /// Generated L2 genesis file.
    pub genesis_l2_path: PathBuf,
    /// Generated L1 genesis allocs.
    pub allocs_path: PathBuf,
    /// Shared copy of the contract address book.
    pub addresses_json_path: PathBuf,
    /// Generated rollup config.
    pub rollup_config_path: PathBuf,
    /// External L1 PoS devnet compose project directory.
    pub eth_pos_dir: PathBuf,
    /// L1 RPC endpoint.
    pub l1_rpc_url: String,
    /// L1 WebSocket endpoint.
    pub l1_ws_url: String,
    /// Sequencer endpoint.
    pub seq_url: String,
}

impl DevnetPaths {
    /// Resolves all locations from the CLI arguments.
    pub fn resolve(args: &DevnetArgs) -> Result<Self> {
        let monorepo_dir = Path::new(&args.monorepo_dir)
            .canonicalize()
            .wrap_err_with(|| format!("invalid monorepo dir `{}`", args.monorepo_dir))?;
        let devnet_dir = monorepo_dir.join(&args.devnet_dir);
        let contracts_bedrock_dir = monorepo_dir.join("packages").join("contracts-bedrock");
        let deployment_dir = contracts_bedrock_dir.join("deployments").join(&args.deployment);
        let deploy_config_dir = contracts_bedrock_dir.join("deploy-config");

        Ok(Self {
            l1_deployments_path: deployment_dir.join(".deploy"),
            devnet_config_path: deploy_config_dir.join(&args.deploy_config),
            devnet_config_template_path: deploy_config_dir.join(&args.deploy_config_template),
            op_node_dir: monorepo_dir.join("op-node"),
            ops_bedrock_dir: monorepo_dir.join("ops-bedrock"),
            ops_chain_ops_dir: monorepo_dir.join("op-chain-ops"),
            sdk_dir: monorepo_dir.join("packages").join("sdk"),
            genesis_l1_path: devnet_dir.join("genesis-l1.json"),
            genesis_l2_path: devnet_dir.join("genesis-l2.json"),
            allocs_path: devnet_dir.join("allocs-l1.json"),
            addresses_json_path: devnet_dir.join("addresses.json"),
            rollup_config_path: devnet_dir.join("rollup.json"),
            eth_pos_dir: PathBuf::from(&args.eth_pos_dir),
            l1_rpc_url: args.l1_rpc_url.clone(),
            l1_ws_url: args.l1_ws_url.clone(),
            seq_url: args.seq_url.clone(),
            monorepo_dir,
            devnet_dir,
            contracts_bedrock_dir,
            deployment_dir,
        })
    }
}
