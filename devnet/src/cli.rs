//! CLI definitions for the devnet launcher.

use clap::Parser;

/// Launch and configure a local L1 + NodeKit OP-stack L2 devnet.
#[derive(Parser, Debug, Clone)]
#[command(name = "devnet", about = "Devnet launcher for NodeKit-sequenced rollups")]
pub struct DevnetArgs {
    /// Directory of the monorepo.
    #[arg(long, default_value = ".")]
    pub monorepo_dir: String,

    /// Output path for devnet config, relative to the monorepo.
    #[arg(long, default_value = ".devnet")]
    pub devnet_dir: String,

    /// Which L2 to run (compose service prefix).
    #[arg(long, default_value = "op1")]
    pub l2: String,

    /// URL for the L2 RPC node.
    #[arg(long, default_value = "http://localhost:19545")]
    pub l2_provider_url: String,

    /// Deployment config, relative to packages/contracts-bedrock/deploy-config.
    #[arg(long, default_value = "devnetL1.json")]
    pub deploy_config: String,

    /// Deployment config template, relative to packages/contracts-bedrock/deploy-config.
    #[arg(long, default_value = "devnetL1-nodekit-template.json")]
    pub deploy_config_template: String,

    /// Deployment output directory name, relative to packages/contracts-bedrock/deployments.
    #[arg(long, default_value = "devnetL1")]
    pub deployment: String,

    /// Compose file to use for the service containers.
    #[arg(long, default_value = "docker-compose.yml")]
    pub compose_file: String,

    /// JWT secret to access the geth HTTP API.
    #[arg(
        long,
        default_value = "0xfad2709d0bb03bf0e8ba3c99bea194575d3e98863133d1af638ed056d1d59345"
    )]
    pub jwt_secret: String,

    /// L1 RPC URL.
    #[arg(long, default_value = "http://localhost:8545")]
    pub l1_rpc_url: String,

    /// L1 WebSocket URL.
    #[arg(long, default_value = "ws://localhost:8546")]
    pub l1_ws_url: String,

    /// Sequencer endpoint URL (chain ID is the last path segment).
    #[arg(
        long,
        default_value = "http://127.0.0.1:37029/ext/bc/56iQygPt5wrSCqZSLVwKyT7hAEdraXqDsYqWtWoAWaZSKDSDm"
    )]
    pub seq_url: String,

    /// Chain ID of the L1.
    #[arg(long, default_value_t = 32382)]
    pub l1_chain_id: u64,

    /// Chain ID of the L2.
    #[arg(long, default_value_t = 45200)]
    pub l2_chain_id: u64,

    /// Sequencer-commitment contract address on L1.
    #[arg(long, default_value = "")]
    pub nodekit_contract: String,

    /// Mnemonic for the contract deployment signer.
    #[arg(long, default_value = "test test test test test test test test test test test junk")]
    pub mnemonic_words: String,

    /// Directory of the external L1 PoS devnet compose project.
    #[arg(long, default_value = "eth-pos-devnet")]
    pub eth_pos_dir: String,

    /// Launch the L2 service stack.
    #[arg(long)]
    pub launch_l2: bool,

    /// Launch the external L1 PoS devnet.
    #[arg(long)]
    pub launch_l1: bool,

    /// Deploy the L2 + sequencer contracts and exit.
    #[arg(long)]
    pub deploy_contracts: bool,

    /// Deploy an additional L2 onto an already-running L1 and sequencer.
    #[arg(long)]
    pub deploy_l2: bool,

    /// Only generate the L1 genesis allocs and exit.
    #[arg(long)]
    pub allocs: bool,

    /// Run the post-deploy deposit checks against a deployed devnet.
    #[arg(long)]
    pub test: bool,

    /// Sequence the L2 through NodeKit.
    #[arg(long)]
    pub nodekit: bool,
}
