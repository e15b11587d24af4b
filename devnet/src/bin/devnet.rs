//! Devnet launcher entrypoint.

use clap::Parser;
use devnet::{
    DevnetArgs, DevnetPaths,
    artifacts::{FeatureFlags, init_deploy_config},
    compose::ComposeRuntime,
    deployer::{self, Cast, DeployOptions},
    l1::{EthPosStack, generate_l1_allocs},
    l2::{BringUpOptions, bring_up},
    readiness::{wait_for_port, wait_for_rpc},
    rpc::RpcClient,
    verify,
};
use eyre::{Result, WrapErr};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = DevnetArgs::parse();
    let flags = FeatureFlags::from_env();
    let paths = DevnetPaths::resolve(&args)?;

    std::fs::create_dir_all(&paths.devnet_dir).wrap_err("failed to create devnet dir")?;

    let deploy_opts = DeployOptions {
        deploy_config: args.deploy_config.clone(),
        deploy_l2: args.deploy_l2,
        jwt_secret: args.jwt_secret.clone(),
        mnemonic: args.mnemonic_words.clone(),
        nodekit_contract: args.nodekit_contract.clone(),
    };

    if args.test {
        info!("Testing deployed devnet");
        return verify::run_deployment_checks(&paths, &args.l2_provider_url).await;
    }

    if args.allocs {
        return generate_l1_allocs(&paths, &deploy_opts, args.l2_chain_id, flags).await;
    }

    if args.launch_l1 {
        info!("Launching L1 PoS devnet");
        let stack = EthPosStack::new(&paths.eth_pos_dir)?;
        stack.launch()?;
        wait_for_port("127.0.0.1", 8545, 30, std::time::Duration::from_secs(1)).await?;
        wait_for_rpc(&RpcClient::new(&paths.l1_rpc_url, None)?, None).await?;
        info!("L1 PoS devnet ready");
        return Ok(());
    }

    if args.launch_l2 {
        info!("Launching op stack");
        let runtime = ComposeRuntime::new(&args.compose_file, &paths.ops_bedrock_dir);
        let opts = BringUpOptions {
            l2: args.l2.clone(),
            l2_chain_id: args.l2_chain_id,
            l2_provider_url: args.l2_provider_url.clone(),
            seq_url: args.seq_url.clone(),
            deploy_l2: args.deploy_l2,
        };
        return bring_up(&runtime, &paths, &opts).await;
    }

    if args.deploy_contracts {
        init_deploy_config(&paths, true, args.l2_chain_id, flags)?;
        match deployer::deploy(&Cast, &paths, &deploy_opts).await {
            Ok(()) => info!("contracts deployed"),
            Err(err) => {
                error!(error = %err, "unable to deploy contracts");
                return Err(err);
            }
        }
        return Ok(());
    }

    info!("Nothing to do; pass --launch-l2, --launch-l1, --deploy-contracts, --allocs or --test");
    Ok(())
}
