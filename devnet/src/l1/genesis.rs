//! L1 genesis allocs generation against a throwaway dev node.

use std::time::Duration;

use eyre::{Result, WrapErr, bail};
use tracing::info;

use crate::{
    artifacts::{FeatureFlags, init_deploy_config, write_json},
    deployer::{self, Cast, DeployOptions},
    paths::DevnetPaths,
    readiness::wait_for_port,
    rpc::RpcClient,
};

const L1_DEV_PORT: u16 = 8545;

/// Generates the L1 genesis allocs file.
///
/// Starts a dev-mode geth, deploys the contract set against it in an
/// isolated task, dumps the resulting chain state via `debug_dumpBlock`,
/// and writes it as the allocs artifact. The dev node is terminated on
/// every exit path.
pub async fn generate_l1_allocs(
    paths: &DevnetPaths,
    opts: &DeployOptions,
    l2_chain_id: u64,
    flags: FeatureFlags,
) -> Result<()> {
    // A node already listening here would hand out a stale genesis block.
    if wait_for_port("127.0.0.1", L1_DEV_PORT, 1, Duration::ZERO).await.is_ok() {
        bail!(
            "existing process is listening on localhost:{L1_DEV_PORT}, \
             please kill it and try again (e.g. `pkill geth`)"
        );
    }

    info!("Generating L1 genesis state");
    init_deploy_config(paths, false, l2_chain_id, flags)?;

    let mut geth = tokio::process::Command::new("geth")
        .args(["--dev", "--http", "--http.api", "eth,debug"])
        .args(["--verbosity", "4", "--gcmode", "archive", "--dev.gaslimit", "30000000"])
        .arg("--rpc.allow-unprotected-txs")
        .kill_on_drop(true)
        .spawn()
        .wrap_err("failed to start dev geth")?;

    let result = dump_allocs(paths, opts).await;

    let _ = geth.kill().await;
    result
}

/// Runs the deployment in a spawned task and dumps the resulting state.
///
/// The task boundary keeps a deployment panic or failure from tearing
/// down this process's cleanup path; its result comes back through the
/// join handle.
async fn dump_allocs(paths: &DevnetPaths, opts: &DeployOptions) -> Result<()> {
    let task_paths = paths.clone();
    let task_opts = DeployOptions { deploy_l2: false, ..opts.clone() };
    let deployment =
        tokio::spawn(async move { deployer::deploy(&Cast, &task_paths, &task_opts).await });
    deployment.await.wrap_err("deployment task panicked")??;

    let client = RpcClient::new(&paths.l1_rpc_url, None)?;
    let dump = client.dump_block_latest().await.wrap_err("failed to dump chain state")?;

    write_json(&paths.allocs_path, &dump)?;
    info!(path = %paths.allocs_path.display(), "Wrote L1 allocs");
    Ok(())
}
