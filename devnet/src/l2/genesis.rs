//! L2 genesis and rollup config generation.

use eyre::{Result, WrapErr};
use tracing::info;

use crate::{command::Cmd, paths::DevnetPaths};

/// Generates the L2 genesis and rollup config files.
///
/// Existing files are treated as a cache and left alone, so repeated
/// launches against the same devnet directory reuse one genesis. The
/// generator reads the live deploy config and the L1 deployment
/// addresses, both of which must exist by the time this runs.
pub async fn generate_l2_genesis(paths: &DevnetPaths) -> Result<()> {
    if paths.genesis_l2_path.is_file() {
        info!("L2 genesis and rollup configs already generated.");
        return Ok(());
    }

    info!("Generating L2 genesis and rollup configs.");
    Cmd::new("go")
        .args(["run", "cmd/main.go", "genesis", "l2"])
        .args(["--l1-rpc", paths.l1_rpc_url.as_str()])
        .arg("--deploy-config")
        .arg(paths.devnet_config_path.display().to_string())
        .arg("--l1-deployments")
        .arg(paths.l1_deployments_path.display().to_string())
        .arg("--outfile.l2")
        .arg(paths.genesis_l2_path.display().to_string())
        .arg("--outfile.rollup")
        .arg(paths.rollup_config_path.display().to_string())
        .cwd(&paths.op_node_dir)
        .run()
        .await
        .wrap_err("L2 genesis generation failed")
}
