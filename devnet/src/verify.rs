//! Post-deploy verification of a running devnet.

use std::time::Duration;

use eyre::{Result, WrapErr};
use tracing::info;

use crate::{
    command::Cmd,
    paths::DevnetPaths,
    runner::{CommandPreset, DEFAULT_PARALLELISM, into_result, run_commands},
};

/// Deadline for each deposit check.
const DEPOSIT_TIMEOUT: Duration = Duration::from_secs(8 * 60);

/// Runs the deployment checks against an already-deployed devnet.
///
/// First validates the L2 config, then runs the two deposit flows
/// concurrently. The deposits use distinct non-system signer indices so
/// their nonces never contend and fee estimation on the system accounts
/// stays undisturbed.
pub async fn run_deployment_checks(paths: &DevnetPaths, l2_provider_url: &str) -> Result<()> {
    info!("Checking L2 config");
    Cmd::new("go")
        .args(["run", "cmd/check-l2/main.go"])
        .args(["--l2-rpc-url", l2_provider_url, "--l1-rpc-url", paths.l1_rpc_url.as_str()])
        .cwd(&paths.ops_chain_ops_dir)
        .run()
        .await
        .wrap_err("L2 config check failed")?;

    let addresses_json = paths.addresses_json_path.display().to_string();
    let presets = vec![
        CommandPreset::new(
            "erc20-test",
            [
                "npx",
                "hardhat",
                "deposit-erc20",
                "--network",
                "devnetL1",
                "--l1-contracts-json-path",
                addresses_json.as_str(),
                "--l2-provider-url",
                l2_provider_url,
                "--signer-index",
                "14",
            ],
            &paths.sdk_dir,
            DEPOSIT_TIMEOUT,
        ),
        CommandPreset::new(
            "eth-test",
            [
                "npx",
                "hardhat",
                "deposit-eth",
                "--network",
                "devnetL1",
                "--l1-contracts-json-path",
                addresses_json.as_str(),
                "--l2-provider-url",
                l2_provider_url,
                "--signer-index",
                "15",
            ],
            &paths.sdk_dir,
            DEPOSIT_TIMEOUT,
        ),
    ];

    let outcomes = run_commands(presets, DEFAULT_PARALLELISM).await;
    into_result(outcomes).wrap_err("deployment checks failed")?;

    info!("Deployment checks passed");
    Ok(())
}
