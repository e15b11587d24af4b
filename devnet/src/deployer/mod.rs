//! L1 contract deployment for the rollup and the sequencer commitment.

use alloy_primitives::{Address, U256, address};
use eyre::{Result, WrapErr, eyre};
use rand::RngCore;
use tracing::{debug, info};

use crate::{
    artifacts::{DeployConfig, copy_artifact},
    command::Cmd,
    error::DevnetError,
    paths::DevnetPaths,
    readiness::wait_for_rpc,
    rpc::RpcClient,
};

/// The shared CREATE2 factory account. Its address and creation
/// transaction are fixed, so contracts deployed through it land at the
/// same addresses on every chain.
pub const CREATE2_DEPLOYER_ADDRESS: Address =
    address!("3fAB184622Dc19b6109349B94811493BF2a45362");

/// Ether sent to the factory account before publishing its creation
/// transaction.
pub const CREATE2_DEPLOYER_FUNDING: &str = "1ether";

/// Presigned creation transaction of the CREATE2 factory. Content-addressed;
/// identical on every chain.
const CREATE2_DEPLOYER_RAW_TX: &str = "0xf8a58085174876e800830186a08080b853604580600e600039806000f350fe7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe03601600081602082378035828234f58015156039578182fd5b8082525050506014600cf31ba02222222222222222222222222222222222222222222222222222222222222222a02222222222222222222222222222222222222222222222222222222222222222";

/// Forge script entrypoint for the L1 contract set.
const DEPLOY_SCRIPT_FQN: &str = "scripts/Deploy.s.sol:Deploy";

/// Inputs for one deployment run.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Deploy-config file name; its stem becomes the deployment context.
    pub deploy_config: String,
    /// Deploying an additional L2 onto an L1 that already hosts one.
    pub deploy_l2: bool,
    /// JWT secret for the L1 RPC, empty when the endpoint is open.
    pub jwt_secret: String,
    /// Mnemonic handed to the deployment tool for signing.
    pub mnemonic: String,
    /// Sequencer-commitment contract address supplied out-of-band.
    pub nodekit_contract: String,
}

/// Balance/funding/raw-transaction operations against L1.
///
/// A thin seam over the external `cast` tool so the funding short-circuit
/// is testable without a chain.
pub trait ChainCli {
    /// Balance of `address` in wei.
    fn balance(
        &self,
        rpc_url: &str,
        address: Address,
    ) -> impl Future<Output = Result<U256, DevnetError>>;

    /// Sends `amount` from an unlocked account.
    fn send_value(
        &self,
        rpc_url: &str,
        from: Address,
        to: Address,
        amount: &str,
    ) -> impl Future<Output = Result<(), DevnetError>>;

    /// Publishes a presigned raw transaction.
    fn publish(&self, rpc_url: &str, raw_tx: &str)
    -> impl Future<Output = Result<(), DevnetError>>;
}

/// [`ChainCli`] backed by the `cast` CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cast;

impl ChainCli for Cast {
    async fn balance(&self, rpc_url: &str, address: Address) -> Result<U256, DevnetError> {
        let out = Cmd::new("cast")
            .arg("balance")
            .arg(address.to_string())
            .args(["--rpc-url", rpc_url])
            .capture()
            .await?;
        out.trim()
            .parse::<U256>()
            .map_err(|_| DevnetError::Deployment(format!("unparseable balance `{}`", out.trim())))
    }

    async fn send_value(
        &self,
        rpc_url: &str,
        from: Address,
        to: Address,
        amount: &str,
    ) -> Result<(), DevnetError> {
        Cmd::new("cast")
            .arg("send")
            .arg("--from")
            .arg(from.to_string())
            .args(["--rpc-url", rpc_url, "--unlocked", "--value", amount])
            .arg(to.to_string())
            .run()
            .await
    }

    async fn publish(&self, rpc_url: &str, raw_tx: &str) -> Result<(), DevnetError> {
        Cmd::new("cast").args(["publish", "--rpc-url", rpc_url, raw_tx]).run().await
    }
}

/// Deploys the L1 contract set and publishes the resulting artifacts.
///
/// Blocks until the target RPC is ready, deploys from the node's first
/// signer account, ensures the CREATE2 factory exists (skipping the
/// funding steps when a previous run already paid for it), runs the forge
/// deployment, then patches the shared deploy config and copies the
/// address book into the shared location. Any step failure aborts the
/// whole operation; re-running is safe because of the factory
/// short-circuit.
pub async fn deploy<C: ChainCli>(
    cast: &C,
    paths: &DevnetPaths,
    opts: &DeployOptions,
) -> Result<()> {
    let rpc_url = paths.l1_rpc_url.as_str();
    let client = RpcClient::new(rpc_url, Some(&opts.jwt_secret))?;
    wait_for_rpc(&client, None).await?;

    let accounts = client.accounts().await.wrap_err("failed to list signer accounts")?;
    let account = *accounts.first().ok_or_else(|| eyre!("L1 node exposes no signer accounts"))?;
    info!(%account, "Deploying");

    ensure_create2_deployer(cast, rpc_url, account).await?;

    let context = opts.deploy_config.trim_end_matches(".json");
    let mut forge = Cmd::new("forge")
        .args(["script", DEPLOY_SCRIPT_FQN, "--sender"])
        .arg(account.to_string())
        .args(["--rpc-url", rpc_url, "--broadcast", "--unlocked"])
        .cwd(&paths.contracts_bedrock_dir)
        .env("DEPLOYMENT_CONTEXT", context)
        .env("MNEMONIC", &opts.mnemonic);
    if opts.deploy_l2 {
        // A fresh salt keeps this rollup's contract addresses from
        // colliding with a prior deployment sharing the L1.
        forge = forge.env("IMPL_SALT", random_salt());
    }
    forge
        .run()
        .await
        .map_err(|err| DevnetError::Deployment(err.to_string()))
        .wrap_err("contract deployment failed")?;

    publish_artifacts(paths, &opts.nodekit_contract)?;
    Ok(())
}

/// Makes sure the CREATE2 factory exists on L1.
///
/// A nonzero balance on the factory account means a previous run already
/// funded and published it; redoing either step would conflict with the
/// shared state other rollups rely on.
pub async fn ensure_create2_deployer<C: ChainCli>(
    cast: &C,
    rpc_url: &str,
    from: Address,
) -> Result<()> {
    let balance = cast
        .balance(rpc_url, CREATE2_DEPLOYER_ADDRESS)
        .await
        .wrap_err("failed to query create2 deployer balance")?;
    if !balance.is_zero() {
        debug!(%balance, "create2 deployer already funded, skipping");
        return Ok(());
    }

    cast.send_value(rpc_url, from, CREATE2_DEPLOYER_ADDRESS, CREATE2_DEPLOYER_FUNDING)
        .await
        .wrap_err("failed to fund create2 deployer")?;
    cast.publish(rpc_url, CREATE2_DEPLOYER_RAW_TX)
        .await
        .wrap_err("failed to publish create2 deployer transaction")?;
    Ok(())
}

/// 32 random bytes, hex-encoded, for the deployment tool's implementation
/// salt.
pub fn random_salt() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Patches the shared deploy config with the sequencer-commitment address
/// and copies the deployment tool's address book to the shared location.
///
/// Runs before anything reads either file downstream, which is what keeps
/// the bring-up's read of these artifacts well-defined.
pub fn publish_artifacts(paths: &DevnetPaths, nodekit_contract: &str) -> Result<()> {
    let mut config = DeployConfig::load(&paths.devnet_config_path)
        .wrap_err("failed to load deploy config for patching")?;
    config.nodekit_contract_address = Some(nodekit_contract.to_string());
    config.save(&paths.devnet_config_path).wrap_err("failed to persist deploy config")?;

    copy_artifact(&paths.l1_deployments_path, &paths.addresses_json_path)
        .wrap_err("failed to copy address book")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct MockCli {
        balance: U256,
        funded: Mutex<u32>,
        published: Mutex<u32>,
    }

    impl ChainCli for MockCli {
        async fn balance(&self, _rpc_url: &str, _address: Address) -> Result<U256, DevnetError> {
            Ok(self.balance)
        }

        async fn send_value(
            &self,
            _rpc_url: &str,
            _from: Address,
            _to: Address,
            _amount: &str,
        ) -> Result<(), DevnetError> {
            *self.funded.lock().unwrap() += 1;
            Ok(())
        }

        async fn publish(&self, _rpc_url: &str, _raw_tx: &str) -> Result<(), DevnetError> {
            *self.published.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_funded_deployer_short_circuits() {
        let cast = MockCli { balance: U256::from(1u64), ..Default::default() };

        ensure_create2_deployer(&cast, "http://localhost:8545", Address::ZERO).await.unwrap();

        assert_eq!(*cast.funded.lock().unwrap(), 0);
        assert_eq!(*cast.published.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unfunded_deployer_is_funded_and_published() {
        let cast = MockCli::default();

        ensure_create2_deployer(&cast, "http://localhost:8545", Address::ZERO).await.unwrap();

        assert_eq!(*cast.funded.lock().unwrap(), 1);
        assert_eq!(*cast.published.lock().unwrap(), 1);
    }

    #[test]
    fn test_salts_are_unique_across_runs() {
        let first = random_salt();
        let second = random_salt();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }
}
