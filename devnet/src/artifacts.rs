//! File-resident JSON artifacts shared between launch steps.
//!
//! All cross-step state lives in JSON files under the devnet directory:
//! the deploy config, the contract address book, and the rollup config.
//! Writes are whole-file replaces; single-writer-per-file discipline is
//! assumed within a run.

use std::{
    collections::BTreeMap,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{error::DevnetError, paths::DevnetPaths};

/// Reads and parses a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DevnetError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| DevnetError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&contents)
        .map_err(|source| DevnetError::Parse { path: path.to_path_buf(), source })
}

/// Serializes a value to a JSON artifact, replacing any existing file.
///
/// Output is UTF-8 with 2-space indentation, the format the external
/// genesis and deployment tools produce and consume.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DevnetError> {
    let contents = serde_json::to_string_pretty(value)
        .map_err(|source| DevnetError::Parse { path: path.to_path_buf(), source })?;
    std::fs::write(path, contents)
        .map_err(|source| DevnetError::Io { path: path.to_path_buf(), source })
}

/// Copies an artifact file to the shared location.
///
/// Plain file copy; there is a single producer per run, so the copy is
/// atomic for this design's purposes.
pub fn copy_artifact(src: &Path, dst: &Path) -> Result<(), DevnetError> {
    std::fs::copy(src, dst)
        .map(|_| ())
        .map_err(|source| DevnetError::Io { path: src.to_path_buf(), source })
}

/// Feature toggles read from the process environment at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureFlags {
    /// Enable the fault-proof contract set.
    pub fault_proofs: bool,
    /// Enable plasma mode.
    pub plasma: bool,
}

impl FeatureFlags {
    /// Reads `DEVNET_FPAC` / `DEVNET_PLASMA` once; carried by value after.
    pub fn from_env() -> Self {
        let enabled = |key: &str| std::env::var(key).is_ok_and(|v| v == "true");
        Self { fault_proofs: enabled("DEVNET_FPAC"), plasma: enabled("DEVNET_PLASMA") }
    }
}

/// The deploy-config file driving contract deployment and genesis
/// generation.
///
/// Known fields are typed; everything else the template carries rides in
/// `extra` and round-trips untouched, so the file stays compatible with
/// whatever new keys the external tools grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    /// L1 genesis timestamp, hex-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l1_genesis_block_timestamp: Option<String>,
    /// Chain ID of the rollup.
    #[serde(rename = "l2ChainID", skip_serializing_if = "Option::is_none")]
    pub l2_chain_id: Option<u64>,
    /// Deploy the fault-proof contract set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_fault_proofs: Option<bool>,
    /// Maximum fault-game duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_game_max_duration: Option<u64>,
    /// Enable plasma mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_plasma: Option<bool>,
    /// Sequencer-commitment contract address on L1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodekit_contract_address: Option<String>,
    /// Unmodeled template keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeployConfig {
    /// Loads a deploy config from disk.
    pub fn load(path: &Path) -> Result<Self, DevnetError> {
        read_json(path)
    }

    /// Persists the deploy config, replacing the file.
    pub fn save(&self, path: &Path) -> Result<(), DevnetError> {
        write_json(path, self)
    }
}

/// Materializes the live deploy config from its template.
///
/// Refreshes the genesis timestamp when asked, applies feature toggles,
/// and pins the L2 chain ID. The result is persisted before returning, so
/// every downstream consumer of the file sees the final values.
pub fn init_deploy_config(
    paths: &DevnetPaths,
    update_timestamp: bool,
    l2_chain_id: u64,
    flags: FeatureFlags,
) -> Result<DeployConfig, DevnetError> {
    let mut config = DeployConfig::load(&paths.devnet_config_template_path)?;

    if update_timestamp {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_secs();
        config.l1_genesis_block_timestamp = Some(format!("{now:#x}"));
    }
    if flags.fault_proofs {
        config.use_fault_proofs = Some(true);
        config.fault_game_max_duration = Some(10);
    }
    if flags.plasma {
        config.use_plasma = Some(true);
    }
    config.l2_chain_id = Some(l2_chain_id);

    config.save(&paths.devnet_config_path)?;
    Ok(config)
}

/// Contract name → deployed address, as emitted by the deployment tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook(pub BTreeMap<String, Address>);

impl AddressBook {
    /// Loads the address book from disk.
    pub fn load(path: &Path) -> Result<Self, DevnetError> {
        read_json(path)
    }

    /// Returns the address of a contract, failing when it is absent.
    pub fn require(&self, name: &str) -> Result<Address, DevnetError> {
        self.0.get(name).copied().ok_or_else(|| DevnetError::MissingContract(name.to_string()))
    }
}

/// The rollup config produced by L2 genesis generation.
///
/// Immutable once generated for a run. Only the batch inbox is consumed
/// here; the rest is passed through to the rollup services on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupConfig {
    /// L1 address the batcher posts L2 transaction data to.
    pub batch_inbox_address: Address,
    /// Unmodeled generator output, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RollupConfig {
    /// Loads the rollup config from disk.
    pub fn load(path: &Path) -> Result<Self, DevnetError> {
        read_json(path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_config() -> DeployConfig {
        DeployConfig {
            l1_genesis_block_timestamp: Some("0x66f0c4d1".to_string()),
            l2_chain_id: Some(45200),
            use_fault_proofs: None,
            fault_game_max_duration: None,
            use_plasma: None,
            nodekit_contract_address: Some("0x0000000000000000000000000000000000000042".into()),
            extra: {
                let mut extra = Map::new();
                extra.insert("finalizationPeriodSeconds".into(), json!(2));
                extra.insert("batchSenderAddress".into(), json!("0x3c44..."));
                extra
            },
        }
    }

    #[test]
    fn test_deploy_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devnetL1.json");

        let config = sample_config();
        config.save(&path).unwrap();
        let loaded = DeployConfig::load(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_deploy_config_preserves_unknown_keys_and_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devnetL1.json");

        sample_config().save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        assert!(raw.contains("\n  \"l2ChainID\": 45200"));
        assert!(raw.contains("finalizationPeriodSeconds"));
    }

    #[test]
    fn test_address_book_require() {
        let book: AddressBook = serde_json::from_value(json!({
            "L2OutputOracleProxy": "0x700b6a60ce7eaaea56f065753d8dcb9653dbad35",
        }))
        .unwrap();

        assert!(book.require("L2OutputOracleProxy").is_ok());
        assert!(matches!(
            book.require("OptimismPortalProxy"),
            Err(DevnetError::MissingContract(name)) if name == "OptimismPortalProxy"
        ));
    }

    #[test]
    fn test_rollup_config_batch_inbox() {
        let config: RollupConfig = serde_json::from_value(json!({
            "batch_inbox_address": "0xff00000000000000000000000000000000045200",
            "genesis": {"l2_time": 1},
        }))
        .unwrap();

        assert_eq!(
            config.batch_inbox_address.to_string().to_lowercase(),
            "0xff00000000000000000000000000000000045200"
        );
        assert!(config.extra.contains_key("genesis"));
    }
}
