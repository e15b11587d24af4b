//! Tests for the artifact flow between deployment and bring-up.

use std::path::Path;

use devnet::{
    DevnetPaths,
    artifacts::{AddressBook, DeployConfig, FeatureFlags, RollupConfig, init_deploy_config, write_json},
    deployer::publish_artifacts,
};
use serde_json::json;

fn paths_under(root: &Path) -> DevnetPaths {
    let contracts = root.join("packages/contracts-bedrock");
    DevnetPaths {
        monorepo_dir: root.to_path_buf(),
        devnet_dir: root.join(".devnet"),
        deployment_dir: contracts.join("deployments/devnetL1"),
        l1_deployments_path: contracts.join("deployments/devnetL1/.deploy"),
        devnet_config_path: contracts.join("deploy-config/devnetL1.json"),
        devnet_config_template_path: contracts.join("deploy-config/devnetL1-nodekit-template.json"),
        contracts_bedrock_dir: contracts,
        op_node_dir: root.join("op-node"),
        ops_bedrock_dir: root.join("ops-bedrock"),
        ops_chain_ops_dir: root.join("op-chain-ops"),
        sdk_dir: root.join("packages/sdk"),
        genesis_l1_path: root.join(".devnet/genesis-l1.json"),
        genesis_l2_path: root.join(".devnet/genesis-l2.json"),
        allocs_path: root.join(".devnet/allocs-l1.json"),
        addresses_json_path: root.join(".devnet/addresses.json"),
        rollup_config_path: root.join(".devnet/rollup.json"),
        eth_pos_dir: root.join("eth-pos-devnet"),
        l1_rpc_url: "http://localhost:8545".to_string(),
        l1_ws_url: "ws://localhost:8546".to_string(),
        seq_url: "http://127.0.0.1:37029/ext/bc/seqchain".to_string(),
    }
}

fn scaffold(paths: &DevnetPaths) {
    std::fs::create_dir_all(&paths.devnet_dir).unwrap();
    std::fs::create_dir_all(&paths.deployment_dir).unwrap();
    std::fs::create_dir_all(paths.devnet_config_path.parent().unwrap()).unwrap();

    write_json(
        &paths.devnet_config_template_path,
        &json!({
            "l1ChainID": 32382,
            "l2ChainID": 901,
            "finalizationPeriodSeconds": 2,
        }),
    )
    .unwrap();
}

#[test]
fn test_init_config_pins_chain_id_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_under(dir.path());
    scaffold(&paths);

    let flags = FeatureFlags { fault_proofs: true, plasma: false };
    let config = init_deploy_config(&paths, true, 45200, flags).unwrap();

    assert_eq!(config.l2_chain_id, Some(45200));
    assert_eq!(config.use_fault_proofs, Some(true));
    assert_eq!(config.fault_game_max_duration, Some(10));
    assert_eq!(config.use_plasma, None);
    assert!(config.l1_genesis_block_timestamp.unwrap().starts_with("0x"));

    // The live file must already hold the final values.
    let on_disk = DeployConfig::load(&paths.devnet_config_path).unwrap();
    assert_eq!(on_disk.l2_chain_id, Some(45200));
    assert_eq!(on_disk.extra["l1ChainID"], json!(32382));
}

#[test]
fn test_deployment_artifacts_visible_to_bring_up() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_under(dir.path());
    scaffold(&paths);

    init_deploy_config(&paths, true, 45200, FeatureFlags::default()).unwrap();

    // Address book as the deployment tool leaves it behind.
    write_json(
        &paths.l1_deployments_path,
        &json!({
            "L2OutputOracleProxy": "0x700b6a60ce7eaaea56f065753d8dcb9653dbad35",
            "OptimismPortalProxy": "0x978e3286eb805934215a88694d80b09aded68d90",
        }),
    )
    .unwrap();

    let nodekit_contract = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
    publish_artifacts(&paths, nodekit_contract).unwrap();

    // What bring-up reads must match what deployment wrote.
    let config = DeployConfig::load(&paths.devnet_config_path).unwrap();
    assert_eq!(config.nodekit_contract_address.as_deref(), Some(nodekit_contract));

    let addresses = AddressBook::load(&paths.addresses_json_path).unwrap();
    let oracle = addresses.require("L2OutputOracleProxy").unwrap();
    assert_eq!(
        oracle.to_string().to_lowercase(),
        "0x700b6a60ce7eaaea56f065753d8dcb9653dbad35"
    );
}

#[test]
fn test_rollup_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollup.json");

    let config: RollupConfig = serde_json::from_value(json!({
        "batch_inbox_address": "0xff00000000000000000000000000000000045200",
        "genesis": {"l2_time": 1700000000},
        "block_time": 2,
    }))
    .unwrap();
    write_json(&path, &config).unwrap();

    assert_eq!(RollupConfig::load(&path).unwrap(), config);
}
