// Path: crates/cli/tests/node_assembly.rs
//! Builds the validator core the way `pulsar node start` does, from files on disk.

use pulsar_api::consensus::VoteExtensionApp;
use pulsar_api::registry::KeyRegistry;
use pulsar_cli::{Genesis, ValidatorNode};
use pulsar_crypto::Keypair;
use pulsar_test_utils::{assert_ok, fixtures};
use pulsar_types::app::{CrossChainValidator, PageRequest, RegisterKeysMsg};
use pulsar_types::config::ValidatorConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::tempdir;

fn keypair(seed: u64) -> Keypair {
    Keypair::generate(&mut StdRng::seed_from_u64(seed)).unwrap()
}

fn dev_config() -> ValidatorConfig {
    let mut config = ValidatorConfig::default();
    config.accumulator.development_params = true;
    config
}

fn genesis_for(kp: &Keypair) -> Genesis {
    Genesis {
        validators: vec![CrossChainValidator {
            address: "val0".into(),
            power: 10,
        }],
        key_stores: vec![RegisterKeysMsg {
            creator: "val0".into(),
            local_public_key: "aa01".into(),
            foreign_public_key: kp.address(),
        }],
    }
}

#[test]
fn config_written_to_disk_builds_a_node() {
    let dir = tempdir().unwrap();
    let kp = keypair(1);
    let key_path = dir.path().join("signing.key");
    fs::write(&key_path, format!("{}\n", kp.secret().to_base58().as_str())).unwrap();

    let config = ValidatorConfig {
        signing_key_file: Some(key_path.display().to_string()),
        ..dev_config()
    };
    let config_path = dir.path().join("validator.toml");
    fs::write(&config_path, config.to_toml_string().unwrap()).unwrap();

    let genesis_path = dir.path().join("genesis.json");
    fs::write(
        &genesis_path,
        serde_json::to_string(&genesis_for(&kp)).unwrap(),
    )
    .unwrap();

    let loaded = ValidatorConfig::load(&config_path).unwrap();
    assert_eq!(loaded, config);
    let genesis = Genesis::load(&genesis_path).unwrap();
    let node = ValidatorNode::build(loaded, &genesis).unwrap();

    assert_eq!(node.vote_ext().own_address(), kp.address());
    let state = node.state().read();
    let entry = node
        .key_store()
        .get_by_foreign_key(&*state, &kp.address())
        .unwrap()
        .unwrap();
    assert_eq!(entry.creator, "val0");
    assert_eq!(
        node.bridge().params(&*state).unwrap(),
        node.config().bridge
    );
}

#[test]
fn the_node_extends_its_own_vote() {
    let kp = keypair(2);
    let config = ValidatorConfig {
        signing_key: Some(kp.secret().to_base58().to_string()),
        ..dev_config()
    };
    let node = ValidatorNode::build(config, &genesis_for(&kp)).unwrap();

    let app_hash = node.app_hash();
    {
        let state = node.state().read();
        assert!(node
            .vote_ext()
            .process_proposal(&*state, 1, &[], &app_hash)
            .is_accept());
    }
    let state = node.state().read();
    let ext = node.vote_ext().extend_vote(&*state, 1).unwrap();
    assert!(node
        .vote_ext()
        .verify_vote_extension(&*state, 1, "val0", &ext)
        .is_accept());
    assert_eq!(node.vote_ext().votes().count(1), 1);
}

#[test]
fn bad_or_missing_signing_keys_are_fatal() {
    let kp = keypair(3);
    let missing = dev_config();
    assert!(ValidatorNode::build(missing, &Genesis::default()).is_err());

    // A public address is not a secret key.
    let wrong = ValidatorConfig {
        signing_key: Some(kp.address()),
        ..dev_config()
    };
    assert!(ValidatorNode::build(wrong, &Genesis::default()).is_err());

    let dir = tempdir().unwrap();
    let absent = ValidatorConfig {
        signing_key_file: Some(dir.path().join("nope.key").display().to_string()),
        ..dev_config()
    };
    assert!(ValidatorNode::build(absent, &Genesis::default()).is_err());
}

#[test]
fn startup_requires_a_poseidon_table_unless_in_development() {
    let kp = keypair(6);
    let config = ValidatorConfig {
        signing_key: Some(kp.secret().to_base58().to_string()),
        ..ValidatorConfig::default()
    };
    let err = ValidatorNode::build(config, &genesis_for(&kp)).unwrap_err();
    assert!(err.to_string().contains("poseidon_params"), "{err:#}");
}

#[test]
fn rejected_genesis_registrations_abort_startup() {
    let kp = keypair(4);
    let config = ValidatorConfig {
        signing_key: Some(kp.secret().to_base58().to_string()),
        ..dev_config()
    };
    let mut genesis = genesis_for(&kp);
    let mut duplicate = genesis.key_stores[0].clone();
    duplicate.creator = "consumer1other".into();
    genesis.key_stores.push(duplicate);
    assert!(ValidatorNode::build(config, &genesis).is_err());
}

#[test]
fn votes_are_persisted_through_the_assembled_node() {
    let kp = keypair(5);
    let dir = tempdir().unwrap();
    let path = dir.path().join("validator.toml");
    fs::write(
        &path,
        fixtures::validator_toml(kp.secret().to_base58().as_str()),
    )
    .unwrap();
    let config = ValidatorConfig::load(&path).unwrap();
    assert_eq!(config.chain_id, "pulsar-test");
    let node = assert_ok!(ValidatorNode::build(config, &genesis_for(&kp)));
    let handler = node.vote_ext();

    let root1 = node.app_hash();
    assert!(handler
        .process_proposal(&*node.state().read(), 1, &[], &root1)
        .is_accept());
    let ext = handler.extend_vote(&*node.state().read(), 1).unwrap();
    assert!(handler
        .verify_vote_extension(&*node.state().read(), 1, "val0", &ext)
        .is_accept());
    handler
        .pre_finalize(&mut *node.state().write(), 1, &root1)
        .unwrap();

    let root2 = node.app_hash();
    let proposal = handler
        .prepare_proposal(&*node.state().read(), 2, vec![], &root2)
        .unwrap();
    assert!(handler
        .process_proposal(&*node.state().read(), 2, &proposal, &root2)
        .is_accept());
    handler
        .pre_finalize(&mut *node.state().write(), 2, &root2)
        .unwrap();

    let state = node.state().read();
    let records = node
        .vote_ext_records()
        .vote_exts_by_height(&*state, 1, &PageRequest::default())
        .unwrap();
    assert_eq!(records.items.len(), 1);
    assert_eq!(records.items[0].validator_addr, kp.address());
    assert_eq!(records.items[0].index, format!("1/{}", kp.address()));
}
