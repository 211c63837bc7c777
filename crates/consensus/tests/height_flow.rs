// Path: crates/consensus/tests/height_flow.rs
//! Three validators run heights 1 through 3 against the state-backed key
//! registry and vote-extension store.

use pulsar_api::consensus::{ProposalStatus, VoteExtensionApp};
use pulsar_consensus::vote_ext::{VoteExtPayload, VOTE_EXT_MARKER};
use pulsar_consensus::VoteExtHandler;
use pulsar_services::{KeyStoreService, VoteExtStore};
use pulsar_state::memory::MemoryState;
use pulsar_test_utils::{assert_bytes_eq, keypair, MockValidatorSource};
use pulsar_types::app::{PageRequest, RegisterKeysMsg};
use pulsar_types::config::NetworkId;
use std::sync::Arc;

const VALIDATORS: [&str; 3] = ["val0", "val1", "val2"];

fn setup() -> (MemoryState, Vec<VoteExtHandler>) {
    let keys = KeyStoreService::new();
    let mut state = MemoryState::new();
    for (i, name) in VALIDATORS.iter().enumerate() {
        keys.register(
            &mut state,
            &RegisterKeysMsg {
                creator: name.to_string(),
                local_public_key: format!("0{}", i + 1).repeat(2),
                foreign_public_key: keypair(i as u64 + 1).unwrap().address(),
            },
        )
        .unwrap();
    }
    let validators = Arc::new(MockValidatorSource::new(&[
        ("val0", 10),
        ("val1", 20),
        ("val2", 30),
    ]));
    let registry = Arc::new(keys);
    let store = Arc::new(VoteExtStore::new());
    let nodes = (0..VALIDATORS.len() as u64)
        .map(|i| {
            VoteExtHandler::new(
                keypair(i + 1).unwrap(),
                NetworkId::Devnet,
                registry.clone(),
                validators.clone(),
                store.clone(),
            )
            .unwrap()
        })
        .collect();
    (state, nodes)
}

/// Every node extends, and every node verifies every peer.
fn exchange_votes(state: &MemoryState, nodes: &[VoteExtHandler], height: u64) {
    let extensions: Vec<Vec<u8>> = nodes
        .iter()
        .map(|n| n.extend_vote(state, height).unwrap())
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        for (j, ext) in extensions.iter().enumerate() {
            if i == j {
                continue;
            }
            let status = node.verify_vote_extension(state, height, VALIDATORS[j], ext);
            assert!(status.is_accept(), "node {} rejected val{}: {:?}", i, j, status);
        }
        assert_eq!(node.votes().count(height), nodes.len());
    }
}

#[test]
fn votes_flow_from_extension_to_records() {
    let (mut state, nodes) = setup();
    let store = VoteExtStore::new();

    for node in &nodes {
        assert_eq!(node.process_proposal(&state, 1, &[], b""), ProposalStatus::Accept);
    }
    exchange_votes(&state, &nodes, 1);
    for node in &nodes {
        node.pre_finalize(&mut state, 1, &[1u8; 32]).unwrap();
    }

    let proposal = nodes[0]
        .prepare_proposal(&state, 2, vec![b"tx-a".to_vec()], &[2u8; 32])
        .unwrap();
    assert!(proposal[0].starts_with(VOTE_EXT_MARKER));
    assert_eq!(VoteExtPayload::decode_tx(&proposal[0]).unwrap().votes.len(), 3);
    for node in &nodes[1..] {
        assert_eq!(
            node.process_proposal(&state, 2, &proposal, &[2u8; 32]),
            ProposalStatus::Accept
        );
    }

    // Every node writes the same records into the shared state.
    for node in &nodes {
        node.pre_finalize(&mut state, 2, &[2u8; 32]).unwrap();
        assert_eq!(node.votes().count(1), 0);
    }
    for node in &nodes {
        assert_bytes_eq!(node.state_root(2).unwrap(), [2u8; 32]);
    }
    let index = store.vote_ext_index(&state, 1).unwrap().unwrap();
    assert_eq!(index.indexes.len(), 3);
    let records = store
        .vote_exts_by_height(&state, 1, &PageRequest::default())
        .unwrap();
    assert_eq!(records.items.len(), 3);
    for record in &records.items {
        assert_eq!(record.height, 1);
        assert_eq!(record.signature.len(), 128);
    }

    // Height 2 proceeds with fresh votes.
    exchange_votes(&state, &nodes, 2);
    let proposal = nodes[1]
        .prepare_proposal(&state, 3, vec![], &[3u8; 32])
        .unwrap();
    assert_eq!(proposal.len(), 1);
    assert_eq!(
        nodes[2].process_proposal(&state, 3, &proposal, &[3u8; 32]),
        ProposalStatus::Accept
    );
    nodes[2].pre_finalize(&mut state, 3, &[3u8; 32]).unwrap();
    let all = store
        .all_vote_exts(
            &state,
            &PageRequest {
                count_total: true,
                ..PageRequest::default()
            },
        )
        .unwrap();
    assert_eq!(all.pagination.total, Some(6));
    assert_eq!(
        store
            .vote_exts_by_height(&state, 2, &PageRequest::default())
            .unwrap()
            .items
            .len(),
        3
    );
}

#[test]
fn peer_votes_verify_before_the_local_extension() {
    let (mut state, nodes) = setup();
    for node in &nodes {
        assert_eq!(node.process_proposal(&state, 1, &[], b""), ProposalStatus::Accept);
    }
    exchange_votes(&state, &nodes, 1);
    for node in &nodes {
        node.pre_finalize(&mut state, 1, &[1u8; 32]).unwrap();
    }

    // The proposal for height 2 carries node 1's own height-1 vote, which
    // lands in its height-2 cache.
    let proposal = nodes[0]
        .prepare_proposal(&state, 2, vec![], &[2u8; 32])
        .unwrap();
    assert_eq!(
        nodes[1].process_proposal(&state, 2, &proposal, &[2u8; 32]),
        ProposalStatus::Accept
    );
    assert!(nodes[1].votes().vote(2, nodes[1].own_address()).is_some());

    // A peer's precommit arrives before node 1 extends its own vote.
    let early = nodes[0].extend_vote(&state, 2).unwrap();
    let status = nodes[1].verify_vote_extension(&state, 2, VALIDATORS[0], &early);
    assert!(status.is_accept(), "{:?}", status);

    let own = nodes[1].extend_vote(&state, 2).unwrap();
    assert!(nodes[0]
        .verify_vote_extension(&state, 2, VALIDATORS[1], &own)
        .is_accept());
    assert!(nodes[1]
        .verify_vote_extension(&state, 2, VALIDATORS[0], &early)
        .is_accept());
}
