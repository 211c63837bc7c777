// Path: crates/services/tests/bridge_scenarios.rs
//! End-to-end batches through the keeper with the state-backed key registry.

use pulsar_api::ledger::Ledger;
use pulsar_api::state::StateAccess;
use pulsar_services::{BridgeKeeper, KeyStoreService};
use pulsar_test_utils::fixtures::{self, deposit, resolve_msg, settlement, withdrawal, PROVER};
use pulsar_test_utils::{assert_err, keypair, MockLedger, MockVerifier};
use pulsar_types::app::{
    BridgeEvent, BridgeParams, CommissionRate, EventLog, LockForWithdrawalMsg, PageRequest,
    RegisterKeysMsg, ResolveOutcome,
};
use pulsar_types::config::AccumulatorConfig;
use pulsar_types::error::BridgeError;
use std::sync::Arc;

struct Bridge {
    ledger: Arc<MockLedger>,
    verifier: Arc<MockVerifier>,
    keys: KeyStoreService,
    keeper: BridgeKeeper,
}

fn bridge() -> Bridge {
    let ledger = Arc::new(MockLedger::new());
    let verifier = Arc::new(MockVerifier::approve_all());
    let keeper = BridgeKeeper::new(
        ledger.clone(),
        Arc::new(KeyStoreService::new()),
        verifier.clone(),
        &AccumulatorConfig::default(),
    )
    .unwrap();
    Bridge {
        ledger,
        verifier,
        keys: KeyStoreService::new(),
        keeper,
    }
}

fn register(b: &Bridge, state: &mut dyn StateAccess, creator: &str, foreign: &str) {
    b.keys
        .register(
            state,
            &RegisterKeysMsg {
                creator: creator.into(),
                local_public_key: "02aa".into(),
                foreign_public_key: foreign.into(),
            },
        )
        .unwrap();
}

#[tokio::test]
async fn deposit_is_gated_on_registration() {
    let b = bridge();
    let mut state = fixtures::state();
    let key = keypair(1).unwrap().address();
    let mut events = EventLog::new();

    let first = b
        .keeper
        .resolve_actions(&mut state, &mut events, &resolve_msg(vec![deposit(&key, 1_000_000)], 1))
        .await
        .unwrap();
    assert_eq!(first, ResolveOutcome { processed: 1, approved: 0, ignored: 1 });
    assert_eq!(b.ledger.mint_count(), 0);

    register(&b, &mut state, "consumer1alice", &key);
    let second = b
        .keeper
        .resolve_actions(&mut state, &mut events, &resolve_msg(vec![deposit(&key, 1_000_000)], 2))
        .await
        .unwrap();
    assert_eq!(second, ResolveOutcome { processed: 1, approved: 1, ignored: 0 });
    assert_eq!(
        b.ledger.balance(&state, "upmina", "consumer1alice").unwrap(),
        1_000_000
    );
    assert!(events.events().iter().any(|e| matches!(
        e,
        BridgeEvent::DepositProcessed { cosmos_address, .. } if cosmos_address == "consumer1alice"
    )));

    let query = b.keeper.query(&state);
    let log = query.approved_actions(&PageRequest::default()).unwrap();
    assert_eq!(log.items, vec![deposit(&key, 1_000_000)]);
    assert_eq!(query.bridge_state().unwrap().settled_block_height, 2);
}

#[tokio::test]
async fn lock_then_withdraw_respects_the_balance_floor() {
    let b = bridge();
    let mut state = fixtures::state();
    b.keeper
        .set_params(
            &mut state,
            &BridgeParams {
                commission_rate: CommissionRate::ZERO,
                ..BridgeParams::default()
            },
        )
        .unwrap();
    let key = keypair(2).unwrap().address();
    b.ledger
        .fund(&mut state, "upmina", 1_000, "consumer1bob")
        .unwrap();

    let mut events = EventLog::new();
    let net = b
        .keeper
        .lock_for_withdrawal(
            &mut state,
            &mut events,
            &LockForWithdrawalMsg {
                creator: "consumer1bob".into(),
                foreign_public_key: key.clone(),
                amount: 1_000,
            },
        )
        .unwrap();
    assert_eq!(net, 1_000);
    assert_eq!(b.ledger.burn_count(), 1);

    let outcome = b
        .keeper
        .resolve_actions(
            &mut state,
            &mut events,
            &resolve_msg(vec![withdrawal(&key, 1_000), withdrawal(&key, 1_000)], 1),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ResolveOutcome { processed: 2, approved: 1, ignored: 1 });
    assert_eq!(b.keeper.query(&state).withdrawal_balance(&key).unwrap(), 0);
}

#[tokio::test]
async fn all_ignored_batch_moves_only_the_all_hash() {
    let b = bridge();
    let mut state = fixtures::state();
    let mut events = EventLog::new();
    let before = b.keeper.query(&state).bridge_state().unwrap();

    let outcome = b
        .keeper
        .resolve_actions(
            &mut state,
            &mut events,
            &resolve_msg(vec![withdrawal(&keypair(3).unwrap().address(), 5)], 1),
        )
        .await
        .unwrap();
    assert_eq!(outcome.approved, 0);

    let after = b.keeper.query(&state).bridge_state().unwrap();
    assert_eq!(after.approved_action_hash, before.approved_action_hash);
    assert_ne!(after.all_action_hash, before.all_action_hash);
    assert_eq!(after.approved_actions_count, 0);
    assert_eq!(after.settled_block_height, 1);
}

#[tokio::test]
async fn stale_height_fails_without_state_change() {
    let b = bridge();
    let mut state = fixtures::state();
    let key = keypair(4).unwrap().address();
    let mut events = EventLog::new();
    b.keeper
        .resolve_actions(&mut state, &mut events, &resolve_msg(vec![settlement(&key, 1)], 5))
        .await
        .unwrap();
    let snapshot = b.keeper.query(&state).bridge_state().unwrap();
    let entries = state.prefix_scan(b"").unwrap().count();
    let emitted = events.events().len();

    for stale in [5, 4] {
        let err = assert_err!(
            b.keeper
                .resolve_actions(&mut state, &mut events, &resolve_msg(vec![settlement(&key, 1)], stale))
                .await
        );
        assert_eq!(err, BridgeError::InvalidBlockHeight { settled: 5, next: stale });
    }
    assert_eq!(b.keeper.query(&state).bridge_state().unwrap(), snapshot);
    assert_eq!(state.prefix_scan(b"").unwrap().count(), entries);
    assert_eq!(events.events().len(), emitted);
    assert_eq!(b.verifier.call_count(), 1);
}

#[tokio::test]
async fn masked_actions_never_reach_the_log() {
    let b = bridge();
    let mut state = fixtures::state();
    let keys: Vec<String> = (10..14).map(|s| keypair(s).unwrap().address()).collect();
    let actions: Vec<_> = keys.iter().map(|k| settlement(k, 1)).collect();
    b.verifier.push_mask(vec![true, false, true]);

    let mut events = EventLog::new();
    let outcome = b
        .keeper
        .resolve_actions(&mut state, &mut events, &resolve_msg(actions.clone(), 1))
        .await
        .unwrap();
    assert_eq!(outcome, ResolveOutcome { processed: 2, approved: 2, ignored: 0 });

    let query = b.keeper.query(&state);
    let log = query.approved_actions(&PageRequest::default()).unwrap();
    assert_eq!(log.items, vec![actions[0].clone(), actions[2].clone()]);

    let accumulator = b.keeper.accumulator();
    let expected = accumulator
        .fold(&accumulator.initialize(), [&actions[0], &actions[2]])
        .unwrap();
    let snapshot = query.bridge_state().unwrap();
    assert_eq!(snapshot.all_action_hash, expected.to_string());
    assert_eq!(snapshot.approved_action_hash, expected.to_string());
    assert_eq!(query.reward_balance(PROVER).unwrap(), 1_000_000);
}
