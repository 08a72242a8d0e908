//! Batch runner tests
//!
//! Run with: cargo test --test batch_test

mod common;

use std::sync::Arc;

use common::{orchestrator_with, test_config, MockRpc, ReceiptMode, KEY_A, KEY_B};
use testnet_bridger::types::OPTIMISM;
use testnet_bridger::{run_batch, BatchParams, Redacted};

fn params() -> BatchParams {
    BatchParams {
        network: OPTIMISM.to_string(),
        amount_min: 0.01,
        amount_max: 0.02,
        slippage: 0.95,
        delay_min_secs: 0,
        delay_max_secs: 0,
    }
}

fn keys(raw: &[&str]) -> Vec<Redacted<String>> {
    raw.iter().map(|k| Redacted::new(k.to_string())).collect()
}

#[tokio::test]
async fn test_batch_processes_every_account() {
    let mock = Arc::new(MockRpc::default());
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let summary = run_batch(&orchestrator, &keys(&[KEY_A, KEY_B]), &params())
        .await
        .unwrap();

    assert_eq!(summary.confirmed, 2);
    assert_eq!(summary.total(), 2);
    assert_eq!(mock.sent().len(), 2);
}

#[tokio::test]
async fn test_failed_account_does_not_stop_batch() {
    let mock = Arc::new(MockRpc::default());
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let summary = run_batch(&orchestrator, &keys(&[KEY_A, "0xnotakey", KEY_B]), &params())
        .await
        .unwrap();

    assert_eq!(summary.confirmed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(mock.sent().len(), 2);
}

#[tokio::test]
async fn test_reverted_accounts_are_counted() {
    let mock = Arc::new(MockRpc {
        receipt_mode: ReceiptMode::Reverted,
        ..Default::default()
    });
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let summary = run_batch(&orchestrator, &keys(&[KEY_A, KEY_B]), &params())
        .await
        .unwrap();

    assert_eq!(summary.reverted, 2);
    assert_eq!(summary.confirmed, 0);
}

#[tokio::test]
async fn test_unsupported_network_fails_each_account() {
    let mock = Arc::new(MockRpc::default());
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let p = BatchParams {
        network: "base".to_string(),
        ..params()
    };
    let summary = run_batch(&orchestrator, &keys(&[KEY_A, KEY_B]), &p)
        .await
        .unwrap();

    assert_eq!(summary.failed, 2);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_params_rejected_before_any_account() {
    let mock = Arc::new(MockRpc::default());
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let p = BatchParams {
        amount_min: 1.0,
        amount_max: 0.5,
        ..params()
    };
    let result = run_batch(&orchestrator, &keys(&[KEY_A]), &p).await;

    assert!(result.is_err());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_amount_range_rounding_to_zero_rejected() {
    let mock = Arc::new(MockRpc::default());
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let p = BatchParams {
        amount_min: 0.0000001,
        amount_max: 0.0000004,
        ..params()
    };
    let result = run_batch(&orchestrator, &keys(&[KEY_A, KEY_B]), &p).await;

    assert!(result.is_err());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_empty_key_list() {
    let mock = Arc::new(MockRpc::default());
    let orchestrator = orchestrator_with(test_config(), mock.clone());

    let summary = run_batch(&orchestrator, &[], &params()).await.unwrap();

    assert_eq!(summary.total(), 0);
}
