//! Full pool lifecycle over the in-memory ledger: create, synchronize,
//! deposit, swap, withdraw, publish, list.

use std::sync::Arc;
use tidepool_commands::{Inputs, OperationKind, Pool, PoolRegistry};
use tidepool_integration::{init_tracing, InMemoryLedger};
use tidepool_ledger::{LedgerReader, TransactionParameters};
use tidepool_types::{Address, AssetAmount, AssetId, AssetIdentifier, CommandError};

fn x_asset() -> AssetIdentifier {
    AssetIdentifier::new(
        AssetId::from_bytes([0x01, 0x02, 0x03, 0x04]),
        Address::new("TXISSUERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
    )
}

fn y_asset() -> AssetIdentifier {
    AssetIdentifier::new(
        AssetId::from_bytes([0x05, 0x06, 0x07, 0x08]),
        Address::new("TYISSUERAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
    )
}

fn target() -> Address {
    Address::new("TPOOLTARGETAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
}

fn provider() -> Address {
    Address::new("TALICEAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
}

fn trader() -> Address {
    Address::new("TBOBAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
}

fn funded_ledger() -> Arc<InMemoryLedger> {
    let ledger = Arc::new(InMemoryLedger::testnet());
    ledger.credit(&provider(), &AssetAmount::new(x_asset(), 100_000_000));
    ledger.credit(&provider(), &AssetAmount::new(y_asset(), 100_000_000));
    ledger.credit(&trader(), &AssetAmount::new(x_asset(), 10_000_000));
    ledger
}

fn pool_over(ledger: &Arc<InMemoryLedger>) -> Pool {
    let reader: Arc<dyn LedgerReader> = ledger.clone();
    Pool::new("surfer:xym", target(), reader)
}

#[tokio::test]
async fn full_lifecycle_settles_and_lists() {
    init_tracing();
    let ledger = funded_ledger();
    let mut pool = pool_over(&ledger);
    let shares = pool.shares_asset().clone();
    let params = TransactionParameters::default;

    // Create: 10M x 10M seeds shares = 1_000_000 * sqrt(10M * 10M) = 10^13.
    let batch = pool
        .create(
            &provider(),
            provider(),
            AssetAmount::new(x_asset(), 10_000_000),
            AssetAmount::new(y_asset(), 10_000_000),
            params(),
        )
        .unwrap();
    ledger.settle(&batch).unwrap();

    assert_eq!(ledger.supply(&shares), 10_000_000_000_000);
    assert_eq!(ledger.balance(&provider(), &shares), 10_000_000_000_000);
    assert_eq!(ledger.balance(&target(), &x_asset()), 10_000_000);
    assert_eq!(ledger.balance(&target(), &y_asset()), 10_000_000);

    // Deposit 5M:5M online; pro-rata mint is half the supply.
    let inputs = Inputs::new()
        .with("provider", provider())
        .with("input_x", AssetAmount::new(x_asset(), 5_000_000))
        .with("input_y", AssetAmount::new(y_asset(), 5_000_000));
    let batch = pool
        .execute(&provider(), OperationKind::AddLiquidity, inputs, params())
        .await
        .unwrap();
    ledger.settle(&batch).unwrap();

    assert_eq!(ledger.supply(&shares), 15_000_000_000_000);
    assert_eq!(ledger.balance(&provider(), &shares), 15_000_000_000_000);
    assert_eq!(ledger.balance(&target(), &x_asset()), 15_000_000);

    // Swap 1.5M x for y against 15M:15M reserves.
    let inputs = Inputs::new()
        .with("trader", trader())
        .with("input_x", AssetAmount::new(x_asset(), 1_500_000))
        .with("output", y_asset().id);
    let batch = pool
        .execute(&trader(), OperationKind::Swap, inputs, params())
        .await
        .unwrap();
    ledger.settle(&batch).unwrap();

    // out = 15M - (15M * 15M) / 16.5M, floored.
    assert_eq!(ledger.balance(&trader(), &y_asset()), 1_363_636);
    assert_eq!(ledger.balance(&target(), &x_asset()), 16_500_000);
    assert_eq!(ledger.balance(&target(), &y_asset()), 13_636_364);

    // Withdraw a third of the supply.
    let inputs = Inputs::new()
        .with("provider", provider())
        .with("input_shares", 5_000_000_000_000u64);
    let batch = pool
        .execute(&provider(), OperationKind::RemoveLiquidity, inputs, params())
        .await
        .unwrap();
    ledger.settle(&batch).unwrap();

    assert_eq!(ledger.supply(&shares), 10_000_000_000_000);
    assert_eq!(ledger.balance(&provider(), &shares), 10_000_000_000_000);
    // A third of each reserve, floored.
    assert_eq!(ledger.balance(&target(), &x_asset()), 11_000_000);
    assert_eq!(ledger.balance(&target(), &y_asset()), 9_090_910);

    // Publish and rediscover through the registry.
    let collector = Address::new("TREGISTRYAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    let batch = pool.publish(&target(), collector.clone(), params()).unwrap();
    ledger.settle(&batch).unwrap();

    let reader: Arc<dyn LedgerReader> = ledger.clone();
    let registry = PoolRegistry::new(collector, reader);
    let listings = registry.list().await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].target, target());
    assert_eq!(listings[0].shares, shares);
    assert_eq!(listings[0].x_id, x_asset().id);
    assert_eq!(listings[0].y_id, y_asset().id);
}

#[tokio::test]
async fn tampered_signer_assignment_fails_settlement() {
    init_tracing();
    let ledger = funded_ledger();
    let pool = pool_over(&ledger);

    let batch = pool
        .create(
            &provider(),
            provider(),
            AssetAmount::new(x_asset(), 10_000_000),
            AssetAmount::new(y_asset(), 10_000_000),
            TransactionParameters::default(),
        )
        .unwrap();

    // Rebuild the batch with every entry's signer forced to the provider;
    // the target-namespace entries must now fail settlement.
    let tampered = tidepool_ledger::AtomicBatch::new(
        batch
            .entries()
            .iter()
            .map(|entry| {
                tidepool_ledger::BatchEntry::new(entry.transaction.clone(), provider())
            })
            .collect(),
        batch.network().clone(),
        batch.parameters().clone(),
    );
    assert!(ledger.settle(&tampered).is_err());

    // The untampered batch still settles: state was untouched by the failure.
    ledger.settle(&batch).unwrap();
}

#[tokio::test]
async fn offline_withdrawal_fails_closed_without_holdings() {
    init_tracing();
    let ledger = funded_ledger();
    let mut pool = pool_over(&ledger);

    let batch = pool
        .create(
            &provider(),
            provider(),
            AssetAmount::new(x_asset(), 10_000_000),
            AssetAmount::new(y_asset(), 10_000_000),
            TransactionParameters::default(),
        )
        .unwrap();
    ledger.settle(&batch).unwrap();
    pool.synchronize().await;

    // The snapshot is held, but the offline path never reads the provider's
    // share balance, so the withdrawal is denied rather than guessed.
    let inputs = Inputs::new()
        .with("provider", provider())
        .with("input_shares", 1_000_000u64);
    let err = pool
        .execute_offline(
            &provider(),
            OperationKind::RemoveLiquidity,
            inputs,
            TransactionParameters::default(),
        )
        .unwrap_err();
    assert!(matches!(err, CommandError::OperationForbidden { .. }));
}

#[tokio::test]
async fn missing_argument_is_reported_before_anything_runs() {
    init_tracing();
    let ledger = funded_ledger();
    let mut pool = pool_over(&ledger);

    let inputs = Inputs::new().with("trader", trader());
    let err = pool
        .execute(&trader(), OperationKind::Swap, inputs, TransactionParameters::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CommandError::MissingArgument {
            operation: "swap".to_string(),
            argument: "input_x".to_string(),
        }
    );
}
