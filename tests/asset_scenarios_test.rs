mod common;

use rust_decimal::Decimal;
use serde_json::json;
use std::sync::atomic::Ordering;

use common::{
    block, coinbase, create_tx, mint_tx, sub_asset_tx, test_config, transfer_tx, FakeMetadata,
    Harness, STREAM,
};
use rtm_asset_indexer::application::sync::StopSignal;
use rtm_asset_indexer::domain::models::{
    Asset, AssetKind, SyncState, TransferType, TxClassification,
};
use rtm_asset_indexer::domain::services::asset_processor::transferred_total;
use rtm_asset_indexer::infrastructure::persistence::repositories::{
    AssetRepository, AssetTransferRepository, BlockRepository, SyncStateRepository,
    TransactionRepository,
};

fn find_asset(harness: &Harness, name: &str) -> Asset {
    harness
        .store
        .assets()
        .into_iter()
        .find(|asset| asset.name == name)
        .unwrap_or_else(|| panic!("asset {} should exist", name))
}

#[tokio::test]
async fn test_create_mint_transfer_scenarios() {
    let harness = Harness::new(vec![block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")])]);
    let mut daemon = harness.daemon(test_config(), StopSignal::never());

    // Scenario A
    daemon.run_iteration().await.unwrap();
    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.asset_id, "widget");
    assert_eq!(widget.creator, "RA");
    assert_eq!(widget.current_owner, "RA");
    assert_eq!(widget.mint_count, 0);
    assert_eq!(widget.asset_type, AssetKind::Fungible);
    assert_eq!(widget.total_supply, Decimal::from(1000));
    assert!(!widget.is_sub_asset);

    // Scenario B
    harness
        .chain
        .push(block(101, 1_060, vec![mint_tx("mint1", "widget", "WIDGET", "RB", 5.0)]));
    daemon.run_iteration().await.unwrap();
    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.mint_count, 1);
    assert_eq!(widget.circulating_supply, Decimal::from(5));
    assert_eq!(widget.current_owner, "RB");
    assert_eq!(widget.last_mint_time, Some(1_060));

    let transfers = harness.store.transfers();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].transfer_type, TransferType::Mint);
    assert_eq!(transfers[0].from, None);
    assert_eq!(transfers[0].to, "RB");
    assert_eq!(transfers[0].amount, Decimal::from(5));

    // Scenario C
    harness.chain.push(block(
        102,
        1_120,
        vec![transfer_tx("xfer1", "RB", &[("RC", "WIDGET", 2.0)])],
    ));
    daemon.run_iteration().await.unwrap();
    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.current_owner, "RC");
    assert_eq!(widget.transfer_count, 1);
    assert_eq!(widget.last_transfer_time, Some(1_120));

    let transfer = harness
        .store
        .transfers()
        .into_iter()
        .find(|t| t.txid == "xfer1")
        .unwrap();
    assert_eq!(transfer.transfer_type, TransferType::Transfer);
    assert_eq!(transfer.from.as_deref(), Some("RB"));
    assert_eq!(transfer.to, "RC");
    assert_eq!(transfer.amount, Decimal::from(2));

    let tx = harness.store.find_by_txid("xfer1").await.unwrap().unwrap();
    assert_eq!(tx.classification, TxClassification::AssetTransfer);
    assert_eq!(tx.block_hash.as_deref(), Some("hash102"));
}

#[tokio::test]
async fn test_replay_after_crash_does_not_double_count() {
    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")]),
        block(101, 1_060, vec![mint_tx("mint1", "widget", "WIDGET", "RB", 5.0)]),
        block(102, 1_120, vec![transfer_tx("xfer1", "RB", &[("RC", "WIDGET", 2.0)])]),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();
    let transactions_before = harness.store.transaction_count();

    // Crash after 101 and 102 were applied but before their block rows and
    // checkpoint were written
    BlockRepository::delete_above(harness.store.as_ref(), 100)
        .await
        .unwrap();
    let mut state = harness.sync_state().await;
    state.current_block = 100;
    SyncStateRepository::save(harness.store.as_ref(), &state)
        .await
        .unwrap();

    // Scenario D
    let mut restarted = harness.daemon(test_config(), StopSignal::never());
    restarted.run_iteration().await.unwrap();

    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.mint_count, 1);
    assert_eq!(widget.circulating_supply, Decimal::from(5));
    assert_eq!(widget.transfer_count, 1);
    assert_eq!(widget.current_owner, "RC");
    assert_eq!(harness.store.transfers().len(), 2);
    assert_eq!(harness.store.transaction_count(), transactions_before);
    assert_eq!(harness.store.block_count(), 3);
    assert_eq!(harness.sync_state().await.current_block, 102);
}

#[tokio::test]
async fn test_sub_asset_naming() {
    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("P", "NukeBoom", "RA")]),
        block(
            101,
            1_060,
            vec![
                sub_asset_tx("tower1", "tower", "P", "RA"),
                sub_asset_tx("tower2", "tower", "MISSING", "RA"),
            ],
        ),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let resolved = harness.store.find_by_id("tower1").await.unwrap().unwrap();
    assert_eq!(resolved.name, "NUKEBOOM|tower");
    assert!(resolved.is_sub_asset);
    assert_eq!(resolved.parent_asset_id.as_deref(), Some("P"));
    assert_eq!(resolved.parent_asset_name.as_deref(), Some("NUKEBOOM"));
    assert_eq!(resolved.sub_asset_name.as_deref(), Some("tower"));

    let orphan = harness.store.find_by_id("tower2").await.unwrap().unwrap();
    assert_eq!(orphan.name, "UNKNOWN|tower");
    assert!(orphan.is_sub_asset);
    assert_eq!(orphan.parent_asset_name, None);
}

#[tokio::test]
async fn test_transfer_by_suffixed_asset_id() {
    let by_id = |txid: &str, asset_id: &str, to: &str| {
        json!({
            "txid": txid,
            "type": 0,
            "vin": [{"txid": "prev", "vout": 0, "address": "RB", "value": 1.0}],
            "vout": [{
                "n": 0,
                "value": 0.0,
                "scriptPubKey": {
                    "type": "transferasset",
                    "addresses": [to],
                    "asset": {"asset_id": asset_id, "amount": 1.0}
                }
            }]
        })
    };

    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("abcd1234", "GADGET", "RA")]),
        block(101, 1_060, vec![mint_tx("m1", "abcd1234", "GADGET", "RB", 50.0)]),
        block(
            102,
            1_120,
            vec![
                by_id("t1", "abcd1234[0]", "RC"),
                by_id("t2", "abcd1234[1...50]", "RD"),
            ],
        ),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let transfers = harness.store.find_by_asset("abcd1234").await.unwrap();
    let recipients: Vec<&str> = transfers
        .iter()
        .filter(|t| t.transfer_type == TransferType::Transfer)
        .map(|t| t.to.as_str())
        .collect();
    assert_eq!(recipients, vec!["RC", "RD"]);
    assert_eq!(find_asset(&harness, "GADGET").transfer_count, 2);
}

#[tokio::test]
async fn test_multi_output_transfer_counts_once() {
    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")]),
        block(101, 1_060, vec![mint_tx("mint1", "widget", "WIDGET", "RB", 5.0)]),
        block(
            102,
            1_120,
            vec![transfer_tx(
                "split",
                "RB",
                &[("RC", "WIDGET", 2.0), ("RD", "WIDGET", 1.0), ("RB", "WIDGET", 2.0)],
            )],
        ),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.transfer_count, 1);
    // Change back to the sender does not count as the new owner
    assert_eq!(widget.current_owner, "RD");

    let rows = harness.store.find_by_asset("widget").await.unwrap();
    assert_eq!(
        rows.iter()
            .filter(|t| t.transfer_type == TransferType::Transfer)
            .count(),
        3
    );
}

#[tokio::test]
async fn test_mint_ignores_outputs_of_other_assets() {
    let mut mint = mint_tx("mint1", "widget", "WIDGET", "RB", 5.0);
    let foreign = json!({
        "n": 0,
        "value": 0.0,
        "scriptPubKey": {
            "type": "transferasset",
            "addresses": ["RX"],
            "asset": {"name": "OTHER", "asset_id": "other", "amount": 999.0}
        }
    });
    let mut outputs = vec![foreign];
    outputs.extend(mint["vout"].as_array().cloned().unwrap_or_default());
    outputs[1]["n"] = json!(1);
    mint["vout"] = json!(outputs);

    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")]),
        block(101, 1_060, vec![mint]),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.mint_count, 1);
    assert_eq!(widget.circulating_supply, Decimal::from(5));
    assert_eq!(widget.current_owner, "RB");

    let rows = harness.store.find_by_asset("widget").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].to, "RB");
    assert_eq!(rows[0].amount, Decimal::from(5));
}

#[tokio::test]
async fn test_transferred_amounts_stay_within_minted_supply() {
    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")]),
        block(101, 1_060, vec![mint_tx("mint1", "widget", "WIDGET", "RB", 5.0)]),
        block(102, 1_120, vec![transfer_tx("x1", "RB", &[("RC", "WIDGET", 2.0)])]),
        block(103, 1_180, vec![transfer_tx("x2", "RC", &[("RD", "WIDGET", 1.5)])]),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let widget = find_asset(&harness, "WIDGET");
    let rows = harness.store.find_by_asset("widget").await.unwrap();
    assert!(transferred_total(&rows) <= widget.circulating_supply);
    assert_eq!(widget.transfer_count, 2);
    assert_eq!(widget.current_owner, "RD");
}

#[tokio::test]
async fn test_data_errors_do_not_abort_the_block() {
    let harness = Harness::new(vec![block(
        100,
        1_000,
        vec![
            mint_tx("orphan-mint", "nope", "NOPE", "RB", 1.0),
            json!({"txid": "broken", "type": 8}),
            create_tx("widget", "WIDGET", "RA"),
        ],
    )]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    assert_eq!(harness.store.block_count(), 1);
    assert_eq!(harness.store.assets().len(), 1);
    assert!(harness.store.find_by_txid("orphan-mint").await.unwrap().is_none());
    assert_eq!(harness.sync_state().await.current_block, 100);
}

#[tokio::test]
async fn test_reference_hash_resolves_metadata() {
    let mut with_hash = create_tx("art", "ART", "RA");
    with_hash["newAssetTx"]["referenceHash"] = json!("QmMeta");
    with_hash["newAssetTx"]["isUnique"] = json!(true);
    let mut missing_hash = create_tx("lost", "LOST", "RA");
    missing_hash["newAssetTx"]["referenceHash"] = json!("QmGone");

    let mut harness = Harness::new(vec![block(100, 1_000, vec![with_hash, missing_hash])]);
    harness.metadata = FakeMetadata::with("QmMeta", json!({"name": "Art", "image": "ipfs://QmImage"}));
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let art = find_asset(&harness, "ART");
    assert!(art.ipfs_verified);
    assert_eq!(art.asset_type, AssetKind::Unique);
    assert_eq!(art.metadata, Some(json!({"name": "Art", "image": "ipfs://QmImage"})));
    assert_eq!(
        art.image_url.as_deref(),
        Some("https://gateway.test/ipfs/QmImage")
    );

    let lost = find_asset(&harness, "LOST");
    assert!(!lost.ipfs_verified);
    assert_eq!(lost.metadata, None);
    assert_eq!(harness.metadata.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_standard_transactions_are_optional() {
    let blocks = vec![block(100, 1_000, vec![coinbase("cb100", "RMINER")])];

    let skipped = Harness::new(blocks.clone());
    skipped
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();
    assert_eq!(skipped.store.transaction_count(), 0);

    let indexed = Harness::new(blocks);
    let mut config = test_config();
    config.index_standard_transactions = true;
    indexed
        .daemon(config, StopSignal::never())
        .run_iteration()
        .await
        .unwrap();
    let row = indexed.store.find_by_txid("cb100").await.unwrap().unwrap();
    assert_eq!(row.classification, TxClassification::Standard);
}

#[tokio::test]
async fn test_asset_creation_is_insert_if_absent() {
    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")]),
        block(101, 1_060, vec![mint_tx("mint1", "widget", "WIDGET", "RB", 5.0)]),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    // Re-running the creation must not reset counters moved by the mint
    BlockRepository::delete_above(harness.store.as_ref(), 99)
        .await
        .unwrap();
    let state = SyncState::initial(STREAM, 99);
    SyncStateRepository::save(harness.store.as_ref(), &state)
        .await
        .unwrap();
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let widget = find_asset(&harness, "WIDGET");
    assert_eq!(widget.mint_count, 1);
    assert_eq!(widget.current_owner, "RB");
    assert!(AssetRepository::insert(harness.store.as_ref(), &widget)
        .await
        .map(|inserted| !inserted)
        .unwrap());
    assert_eq!(
        TransactionRepository::find_by_txid(harness.store.as_ref(), "widget")
            .await
            .unwrap()
            .map(|tx| tx.classification),
        Some(TxClassification::AssetCreate)
    );
    assert_eq!(
        AssetTransferRepository::find_by_asset(harness.store.as_ref(), "widget")
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_update_stores_raw_payload_only() {
    let update = json!({
        "txid": "upd1",
        "type": 9,
        "vin": [{"txid": "funding", "vout": 0, "address": "RA", "value": 1.0}],
        "vout": [],
        "updateAssetTx": {"assetId": "widget", "referenceHash": "QmNew"}
    });
    let harness = Harness::new(vec![
        block(100, 1_000, vec![create_tx("widget", "WIDGET", "RA")]),
        block(101, 1_060, vec![update]),
    ]);
    harness
        .daemon(test_config(), StopSignal::never())
        .run_iteration()
        .await
        .unwrap();

    let row = harness.store.find_by_txid("upd1").await.unwrap().unwrap();
    assert_eq!(row.classification, TxClassification::AssetUpdate);
    assert_eq!(
        row.payload,
        Some(json!({"assetId": "widget", "referenceHash": "QmNew"}))
    );
    // Updates are recorded, never applied
    assert_eq!(find_asset(&harness, "WIDGET").reference_hash, None);
}
