mod common;

use std::sync::{Arc, Mutex};

use common::{config_for, spawn_mock_server, BROKEN, KNOWN, UNKNOWN};
use wallet_details_adapters::{ArkApiAdapter, MarketDataAdapter};
use wallet_details_core::{ApiClientPort, MarketDataPort, Network, PortError, TimestampMs};

#[tokio::test]
async fn transaction_list_maps_node_payload() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_mock_server(Arc::clone(&calls));
    let api = ArkApiAdapter::new(&config_for(&base), Network::default()).expect("adapter");

    let response = api.get_transaction_list(KNOWN).await.expect("list");

    assert!(response.success);
    assert_eq!(response.transactions.len(), 2);
    let newer = &response.transactions[1];
    assert_eq!(newer.id, "newer");
    assert_eq!(newer.amount, 100_000_000);
    assert_eq!(newer.timestamp, TimestampMs(1_490_187_600_000));
    assert_eq!(newer.vendor_field.as_deref(), Some("thanks"));

    let recorded = calls.lock().expect("calls lock").clone();
    assert_eq!(
        recorded,
        vec![format!("/api/wallets/{KNOWN}/transactions?limit=50")]
    );
}

#[tokio::test]
async fn unknown_wallet_is_an_empty_successful_list() {
    let base = spawn_mock_server(Arc::new(Mutex::new(Vec::new())));
    let api = ArkApiAdapter::new(&config_for(&base), Network::default()).expect("adapter");

    let response = api.get_transaction_list(UNKNOWN).await.expect("list");

    assert!(response.success);
    assert!(response.transactions.is_empty());
}

#[tokio::test]
async fn server_error_surfaces_as_transport_error() {
    let base = spawn_mock_server(Arc::new(Mutex::new(Vec::new())));
    let api = ArkApiAdapter::new(&config_for(&base), Network::default()).expect("adapter");

    let err = api.get_transaction_list(BROKEN).await.expect_err("must fail");

    assert!(matches!(err, PortError::Transport(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn refreshed_fees_reach_subscribers() {
    let base = spawn_mock_server(Arc::new(Mutex::new(Vec::new())));
    let api = ArkApiAdapter::new(&config_for(&base), Network::default()).expect("adapter");
    let rx = api.fees();
    assert_eq!(*rx.borrow(), None);

    let fees = api.refresh_fees().await.expect("fees");

    assert_eq!(fees.transfer, 10_000_000);
    assert_eq!(fees.delegate_registration, 2_500_000_000);
    assert_eq!(rx.borrow().as_ref(), Some(&fees));
}

#[tokio::test]
async fn market_refresh_caches_ticker_and_publishes_history() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_mock_server(Arc::clone(&calls));
    let market = MarketDataAdapter::new(&config_for(&base)).expect("adapter");
    assert!(market.cached_ticker().is_none());
    let history_rx = market.history();

    market.refresh_ticker().await.expect("ticker");
    market.refresh_history().await.expect("history");

    let ticker = market.cached_ticker().expect("cached ticker");
    assert_eq!(ticker.currency("eur").map(|c| c.price), Some(0.4));
    let history = history_rx.borrow().clone().expect("history published");
    assert_eq!(
        history.price_at("USD", TimestampMs(1_490_140_800_000)),
        Some(0.2)
    );
    assert_eq!(
        history.price_at("EUR", TimestampMs(1_490_054_400_000)),
        Some(0.1)
    );

    let recorded = calls.lock().expect("calls lock").clone();
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[0], "/data/pricemultifull?fsyms=ARK&tsyms=USD,EUR");
}
