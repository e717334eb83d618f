//! Wallet details: balance, market price and transaction history for one wallet

use eframe::egui;
use eyre::WrapErr;
use wallet_details_adapters::WalletDetailsConfig;

mod app;
mod ui;

/// Shown when no snapshot file is given on the command line.
const DEMO_ADDRESS: &str = "AUexKjGtgsSpVzPLs6jNMM6vJ6znEVTQWK";

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting wallet details");

    let snapshot = match std::env::args().nth(1) {
        Some(path) => Some(
            std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read wallet snapshot {path}"))?,
        ),
        None => Some(demo_snapshot()),
    };

    let mut config = WalletDetailsConfig::default();
    if let Ok(url) = std::env::var("WALLET_DETAILS_API_URL") {
        config.api_base_url = url;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Wallet details")
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "wallet-details",
        native_options,
        Box::new(move |cc| {
            let app = app::App::new(cc, runtime, config, snapshot)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| eyre::eyre!("ui exited with error: {e}"))
}

fn demo_snapshot() -> String {
    serde_json::json!({
        "address": DEMO_ADDRESS,
        "label": "Demo wallet",
        "balance": 0,
        "transactions": [],
        "isCold": false,
    })
    .to_string()
}
