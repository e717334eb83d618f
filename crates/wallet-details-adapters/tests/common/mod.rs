#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Method, Response, Server, StatusCode};

use wallet_details_adapters::WalletDetailsConfig;

pub const KNOWN: &str = "AUexKjGtgsSpVzPLs6jNMM6vJ6znEVTQWK";
pub const UNKNOWN: &str = "AJjv7WztjJNYHrLAeveG5NgHWp6699ZJwD";
pub const BROKEN: &str = "ANBkoGqWeTSiaEVgVzSKZd3jS7UWzv9PSo";

/// Serves the Ark and CryptoCompare routes the adapters call. Every request
/// path is recorded in `calls`.
pub fn spawn_mock_server(calls: Arc<Mutex<Vec<String>>>) -> String {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    thread::spawn(move || {
        while let Ok(req) = server.recv() {
            let path = req.url().to_owned();
            if let Ok(mut g) = calls.lock() {
                g.push(path.clone());
            }

            let (code, payload) = match (req.method().clone(), path.as_str()) {
                (Method::Get, p) if p.starts_with(&format!("/api/wallets/{KNOWN}/transactions")) => {
                    (200, transaction_page())
                }
                (Method::Get, p) if p.starts_with(&format!("/api/wallets/{BROKEN}/")) => {
                    (500, json!({"error": "internal"}))
                }
                (Method::Get, "/api/transactions/fees") => (
                    200,
                    json!({"data": {
                        "transfer": "10000000",
                        "secondSignature": "500000000",
                        "delegateRegistration": "2500000000",
                        "vote": "100000000",
                        "multiSignature": "500000000"
                    }}),
                ),
                (Method::Get, p) if p.starts_with("/data/pricemultifull") => (
                    200,
                    json!({"RAW": {"ARK": {
                        "USD": {"PRICE": 0.5, "TOSYMBOL": "$"},
                        "EUR": {"PRICE": 0.4, "TOSYMBOL": "€"}
                    }}}),
                ),
                (Method::Get, p) if p.starts_with("/data/histoday") => (
                    200,
                    json!({"Data": [
                        {"time": 1_490_054_400u64, "close": 0.1},
                        {"time": 1_490_140_800u64, "close": 0.2}
                    ]}),
                ),
                _ => (404, json!({"error": "not found"})),
            };

            let response =
                Response::from_string(payload.to_string()).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    addr
}

pub fn transaction_page() -> Value {
    json!({
        "meta": {"count": 2},
        "data": [
            {
                "id": "older",
                "amount": "200000000",
                "fee": "10000000",
                "sender": KNOWN,
                "recipient": UNKNOWN,
                "confirmations": 120,
                "timestamp": {"epoch": 0, "unix": 1_490_101_200u64}
            },
            {
                "id": "newer",
                "amount": "100000000",
                "fee": "10000000",
                "sender": UNKNOWN,
                "recipient": KNOWN,
                "vendorField": "thanks",
                "confirmations": 3,
                "timestamp": {"epoch": 86400, "unix": 1_490_187_600u64}
            }
        ]
    })
}

pub fn config_for(base: &str) -> WalletDetailsConfig {
    WalletDetailsConfig {
        api_base_url: format!("{base}/api"),
        api_timeout_ms: 5_000,
        market_api_url: format!("{base}/data"),
        market_currencies: vec!["USD".to_owned(), "EUR".to_owned()],
        ..WalletDetailsConfig::default()
    }
}
