//! Market data from the CryptoCompare public API.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use wallet_details_core::{
    MarketCurrency, MarketDataPort, MarketHistory, MarketTicker, PortError, TimestampMs,
};

use crate::config::WalletDetailsConfig;

const CURRENCY_NAMES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CNY", "Chinese Yuan"),
    ("KRW", "South Korean Won"),
    ("BTC", "Bitcoin"),
];

pub struct MarketDataAdapter {
    client: reqwest::Client,
    base_url: String,
    token: String,
    currencies: Vec<String>,
    history_days: u32,
    ticker: Mutex<Option<MarketTicker>>,
    history_tx: watch::Sender<Option<MarketHistory>>,
}

impl MarketDataAdapter {
    pub fn new(config: &WalletDetailsConfig) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms))
            .build()
            .map_err(|e| PortError::Transport(format!("http client build failed: {e}")))?;
        let (history_tx, _) = watch::channel(None);
        Ok(Self {
            client,
            base_url: config.market_api_url.trim_end_matches('/').to_owned(),
            token: config.market_token.clone(),
            currencies: config.market_currencies.clone(),
            history_days: config.market_history_days,
            ticker: Mutex::new(None),
            history_tx,
        })
    }

    pub fn set_ticker(&self, ticker: MarketTicker) {
        *lock_or_recover!(self.ticker) = Some(ticker);
    }

    pub fn publish_history(&self, history: MarketHistory) {
        self.history_tx.send_replace(Some(history));
    }

    /// Serialized cached ticker, for persisting between sessions.
    pub fn ticker_snapshot(&self) -> Option<String> {
        let ticker = lock_or_recover!(self.ticker).clone()?;
        serde_json::to_string(&ticker).ok()
    }

    /// Seeds the cache from a ticker stored by an earlier session.
    pub fn restore_ticker(&self, raw: &str) -> Result<(), PortError> {
        let ticker: MarketTicker = serde_json::from_str(raw)
            .map_err(|e| PortError::Validation(format!("stored ticker: {e}")))?;
        debug!(currencies = ticker.currencies.len(), "restored stored ticker");
        self.set_ticker(ticker);
        Ok(())
    }

    /// Waits at most `limit` for a first ticker. Returns whether one is cached
    /// afterwards.
    pub async fn warm_up(&self, limit: Duration) -> bool {
        match tokio::time::timeout(limit, self.refresh_ticker()).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "initial ticker fetch failed");
                self.cached_ticker().is_some()
            }
            Err(_) => {
                warn!(?limit, "initial ticker fetch timed out");
                self.cached_ticker().is_some()
            }
        }
    }

    pub async fn refresh_ticker(&self) -> Result<MarketTicker, PortError> {
        let url = format!(
            "{}/pricemultifull?fsyms={}&tsyms={}",
            self.base_url,
            self.token,
            self.currencies.join(",")
        );
        let body = self.get_text(&url).await?;
        let ticker = parse_ticker(&self.token, &body)?;
        info!(currencies = ticker.currencies.len(), "ticker refreshed");
        self.set_ticker(ticker.clone());
        Ok(ticker)
    }

    /// Fetches daily closes for every configured currency and publishes the
    /// merged history.
    pub async fn refresh_history(&self) -> Result<MarketHistory, PortError> {
        let mut history = self.history_tx.borrow().clone().unwrap_or_default();
        for code in &self.currencies {
            let url = format!(
                "{}/histoday?fsym={}&tsym={}&limit={}",
                self.base_url, self.token, code, self.history_days
            );
            let body = self.get_text(&url).await?;
            merge_history(&mut history, code, &body)?;
        }
        self.publish_history(history.clone());
        Ok(history)
    }

    async fn get_text(&self, url: &str) -> Result<String, PortError> {
        debug!(%url, "market request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("request to {url} failed: {e}")))?;
        if !response.status().is_success() {
            return Err(PortError::Transport(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        response
            .text()
            .await
            .map_err(|e| PortError::Transport(format!("reading {url} failed: {e}")))
    }
}

impl MarketDataPort for MarketDataAdapter {
    fn cached_ticker(&self) -> Option<MarketTicker> {
        lock_or_recover!(self.ticker).clone()
    }

    fn history(&self) -> watch::Receiver<Option<MarketHistory>> {
        self.history_tx.subscribe()
    }
}

#[derive(Debug, Deserialize)]
struct PriceMultiFull {
    #[serde(rename = "RAW")]
    raw: HashMap<String, HashMap<String, RawQuote>>,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(rename = "PRICE")]
    price: f64,
    #[serde(rename = "TOSYMBOL", default)]
    to_symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoDay {
    #[serde(rename = "Data")]
    data: Vec<HistoDayPoint>,
}

#[derive(Debug, Deserialize)]
struct HistoDayPoint {
    time: u64,
    close: f64,
}

pub fn parse_ticker(token: &str, body: &str) -> Result<MarketTicker, PortError> {
    let parsed: PriceMultiFull = serde_json::from_str(body)
        .map_err(|e| PortError::Validation(format!("ticker: {e}")))?;
    let quotes = parsed
        .raw
        .get(token)
        .ok_or_else(|| PortError::NotFound(format!("ticker for {token}")))?;

    let mut currencies: Vec<MarketCurrency> = quotes
        .iter()
        .map(|(code, quote)| MarketCurrency {
            code: code.to_ascii_uppercase(),
            name: currency_name(code).to_owned(),
            symbol: quote.to_symbol.clone().unwrap_or_else(|| code.clone()),
            price: quote.price,
        })
        .collect();
    currencies.sort_by(|a, b| a.code.cmp(&b.code));

    Ok(MarketTicker {
        token: token.to_owned(),
        currencies,
    })
}

pub fn merge_history(history: &mut MarketHistory, code: &str, body: &str) -> Result<(), PortError> {
    let parsed: HistoDay = serde_json::from_str(body)
        .map_err(|e| PortError::Validation(format!("history for {code}: {e}")))?;
    for point in parsed.data {
        history.insert(code, TimestampMs(point.time.saturating_mul(1_000)), point.close);
    }
    Ok(())
}

fn currency_name(code: &str) -> &str {
    CURRENCY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map_or(code, |(_, name)| *name)
}
