use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub const WALLET_MIN_NUMBER_CONFIRMATIONS: u32 = 51;
pub const TRANSACTION_SHOW_PATH: &str = "/transaction/show";

pub const FETCHING_TRANSACTIONS: &str = "TRANSACTIONS_PAGE.FETCHING_TRANSACTIONS";
pub const COPIED_CLIPBOARD: &str = "COPIED_CLIPBOARD";
pub const COPY_CLIPBOARD_FAILED: &str = "COPY_CLIPBOARD_FAILED";
pub const WARNING_SELECT_WALLET_TRANSACTION_LOOKUP: &str =
    "WALLETS_PAGE.WARNING_SELECT_WALLET_TRANSACTION_LOOKUP";

const MS_PER_DAY: u64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimestampMs(pub u64);

impl TimestampMs {
    /// Index of the UTC day this timestamp falls in.
    pub fn day(self) -> u64 {
        self.0 / MS_PER_DAY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub token: String,
    pub symbol: String,
    /// Number of decimal places between the smallest unit and one whole token.
    pub decimals: u32,
}

impl Network {
    pub fn to_whole_units(&self, amount: u64) -> f64 {
        amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self {
            name: "mainnet".to_owned(),
            token: "ARK".to_owned(),
            symbol: "Ѧ".to_owned(),
            decimals: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    pub transfer: u64,
    pub second_signature: u64,
    pub delegate_registration: u64,
    pub vote: u64,
    pub multi_signature: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub timestamp: TimestampMs,
    pub amount: u64,
    pub fee: u64,
    pub sender: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub vendor_field: Option<String>,
    #[serde(default)]
    pub confirmations: u32,
}

impl Transaction {
    pub fn is_sent(&self, address: &str) -> bool {
        self.sender == address
    }

    pub fn is_confirmed(&self, min_confirmations: u32) -> bool {
        self.confirmations >= min_confirmations
    }

    /// Fiat value of the amount, priced at the transaction's day when the
    /// history has that day, otherwise at the currency's current price.
    pub fn amount_equivalent(
        &self,
        network: &Network,
        currency: &MarketCurrency,
        history: Option<&MarketHistory>,
    ) -> f64 {
        let price = history
            .and_then(|h| h.price_at(&currency.code, self.timestamp))
            .unwrap_or(currency.price);
        network.to_whole_units(self.amount) * price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub last_update: Option<TimestampMs>,
    #[serde(default)]
    pub is_cold: bool,
}

impl WalletView {
    pub fn from_snapshot(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// A wallet without an address carries nothing the view can show.
    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty()
    }

    /// Replaces the list with `fetched`, newest first, keeping the first
    /// occurrence of each id.
    pub fn load_transactions(&mut self, fetched: Vec<Transaction>) {
        let mut seen = HashSet::with_capacity(fetched.len());
        let mut txs: Vec<Transaction> = fetched
            .into_iter()
            .filter(|tx| seen.insert(tx.id.clone()))
            .collect();
        txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.transactions = txs;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCurrency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketTicker {
    pub token: String,
    pub currencies: Vec<MarketCurrency>,
}

impl MarketTicker {
    pub fn currency(&self, code: &str) -> Option<&MarketCurrency> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

/// Daily closing prices keyed by upper-case currency code, then UTC day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketHistory {
    prices: HashMap<String, BTreeMap<u64, f64>>,
}

impl MarketHistory {
    pub fn insert(&mut self, code: &str, at: TimestampMs, price: f64) {
        self.prices
            .entry(code.to_ascii_uppercase())
            .or_default()
            .insert(at.day(), price);
    }

    pub fn price_at(&self, code: &str, at: TimestampMs) -> Option<f64> {
        self.prices
            .get(&code.to_ascii_uppercase())
            .and_then(|series| series.get(&at.day()))
            .copied()
    }

    pub fn series(&self, code: &str) -> Option<&BTreeMap<u64, f64>> {
        self.prices.get(&code.to_ascii_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.prices.values().all(BTreeMap::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub currency: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            currency: "usd".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionShowParams {
    pub transaction: Transaction,
    pub symbol: String,
    pub equivalent_amount: f64,
    pub equivalent_symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub key: String,
}

impl Toast {
    pub fn success(key: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            key: key.into(),
        }
    }

    pub fn warning(key: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            key: key.into(),
        }
    }

    pub fn error(key: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            key: key.into(),
        }
    }
}
