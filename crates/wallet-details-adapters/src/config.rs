#[derive(Debug, Clone)]
pub struct WalletDetailsConfig {
    pub api_base_url: String,
    pub api_timeout_ms: u64,
    pub transaction_page_limit: u32,
    pub market_api_url: String,
    pub market_token: String,
    pub market_currencies: Vec<String>,
    pub market_history_days: u32,
    pub market_refresh_interval_ms: u64,
    /// How long startup waits for a first ticker when none was stored.
    pub market_warmup_timeout_ms: u64,
    pub default_currency: String,
    pub toast_ttl_ms: u64,
}

impl Default for WalletDetailsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.ark.io/api".to_owned(),
            api_timeout_ms: 15_000,
            transaction_page_limit: 50,
            market_api_url: "https://min-api.cryptocompare.com/data".to_owned(),
            market_token: "ARK".to_owned(),
            market_currencies: ["USD", "EUR", "GBP", "JPY", "BTC"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            market_history_days: 30,
            market_refresh_interval_ms: 60_000,
            market_warmup_timeout_ms: 3_000,
            default_currency: "usd".to_owned(),
            toast_ttl_ms: 3_000,
        }
    }
}
