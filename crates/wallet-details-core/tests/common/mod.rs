#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch, Notify};

use wallet_details_core::{
    ApiClientPort, ClipboardPort, ClockPort, Fees, LoaderHandle, LoadingPort, MarketCurrency,
    MarketDataPort, MarketHistory, MarketTicker, NavigationPort, Network, PortError,
    RefresherHandle, Services, SettingsPort, TimestampMs, Toast, ToastPort, Transaction,
    TransactionListResponse, TransactionShowParams, TranslationPort, UserSettings, ViewConfig,
    WalletDetailsController, WalletView,
};

pub const ADDRESS: &str = "AUexKjGtgsSpVzPLs6jNMM6vJ6znEVTQWK";
pub const NOW_MS: u64 = 1_739_750_400_000;

#[derive(Debug, Clone, PartialEq)]
pub enum NavCall {
    Pop,
    Forward(String, TransactionShowParams),
    Dismiss,
}

#[derive(Debug, Default)]
pub struct RecordingNavigation {
    pub calls: Mutex<Vec<NavCall>>,
}

impl RecordingNavigation {
    pub fn calls(&self) -> Vec<NavCall> {
        self.calls.lock().expect("nav lock").clone()
    }
}

impl NavigationPort for RecordingNavigation {
    fn pop(&self) {
        self.calls.lock().expect("nav lock").push(NavCall::Pop);
    }

    fn navigate_forward(&self, path: &str, params: TransactionShowParams) {
        self.calls
            .lock()
            .expect("nav lock")
            .push(NavCall::Forward(path.to_owned(), params));
    }

    fn dismiss_modal(&self) {
        self.calls.lock().expect("nav lock").push(NavCall::Dismiss);
    }
}

pub struct MockApi {
    pub fees_tx: watch::Sender<Option<Fees>>,
    pub responses: Mutex<VecDeque<Result<TransactionListResponse, PortError>>>,
    pub calls: AtomicUsize,
    pub gate: Option<Arc<Notify>>,
    /// Per-call replies, claimed in call order and answered by the test.
    pub deferred: Mutex<VecDeque<oneshot::Receiver<Result<TransactionListResponse, PortError>>>>,
}

impl MockApi {
    pub fn new() -> Self {
        let (fees_tx, _) = watch::channel(None);
        Self {
            fees_tx,
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            gate: None,
            deferred: Mutex::new(VecDeque::new()),
        }
    }

    /// Reply to the next call through the returned sender.
    pub fn defer(&self) -> oneshot::Sender<Result<TransactionListResponse, PortError>> {
        let (tx, rx) = oneshot::channel();
        self.deferred.lock().expect("deferred lock").push_back(rx);
        tx
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn respond(&self, response: Result<TransactionListResponse, PortError>) {
        self.responses.lock().expect("responses lock").push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiClientPort for MockApi {
    fn network(&self) -> Network {
        Network::default()
    }

    fn fees(&self) -> watch::Receiver<Option<Fees>> {
        self.fees_tx.subscribe()
    }

    async fn get_transaction_list(
        &self,
        _address: &str,
    ) -> Result<TransactionListResponse, PortError> {
        let deferred = self.deferred.lock().expect("deferred lock").pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reply) = deferred {
            return reply
                .await
                .unwrap_or_else(|_| Err(PortError::Unavailable("reply dropped".to_owned())));
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(TransactionListResponse {
                    success: true,
                    transactions: vec![],
                })
            })
    }
}

pub struct MockMarket {
    pub ticker: Option<MarketTicker>,
    pub history_tx: watch::Sender<Option<MarketHistory>>,
}

impl MarketDataPort for MockMarket {
    fn cached_ticker(&self) -> Option<MarketTicker> {
        self.ticker.clone()
    }

    fn history(&self) -> watch::Receiver<Option<MarketHistory>> {
        self.history_tx.subscribe()
    }
}

pub struct MockSettings {
    pub tx: watch::Sender<UserSettings>,
}

impl SettingsPort for MockSettings {
    fn settings(&self) -> watch::Receiver<UserSettings> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Default)]
pub struct MockTranslation {
    pub fail: bool,
    pub gate: Option<Arc<Notify>>,
}

#[async_trait]
impl TranslationPort for MockTranslation {
    async fn get(&self, key: &str) -> Result<String, PortError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(PortError::Unavailable("translations".to_owned()));
        }
        match key {
            "TRANSACTIONS_PAGE.FETCHING_TRANSACTIONS" => Ok("Fetching transactions".to_owned()),
            other => Err(PortError::NotFound(other.to_owned())),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockClipboard {
    pub fail: bool,
    pub copied: Mutex<Vec<String>>,
}

impl ClipboardPort for MockClipboard {
    fn copy(&self, text: &str) -> Result<(), PortError> {
        if self.fail {
            return Err(PortError::Unavailable("clipboard".to_owned()));
        }
        self.copied.lock().expect("clipboard lock").push(text.to_owned());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingToasts {
    pub toasts: Mutex<Vec<Toast>>,
}

impl RecordingToasts {
    pub fn all(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toast lock").clone()
    }
}

impl ToastPort for RecordingToasts {
    fn show(&self, toast: Toast) {
        self.toasts.lock().expect("toast lock").push(toast);
    }
}

#[derive(Debug, Default)]
pub struct MockLoading {
    pub messages: Mutex<Vec<String>>,
    pub dismissed: Arc<AtomicUsize>,
}

impl MockLoading {
    pub fn presented(&self) -> usize {
        self.messages.lock().expect("loading lock").len()
    }

    pub fn dismissed(&self) -> usize {
        self.dismissed.load(Ordering::SeqCst)
    }
}

struct CountingLoader(Arc<AtomicUsize>);

impl LoaderHandle for CountingLoader {
    fn dismiss(self: Box<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl LoadingPort for MockLoading {
    fn present(&self, message: &str) -> Box<dyn LoaderHandle> {
        self.messages
            .lock()
            .expect("loading lock")
            .push(message.to_owned());
        Box::new(CountingLoader(Arc::clone(&self.dismissed)))
    }
}

pub struct CountingRefresher(pub Arc<AtomicUsize>);

impl RefresherHandle for CountingRefresher {
    fn complete(self: Box<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(NOW_MS)
    }
}

pub struct Harness {
    pub navigation: Arc<RecordingNavigation>,
    pub api: Arc<MockApi>,
    pub market: Arc<MockMarket>,
    pub settings: Arc<MockSettings>,
    pub translation: Arc<MockTranslation>,
    pub clipboard: Arc<MockClipboard>,
    pub toasts: Arc<RecordingToasts>,
    pub loading: Arc<MockLoading>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_api(MockApi::new())
    }

    pub fn with_api(api: MockApi) -> Self {
        let (history_tx, _) = watch::channel(None);
        let (settings_tx, _) = watch::channel(UserSettings::default());
        Self {
            navigation: Arc::new(RecordingNavigation::default()),
            api: Arc::new(api),
            market: Arc::new(MockMarket {
                ticker: Some(ticker()),
                history_tx,
            }),
            settings: Arc::new(MockSettings { tx: settings_tx }),
            translation: Arc::new(MockTranslation::default()),
            clipboard: Arc::new(MockClipboard::default()),
            toasts: Arc::new(RecordingToasts::default()),
            loading: Arc::new(MockLoading::default()),
        }
    }

    pub fn failing_clipboard(mut self) -> Self {
        self.clipboard = Arc::new(MockClipboard {
            fail: true,
            ..MockClipboard::default()
        });
        self
    }

    pub fn with_translation(mut self, translation: MockTranslation) -> Self {
        self.translation = Arc::new(translation);
        self
    }

    pub fn without_ticker(mut self) -> Self {
        let (history_tx, _) = watch::channel(None);
        self.market = Arc::new(MockMarket {
            ticker: None,
            history_tx,
        });
        self
    }

    pub fn services(&self) -> Services {
        Services {
            navigation: self.navigation.clone(),
            api: self.api.clone(),
            market: self.market.clone(),
            settings: self.settings.clone(),
            translation: self.translation.clone(),
            clipboard: self.clipboard.clone(),
            toasts: self.toasts.clone(),
            loading: self.loading.clone(),
            clock: Arc::new(FixedClock),
        }
    }

    pub fn controller(&self, wallet: Option<&WalletView>) -> WalletDetailsController {
        self.controller_with(ViewConfig::default(), wallet)
    }

    pub fn controller_with(
        &self,
        config: ViewConfig,
        wallet: Option<&WalletView>,
    ) -> WalletDetailsController {
        let snapshot = wallet.map(|w| w.to_snapshot().expect("serialize wallet"));
        WalletDetailsController::new(self.services(), config, snapshot.as_deref())
    }
}

/// Applies events until nothing arrives for a short while.
pub async fn settle(controller: &mut WalletDetailsController) {
    while tokio::time::timeout(Duration::from_millis(50), controller.apply_next())
        .await
        .is_ok()
    {}
}

pub fn ticker() -> MarketTicker {
    MarketTicker {
        token: "ARK".to_owned(),
        currencies: vec![
            MarketCurrency {
                code: "USD".to_owned(),
                name: "US Dollar".to_owned(),
                symbol: "$".to_owned(),
                price: 0.5,
            },
            MarketCurrency {
                code: "EUR".to_owned(),
                name: "Euro".to_owned(),
                symbol: "€".to_owned(),
                price: 0.4,
            },
        ],
    }
}

pub fn tx(id: &str, timestamp_ms: u64, amount: u64) -> Transaction {
    Transaction {
        id: id.to_owned(),
        timestamp: TimestampMs(timestamp_ms),
        amount,
        fee: 10_000_000,
        sender: ADDRESS.to_owned(),
        recipient: Some("AJjv7WztjJNYHrLAeveG5NgHWp6699ZJwD".to_owned()),
        vendor_field: None,
        confirmations: 60,
    }
}

pub fn wallet(transactions: Vec<Transaction>, is_cold: bool) -> WalletView {
    WalletView {
        address: ADDRESS.to_owned(),
        label: Some("genesis".to_owned()),
        balance: 250_000_000,
        transactions,
        last_update: None,
        is_cold,
    }
}

pub fn list(transactions: Vec<Transaction>) -> Result<TransactionListResponse, PortError> {
    Ok(TransactionListResponse {
        success: true,
        transactions,
    })
}
