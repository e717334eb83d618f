//! View controller for the wallet details modal.
//!
//! The controller owns the view-bound fields. Background tasks never touch
//! them: they send [`Tagged`] events into a channel and the owner applies
//! them with [`WalletDetailsController::apply_pending`] (once per frame) or
//! [`WalletDetailsController::apply_next`]. Events from a destroyed
//! activation are dropped on arrival.
//!
//! Methods that start work call `tokio::spawn` and must run inside a tokio
//! runtime context.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::activation::{Activation, Tagged};
use crate::domain::{
    Fees, MarketCurrency, MarketHistory, MarketTicker, Network, TimestampMs, Toast, Transaction,
    TransactionListResponse, TransactionShowParams, UserSettings, WalletView, COPIED_CLIPBOARD,
    COPY_CLIPBOARD_FAILED, FETCHING_TRANSACTIONS, TRANSACTION_SHOW_PATH,
    WALLET_MIN_NUMBER_CONFIRMATIONS, WARNING_SELECT_WALLET_TRANSACTION_LOOKUP,
};
use crate::indicator::{RefreshIndicator, RefresherHandle};
use crate::ports::{
    ApiClientPort, ClipboardPort, ClockPort, LoadingPort, MarketDataPort, NavigationPort,
    PortError, SettingsPort, ToastPort, TranslationPort,
};

#[derive(Clone)]
pub struct Services {
    pub navigation: Arc<dyn NavigationPort>,
    pub api: Arc<dyn ApiClientPort>,
    pub market: Arc<dyn MarketDataPort>,
    pub settings: Arc<dyn SettingsPort>,
    pub translation: Arc<dyn TranslationPort>,
    pub clipboard: Arc<dyn ClipboardPort>,
    pub toasts: Arc<dyn ToastPort>,
    pub loading: Arc<dyn LoadingPort>,
    pub clock: Arc<dyn ClockPort>,
}

#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub min_confirmations: u32,
    /// Refresh once on every enter even when no loader is shown.
    pub refresh_on_enter: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_confirmations: WALLET_MIN_NUMBER_CONFIRMATIONS,
            refresh_on_enter: true,
        }
    }
}

/// Fields the modal renders.
#[derive(Debug, Clone)]
pub struct WalletDetailsView {
    pub wallet: Option<WalletView>,
    pub address: String,
    pub network: Network,
    pub fees: Option<Fees>,
    pub ticker: Option<MarketTicker>,
    pub market_history: Option<MarketHistory>,
    pub market_currency: Option<MarketCurrency>,
    pub empty_transactions: bool,
    pub min_confirmations: u32,
}

#[derive(Debug)]
enum ViewEvent {
    Fees(Option<Fees>),
    History(Option<MarketHistory>),
    Settings(UserSettings),
    FetchingMessage(String),
    TransactionsFetched {
        request: u64,
        result: Result<TransactionListResponse, PortError>,
    },
}

pub struct WalletDetailsController {
    services: Services,
    config: ViewConfig,
    view: WalletDetailsView,
    activation: Option<Activation>,
    activations_started: u64,
    next_request: u64,
    /// Newest request whose list made it into the view.
    latest_applied: u64,
    in_flight: HashMap<u64, Option<RefreshIndicator>>,
    events_tx: mpsc::UnboundedSender<Tagged<ViewEvent>>,
    events_rx: mpsc::UnboundedReceiver<Tagged<ViewEvent>>,
}

impl WalletDetailsController {
    /// Builds the controller from the serialized wallet handed over by the
    /// navigation layer. A missing, blank or unreadable snapshot pops the
    /// modal right away.
    pub fn new(services: Services, config: ViewConfig, wallet_param: Option<&str>) -> Self {
        let wallet = match wallet_param.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => match WalletView::from_snapshot(raw) {
                Ok(wallet) if !wallet.is_blank() => Some(wallet),
                Ok(_) => {
                    warn!("wallet snapshot has no address");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "wallet snapshot could not be decoded");
                    None
                }
            },
            None => None,
        };
        if wallet.is_none() {
            services.navigation.pop();
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let view = WalletDetailsView {
            address: wallet.as_ref().map(|w| w.address.clone()).unwrap_or_default(),
            empty_transactions: wallet.as_ref().map_or(true, |w| w.transactions.is_empty()),
            wallet,
            network: services.api.network(),
            fees: None,
            ticker: None,
            market_history: None,
            market_currency: None,
            min_confirmations: config.min_confirmations,
        };

        Self {
            services,
            config,
            view,
            activation: None,
            activations_started: 0,
            next_request: 0,
            latest_applied: 0,
            in_flight: HashMap::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn view(&self) -> &WalletDetailsView {
        &self.view
    }

    pub fn is_active(&self) -> bool {
        self.activation.as_ref().is_some_and(|a| !a.is_cancelled())
    }

    pub fn activation_id(&self) -> Option<u64> {
        self.activation.as_ref().map(Activation::id)
    }

    /// Refreshes started but not yet settled.
    pub fn in_flight_refreshes(&self) -> usize {
        self.in_flight.len()
    }

    pub fn on_enter(&mut self) {
        if self.is_active() {
            debug!("wallet details already active");
            return;
        }
        self.activations_started += 1;
        let activation = Activation::new(self.activations_started);
        info!(
            activation = activation.id(),
            address = %self.view.address,
            "wallet details entered"
        );
        self.activation = Some(activation.clone());

        let fetching = self.load(&activation);
        if !fetching && self.config.refresh_on_enter {
            self.refresh_transactions(None);
        }
    }

    /// Starts the subscriptions of this activation. Returns true when the
    /// loader path was taken for an empty, non-cold wallet.
    fn load(&mut self, activation: &Activation) -> bool {
        activation.forward_watch(
            self.services.api.fees(),
            self.events_tx.clone(),
            ViewEvent::Fees,
        );
        if let Some(ticker) = self.services.market.cached_ticker() {
            self.set_ticker(activation, ticker);
        }
        activation.forward_watch(
            self.services.market.history(),
            self.events_tx.clone(),
            ViewEvent::History,
        );

        let Some(wallet) = self.view.wallet.as_ref() else {
            return false;
        };
        self.view.empty_transactions = wallet.transactions.is_empty();
        if self.needs_initial_fetch() {
            self.spawn_fetching_message(activation);
            return true;
        }
        false
    }

    fn needs_initial_fetch(&self) -> bool {
        self.view
            .wallet
            .as_ref()
            .is_some_and(|w| w.transactions.is_empty() && !w.is_cold)
    }

    fn set_ticker(&mut self, activation: &Activation, ticker: MarketTicker) {
        self.view.ticker = Some(ticker);
        activation.forward_watch(
            self.services.settings.settings(),
            self.events_tx.clone(),
            ViewEvent::Settings,
        );
    }

    fn spawn_fetching_message(&self, activation: &Activation) {
        let translation = Arc::clone(&self.services.translation);
        let tx = self.events_tx.clone();
        let token = activation.token().clone();
        let id = activation.id();
        tokio::spawn(async move {
            let message = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                translated = translation.get(FETCHING_TRANSACTIONS) => {
                    translated.unwrap_or_else(|e| {
                        warn!(error = %e, "fetching message translation failed");
                        FETCHING_TRANSACTIONS.to_owned()
                    })
                }
            };
            let _ = tx.send(Tagged {
                activation: id,
                event: ViewEvent::FetchingMessage(message),
            });
        });
    }

    /// Fetches the wallet's transactions. The indicator, if any, is finished
    /// exactly once when the fetch settles or the view is destroyed first.
    pub fn refresh_transactions(&mut self, indicator: Option<RefreshIndicator>) {
        let activation_id = match self.activation.as_ref() {
            Some(a) if !a.is_cancelled() => a.id(),
            _ => {
                debug!("refresh requested outside an active view");
                if let Some(indicator) = indicator {
                    indicator.finish();
                }
                return;
            }
        };
        let Some(address) = self.view.wallet.as_ref().map(|w| w.address.clone()) else {
            if let Some(indicator) = indicator {
                indicator.finish();
            }
            return;
        };

        self.next_request += 1;
        let request = self.next_request;
        debug!(
            request,
            indicator = ?indicator.as_ref().map(RefreshIndicator::kind),
            "fetching transactions"
        );
        self.in_flight.insert(request, indicator);

        let api = Arc::clone(&self.services.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.get_transaction_list(&address).await;
            let _ = tx.send(Tagged {
                activation: activation_id,
                event: ViewEvent::TransactionsFetched { request, result },
            });
        });
    }

    /// Pull-to-refresh.
    pub fn do_refresh(&mut self, refresher: Box<dyn RefresherHandle>) {
        self.refresh_transactions(Some(RefreshIndicator::Refresher(refresher)));
    }

    /// Applies every event already delivered. Returns how many changed the view.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(tagged) = self.events_rx.try_recv() {
            if self.apply(tagged) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next event and applies it. Returns false when the event
    /// belonged to a finished activation.
    pub async fn apply_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(tagged) => self.apply(tagged),
            None => false,
        }
    }

    fn apply(&mut self, tagged: Tagged<ViewEvent>) -> bool {
        let live = self
            .activation
            .as_ref()
            .is_some_and(|a| a.accepts(&tagged));
        if !live {
            trace!(activation = tagged.activation, "dropping stale view event");
            return false;
        }

        match tagged.event {
            ViewEvent::Fees(fees) => self.view.fees = fees,
            ViewEvent::History(history) => self.view.market_history = history,
            ViewEvent::Settings(settings) => {
                self.view.market_currency = self
                    .view
                    .ticker
                    .as_ref()
                    .and_then(|t| t.currency(&settings.currency))
                    .cloned();
                if self.view.market_currency.is_none() {
                    warn!(currency = %settings.currency, "currency missing from ticker");
                }
            }
            ViewEvent::FetchingMessage(message) => {
                if self.needs_initial_fetch() {
                    let loader = self.services.loading.present(&format!("{message}..."));
                    self.refresh_transactions(Some(RefreshIndicator::Loader(loader)));
                } else {
                    debug!("transactions arrived before the loader, skipping it");
                }
            }
            ViewEvent::TransactionsFetched { request, result } => {
                self.finish_refresh(request, result)
            }
        }
        true
    }

    fn finish_refresh(&mut self, request: u64, result: Result<TransactionListResponse, PortError>) {
        let indicator = self.in_flight.remove(&request).flatten();

        match result {
            Ok(response) if response.success && request < self.latest_applied => {
                debug!(
                    request,
                    latest = self.latest_applied,
                    "dropping superseded transaction list"
                );
            }
            Ok(response) if response.success => {
                self.latest_applied = request;
                if let Some(wallet) = self.view.wallet.as_mut() {
                    let is_cold = response.transactions.is_empty();
                    wallet.load_transactions(response.transactions);
                    match self.services.clock.now_ms() {
                        Ok(now) => wallet.last_update = Some(TimestampMs(now)),
                        Err(e) => warn!(error = %e, "clock unavailable, last update unchanged"),
                    }
                    wallet.is_cold = is_cold;
                    info!(
                        request,
                        count = wallet.transactions.len(),
                        is_cold,
                        "transactions refreshed"
                    );
                }
            }
            Ok(_) => warn!(request, "transaction list request was not successful"),
            Err(e) => warn!(request, error = %e, "transaction refresh failed"),
        }

        if let Some(indicator) = indicator {
            indicator.finish();
        }
        self.view.empty_transactions = self
            .view
            .wallet
            .as_ref()
            .map_or(true, |w| w.transactions.is_empty());
    }

    pub fn open_transaction(&self, tx: &Transaction) {
        if self.view.wallet.is_none() {
            self.services
                .toasts
                .show(Toast::warning(WARNING_SELECT_WALLET_TRANSACTION_LOOKUP));
            return;
        }

        let (equivalent_amount, equivalent_symbol) = match self.view.market_currency.as_ref() {
            Some(currency) => (
                tx.amount_equivalent(
                    &self.view.network,
                    currency,
                    self.view.market_history.as_ref(),
                ),
                currency.symbol.clone(),
            ),
            None => (0.0, String::new()),
        };

        self.services.navigation.navigate_forward(
            TRANSACTION_SHOW_PATH,
            TransactionShowParams {
                transaction: tx.clone(),
                symbol: self.view.network.symbol.clone(),
                equivalent_amount,
                equivalent_symbol,
            },
        );
    }

    pub fn copy_address(&self) {
        let toast = match self.services.clipboard.copy(&self.view.address) {
            Ok(()) => Toast::success(COPIED_CLIPBOARD),
            Err(e) => {
                warn!(error = %e, "copy to clipboard failed");
                Toast::error(COPY_CLIPBOARD_FAILED)
            }
        };
        self.services.toasts.show(toast);
    }

    pub fn dismiss(&self) {
        self.services.navigation.dismiss_modal();
    }

    /// Cancels the current activation. Indicators of unsettled refreshes are
    /// finished here and their late results are ignored.
    pub fn on_destroy(&mut self) {
        let Some(activation) = self.activation.as_ref() else {
            return;
        };
        if activation.is_cancelled() {
            return;
        }
        activation.cancel();
        info!(activation = activation.id(), "wallet details destroyed");

        for (_, indicator) in self.in_flight.drain() {
            if let Some(indicator) = indicator {
                indicator.finish();
            }
        }
        while self.events_rx.try_recv().is_ok() {}
    }
}

impl Drop for WalletDetailsController {
    fn drop(&mut self) {
        self.on_destroy();
    }
}
