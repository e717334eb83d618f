//! Modal host: wires adapters into the controller and draws its view.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use wallet_details_adapters::{
    ArkApiAdapter, LoadingOverlay, MarketDataAdapter, NavRequest, NavigationRecorder,
    PullRefresher, SettingsStore, SystemClipboardAdapter, SystemClockAdapter, ToastQueue,
    TranslationTable, WalletDetailsConfig,
};
use wallet_details_core::{
    MarketDataPort, Network, Services, Transaction, TransactionShowParams, UserSettings, ViewConfig,
    WalletDetailsController, WalletDetailsView,
};

use crate::ui;

/// Storage key for the selected fiat currency
const CURRENCY_STORAGE_KEY: &str = "currency";
/// Storage key for the last market ticker
const TICKER_STORAGE_KEY: &str = "market_ticker";

/// User input collected while drawing, applied after the frame is laid out.
enum UiAction {
    CopyAddress,
    Refresh,
    OpenTransaction(Transaction),
    SelectCurrency(String),
    CloseDetails,
    Dismiss,
}

pub struct App {
    runtime: tokio::runtime::Runtime,
    controller: WalletDetailsController,
    translations: TranslationTable,
    navigation: NavigationRecorder,
    overlay: LoadingOverlay,
    toasts: ToastQueue,
    refresher: PullRefresher,
    settings: Arc<SettingsStore>,
    market: Arc<MarketDataAdapter>,
    currencies: Vec<String>,
    /// Transaction detail screen opened from the list
    shown_transaction: Option<TransactionShowParams>,
    entered: bool,
}

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        config: WalletDetailsConfig,
        wallet_snapshot: Option<String>,
    ) -> eyre::Result<Self> {
        let currency = cc
            .storage
            .and_then(|s| s.get_string(CURRENCY_STORAGE_KEY))
            .unwrap_or_else(|| config.default_currency.clone());
        let settings = Arc::new(SettingsStore::new(UserSettings { currency }));

        let api = Arc::new(ArkApiAdapter::new(&config, Network::default())?);
        let market = Arc::new(MarketDataAdapter::new(&config)?);
        if let Some(stored) = cc.storage.and_then(|s| s.get_string(TICKER_STORAGE_KEY)) {
            if let Err(e) = market.restore_ticker(&stored) {
                tracing::warn!(error = %e, "ignoring stored ticker");
            }
        }
        // The view reads the cached ticker once, on its first frame.
        if market.cached_ticker().is_none() {
            let limit = Duration::from_millis(config.market_warmup_timeout_ms);
            runtime.block_on(market.warm_up(limit));
        }
        let translations = TranslationTable::english()?;
        let navigation = NavigationRecorder::default();
        let overlay = LoadingOverlay::default();
        let toasts = ToastQueue::new(Duration::from_millis(config.toast_ttl_ms));

        spawn_feeds(
            &runtime,
            Arc::clone(&api),
            Arc::clone(&market),
            Duration::from_millis(config.market_refresh_interval_ms),
        );

        let services = Services {
            navigation: Arc::new(navigation.clone()),
            api,
            market: market.clone(),
            settings: settings.clone(),
            translation: Arc::new(translations.clone()),
            clipboard: Arc::new(SystemClipboardAdapter),
            toasts: Arc::new(toasts.clone()),
            loading: Arc::new(overlay.clone()),
            clock: Arc::new(SystemClockAdapter),
        };
        let controller = WalletDetailsController::new(
            services,
            ViewConfig::default(),
            wallet_snapshot.as_deref(),
        );

        Ok(Self {
            runtime,
            controller,
            translations,
            navigation,
            overlay,
            toasts,
            refresher: PullRefresher::default(),
            settings,
            market,
            currencies: config.market_currencies,
            shown_transaction: None,
            entered: false,
        })
    }

    fn t(&self, key: &str) -> String {
        self.translations.translate(key)
    }
}

/// Keeps fees, ticker and history fresh for the lifetime of the app.
fn spawn_feeds(
    runtime: &tokio::runtime::Runtime,
    api: Arc<ArkApiAdapter>,
    market: Arc<MarketDataAdapter>,
    every: Duration,
) {
    runtime.spawn(async move {
        let mut tick = tokio::time::interval(every);
        loop {
            tick.tick().await;
            if let Err(e) = api.refresh_fees().await {
                tracing::warn!(error = %e, "fee refresh failed");
            }
            if let Err(e) = market.refresh_ticker().await {
                tracing::warn!(error = %e, "ticker refresh failed");
            }
            if let Err(e) = market.refresh_history().await {
                tracing::warn!(error = %e, "history refresh failed");
            }
        }
    });
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        let handle = self.runtime.handle().clone();
        let _rt = handle.enter();

        if !self.entered {
            self.controller.on_enter();
            self.entered = true;
        }
        self.controller.apply_pending();
        self.handle_navigation(ctx);

        let mut actions = Vec::new();
        let view = self.controller.view();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let title = view
                    .wallet
                    .as_ref()
                    .and_then(|w| w.label.clone())
                    .unwrap_or_else(|| self.t("WALLETS_PAGE.ADDRESS"));
                ui::styled_heading(ui, &title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.t("CLOSE")).clicked() {
                        actions.push(UiAction::Dismiss);
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_summary(ui, view, &mut actions);
            self.render_transactions(ui, view, &mut actions);
        });

        self.render_overlay(ctx);
        self.render_transaction_window(ctx, &mut actions);
        self.render_toasts(ctx);

        for action in actions {
            self.apply(action);
        }
        ctx.request_repaint_after(Duration::from_millis(250));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(CURRENCY_STORAGE_KEY, self.settings.current().currency);
        if let Some(ticker) = self.market.ticker_snapshot() {
            storage.set_string(TICKER_STORAGE_KEY, ticker);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.on_destroy();
    }
}

impl App {
    fn handle_navigation(&mut self, ctx: &egui::Context) {
        for request in self.navigation.drain() {
            match request {
                NavRequest::Pop | NavRequest::Dismiss => {
                    self.controller.on_destroy();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                NavRequest::Forward { path, params } => {
                    tracing::debug!(%path, id = %params.transaction.id, "showing transaction");
                    self.shown_transaction = Some(params);
                }
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::CopyAddress => self.controller.copy_address(),
            UiAction::Refresh => {
                if let Some(handle) = self.refresher.begin() {
                    self.controller.do_refresh(handle);
                }
            }
            UiAction::OpenTransaction(tx) => self.controller.open_transaction(&tx),
            UiAction::SelectCurrency(code) => self.settings.set_currency(&code),
            UiAction::CloseDetails => self.shown_transaction = None,
            UiAction::Dismiss => self.controller.dismiss(),
        }
    }

    fn render_summary(
        &self,
        ui: &mut egui::Ui,
        view: &WalletDetailsView,
        actions: &mut Vec<UiAction>,
    ) {
        ui.add_space(10.0);
        if ui::labeled_field_with_copy(
            ui,
            &self.t("WALLETS_PAGE.ADDRESS"),
            &view.address,
            &self.t("WALLETS_PAGE.COPY_ADDRESS"),
        ) {
            actions.push(UiAction::CopyAddress);
        }

        if let Some(wallet) = view.wallet.as_ref() {
            let mut balance = ui::format_token(&view.network, wallet.balance);
            if let Some(currency) = view.market_currency.as_ref() {
                let fiat = view.network.to_whole_units(wallet.balance) * currency.price;
                balance = format!("{balance}  ({})", ui::format_fiat(&currency.symbol, fiat));
            }
            ui::labeled_value(ui, &self.t("WALLETS_PAGE.BALANCE"), &balance);
        }

        ui::section_header(ui, &self.t("WALLETS_PAGE.MARKET_PRICE"));
        ui.horizontal(|ui| {
            match view.market_currency.as_ref() {
                Some(currency) => {
                    ui.label(format!(
                        "1 {} = {}",
                        view.network.token,
                        ui::format_fiat(&currency.symbol, currency.price)
                    ));
                }
                None => {
                    ui.label("—");
                }
            }

            let mut selected = self.settings.current().currency.to_ascii_uppercase();
            let before = selected.clone();
            egui::ComboBox::from_id_salt("currency_select")
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for code in &self.currencies {
                        ui.selectable_value(&mut selected, code.clone(), code);
                    }
                });
            if selected != before {
                actions.push(UiAction::SelectCurrency(selected));
            }
        });

        if let Some(fees) = view.fees.as_ref() {
            ui::labeled_value(
                ui,
                &self.t("WALLETS_PAGE.FEES"),
                &ui::format_token(&view.network, fees.transfer),
            );
        }
    }

    fn render_transactions(
        &self,
        ui: &mut egui::Ui,
        view: &WalletDetailsView,
        actions: &mut Vec<UiAction>,
    ) {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(self.t("TRANSACTIONS_PAGE.TRANSACTIONS"))
                    .strong()
                    .size(14.0),
            );
            if self.refresher.is_refreshing() {
                ui.add(egui::Spinner::new());
            } else if ui.small_button(format!("⟳ {}", self.t("REFRESH"))).clicked() {
                actions.push(UiAction::Refresh);
            }
            if let Some(updated) = view.wallet.as_ref().and_then(|w| w.last_update) {
                ui.label(
                    egui::RichText::new(format!(
                        "{}: {}",
                        self.t("TRANSACTIONS_PAGE.LAST_UPDATE"),
                        ui::format_timestamp(updated.0)
                    ))
                    .weak(),
                );
            }
        });
        ui.separator();

        let Some(wallet) = view.wallet.as_ref() else {
            return;
        };
        if view.empty_transactions {
            ui.label(self.t("TRANSACTIONS_PAGE.NO_TRANSACTIONS"));
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for tx in &wallet.transactions {
                let direction = if tx.is_sent(&wallet.address) {
                    self.t("TRANSACTIONS_PAGE.SENT")
                } else {
                    self.t("TRANSACTIONS_PAGE.RECEIVED")
                };
                let mut line = format!(
                    "{}  {}  {}",
                    ui::format_timestamp(tx.timestamp.0),
                    direction,
                    ui::format_token(&view.network, tx.amount)
                );
                if !tx.is_confirmed(view.min_confirmations) {
                    line.push_str(&format!("  ({})", self.t("TRANSACTIONS_PAGE.UNCONFIRMED")));
                }
                if ui.selectable_label(false, line).clicked() {
                    actions.push(UiAction::OpenTransaction(tx.clone()));
                }
            }
        });
    }

    fn render_overlay(&self, ctx: &egui::Context) {
        let Some(message) = self.overlay.current() else {
            return;
        };
        egui::Window::new("loading")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(message);
                });
            });
    }

    fn render_transaction_window(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(params) = self.shown_transaction.as_ref() else {
            return;
        };
        let network = &self.controller.view().network;
        let tx = &params.transaction;

        let mut open = true;
        egui::Window::new(&tx.id)
            .id(egui::Id::new("transaction_show"))
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui::labeled_value(ui, "Id", &tx.id);
                ui::labeled_value(ui, "Time", &ui::format_timestamp(tx.timestamp.0));
                ui::labeled_value(ui, "Sender", &tx.sender);
                if let Some(recipient) = tx.recipient.as_deref() {
                    ui::labeled_value(ui, "Recipient", recipient);
                }
                let amount = ui::format_token(network, tx.amount)
                    .replacen(&network.symbol, &params.symbol, 1);
                ui::labeled_value(ui, "Amount", &amount);
                if !params.equivalent_symbol.is_empty() {
                    ui::labeled_value(
                        ui,
                        "Value",
                        &ui::format_fiat(&params.equivalent_symbol, params.equivalent_amount),
                    );
                }
                ui::labeled_value(ui, "Fee", &ui::format_token(network, tx.fee));
                ui::labeled_value(ui, "Confirmations", &tx.confirmations.to_string());
                if let Some(memo) = tx.vendor_field.as_deref() {
                    ui::labeled_value(ui, "Vendor field", memo);
                }
            });
        if !open {
            actions.push(UiAction::CloseDetails);
        }
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        let visible = self.toasts.visible(Instant::now());
        if visible.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .show(ctx, |ui| {
                for toast in visible {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(self.t(&toast.key))
                                .color(ui::toast_color(toast.level)),
                        );
                    });
                }
            });
    }
}
