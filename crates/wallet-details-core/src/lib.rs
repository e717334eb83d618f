pub mod activation;
pub mod controller;
pub mod domain;
pub mod indicator;
pub mod ports;

pub use activation::Activation;
pub use controller::{Services, ViewConfig, WalletDetailsController, WalletDetailsView};
pub use domain::{
    Fees, MarketCurrency, MarketHistory, MarketTicker, Network, TimestampMs, Toast, ToastLevel,
    Transaction, TransactionListResponse, TransactionShowParams, UserSettings, WalletView,
    COPIED_CLIPBOARD, COPY_CLIPBOARD_FAILED, FETCHING_TRANSACTIONS, TRANSACTION_SHOW_PATH,
    WALLET_MIN_NUMBER_CONFIRMATIONS, WARNING_SELECT_WALLET_TRANSACTION_LOOKUP,
};
pub use indicator::{IndicatorKind, LoaderHandle, RefreshIndicator, RefresherHandle};
pub use ports::{
    ApiClientPort, ClipboardPort, ClockPort, LoadingPort, MarketDataPort, NavigationPort,
    PortError, SettingsPort, ToastPort, TranslationPort,
};
