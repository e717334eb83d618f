/// Acquire mutex lock, recovering from poisoned state if necessary.
macro_rules! lock_or_recover {
    ($mutex:expr) => {
        $mutex.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("mutex poisoned, recovering");
            poisoned.into_inner()
        })
    };
}

pub mod api;
pub mod clipboard;
pub mod clock;
pub mod config;
pub mod indicators;
pub mod market;
pub mod navigation;
pub mod settings;
pub mod toast;
pub mod translation;

pub use api::ArkApiAdapter;
pub use clipboard::SystemClipboardAdapter;
pub use clock::SystemClockAdapter;
pub use config::WalletDetailsConfig;
pub use indicators::{LoadingOverlay, PullRefresher};
pub use market::MarketDataAdapter;
pub use navigation::{NavRequest, NavigationRecorder};
pub use settings::SettingsStore;
pub use toast::ToastQueue;
pub use translation::TranslationTable;
