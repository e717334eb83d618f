use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::{
    Fees, MarketHistory, MarketTicker, Network, Toast, TransactionListResponse,
    TransactionShowParams, UserSettings,
};
use crate::indicator::LoaderHandle;

#[derive(Debug, Clone, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub trait NavigationPort: Send + Sync {
    fn pop(&self);
    fn navigate_forward(&self, path: &str, params: TransactionShowParams);
    fn dismiss_modal(&self);
}

#[async_trait]
pub trait ApiClientPort: Send + Sync {
    fn network(&self) -> Network;
    fn fees(&self) -> watch::Receiver<Option<Fees>>;
    async fn get_transaction_list(
        &self,
        address: &str,
    ) -> Result<TransactionListResponse, PortError>;
}

pub trait MarketDataPort: Send + Sync {
    fn cached_ticker(&self) -> Option<MarketTicker>;
    fn history(&self) -> watch::Receiver<Option<MarketHistory>>;
}

pub trait SettingsPort: Send + Sync {
    fn settings(&self) -> watch::Receiver<UserSettings>;
}

#[async_trait]
pub trait TranslationPort: Send + Sync {
    async fn get(&self, key: &str) -> Result<String, PortError>;
}

pub trait ClipboardPort: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), PortError>;
}

pub trait ToastPort: Send + Sync {
    fn show(&self, toast: Toast);
}

pub trait LoadingPort: Send + Sync {
    /// Presents a blocking loader; it stays up until the handle is dismissed.
    fn present(&self, message: &str) -> Box<dyn LoaderHandle>;
}

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> Result<u64, PortError>;
}
