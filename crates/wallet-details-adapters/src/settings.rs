use tokio::sync::watch;
use tracing::info;

use wallet_details_core::{SettingsPort, UserSettings};

/// In-process user settings. Every change is pushed to current subscribers.
#[derive(Debug)]
pub struct SettingsStore {
    tx: watch::Sender<UserSettings>,
}

impl SettingsStore {
    pub fn new(initial: UserSettings) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> UserSettings {
        self.tx.borrow().clone()
    }

    pub fn set_currency(&self, code: &str) {
        let code = code.trim().to_ascii_lowercase();
        let changed = self.tx.send_if_modified(|settings| {
            if settings.currency == code {
                return false;
            }
            settings.currency = code.clone();
            true
        });
        if changed {
            info!(currency = %code, "currency changed");
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(UserSettings::default())
    }
}

impl SettingsPort for SettingsStore {
    fn settings(&self) -> watch::Receiver<UserSettings> {
        self.tx.subscribe()
    }
}
