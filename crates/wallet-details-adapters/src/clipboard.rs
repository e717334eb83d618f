use wallet_details_core::{ClipboardPort, PortError};

/// System clipboard through arboard. A fresh handle is opened per copy.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboardAdapter;

impl ClipboardPort for SystemClipboardAdapter {
    fn copy(&self, text: &str) -> Result<(), PortError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| PortError::Unavailable(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(text)
            .map_err(|e| PortError::Transport(format!("clipboard write failed: {e}")))
    }
}
