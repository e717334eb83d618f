use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::info;

use wallet_details_core::{Toast, ToastPort};

#[derive(Debug)]
struct ActiveToast {
    toast: Toast,
    shown_at: Instant,
}

/// Toasts waiting to be drawn. Each one expires `ttl` after it was raised.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<ActiveToast>>>,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            ttl,
        }
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<Toast> {
        let mut queue = lock_or_recover!(self.inner);
        queue.retain(|t| now.saturating_duration_since(t.shown_at) < self.ttl);
        queue.iter().map(|t| t.toast.clone()).collect()
    }

    fn push_at(&self, toast: Toast, at: Instant) {
        lock_or_recover!(self.inner).push_back(ActiveToast { toast, shown_at: at });
    }
}

impl ToastPort for ToastQueue {
    fn show(&self, toast: Toast) {
        info!(level = ?toast.level, key = %toast.key, "toast");
        self.push_at(toast, Instant::now());
    }
}
