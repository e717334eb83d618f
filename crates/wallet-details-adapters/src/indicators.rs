//! Loader overlay and pull-to-refresh state shared with the shell.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use wallet_details_core::{LoaderHandle, LoadingPort, RefresherHandle};

#[derive(Debug, Default)]
struct OverlayState {
    next_id: AtomicU64,
    shown: Mutex<Vec<(u64, String)>>,
}

/// Stack of presented loaders; the shell draws the most recent one.
#[derive(Debug, Clone, Default)]
pub struct LoadingOverlay {
    state: Arc<OverlayState>,
}

impl LoadingOverlay {
    pub fn current(&self) -> Option<String> {
        lock_or_recover!(self.state.shown)
            .last()
            .map(|(_, message)| message.clone())
    }
}

struct OverlayLoader {
    id: u64,
    state: Arc<OverlayState>,
}

impl LoaderHandle for OverlayLoader {
    fn dismiss(self: Box<Self>) {
        lock_or_recover!(self.state.shown).retain(|(id, _)| *id != self.id);
    }
}

impl LoadingPort for LoadingOverlay {
    fn present(&self, message: &str) -> Box<dyn LoaderHandle> {
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        lock_or_recover!(self.state.shown).push((id, message.to_owned()));
        Box::new(OverlayLoader {
            id,
            state: Arc::clone(&self.state),
        })
    }
}

/// Pull-to-refresh control: spinning from `begin` until the refresh completes.
#[derive(Debug, Clone, Default)]
pub struct PullRefresher {
    refreshing: Arc<AtomicBool>,
}

impl PullRefresher {
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Starts spinning and returns the handle the refresh completes.
    /// Returns `None` while a refresh is already running.
    pub fn begin(&self) -> Option<Box<dyn RefresherHandle>> {
        if self.refreshing.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Box::new(RefresherCompletion {
            refreshing: Arc::clone(&self.refreshing),
        }))
    }
}

struct RefresherCompletion {
    refreshing: Arc<AtomicBool>,
}

impl RefresherHandle for RefresherCompletion {
    fn complete(self: Box<Self>) {
        self.refreshing.store(false, Ordering::Release);
    }
}
