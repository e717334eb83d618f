//! One view activation: everything started between `on_enter` and
//! `on_destroy` shares the activation's cancellation token.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Event produced by a background task, tagged with the activation that
/// started it.
#[derive(Debug)]
pub struct Tagged<E> {
    pub activation: u64,
    pub event: E,
}

#[derive(Debug, Clone)]
pub struct Activation {
    id: u64,
    token: CancellationToken,
}

impl Activation {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Accepts events from this activation only while it is live.
    pub fn accepts<E>(&self, tagged: &Tagged<E>) -> bool {
        tagged.activation == self.id && !self.is_cancelled()
    }

    /// Forwards the current value of `rx` and every later change into `tx`
    /// until the token fires or either side of a channel closes.
    pub fn forward_watch<T, E, F>(
        &self,
        mut rx: watch::Receiver<T>,
        tx: mpsc::UnboundedSender<Tagged<E>>,
        map: F,
    ) where
        T: Clone + Send + Sync + 'static,
        E: Send + 'static,
        F: Fn(T) -> E + Send + 'static,
    {
        let id = self.id;
        let token = self.token.clone();
        tokio::spawn(async move {
            loop {
                if token.is_cancelled() {
                    break;
                }
                let value = rx.borrow_and_update().clone();
                if tx
                    .send(Tagged {
                        activation: id,
                        event: map(value),
                    })
                    .is_err()
                {
                    break;
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!(activation = id, "watch forwarder stopped");
        });
    }
}
