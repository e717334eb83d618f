use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use wallet_details_core::{NavigationPort, TransactionShowParams};

#[derive(Debug, Clone, PartialEq)]
pub enum NavRequest {
    Pop,
    Forward {
        path: String,
        params: TransactionShowParams,
    },
    Dismiss,
}

/// Queues navigation requests for the shell to act on between frames.
#[derive(Debug, Clone, Default)]
pub struct NavigationRecorder {
    requests: Arc<Mutex<VecDeque<NavRequest>>>,
}

impl NavigationRecorder {
    pub fn drain(&self) -> Vec<NavRequest> {
        lock_or_recover!(self.requests).drain(..).collect()
    }

    fn push(&self, request: NavRequest) {
        debug!(?request, "navigation requested");
        lock_or_recover!(self.requests).push_back(request);
    }
}

impl NavigationPort for NavigationRecorder {
    fn pop(&self) {
        self.push(NavRequest::Pop);
    }

    fn navigate_forward(&self, path: &str, params: TransactionShowParams) {
        self.push(NavRequest::Forward {
            path: path.to_owned(),
            params,
        });
    }

    fn dismiss_modal(&self) {
        self.push(NavRequest::Dismiss);
    }
}
