//! Per-connection session holding the navigation state.

use tokio::sync::Mutex;
use tracing::debug;

use super::{NavigationState, Transition};

/// One logical client session.
///
/// Each connection (or HTTP session id) owns its own `Session`; it is never
/// shared between clients. The mutex keeps transitions atomic when a client
/// has several requests in flight.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<NavigationState>,
}

impl Session {
    /// Create a session positioned at the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> NavigationState {
        *self.state.lock().await
    }

    /// Apply a transition and return `(previous, current)`.
    pub async fn apply(&self, transition: Transition) -> (NavigationState, NavigationState) {
        let mut state = self.state.lock().await;
        let previous = *state;
        *state = previous.apply(transition);
        debug!(?previous, current = ?*state, "Session transition");
        (previous, *state)
    }
}
