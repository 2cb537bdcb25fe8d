//! Usage: Data stores composing the bridge with reactive state.
//!
//! Every store keeps its state in a `tokio::sync::watch` sender. Actions raise
//! `loading` through [`ActionGuard`], which lowers it again on drop.

pub mod api_keys;
pub mod auth;
pub mod models;
pub mod request_logs;
pub mod session;
pub mod settings;

pub use api_keys::{ApiKeysState, ApiKeysStore};
pub use auth::{AuthState, AuthStore, SessionGate};
pub use request_logs::{RequestLogsState, RequestLogsStore};
pub use session::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use settings::{SettingsSnapshot, SettingsStore, SettingsValues};

use crate::domain::async_action::AsyncStatus;
use crate::error::StoreError;
use tokio::sync::watch;

pub(crate) trait HasStatus {
    fn status_mut(&mut self) -> &mut AsyncStatus;
}

/// Which list query produced the held collection; creates refetch the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    #[default]
    All,
    Page,
}

pub(crate) struct ActionGuard<'a, S: HasStatus> {
    state: &'a watch::Sender<S>,
}

impl<'a, S: HasStatus> ActionGuard<'a, S> {
    pub(crate) fn begin(state: &'a watch::Sender<S>) -> Self {
        state.send_modify(|s| s.status_mut().begin());
        Self { state }
    }

    pub(crate) fn fail(&self, err: &StoreError) {
        self.fail_with(err.to_string());
    }

    pub(crate) fn fail_with(&self, message: String) {
        self.state.send_modify(|s| s.status_mut().fail(message));
    }
}

impl<S: HasStatus> Drop for ActionGuard<'_, S> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.status_mut().settle());
    }
}

/// Logs and reports `false` when no session is active.
pub(crate) fn has_session(gate: &dyn SessionGate, action: &'static str) -> bool {
    if gate.is_authenticated() {
        return true;
    }
    tracing::warn!(action, "store: not authenticated, skipping");
    false
}
