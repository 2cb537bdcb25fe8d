//! Usage: Loading/error bookkeeping around a single async action.

use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use tokio::sync::watch;

pub const FALLBACK_ERROR_MESSAGE: &str = "Operation failed";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AsyncStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl AsyncStatus {
    /// Starts a new attempt: the previous attempt's error no longer applies.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(error_message(message.into()));
    }

    pub fn settle(&mut self) {
        self.loading = false;
    }

    pub fn clear(&mut self) {
        self.loading = false;
        self.error = None;
    }
}

pub(crate) fn error_message(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// Shared loading/error state for async actions. Overlapping `execute` calls
/// are not serialized: each one writes the shared status and the last writer
/// wins.
#[derive(Debug)]
pub struct AsyncAction {
    status: watch::Sender<AsyncStatus>,
}

impl Default for AsyncAction {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncAction {
    pub fn new() -> Self {
        Self {
            status: watch::Sender::new(AsyncStatus::default()),
        }
    }

    pub fn status(&self) -> AsyncStatus {
        self.status.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AsyncStatus> {
        self.status.subscribe()
    }

    pub fn reset(&self) {
        self.status.send_modify(AsyncStatus::clear);
    }

    /// Runs `operation` with `loading` raised. A failure is recorded as the
    /// error's display text and handed back to the caller unchanged.
    pub async fn execute<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let _settle = self.begin();
        match operation().await {
            Ok(value) => Ok(value),
            Err(err) => {
                let message = err.to_string();
                self.status.send_modify(|status| status.fail(message));
                Err(err)
            }
        }
    }

    fn begin(&self) -> SettleOnDrop<'_> {
        self.status.send_modify(AsyncStatus::begin);
        SettleOnDrop { status: &self.status }
    }
}

/// Lowers `loading` on every exit path, including panics and a dropped future.
struct SettleOnDrop<'a> {
    status: &'a watch::Sender<AsyncStatus>,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        self.status.send_modify(AsyncStatus::settle);
    }
}
