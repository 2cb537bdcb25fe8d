//! Usage: Request log listing (recent/paginated) and usage statistics.

use super::auth::SessionGate;
use super::models::{RequestLog, RequestLogsPage, UsageStats};
use super::{has_session, ActionGuard, FetchMode, HasStatus};
use crate::bridge::{self, commands, CommandBridge};
use crate::domain::async_action::AsyncStatus;
use crate::domain::pagination::{PageChange, PaginationController, PaginationOptions};
use crate::error::StoreResult;
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_LOG_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct RequestLogsState {
    pub logs: Vec<RequestLog>,
    pub stats: Option<UsageStats>,
    pub status: AsyncStatus,
    pub pagination: PaginationController,
    fetch_ticket: u64,
    last_fetch: FetchMode,
}

impl RequestLogsState {
    pub fn last_fetch(&self) -> FetchMode {
        self.last_fetch
    }
}

impl HasStatus for RequestLogsState {
    fn status_mut(&mut self) -> &mut AsyncStatus {
        &mut self.status
    }
}

pub struct RequestLogsStore {
    bridge: Arc<dyn CommandBridge>,
    session: Arc<dyn SessionGate>,
    default_limit: u32,
    state: watch::Sender<RequestLogsState>,
}

impl RequestLogsStore {
    pub fn new(
        bridge: Arc<dyn CommandBridge>,
        session: Arc<dyn SessionGate>,
        pagination: PaginationOptions,
        default_limit: u32,
    ) -> Self {
        let state = RequestLogsState {
            pagination: PaginationController::new(pagination),
            ..RequestLogsState::default()
        };
        Self {
            bridge,
            session,
            default_limit: if default_limit == 0 { DEFAULT_LOG_LIMIT } else { default_limit },
            state: watch::Sender::new(state),
        }
    }

    pub fn snapshot(&self) -> RequestLogsState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestLogsState> {
        self.state.subscribe()
    }

    pub fn on_page_change(&self, listener: impl Fn(&PageChange) + Send + Sync + 'static) {
        self.state.send_if_modified(|s| {
            s.pagination.on_change(listener);
            false
        });
    }

    /// Most recent logs, newest first. `None` uses the configured limit.
    pub async fn fetch_logs(&self, limit: Option<u32>) {
        if !has_session(&*self.session, "request_logs.fetch_logs") {
            return;
        }
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.default_limit);
        let _action = ActionGuard::begin(&self.state);
        let ticket = self.issue_ticket(FetchMode::All);
        let result = bridge::call::<Option<Vec<RequestLog>>>(
            &*self.bridge,
            commands::GET_REQUEST_LOGS,
            commands::limit_args(limit),
        )
        .await;
        self.settle_fetch(ticket, result, |s, logs| {
            s.logs = logs.unwrap_or_default();
        });
    }

    pub async fn fetch_page(&self, page: u32, per_page: u32) {
        if !has_session(&*self.session, "request_logs.fetch_page") {
            return;
        }
        let _action = ActionGuard::begin(&self.state);
        let ticket = self.issue_ticket(FetchMode::Page);
        let result = bridge::call::<RequestLogsPage>(
            &*self.bridge,
            commands::GET_REQUEST_LOGS_PAGINATED,
            commands::page_args(page, per_page),
        )
        .await;
        self.settle_fetch(ticket, result, |s, page| {
            s.logs = page.logs;
            s.pagination.apply_page_meta(&page.meta);
        });
    }

    pub async fn fetch_stats(&self) {
        if !has_session(&*self.session, "request_logs.fetch_stats") {
            return;
        }
        let action = ActionGuard::begin(&self.state);
        let result = bridge::call::<UsageStats>(
            &*self.bridge,
            commands::GET_USAGE_STATS,
            commands::no_args(),
        )
        .await;
        match result {
            Ok(stats) => self.state.send_modify(|s| s.stats = Some(stats)),
            Err(err) => {
                tracing::warn!(error = %err, "request_logs: stats fetch failed");
                action.fail(&err);
            }
        }
    }

    pub async fn go_to_page(&self, page: u32) {
        self.navigate(|p| p.go_to_page(page)).await;
    }

    pub async fn next_page(&self) {
        self.navigate(PaginationController::go_to_next_page).await;
    }

    pub async fn prev_page(&self) {
        self.navigate(PaginationController::go_to_prev_page).await;
    }

    pub async fn first_page(&self) {
        self.navigate(PaginationController::go_to_first_page).await;
    }

    pub async fn last_page(&self) {
        self.navigate(PaginationController::go_to_last_page).await;
    }

    pub async fn set_per_page(&self, per_page: u32) {
        self.navigate(|p| p.set_per_page(per_page)).await;
    }

    pub fn reset(&self) {
        self.state.send_modify(|s| {
            s.logs.clear();
            s.stats = None;
            s.status.clear();
            s.pagination.reset();
            s.fetch_ticket += 1;
            s.last_fetch = FetchMode::All;
        });
    }

    async fn navigate(&self, step: impl FnOnce(&mut PaginationController) -> Option<PageChange>) {
        let mut change = None;
        self.state.send_if_modified(|s| {
            change = step(&mut s.pagination);
            change.is_some()
        });
        if let Some(change) = change {
            self.fetch_page(change.page, change.per_page).await;
        }
    }

    fn issue_ticket(&self, mode: FetchMode) -> u64 {
        let mut ticket = 0;
        self.state.send_if_modified(|s| {
            s.fetch_ticket += 1;
            s.last_fetch = mode;
            ticket = s.fetch_ticket;
            false
        });
        ticket
    }

    fn settle_fetch<T>(
        &self,
        ticket: u64,
        result: StoreResult<T>,
        apply: impl FnOnce(&mut RequestLogsState, T),
    ) {
        self.state.send_if_modified(|s| {
            if s.fetch_ticket != ticket {
                tracing::debug!(ticket, newest = s.fetch_ticket, "request_logs: discarded stale response");
                return false;
            }
            match result {
                Ok(data) => apply(s, data),
                Err(err) => {
                    tracing::warn!(error = %err, "request_logs: fetch failed");
                    s.status.fail(err.to_string());
                }
            }
            true
        });
    }
}

#[cfg(test)]
mod tests;
