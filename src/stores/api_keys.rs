//! Usage: API key list (all/paginated), create/update/delete.
//!
//! List fetches are ticketed: only the newest in-flight fetch may write the
//! collection, older responses are dropped when they land.

use super::auth::SessionGate;
use super::models::{ApiKey, ApiKeysPage, CreateApiKeyRequest, UpdateApiKeyRequest};
use super::{has_session, ActionGuard, FetchMode, HasStatus};
use crate::bridge::{self, commands, CommandBridge};
use crate::domain::async_action::AsyncStatus;
use crate::domain::pagination::{PageChange, PaginationController, PaginationOptions};
use crate::error::{StoreError, StoreResult};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete API key";

#[derive(Debug, Clone, Default)]
pub struct ApiKeysState {
    pub keys: Vec<ApiKey>,
    pub status: AsyncStatus,
    pub pagination: PaginationController,
    fetch_ticket: u64,
    last_fetch: FetchMode,
    /// Bumped by `reset()`; results of mutations begun under an older
    /// generation are dropped.
    generation: u64,
}

impl ApiKeysState {
    pub fn last_fetch(&self) -> FetchMode {
        self.last_fetch
    }
}

impl HasStatus for ApiKeysState {
    fn status_mut(&mut self) -> &mut AsyncStatus {
        &mut self.status
    }
}

pub struct ApiKeysStore {
    bridge: Arc<dyn CommandBridge>,
    session: Arc<dyn SessionGate>,
    state: watch::Sender<ApiKeysState>,
}

impl ApiKeysStore {
    pub fn new(
        bridge: Arc<dyn CommandBridge>,
        session: Arc<dyn SessionGate>,
        pagination: PaginationOptions,
    ) -> Self {
        let state = ApiKeysState {
            pagination: PaginationController::new(pagination),
            ..ApiKeysState::default()
        };
        Self {
            bridge,
            session,
            state: watch::Sender::new(state),
        }
    }

    pub fn snapshot(&self) -> ApiKeysState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiKeysState> {
        self.state.subscribe()
    }

    /// Listeners run inside the state update and must not call this store.
    pub fn on_page_change(&self, listener: impl Fn(&PageChange) + Send + Sync + 'static) {
        self.state.send_if_modified(|s| {
            s.pagination.on_change(listener);
            false
        });
    }

    pub async fn fetch_all(&self) {
        if !has_session(&*self.session, "api_keys.fetch_all") {
            return;
        }
        let _action = ActionGuard::begin(&self.state);
        self.load_all().await;
    }

    pub async fn fetch_page(&self, page: u32, per_page: u32) {
        if !has_session(&*self.session, "api_keys.fetch_page") {
            return;
        }
        let _action = ActionGuard::begin(&self.state);
        self.load_page(page, per_page).await;
    }

    /// Creates a key, then refetches in the last fetch mode so the list
    /// reflects server ordering and totals.
    pub async fn create(&self, mut request: CreateApiKeyRequest) -> bool {
        if !has_session(&*self.session, "api_keys.create") {
            return false;
        }
        if request.name.trim().is_empty() {
            request.name = default_key_name();
        }
        let generation = self.generation();
        let action = ActionGuard::begin(&self.state);
        let created = bridge::call::<ApiKey>(
            &*self.bridge,
            commands::CREATE_API_KEY,
            commands::request_args(&request),
        )
        .await;
        match created {
            Ok(key) => {
                tracing::info!(key_id = %key.id, "api_keys: created");
                let applied = self.apply_if_current(generation, |s| s.keys.push(key));
                if applied && has_session(&*self.session, "api_keys.refetch") {
                    self.refetch().await;
                }
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "api_keys: create failed");
                if self.generation() == generation {
                    action.fail(&err);
                }
                false
            }
        }
    }

    pub async fn update(&self, key_id: &str, request: UpdateApiKeyRequest) -> bool {
        if !has_session(&*self.session, "api_keys.update") {
            return false;
        }
        let generation = self.generation();
        let action = ActionGuard::begin(&self.state);
        let updated = bridge::call::<ApiKey>(
            &*self.bridge,
            commands::UPDATE_API_KEY,
            commands::key_request_args(key_id, &request),
        )
        .await;
        match updated {
            Ok(key) => {
                self.apply_if_current(generation, |s| {
                    if let Some(slot) = s.keys.iter_mut().find(|k| k.id == key.id) {
                        *slot = key;
                    }
                });
                true
            }
            Err(err) => {
                tracing::warn!(key_id, error = %err, "api_keys: update failed");
                if self.generation() == generation {
                    action.fail(&err);
                }
                false
            }
        }
    }

    pub async fn delete(&self, key_id: &str) -> bool {
        if !has_session(&*self.session, "api_keys.delete") {
            return false;
        }
        let generation = self.generation();
        let action = ActionGuard::begin(&self.state);
        let deleted = bridge::call::<bool>(
            &*self.bridge,
            commands::DELETE_API_KEY,
            commands::key_args(key_id),
        )
        .await;
        match deleted {
            Ok(true) => {
                self.apply_if_current(generation, |s| s.keys.retain(|k| k.id != key_id));
                true
            }
            Ok(false) if self.generation() == generation => {
                action.fail_with(DELETE_FAILED_MESSAGE.to_string());
                false
            }
            Ok(false) => false,
            Err(err) => {
                tracing::warn!(key_id, error = %err, "api_keys: delete failed");
                if self.generation() == generation {
                    action.fail_with(delete_error_message(err));
                }
                false
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

    /// Clears keys, status and pagination. In-flight fetches become stale.
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            s.keys.clear();
            s.status.clear();
            s.pagination.reset();
            s.fetch_ticket += 1;
            s.last_fetch = FetchMode::All;
            s.generation += 1;
        });
    }

    fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Applies `patch` unless the store was reset since `generation` was read.
    fn apply_if_current(&self, generation: u64, patch: impl FnOnce(&mut ApiKeysState)) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation != generation {
                tracing::debug!(generation, current = s.generation, "api_keys: store reset, dropping result");
                return false;
            }
            patch(s);
            true
        })
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

    async fn refetch(&self) {
        let (mode, page, per_page) = {
            let s = self.state.borrow();
            (s.last_fetch, s.pagination.current_page(), s.pagination.per_page())
        };
        match mode {
            FetchMode::All => self.load_all().await,
            FetchMode::Page => self.load_page(page, per_page).await,
        }
    }

    async fn load_all(&self) {
        let ticket = self.issue_ticket(FetchMode::All);
        let result = bridge::call::<Option<Vec<ApiKey>>>(
            &*self.bridge,
            commands::GET_ALL_API_KEYS,
            commands::no_args(),
        )
        .await;
        self.settle_fetch(ticket, result, |s, keys| {
            s.keys = keys.unwrap_or_default();
        });
    }

    async fn load_page(&self, page: u32, per_page: u32) {
        let ticket = self.issue_ticket(FetchMode::Page);
        let result = bridge::call::<ApiKeysPage>(
            &*self.bridge,
            commands::GET_API_KEYS_PAGINATED,
            commands::page_args(page, per_page),
        )
        .await;
        self.settle_fetch(ticket, result, |s, page| {
            s.keys = page.api_keys;
            s.pagination.apply_page_meta(&page.meta);
        });
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
        apply: impl FnOnce(&mut ApiKeysState, T),
    ) {
        self.state.send_if_modified(|s| {
            if s.fetch_ticket != ticket {
                tracing::debug!(ticket, newest = s.fetch_ticket, "api_keys: discarded stale response");
                return false;
            }
            match result {
                Ok(data) => apply(s, data),
                Err(err) => {
                    tracing::warn!(error = %err, "api_keys: fetch failed");
                    s.status.fail(err.to_string());
                }
            }
            true
        });
    }
}

fn default_key_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("Key {millis}")
}

fn delete_error_message(err: StoreError) -> String {
    match err {
        StoreError::Remote(message) if message.trim().is_empty() => {
            DELETE_FAILED_MESSAGE.to_string()
        }
        other => other.to_string(),
    }
}
