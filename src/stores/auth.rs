//! Usage: Session lifecycle (login, password change, token persistence).

use super::models::{ChangePasswordRequest, LoginRequest, LoginResponse};
use super::session::TokenStorage;
use super::{ActionGuard, HasStatus};
use crate::bridge::{self, commands, CommandBridge};
use crate::domain::async_action::AsyncStatus;
use std::sync::Arc;
use tokio::sync::watch;

/// Answers whether protected store operations may reach the backend.
pub trait SessionGate: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub session_token: Option<String>,
    pub is_default_password: bool,
    pub status: AsyncStatus,
}

impl HasStatus for AuthState {
    fn status_mut(&mut self) -> &mut AsyncStatus {
        &mut self.status
    }
}

pub struct AuthStore {
    bridge: Arc<dyn CommandBridge>,
    storage: Arc<dyn TokenStorage>,
    token_key: String,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new(
        bridge: Arc<dyn CommandBridge>,
        storage: Arc<dyn TokenStorage>,
        token_key: impl Into<String>,
    ) -> Self {
        Self {
            bridge,
            storage,
            token_key: token_key.into(),
            state: watch::Sender::new(AuthState::default()),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub async fn login(&self, password: &str) -> bool {
        let action = ActionGuard::begin(&self.state);
        let request = LoginRequest {
            password: password.to_string(),
        };
        let response = match bridge::call::<LoginResponse>(
            &*self.bridge,
            commands::LOGIN,
            commands::request_args(&request),
        )
        .await
        {
            Ok(response) if response.success && !response.session_token.is_empty() => response,
            Ok(_) => {
                action.fail_with("Login failed".to_string());
                return false;
            }
            Err(err) => {
                tracing::warn!(error = %err, "auth: login failed");
                action.fail(&err);
                return false;
            }
        };

        if let Err(err) = self.storage.set(&self.token_key, &response.session_token) {
            tracing::warn!(error = %err, "auth: failed to persist session token");
        }
        self.state.send_modify(|s| {
            s.is_authenticated = true;
            s.session_token = Some(response.session_token);
        });
        tracing::info!("auth: logged in");

        self.check_default_password().await;
        true
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> bool {
        if !super::has_session(self, "auth.change_password") {
            return false;
        }
        let action = ActionGuard::begin(&self.state);
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        match bridge::call::<bool>(
            &*self.bridge,
            commands::CHANGE_PASSWORD,
            commands::request_args(&request),
        )
        .await
        {
            Ok(_) => {
                self.state.send_modify(|s| s.is_default_password = false);
                tracing::info!("auth: password changed");
                true
            }
            Err(err) => {
                action.fail(&err);
                false
            }
        }
    }

    /// Refreshes `is_default_password`. Failures are logged and keep the
    /// previous value.
    pub async fn check_default_password(&self) {
        let result = bridge::call::<bool>(
            &*self.bridge,
            commands::CHECK_DEFAULT_PASSWORD,
            commands::no_args(),
        )
        .await;
        match result {
            Ok(is_default) => {
                self.state.send_if_modified(|s| {
                    let changed = s.is_default_password != is_default;
                    s.is_default_password = is_default;
                    changed
                });
            }
            Err(err) => tracing::warn!(error = %err, "auth: default password check failed"),
        }
    }

    /// Restores a persisted session token. Returns whether a session is active.
    pub async fn load_session(&self) -> bool {
        let token = match self.storage.get(&self.token_key) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return false,
            Err(err) => {
                tracing::warn!(error = %err, "auth: failed to read session token");
                return false;
            }
        };
        self.state.send_modify(|s| {
            s.is_authenticated = true;
            s.session_token = Some(token);
        });
        tracing::debug!("auth: session restored");
        self.check_default_password().await;
        true
    }

    pub fn logout(&self) {
        self.state.send_replace(AuthState::default());
        if let Err(err) = self.storage.remove(&self.token_key) {
            tracing::warn!(error = %err, "auth: failed to clear session token");
        }
        tracing::info!("auth: logged out");
    }
}

impl SessionGate for AuthStore {
    fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }
}
