//! Usage: Gateway settings (retry count, outbound proxy).
//!
//! Unlike the list stores, every action hands its failure back to the caller
//! after recording it.
//!
//! Signed out, every action is a logged no-op: no backend call, no change to
//! values or status. It still returns `Err(StoreError::Unauthenticated)` so a
//! load never passes off a stale value as fresh; callers that only care about
//! backend failures can ignore that variant.

use super::auth::SessionGate;
use super::has_session;
use super::models::ProxySettings;
use crate::bridge::{self, commands, CommandBridge};
use crate::domain::async_action::{AsyncAction, AsyncStatus};
use crate::error::{StoreError, StoreResult};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_RETRY_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsValues {
    pub retry_count: u32,
    pub proxy: ProxySettings,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            retry_count: DEFAULT_RETRY_COUNT,
            proxy: ProxySettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub values: SettingsValues,
    pub status: AsyncStatus,
}

pub struct SettingsStore {
    bridge: Arc<dyn CommandBridge>,
    session: Arc<dyn SessionGate>,
    values: watch::Sender<SettingsValues>,
    action: AsyncAction,
}

impl SettingsStore {
    pub fn new(bridge: Arc<dyn CommandBridge>, session: Arc<dyn SessionGate>) -> Self {
        Self {
            bridge,
            session,
            values: watch::Sender::new(SettingsValues::default()),
            action: AsyncAction::new(),
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            values: self.values.borrow().clone(),
            status: self.action.status(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsValues> {
        self.values.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<AsyncStatus> {
        self.action.subscribe()
    }

    /// Signed out: `Err(Unauthenticated)` with nothing touched.
    pub async fn load_retry_count(&self) -> StoreResult<u32> {
        self.ensure_session("settings.load_retry_count")?;
        let count = self
            .action
            .execute(|| bridge::call::<u32>(&*self.bridge, commands::GET_RETRY_COUNT, commands::no_args()))
            .await
            .inspect_err(|err| tracing::error!(error = %err, "settings: failed to load retry count"))?;
        self.values.send_modify(|v| v.retry_count = count);
        Ok(count)
    }

    /// Signed out: `Err(Unauthenticated)` with nothing touched.
    pub async fn save_retry_count(&self, retry_count: u32) -> StoreResult<()> {
        self.ensure_session("settings.save_retry_count")?;
        self.action
            .execute(|| {
                bridge::call::<Value>(
                    &*self.bridge,
                    commands::SET_RETRY_COUNT,
                    commands::retry_count_args(retry_count),
                )
            })
            .await
            .inspect_err(|err| tracing::error!(error = %err, "settings: failed to save retry count"))?;
        // The backend floors the stored value at 1.
        self.values.send_modify(|v| v.retry_count = retry_count.max(1));
        tracing::info!(retry_count, "settings: retry count saved");
        Ok(())
    }

    /// Signed out: `Err(Unauthenticated)` with nothing touched.
    pub async fn load_proxy_settings(&self) -> StoreResult<ProxySettings> {
        self.ensure_session("settings.load_proxy_settings")?;
        let proxy = self
            .action
            .execute(|| {
                bridge::call::<ProxySettings>(
                    &*self.bridge,
                    commands::GET_PROXY_SETTINGS,
                    commands::no_args(),
                )
            })
            .await
            .inspect_err(|err| tracing::error!(error = %err, "settings: failed to load proxy settings"))?;
        self.values.send_modify(|v| v.proxy = proxy.clone());
        Ok(proxy)
    }

    /// Signed out: `Err(Unauthenticated)` with nothing touched.
    pub async fn save_proxy_settings(&self, settings: ProxySettings) -> StoreResult<()> {
        self.ensure_session("settings.save_proxy_settings")?;
        self.action
            .execute(|| {
                bridge::call::<Value>(
                    &*self.bridge,
                    commands::SET_PROXY_SETTINGS,
                    commands::settings_args(&settings),
                )
            })
            .await
            .inspect_err(|err| tracing::error!(error = %err, "settings: failed to save proxy settings"))?;
        tracing::info!(enabled = settings.enabled, host = %settings.host, port = settings.port, "settings: proxy saved");
        self.values.send_modify(|v| v.proxy = settings);
        Ok(())
    }

    pub fn reset(&self) {
        self.values.send_replace(SettingsValues::default());
        self.action.reset();
    }

    /// Logs the gap through `has_session`; the caller returns before any
    /// state is touched.
    fn ensure_session(&self, action: &'static str) -> StoreResult<()> {
        if has_session(&*self.session, action) {
            Ok(())
        } else {
            Err(StoreError::Unauthenticated)
        }
    }
}
