//! Usage: Owns one instance of every store for a signed-in console session.

use crate::bridge::CommandBridge;
use crate::config::ConsoleConfig;
use crate::stores::{
    ApiKeysStore, AuthStore, RequestLogsStore, SessionGate, SettingsStore, TokenStorage,
};
use std::sync::Arc;

pub struct Console {
    pub auth: Arc<AuthStore>,
    pub api_keys: ApiKeysStore,
    pub request_logs: RequestLogsStore,
    pub settings: SettingsStore,
}

impl Console {
    pub fn new(
        bridge: Arc<dyn CommandBridge>,
        storage: Arc<dyn TokenStorage>,
        config: &ConsoleConfig,
    ) -> Self {
        let auth = Arc::new(AuthStore::new(
            bridge.clone(),
            storage,
            config.session_token_key.clone(),
        ));
        let session: Arc<dyn SessionGate> = auth.clone();
        Self {
            api_keys: ApiKeysStore::new(
                bridge.clone(),
                session.clone(),
                config.api_keys_pagination.clone(),
            ),
            request_logs: RequestLogsStore::new(
                bridge.clone(),
                session.clone(),
                config.logs_pagination.clone(),
                config.log_fetch_limit,
            ),
            settings: SettingsStore::new(bridge, session),
            auth,
        }
    }

    /// Restores a persisted session, if any.
    pub async fn start(&self) -> bool {
        self.auth.load_session().await
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Ends the session and drops everything fetched under it.
    pub fn logout(&self) {
        self.auth.logout();
        self.api_keys.reset();
        self.request_logs.reset();
        self.settings.reset();
    }
}
