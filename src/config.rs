//! Usage: Console configuration persisted as JSON (`console.json`).

use crate::domain::pagination::PaginationOptions;
use crate::stores::request_logs::DEFAULT_LOG_LIMIT;
use crate::stores::session::DEFAULT_SESSION_TOKEN_KEY;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 7;
const MAX_LOG_RETENTION_DAYS: u32 = 3650;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleConfig {
    pub schema_version: u32,
    pub api_keys_pagination: PaginationOptions,
    pub logs_pagination: PaginationOptions,
    pub log_fetch_limit: u32,
    pub session_token_key: String,
    pub log_retention_days: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            api_keys_pagination: PaginationOptions::default(),
            logs_pagination: PaginationOptions::default(),
            log_fetch_limit: DEFAULT_LOG_LIMIT,
            session_token_key: DEFAULT_SESSION_TOKEN_KEY.to_string(),
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
        }
    }
}

impl ConsoleConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config: file missing, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
        if config.schema_version > SCHEMA_VERSION {
            tracing::warn!(
                schema_version = config.schema_version,
                supported = SCHEMA_VERSION,
                "config: newer schema version, unknown fields are ignored"
            );
        }
        Ok(config.normalized())
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
            }
        }
        let mut config = self.clone().normalized();
        config.schema_version = SCHEMA_VERSION;
        let bytes = serde_json::to_vec_pretty(&config)
            .map_err(|e| format!("failed to serialize config: {e}"))?;
        std::fs::write(path, bytes).map_err(|e| format!("failed to write {}: {e}", path.display()))
    }

    pub fn normalized(mut self) -> Self {
        self.api_keys_pagination = self.api_keys_pagination.normalized();
        self.logs_pagination = self.logs_pagination.normalized();
        if self.log_fetch_limit == 0 {
            self.log_fetch_limit = DEFAULT_LOG_LIMIT;
        }
        if self.session_token_key.trim().is_empty() {
            self.session_token_key = DEFAULT_SESSION_TOKEN_KEY.to_string();
        }
        self.log_retention_days = self.log_retention_days.clamp(1, MAX_LOG_RETENTION_DAYS);
        self
    }
}
