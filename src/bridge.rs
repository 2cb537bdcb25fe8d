//! Usage: Command bridge contract (the `invoke()` boundary to the backend).
//!
//! The backend answers every command with a JSON envelope
//! `{"success": bool, "data": T?, "error": string?}`. Transport and
//! serialization are owned by the bridge implementation.

pub mod commands;
#[cfg(test)]
pub(crate) mod testing;

use crate::error::{StoreError, StoreResult};
use futures_core::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

pub trait CommandBridge: Send + Sync {
    fn invoke<'a>(
        &'a self,
        command: &'static str,
        args: Value,
    ) -> BoxFuture<'a, Result<Value, TransportError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResult<T> {
    Success(T),
    Failure(String),
}

#[derive(Debug, Deserialize, Serialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

impl<T> RemoteResult<T> {
    pub fn into_result(self) -> StoreResult<T> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(message) => Err(StoreError::Remote(message)),
        }
    }
}

impl<T: DeserializeOwned> RemoteResult<T> {
    /// Decodes an envelope. A failure without a message keeps an empty string;
    /// callers decide on the user-facing fallback.
    pub fn from_value(raw: Value) -> Result<Self, String> {
        let envelope: Envelope =
            serde_json::from_value(raw).map_err(|e| format!("malformed envelope: {e}"))?;
        if !envelope.success {
            return Ok(Self::Failure(envelope.error.unwrap_or_default()));
        }
        serde_json::from_value(envelope.data)
            .map(Self::Success)
            .map_err(|e| format!("unexpected data: {e}"))
    }
}

impl<T: Serialize> RemoteResult<T> {
    pub fn to_value(&self) -> Value {
        let envelope = match self {
            Self::Success(data) => Envelope {
                success: true,
                data: serde_json::to_value(data).unwrap_or(Value::Null),
                error: None,
            },
            Self::Failure(message) => Envelope {
                success: false,
                data: Value::Null,
                error: Some(message.clone()),
            },
        };
        serde_json::to_value(envelope).unwrap_or(Value::Null)
    }
}

/// Invokes `command` and decodes the envelope into `RemoteResult<T>`.
pub async fn invoke<T: DeserializeOwned>(
    bridge: &dyn CommandBridge,
    command: &'static str,
    args: Value,
) -> StoreResult<RemoteResult<T>> {
    tracing::debug!(command, "bridge: invoke");
    let raw = bridge
        .invoke(command, args)
        .await
        .map_err(|e| StoreError::Transport(e.0))?;
    RemoteResult::from_value(raw).map_err(|message| StoreError::Decode { command, message })
}

/// Like [`invoke`], folding a `{success: false}` answer into `StoreError::Remote`.
pub async fn call<T: DeserializeOwned>(
    bridge: &dyn CommandBridge,
    command: &'static str,
    args: Value,
) -> StoreResult<T> {
    invoke::<T>(bridge, command, args).await?.into_result()
}
