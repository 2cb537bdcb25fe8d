//! Usage: Errors crossing the command bridge.
//!
//! `Remote` and `Transport` both display as the bare message so the UI shows
//! them identically; match on the variant to tell them apart.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend answered `{success: false, error}`.
    #[error("{0}")]
    Remote(String),
    /// The invoke call itself failed.
    #[error("{0}")]
    Transport(String),
    #[error("invalid response for {command}: {message}")]
    Decode {
        command: &'static str,
        message: String,
    },
    #[error("not authenticated")]
    Unauthenticated,
}

pub type StoreResult<T> = Result<T, StoreError>;
