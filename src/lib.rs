//! Client-side state layer of the Tjimi console: form validation, pagination,
//! async action bookkeeping and the data stores that talk to the backend
//! through a [`bridge::CommandBridge`].

pub mod app;
pub mod bridge;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
mod shared;
pub mod stores;

pub use bridge::{CommandBridge, RemoteResult, TransportError};
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::{StoreError, StoreResult};
pub use shared::text::{mask_api_key, truncate_text};
