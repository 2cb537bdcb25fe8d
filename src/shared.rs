//! Usage: Small helpers shared across modules.

pub(crate) mod mutex_ext;
pub mod text;
