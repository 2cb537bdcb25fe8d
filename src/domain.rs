//! Usage: Framework-free state controllers shared by every store.

pub mod async_action;
pub mod form;
pub mod modal;
pub mod pagination;
pub mod validation;
