//! Usage: Process-level setup for hosts embedding the console.

pub mod logging;
