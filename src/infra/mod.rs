//! Infrastructure layer: adapters for config, storage, and OS integrations.

pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod os;
pub mod secrets;
pub mod session_store;
pub mod storage_layout;
#[cfg(test)]
pub mod stubs;
