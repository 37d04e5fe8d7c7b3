//! epimetheus agent library entry.
//!
//! Wires the collector families, the procfs statistics provider and the
//! scrape endpoint together. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod collectors;
pub mod config;
pub mod host;
pub mod logging;
pub mod ops;
pub mod router;
