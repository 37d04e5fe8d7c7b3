//! epimetheus core: metric naming, the gauge registry, host statistics
//! records and their procfs parsers.
//!
//! This crate carries no runtime or transport dependencies so the agent,
//! tests and tooling can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `EpimetheusError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod naming;
pub mod procfs;
pub mod registry;
pub mod stats;

/// Shared result type.
pub use error::{EpimetheusError, ErrorKind, Result};
pub use naming::{metric_key, MetricKey};
pub use registry::{Gauge, GaugeSpec, Registry};
pub use stats::{CpuTimes, LoadAvg, StatsProvider};
