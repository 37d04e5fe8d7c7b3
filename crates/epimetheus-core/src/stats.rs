//! Host statistics records and the provider contract.

use crate::error::Result;

/// Cumulative CPU time of one logical CPU (or the aggregate), in seconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuTimes {
    /// Raw identity as reported by the provider, e.g. `cpu0` or `cpu-total`.
    pub cpu: String,
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
}

/// System load averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadAvg {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Source of host statistics.
///
/// Calls are synchronous and expected to be fast. The number of CPU records
/// may change between calls; the field set never does.
pub trait StatsProvider: Send + Sync {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>>;
    fn load_avg(&self) -> Result<LoadAvg>;
}
