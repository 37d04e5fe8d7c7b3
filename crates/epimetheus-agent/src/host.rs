//! Host statistics read from procfs.

use std::fs;
use std::path::{Path, PathBuf};

use epimetheus_core::error::{EpimetheusError, Result};
use epimetheus_core::procfs::{parse_loadavg, parse_stat_cpus};
use epimetheus_core::stats::{CpuTimes, LoadAvg, StatsProvider};

/// [`StatsProvider`] backed by `<root>/stat` and `<root>/loadavg`.
///
/// Reports the aggregate CPU record first (as `cpu-total`), then one record
/// per logical CPU.
#[derive(Debug, Clone)]
pub struct ProcfsProvider {
    root: PathBuf,
}

impl ProcfsProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path)
            .map_err(|e| EpimetheusError::Provider(format!("read {} failed: {e}", path.display())))
    }
}

impl Default for ProcfsProvider {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl StatsProvider for ProcfsProvider {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>> {
        let content = self.read("stat")?;
        Ok(parse_stat_cpus(&content)?.iter().map(|c| c.to_times()).collect())
    }

    fn load_avg(&self) -> Result<LoadAvg> {
        parse_loadavg(&self.read("loadavg")?)
    }
}
