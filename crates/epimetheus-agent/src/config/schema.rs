use std::net::SocketAddr;
use std::time::Duration;

use epimetheus_core::error::{EpimetheusError, Result};
use serde::Deserialize;

const INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=3_600_000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub collectors: CollectorsSection,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(EpimetheusError::UnsupportedVersion);
        }

        self.agent.validate()?;
        check_interval("collectors.load.interval_ms", self.collectors.load.interval_ms)?;
        check_interval("collectors.cpu.interval_ms", self.collectors.cpu.interval_ms)?;

        Ok(())
    }
}

fn check_interval(name: &str, ms: u64) -> Result<()> {
    if !INTERVAL_RANGE_MS.contains(&ms) {
        return Err(EpimetheusError::Config(format!(
            "{name} must be between {} and {}",
            INTERVAL_RANGE_MS.start(),
            INTERVAL_RANGE_MS.end()
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_procfs_root")]
    pub procfs_root: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            procfs_root: default_procfs_root(),
        }
    }
}

impl AgentSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.procfs_root.is_empty() {
            return Err(EpimetheusError::Config("agent.procfs_root must not be empty".into()));
        }
        Ok(())
    }

    /// Parse `listen`. A bare `:port` binds every interface.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let addr = match self.listen.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.listen.clone(),
        };
        addr.parse().map_err(|e| {
            EpimetheusError::Config(format!("agent.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_procfs_root() -> String {
    "/proc".into()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CollectorsSection {
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub cpu: CpuConfig,
}

/// Load family; critical by default.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub critical: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            critical: true,
            interval_ms: default_interval_ms(),
        }
    }
}

impl LoadConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// CPU family; failure only disables the family by default.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpuConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub critical: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_true")]
    pub per_cpu: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            critical: false,
            interval_ms: default_interval_ms(),
            per_cpu: true,
        }
    }
}

impl CpuConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_true() -> bool {
    true
}
fn default_interval_ms() -> u64 {
    5000
}
