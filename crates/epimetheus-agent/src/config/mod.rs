//! Agent config loader (strict parsing).

pub mod schema;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use epimetheus_core::error::{EpimetheusError, Result};

pub use schema::{AgentConfig, AgentSection, CollectorsSection, CpuConfig, LoadConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "EPIMETHEUS_CONFIG";

pub fn load_from_file(path: &Path) -> Result<AgentConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| EpimetheusError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AgentConfig> {
    let cfg: AgentConfig = serde_yaml::from_str(s)
        .map_err(|e| EpimetheusError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Default search locations, in priority order.
pub fn candidate_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/etc/epimetheus/config.yaml"),
        PathBuf::from("/usr/local/etc/epimetheus/config.yaml"),
    ];
    if let Some(home) = home {
        paths.push(home.join("epimetheus").join("config.yaml"));
    }
    paths
}

/// Pick the config file: `explicit` if given, else the first existing candidate.
pub fn resolve_path(explicit: Option<PathBuf>, candidates: &[PathBuf]) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p);
    }
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            EpimetheusError::Config(format!("no config file found (searched: {})", searched.join(", ")))
        })
}

/// Locate and load the config from `$EPIMETHEUS_CONFIG` or the default paths.
pub fn load() -> Result<(PathBuf, AgentConfig)> {
    let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let home = env::var_os("HOME").map(PathBuf::from);
    let path = resolve_path(explicit, &candidate_paths(home.as_deref()))?;
    let cfg = load_from_file(&path)?;
    Ok((path, cfg))
}
