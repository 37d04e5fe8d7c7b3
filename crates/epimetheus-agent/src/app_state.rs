//! Shared application state for the epimetheus agent.
//!
//! Startup registers every enabled family into a fresh [`Registry`] and
//! spawns its sampler. Errors are explicit (Result instead of panic) so
//! main can refuse to bind when a critical family is missing.

use std::fmt::Write;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use epimetheus_core::error::Result;
use epimetheus_core::registry::Registry;
use epimetheus_core::stats::StatsProvider;

use crate::collectors::{Catalog, CpuFamily, Family, LoadFamily, Sampler, SamplerStats};
use crate::config::CollectorsSection;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<Registry>,
    samplers: Vec<Arc<SamplerStats>>,
    disabled: Vec<&'static str>,
}

struct Planned {
    family: Arc<dyn Family>,
    interval: Duration,
    critical: bool,
}

/// Running sampler tasks plus the sender that stops them.
pub struct SamplerHandles {
    pub shutdown: watch::Sender<bool>,
    pub tasks: Vec<JoinHandle<()>>,
}

impl SamplerHandles {
    /// Signal every sampler and wait for them to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        for t in self.tasks {
            let _ = t.await;
        }
    }
}

impl AppState {
    /// Register the enabled families (load first, then cpu) and start their
    /// samplers on the current runtime.
    ///
    /// A critical family that fails to register aborts startup; any other
    /// failure only disables that family.
    pub fn start(
        cfg: &CollectorsSection,
        provider: Arc<dyn StatsProvider>,
    ) -> Result<(Self, SamplerHandles)> {
        let mut planned = Vec::new();
        if cfg.load.enabled {
            planned.push(Planned {
                family: Arc::new(LoadFamily::new(Arc::clone(&provider))),
                interval: cfg.load.interval(),
                critical: cfg.load.critical,
            });
        }
        if cfg.cpu.enabled {
            planned.push(Planned {
                family: Arc::new(CpuFamily::new(Arc::clone(&provider), cfg.cpu.per_cpu)),
                interval: cfg.cpu.interval(),
                critical: cfg.cpu.critical,
            });
        }

        let registry = Arc::new(Registry::new());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::new();
        let mut samplers = Vec::new();
        let mut disabled = Vec::new();

        for p in planned {
            let name = p.family.name();
            match Catalog::register(p.family.as_ref(), &registry) {
                Ok(catalog) => {
                    let sampler = Sampler::new(p.family, catalog, p.interval);
                    samplers.push(sampler.stats());
                    tasks.push(sampler.spawn(shutdown_rx.clone()));
                }
                Err(e) if p.critical => {
                    tracing::error!(family = name, error = %e, "critical family failed to register");
                    for t in &tasks {
                        t.abort();
                    }
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(family = name, error = %e, "family disabled");
                    disabled.push(name);
                }
            }
        }

        let state = Self {
            inner: Arc::new(AppStateInner { registry, samplers, disabled }),
        };
        Ok((state, SamplerHandles { shutdown, tasks }))
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn sampler_stats(&self) -> &[Arc<SamplerStats>] {
        &self.inner.samplers
    }

    /// Families that failed to register and are not reported.
    pub fn disabled_families(&self) -> &[&'static str] {
        &self.inner.disabled
    }

    /// Render the registry plus the agent's own counters.
    pub fn render_metrics(&self) -> String {
        let mut out = String::new();
        self.inner.registry.render(&mut out);

        let _ = writeln!(out, "# TYPE epimetheus_sample_success_total counter");
        for s in &self.inner.samplers {
            let _ = writeln!(
                out,
                "epimetheus_sample_success_total{{family=\"{}\"}} {}",
                s.family(),
                s.success()
            );
        }
        let _ = writeln!(out, "# TYPE epimetheus_sample_failures_total counter");
        for s in &self.inner.samplers {
            let _ = writeln!(
                out,
                "epimetheus_sample_failures_total{{family=\"{}\"}} {}",
                s.family(),
                s.failures()
            );
        }
        let _ = writeln!(out, "# TYPE epimetheus_up gauge\nepimetheus_up 1");
        out
    }
}
