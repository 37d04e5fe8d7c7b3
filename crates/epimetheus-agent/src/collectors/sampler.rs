use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::Instrument;

use epimetheus_core::Result;

use super::{Applied, Catalog, Family};

/// Cycle counters of one sampler, rendered on `/metrics`.
#[derive(Debug)]
pub struct SamplerStats {
    family: &'static str,
    success: AtomicU64,
    failures: AtomicU64,
}

impl SamplerStats {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            success: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn success(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Background loop keeping one family's gauges fresh.
pub struct Sampler {
    family: Arc<dyn Family>,
    catalog: Catalog,
    interval: Duration,
    stats: Arc<SamplerStats>,
}

impl Sampler {
    pub fn new(family: Arc<dyn Family>, catalog: Catalog, interval: Duration) -> Self {
        let stats = Arc::new(SamplerStats::new(catalog.family()));
        Self { family, catalog, interval, stats }
    }

    pub fn stats(&self) -> Arc<SamplerStats> {
        Arc::clone(&self.stats)
    }

    /// Run one cycle: read, then write into the registered gauges.
    ///
    /// A failed read leaves every gauge untouched.
    pub fn sample_once(&self) -> Result<Applied> {
        match self.family.read() {
            Ok(samples) => {
                let applied = self.catalog.apply(&samples);
                self.stats.success.fetch_add(1, Ordering::Relaxed);
                Ok(applied)
            }
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Sample every `interval` until `shutdown` turns true or its sender is
    /// dropped. The first cycle runs one interval after start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let family = self.catalog.family();
        let mut tick = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(family, interval_ms = self.interval.as_millis() as u64, "sampler started");

        if *shutdown.borrow() {
            return;
        }

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match self.sample_once() {
                        Ok(applied) if applied.ignored > 0 => {
                            tracing::debug!(family, ignored = applied.ignored, "values for unregistered instances ignored");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(family, error = %e, "sample failed, keeping last values");
                        }
                    }
                }

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!(family, "sampler stopped");
    }

    /// Spawn [`Sampler::run`] on the current runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let span = tracing::info_span!("sampler", family = self.catalog.family());
        tokio::spawn(self.run(shutdown).instrument(span))
    }
}
