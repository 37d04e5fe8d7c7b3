//! Gauge primitive and the registry that owns every gauge.
//!
//! Gauges store `f64` bits in an `AtomicU64`, so a scrape racing a sampler
//! sees either the old or the new value. The registry is keyed by
//! [`MetricKey`] and backed by `DashMap`; it is only written during family
//! registration and only read afterwards.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{EpimetheusError, Result};
use crate::naming::MetricKey;

/// Last-write-wins numeric cell.
#[derive(Debug)]
pub struct Gauge {
    bits: AtomicU64,
}

impl Gauge {
    pub fn new(v: f64) -> Self {
        Self { bits: AtomicU64::new(v.to_bits()) }
    }

    pub fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// One gauge to be registered: key, help text and seed value.
#[derive(Debug, Clone)]
pub struct GaugeSpec {
    pub key: MetricKey,
    pub help: String,
    pub initial: f64,
}

struct Registered {
    help: String,
    gauge: Arc<Gauge>,
}

/// Point-in-time view of one gauge, used for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSample {
    pub name: String,
    pub help: String,
    pub value: f64,
}

/// All gauges of the process, keyed by metric name.
#[derive(Default)]
pub struct Registry {
    gauges: DashMap<MetricKey, Registered>,
}

impl Registry {
    pub fn new() -> Self {
        Self { gauges: DashMap::new() }
    }

    /// Register a batch of gauges atomically.
    ///
    /// Either every spec gets a fresh gauge (returned in input order) or the
    /// registry is left exactly as it was. A key that is already present, or
    /// that appears twice in `specs`, yields `DuplicateMetric`.
    pub fn register_all(&self, specs: Vec<GaugeSpec>) -> Result<Vec<Arc<Gauge>>> {
        let mut inserted: Vec<MetricKey> = Vec::with_capacity(specs.len());
        let mut handles = Vec::with_capacity(specs.len());

        for spec in specs {
            let taken = match self.gauges.entry(spec.key.clone()) {
                Entry::Occupied(_) => true,
                Entry::Vacant(slot) => {
                    let gauge = Arc::new(Gauge::new(spec.initial));
                    slot.insert(Registered { help: spec.help, gauge: Arc::clone(&gauge) });
                    handles.push(gauge);
                    false
                }
            };

            // shard guard from `entry` is released here; rollback may touch the same shard
            if taken {
                for k in &inserted {
                    self.gauges.remove(k);
                }
                return Err(EpimetheusError::DuplicateMetric(spec.key.to_string()));
            }
            inserted.push(spec.key);
        }

        Ok(handles)
    }

    /// Register a single gauge.
    pub fn register(&self, spec: GaugeSpec) -> Result<Arc<Gauge>> {
        self.register_all(vec![spec])?
            .pop()
            .ok_or_else(|| EpimetheusError::Internal("empty registration result".into()))
    }

    /// Current value of a gauge, if registered.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.gauges.get(key).map(|e| e.value().gauge.get())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.gauges.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Read every gauge, sorted by name.
    pub fn snapshot(&self) -> Vec<GaugeSample> {
        let mut out: Vec<GaugeSample> = self
            .gauges
            .iter()
            .map(|r| GaugeSample {
                name: r.key().to_string(),
                help: r.value().help.clone(),
                value: r.value().gauge.get(),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, out: &mut String) {
        for s in self.snapshot() {
            if !s.help.is_empty() {
                let _ = writeln!(out, "# HELP {} {}", s.name, escape_help(&s.help));
            }
            let _ = writeln!(out, "# TYPE {} gauge", s.name);
            let _ = writeln!(out, "{} {}", s.name, format_value(s.value));
        }
    }
}

/// Helper to escape help text.
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a sample value the way Prometheus parses it.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::naming::metric_key;

    fn spec(name: &str, v: f64) -> GaugeSpec {
        GaugeSpec { key: metric_key("t", None, name).unwrap(), help: String::new(), initial: v }
    }

    #[test]
    fn gauge_is_last_write_wins() {
        let g = Gauge::default();
        assert_eq!(g.get(), 0.0);
        g.set(1.25);
        g.set(-3.5);
        assert_eq!(g.get(), -3.5);
    }

    #[test]
    fn register_seeds_initial_value() {
        let reg = Registry::new();
        let g = reg.register(spec("a", 4.0)).unwrap();
        assert_eq!(reg.value("t_a"), Some(4.0));
        g.set(5.0);
        assert_eq!(reg.value("t_a"), Some(5.0));
    }

    #[test]
    fn duplicate_key_fails_and_keeps_original() {
        let reg = Registry::new();
        reg.register(spec("a", 1.0)).unwrap();
        let err = reg.register(spec("a", 2.0)).unwrap_err();
        assert_eq!(err.kind().as_str(), "DUPLICATE_METRIC");
        assert_eq!(reg.value("t_a"), Some(1.0));
    }

    #[test]
    fn failed_batch_rolls_back() {
        let reg = Registry::new();
        reg.register(spec("c", 9.0)).unwrap();
        let err = reg
            .register_all(vec![spec("a", 1.0), spec("b", 2.0), spec("c", 3.0)])
            .unwrap_err();
        assert_eq!(err.kind().as_str(), "DUPLICATE_METRIC");
        assert!(!reg.contains("t_a"));
        assert!(!reg.contains("t_b"));
        assert_eq!(reg.value("t_c"), Some(9.0));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_within_batch_rolls_back() {
        let reg = Registry::new();
        assert!(reg.register_all(vec![spec("a", 1.0), spec("a", 2.0)]).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn render_is_sorted_and_typed() {
        let reg = Registry::new();
        reg.register(GaugeSpec {
            key: metric_key("load", None, "5").unwrap(),
            help: "five".into(),
            initial: 2.0,
        })
        .unwrap();
        reg.register(GaugeSpec {
            key: metric_key("load", None, "1").unwrap(),
            help: "one".into(),
            initial: 1.5,
        })
        .unwrap();

        let mut out = String::new();
        reg.render(&mut out);
        assert_eq!(
            out,
            "# HELP load_1 one\n# TYPE load_1 gauge\nload_1 1.5\n\
             # HELP load_5 five\n# TYPE load_5 gauge\nload_5 2\n"
        );
    }

    #[test]
    fn special_values_use_prometheus_spelling() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.1), "0.1");
    }
}
