use std::collections::HashMap;
use std::sync::Arc;

use epimetheus_core::error::{EpimetheusError, Result};
use epimetheus_core::naming::{metric_key, MetricKey};
use epimetheus_core::registry::{Gauge, GaugeSpec, Registry};

use super::{Family, FieldSpec, Sample};

/// Outcome of applying one read to a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub updated: usize,
    /// Values whose key was not registered at startup (late instances).
    pub ignored: usize,
}

/// Gauge handles of one registered family, keyed by metric name.
pub struct Catalog {
    family: &'static str,
    fields: &'static [FieldSpec],
    gauges: HashMap<MetricKey, Arc<Gauge>>,
}

impl Catalog {
    /// Read the family once and register one gauge per (instance, field),
    /// seeded with that read.
    ///
    /// All-or-nothing: on any error nothing of this family stays in
    /// `registry`. Errors are wrapped as `Registration` for the caller.
    pub fn register(family: &dyn Family, registry: &Registry) -> Result<Self> {
        let name = family.name();
        let fields = family.fields();

        let samples = family
            .read()
            .map_err(|e| EpimetheusError::registration(name, e))?;
        let specs = build_specs(name, fields, &samples)
            .map_err(|e| EpimetheusError::registration(name, e))?;

        let keys: Vec<MetricKey> = specs.iter().map(|s| s.key.clone()).collect();
        let handles = registry
            .register_all(specs)
            .map_err(|e| EpimetheusError::registration(name, e))?;

        tracing::info!(family = name, gauges = handles.len(), "family registered");

        Ok(Self {
            family: name,
            fields,
            gauges: keys.into_iter().zip(handles).collect(),
        })
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.gauges.contains_key(key)
    }

    /// Write a fresh read into the registered gauges.
    ///
    /// Keys are derived exactly as at registration; anything without a
    /// registered gauge is skipped.
    pub fn apply(&self, samples: &[Sample]) -> Applied {
        let mut applied = Applied::default();

        for sample in samples {
            for (field, v) in self.fields.iter().zip(&sample.values) {
                let gauge = metric_key(self.family, sample.instance.as_deref(), field.name)
                    .ok()
                    .and_then(|k| self.gauges.get(&k));
                match gauge {
                    Some(g) => {
                        g.set(*v);
                        applied.updated += 1;
                    }
                    None => applied.ignored += 1,
                }
            }
        }

        applied
    }
}

fn build_specs(family: &str, fields: &[FieldSpec], samples: &[Sample]) -> Result<Vec<GaugeSpec>> {
    if samples.is_empty() {
        return Err(EpimetheusError::Provider("first read reported no instances".into()));
    }

    let mut specs = Vec::with_capacity(samples.len() * fields.len());
    for sample in samples {
        if sample.values.len() != fields.len() {
            return Err(EpimetheusError::Internal(format!(
                "{family}: sample has {} values for {} fields",
                sample.values.len(),
                fields.len()
            )));
        }
        for (field, v) in fields.iter().zip(&sample.values) {
            specs.push(GaugeSpec {
                key: metric_key(family, sample.instance.as_deref(), field.name)?,
                help: field.help.to_string(),
                initial: *v,
            });
        }
    }
    Ok(specs)
}
