use std::sync::Arc;

use epimetheus_core::procfs::AGGREGATE_CPU;
use epimetheus_core::stats::StatsProvider;
use epimetheus_core::Result;

use super::{Family, FieldSpec, Sample};

const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "user", help: "Seconds the CPU spent in user mode." },
    FieldSpec { name: "system", help: "Seconds the CPU spent in kernel mode." },
    FieldSpec { name: "idle", help: "Seconds the CPU spent idle." },
    FieldSpec { name: "nice", help: "Seconds the CPU spent in user mode at low priority." },
];

/// CPU time breakdown, one instance per logical CPU.
///
/// With `per_cpu` off only the aggregate record is reported, otherwise
/// every record except the aggregate.
pub struct CpuFamily {
    provider: Arc<dyn StatsProvider>,
    per_cpu: bool,
}

impl CpuFamily {
    pub fn new(provider: Arc<dyn StatsProvider>, per_cpu: bool) -> Self {
        Self { provider, per_cpu }
    }
}

impl Family for CpuFamily {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn read(&self) -> Result<Vec<Sample>> {
        let times = self.provider.cpu_times()?;
        Ok(times
            .into_iter()
            .filter(|t| (t.cpu == AGGREGATE_CPU) != self.per_cpu)
            .map(|t| Sample {
                instance: Some(t.cpu),
                values: vec![t.user, t.system, t.idle, t.nice],
            })
            .collect())
    }
}
