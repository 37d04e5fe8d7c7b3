use std::sync::Arc;

use epimetheus_core::stats::StatsProvider;
use epimetheus_core::Result;

use super::{Family, FieldSpec, Sample};

const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "1", help: "Load average over the last minute" },
    FieldSpec { name: "5", help: "Load average over the last five minutes" },
    FieldSpec { name: "15", help: "Load average over the last 15 minutes" },
];

/// System load averages: one implicit instance, fields `1`, `5`, `15`.
pub struct LoadFamily {
    provider: Arc<dyn StatsProvider>,
}

impl LoadFamily {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }
}

impl Family for LoadFamily {
    fn name(&self) -> &'static str {
        "load"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn read(&self) -> Result<Vec<Sample>> {
        let load = self.provider.load_avg()?;
        Ok(vec![Sample {
            instance: None,
            values: vec![load.load1, load.load5, load.load15],
        }])
    }
}
