//! Collector families.
//!
//! A family reads one kind of host statistic and fans it out over the
//! instances the provider reports. Each family is registered once through
//! [`Catalog::register`] and then kept fresh by its own [`Sampler`] task.

mod catalog;
mod cpu;
mod load;
mod sampler;

pub use catalog::{Applied, Catalog};
pub use cpu::CpuFamily;
pub use load::LoadFamily;
pub use sampler::{Sampler, SamplerStats};

use epimetheus_core::Result;

/// One measured field of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub help: &'static str,
}

/// One reading for one instance.
///
/// `values` is aligned with [`Family::fields`]; `instance` is `None` for
/// single-instance families.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub instance: Option<String>,
    pub values: Vec<f64>,
}

/// A group of metrics sharing one statistics source and one cadence.
pub trait Family: Send + Sync {
    fn name(&self) -> &'static str;
    fn fields(&self) -> &'static [FieldSpec];
    /// Query the statistics provider once.
    fn read(&self) -> Result<Vec<Sample>>;
}
