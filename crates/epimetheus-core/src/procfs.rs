//! Parsers for `/proc/stat` and `/proc/loadavg`.
//!
//! Pure functions over file content, so they are testable with string
//! inputs. Malformed content is reported as `Parse` errors.

use crate::error::{EpimetheusError, Result};
use crate::stats::{CpuTimes, LoadAvg};

/// Kernel clock ticks per second (`USER_HZ`), fixed at 100 on Linux.
pub const USER_HZ: f64 = 100.0;

/// Identity given to the aggregate `cpu` line of `/proc/stat`.
pub const AGGREGATE_CPU: &str = "cpu-total";

/// One `cpuN` (or aggregate `cpu`) line of `/proc/stat`, still in ticks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuLine {
    /// `None` for the aggregate line.
    pub cpu_id: Option<u32>,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
}

impl CpuLine {
    /// Convert ticks to seconds and attach the provider identity.
    pub fn to_times(&self) -> CpuTimes {
        let cpu = match self.cpu_id {
            Some(id) => format!("cpu{id}"),
            None => AGGREGATE_CPU.to_string(),
        };
        CpuTimes {
            cpu,
            user: self.user as f64 / USER_HZ,
            system: self.system as f64 / USER_HZ,
            idle: self.idle as f64 / USER_HZ,
            nice: self.nice as f64 / USER_HZ,
        }
    }
}

/// Parses the cpu lines of `/proc/stat` content, in file order.
///
/// Format: `cpu[N] user nice system idle iowait irq softirq ...`
pub fn parse_stat_cpus(content: &str) -> Result<Vec<CpuLine>> {
    let mut out = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(head) = parts.first() else { continue };
        if !head.starts_with("cpu") {
            continue;
        }

        let cpu_id = if *head == "cpu" {
            None
        } else {
            let id = head[3..]
                .parse()
                .map_err(|_| EpimetheusError::Parse(format!("invalid cpu label {head:?}")))?;
            Some(id)
        };

        if parts.len() < 5 {
            return Err(EpimetheusError::Parse(format!(
                "not enough fields for {head}: expected 4+, got {}",
                parts.len() - 1
            )));
        }

        let field = |idx: usize, name: &str| -> Result<u64> {
            parts[idx]
                .parse()
                .map_err(|_| EpimetheusError::Parse(format!("invalid {name} for {head}")))
        };

        out.push(CpuLine {
            cpu_id,
            user: field(1, "user")?,
            nice: field(2, "nice")?,
            system: field(3, "system")?,
            idle: field(4, "idle")?,
        });
    }

    if out.is_empty() {
        return Err(EpimetheusError::Parse("no cpu lines in stat".into()));
    }
    Ok(out)
}

/// Parses `/proc/loadavg` content.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(EpimetheusError::Parse("invalid loadavg format".into()));
    }

    let load = |idx: usize, name: &str| -> Result<f64> {
        parts[idx]
            .parse()
            .map_err(|_| EpimetheusError::Parse(format!("invalid {name}")))
    };

    Ok(LoadAvg {
        load1: load(0, "load1")?,
        load5: load(1, "load5")?,
        load15: load(2, "load15")?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const STAT: &str = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2550 130 760 20010 250 50 25 0 0 0
intr 123456 0 0
ctxt 987654
btime 1700000000
";

    #[test]
    fn parses_aggregate_and_per_cpu_lines() {
        let cpus = parse_stat_cpus(STAT).unwrap();
        assert_eq!(cpus.len(), 3);
        assert_eq!(cpus[0].cpu_id, None);
        assert_eq!(cpus[0].user, 10000);
        assert_eq!(cpus[1].cpu_id, Some(0));
        assert_eq!(cpus[2].cpu_id, Some(1));
        assert_eq!(cpus[2].idle, 20010);
    }

    #[test]
    fn ticks_convert_to_seconds() {
        let cpus = parse_stat_cpus(STAT).unwrap();
        let t = cpus[1].to_times();
        assert_eq!(t.cpu, "cpu0");
        assert_eq!(t.user, 25.0);
        assert_eq!(t.nice, 1.25);
        assert_eq!(t.system, 7.5);
        assert_eq!(t.idle, 200.0);
        assert_eq!(cpus[0].to_times().cpu, AGGREGATE_CPU);
    }

    #[test]
    fn short_cpu_line_is_rejected() {
        let err = parse_stat_cpus("cpu0 1 2\n").unwrap_err();
        assert_eq!(err.kind().as_str(), "PARSE");
    }

    #[test]
    fn stat_without_cpus_is_rejected() {
        assert!(parse_stat_cpus("intr 1 2 3\n").is_err());
    }

    #[test]
    fn parses_loadavg() {
        let load = parse_loadavg("0.15 0.10 0.05 1/150 1234\n").unwrap();
        assert_eq!(load.load1, 0.15);
        assert_eq!(load.load5, 0.10);
        assert_eq!(load.load15, 0.05);
    }

    #[test]
    fn garbage_loadavg_is_rejected() {
        assert!(parse_loadavg("").is_err());
        assert!(parse_loadavg("a b c 1/2 3").is_err());
    }
}
