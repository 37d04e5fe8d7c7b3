//! Scripted statistics provider shared by agent integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use epimetheus_core::error::{EpimetheusError, Result};
use epimetheus_core::stats::{CpuTimes, LoadAvg, StatsProvider};

/// Replays queued responses in order; an exhausted script fails every call.
#[derive(Default)]
pub struct ScriptedProvider {
    load: Mutex<VecDeque<Result<LoadAvg>>>,
    cpu: Mutex<VecDeque<Result<Vec<CpuTimes>>>>,
    load_calls: AtomicUsize,
    cpu_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_load(&self, load1: f64, load5: f64, load15: f64) -> &Self {
        self.load.lock().unwrap().push_back(Ok(LoadAvg { load1, load5, load15 }));
        self
    }

    pub fn push_load_err(&self) -> &Self {
        self.load.lock().unwrap().push_back(Err(failure()));
        self
    }

    pub fn push_cpu(&self, cpus: Vec<CpuTimes>) -> &Self {
        self.cpu.lock().unwrap().push_back(Ok(cpus));
        self
    }

    pub fn push_cpu_err(&self) -> &Self {
        self.cpu.lock().unwrap().push_back(Err(failure()));
        self
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn cpu_calls(&self) -> usize {
        self.cpu_calls.load(Ordering::SeqCst)
    }
}

fn failure() -> EpimetheusError {
    EpimetheusError::Provider("scripted failure".into())
}

impl StatsProvider for ScriptedProvider {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>> {
        self.cpu_calls.fetch_add(1, Ordering::SeqCst);
        self.cpu
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EpimetheusError::Provider("script exhausted".into())))
    }

    fn load_avg(&self) -> Result<LoadAvg> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.load
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EpimetheusError::Provider("script exhausted".into())))
    }
}

pub fn cpu(name: &str, user: f64, system: f64, idle: f64, nice: f64) -> CpuTimes {
    CpuTimes { cpu: name.to_string(), user, system, idle, nice }
}

/// True when `body` has a line exactly equal to `line`.
pub fn has_line(body: &str, line: &str) -> bool {
    body.lines().any(|l| l == line)
}
