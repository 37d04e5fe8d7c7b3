//! Naming + registry + rendering, end to end.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use epimetheus_core::naming::metric_key;
use epimetheus_core::registry::{GaugeSpec, Registry};

fn gauge(family: &str, instance: Option<&str>, field: &str, v: f64) -> GaugeSpec {
    GaugeSpec {
        key: metric_key(family, instance, field).unwrap(),
        help: String::new(),
        initial: v,
    }
}

fn lines(reg: &Registry) -> Vec<String> {
    let mut out = String::new();
    reg.render(&mut out);
    out.lines().filter(|l| !l.starts_with('#')).map(str::to_string).collect()
}

#[test]
fn load_scenario_renders_bare_names() {
    let reg = Registry::new();
    reg.register_all(vec![
        gauge("load", None, "1", 1.0),
        gauge("load", None, "5", 2.0),
        gauge("load", None, "15", 3.0),
    ])
    .unwrap();

    assert_eq!(lines(&reg), ["load_1 1", "load_15 3", "load_5 2"]);
}

#[test]
fn cpu_scenario_strips_hyphens() {
    let reg = Registry::new();
    reg.register_all(vec![
        gauge("cpu", Some("cpu-0"), "user", 1.5),
        gauge("cpu", Some("cpu-1"), "user", 2.5),
    ])
    .unwrap();

    assert_eq!(lines(&reg), ["cpu_cpu0_user 1.5", "cpu_cpu1_user 2.5"]);
}

#[test]
fn second_family_with_same_key_is_refused() {
    let reg = Registry::new();
    reg.register(gauge("load", None, "1", 1.0)).unwrap();

    let err = reg
        .register_all(vec![gauge("load", None, "5", 5.0), gauge("load", None, "1", 7.0)])
        .unwrap_err();
    assert_eq!(err.kind().as_str(), "DUPLICATE_METRIC");
    assert_eq!(lines(&reg), ["load_1 1"]);
}

#[test]
fn concurrent_reads_see_whole_values() {
    let reg = Arc::new(Registry::new());
    let g = reg.register(gauge("t", None, "v", 0.0)).unwrap();

    let reader = {
        let reg = Arc::clone(&reg);
        thread::spawn(move || {
            for _ in 0..10_000 {
                let v = reg.value("t_v").unwrap();
                assert!(v == 0.0 || v == 1.0 / 3.0 || v == -7.25, "torn value {v}");
            }
        })
    };

    for i in 0..10_000 {
        g.set(if i % 2 == 0 { 1.0 / 3.0 } else { -7.25 });
    }
    reader.join().unwrap();
}
