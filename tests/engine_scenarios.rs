//! End-to-end: scripted counter source → collector → line reporter.

use std::collections::VecDeque;

use chrono::NaiveTime;
use nicstop::report::{ReportStyle, Reporter};
use nicstop::system::collector::Collector;
use nicstop::system::engine::RateEngine;
use nicstop::system::filter::InterfaceFilter;
use nicstop::system::network::InterfaceSnapshot;
use nicstop::system::source::{CounterSource, SourceError};

struct Replay(VecDeque<Vec<InterfaceSnapshot>>);

impl CounterSource for Replay {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn fetch(&mut self) -> Result<Vec<InterfaceSnapshot>, SourceError> {
        self.0
            .pop_front()
            .ok_or_else(|| SourceError::Unavailable("no more samples".into()))
    }
}

fn eth(name: &str, rb: u64, wb: u64, rp: u64, wp: u64, speed: u64, t: f64) -> InterfaceSnapshot {
    InterfaceSnapshot {
        name: name.to_string(),
        read_bytes: rb,
        write_bytes: wb,
        read_packets: rp,
        write_packets: wp,
        speed,
        saturation_events: 0,
        timestamp: t,
    }
}

#[test]
fn engine_contract_first_then_rates() {
    let mut engine = RateEngine::new();
    let prior = eth("eth0", 1000, 500, 10, 5, 1_000_000_000, 0.0);
    assert!(engine.evaluate(prior.clone(), None).is_none());
    assert_eq!(engine.store().get("eth0"), Some(&prior));

    let m = engine
        .evaluate(eth("eth0", 2024, 1012, 20, 10, 1_000_000_000, 1.0), None)
        .expect("second sample emits");
    assert!((m.read_kbps - 1.0).abs() < 1e-9);
    assert!((m.write_kbps - 0.5).abs() < 1e-9);
    assert!((m.read_avg_size - 102.4).abs() < 1e-9);
}

#[test]
fn pipeline_renders_only_emitted_rows() {
    let samples = VecDeque::from(vec![
        vec![eth("eth0", 0, 0, 0, 0, 0, 0.0), eth("lo", 0, 0, 0, 0, 0, 0.0)],
        vec![eth("eth0", 4096, 2048, 4, 2, 0, 2.0), eth("lo", 0, 0, 0, 0, 0, 2.0)],
    ]);
    let mut collector = Collector::new(Box::new(Replay(samples)), None, true);
    let mut reporter = Reporter::new(Vec::new(), ReportStyle::Full, true, 20);
    let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();

    let baseline = collector.tick().unwrap();
    reporter.render(time, &baseline.rows).unwrap();
    let second = collector.tick().unwrap();
    reporter.render(time, &second.rows).unwrap();

    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2, "header plus eth0, lo suppressed: {:?}", lines);
    assert_eq!(
        lines[1].split_whitespace().collect::<Vec<_>>(),
        vec!["08:30:00", "eth0", "2.00", "1.00", "2.00", "1.00", "1024.00", "1024.00", "0.00", "0.00"]
    );

    // exhausted source surfaces as an error, not a panic
    assert!(collector.tick().is_err());
}

#[test]
fn allow_list_limits_rows() {
    let samples = VecDeque::from(vec![
        vec![eth("eth0", 0, 0, 0, 0, 0, 0.0), eth("eth1", 0, 0, 0, 0, 0, 0.0)],
        vec![eth("eth0", 1024, 0, 1, 0, 0, 1.0), eth("eth1", 1024, 0, 1, 0, 0, 1.0)],
    ]);
    let filter = InterfaceFilter::parse("eth1");
    let mut collector = Collector::new(Box::new(Replay(samples)), filter, false);
    collector.tick().unwrap();
    let report = collector.tick().unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].name, "eth1");
    assert!(collector.engine().store().get("eth0").is_none());
}
