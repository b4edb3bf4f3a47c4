use tracing::{debug, warn};

use crate::app::App;
use crate::system::engine::{Outcome, RateEngine};
use crate::system::filter::InterfaceFilter;
use crate::system::network::{DerivedMetrics, NetworkTotals};
use crate::system::source::{CounterSource, SourceError};

/// Result of one polling tick
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    /// Rows to render, sorted by interface name
    pub rows: Vec<DerivedMetrics>,
    /// Interfaces in the raw snapshot
    pub seen: usize,
    pub filtered: usize,
    pub bootstrapped: usize,
    pub stalled: usize,
    /// Rows dropped by skip-zero
    pub suppressed: usize,
}

/// Drives one tick: fetch counters, apply the allow-list, run the rate
/// engine, then apply the skip-zero presentation filter.
pub struct Collector {
    source: Box<dyn CounterSource>,
    engine: RateEngine,
    filter: Option<InterfaceFilter>,
    skip_zero: bool,
}

impl Collector {
    pub fn new(source: Box<dyn CounterSource>, filter: Option<InterfaceFilter>, skip_zero: bool) -> Self {
        Self {
            source,
            engine: RateEngine::new(),
            filter,
            skip_zero,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn engine(&self) -> &RateEngine {
        &self.engine
    }

    pub fn filter(&self) -> Option<&InterfaceFilter> {
        self.filter.as_ref()
    }

    /// Only affects what is rendered; engine state is untouched
    pub fn set_skip_zero(&mut self, skip_zero: bool) {
        self.skip_zero = skip_zero;
    }

    pub fn tick(&mut self) -> Result<TickReport, SourceError> {
        let snapshots = self.source.fetch()?;

        let mut report = TickReport {
            seen: snapshots.len(),
            ..TickReport::default()
        };

        for snap in snapshots {
            match self.engine.step(snap, self.filter.as_ref()) {
                Outcome::Filtered => report.filtered += 1,
                Outcome::Bootstrap => report.bootstrapped += 1,
                Outcome::Stalled { .. } => report.stalled += 1,
                Outcome::Emitted(metrics) => {
                    if self.skip_zero && metrics.suppressible {
                        report.suppressed += 1;
                    } else {
                        report.rows.push(metrics);
                    }
                }
            }
        }

        report.rows.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            seen = report.seen,
            rows = report.rows.len(),
            filtered = report.filtered,
            bootstrapped = report.bootstrapped,
            stalled = report.stalled,
            suppressed = report.suppressed,
            "tick complete"
        );
        Ok(report)
    }

    /// Run a tick and populate the App (TUI mode)
    pub fn refresh(&mut self, app: &mut App) {
        if app.paused {
            return;
        }
        // Keep the TUI toggle authoritative
        self.set_skip_zero(app.skip_zero);

        match self.tick() {
            Ok(report) => {
                app.totals = NetworkTotals::from_rows(&report.rows);
                app.interfaces_seen = report.seen - report.filtered;
                app.suppressed = report.suppressed;
                app.rows = report.rows;
                app.last_error = None;
                app.sort_rows();
                app.clamp_selection();
            }
            Err(e) => {
                warn!(error = %e, "counter fetch failed, skipping tick");
                app.last_error = Some(e.to_string());
            }
        }
        app.last_update = Some(chrono::Local::now());
        app.tick += 1;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::system::network::InterfaceSnapshot;

    /// Replays a fixed list of fetch results
    pub(crate) struct ScriptedSource {
        ticks: VecDeque<Result<Vec<InterfaceSnapshot>, SourceError>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(ticks: Vec<Result<Vec<InterfaceSnapshot>, SourceError>>) -> Self {
            Self { ticks: ticks.into() }
        }
    }

    impl CounterSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn fetch(&mut self) -> Result<Vec<InterfaceSnapshot>, SourceError> {
            self.ticks
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::Unavailable("script exhausted".into())))
        }
    }

    pub(crate) fn snap(name: &str, read_bytes: u64, write_bytes: u64, t: f64) -> InterfaceSnapshot {
        InterfaceSnapshot {
            name: name.to_string(),
            read_bytes,
            write_bytes,
            read_packets: read_bytes / 100,
            write_packets: write_bytes / 100,
            speed: 1_000_000_000,
            saturation_events: 0,
            timestamp: t,
        }
    }

    fn script() -> Vec<Result<Vec<InterfaceSnapshot>, SourceError>> {
        vec![
            Ok(vec![snap("eth0", 0, 0, 0.0), snap("lo", 0, 0, 0.0)]),
            Ok(vec![snap("lo", 0, 0, 1.0), snap("eth0", 2048, 1024, 1.0)]),
            Ok(vec![snap("eth0", 2048, 1024, 2.0), snap("lo", 512, 0, 2.0), snap("wlan0", 0, 0, 2.0)]),
        ]
    }

    #[test]
    fn first_tick_emits_nothing() {
        let mut c = Collector::new(Box::new(ScriptedSource::new(script())), None, false);
        let report = c.tick().unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.bootstrapped, 2);
        assert_eq!(c.engine().store().len(), 2);
    }

    #[test]
    fn rows_are_sorted_by_name() {
        let mut c = Collector::new(Box::new(ScriptedSource::new(script())), None, false);
        c.tick().unwrap();
        let report = c.tick().unwrap();
        let names: Vec<&str> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "lo"]);
        assert_eq!(report.rows[0].read_kbps, 2.0);
    }

    #[test]
    fn skip_zero_drops_idle_rows() {
        let mut c = Collector::new(Box::new(ScriptedSource::new(script())), None, true);
        c.tick().unwrap();
        let report = c.tick().unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "eth0");
        assert_eq!(report.suppressed, 1);

        let report = c.tick().unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "lo");
        assert_eq!(report.bootstrapped, 1);
    }

    #[test]
    fn suppression_never_changes_engine_state() {
        let mut plain = Collector::new(Box::new(ScriptedSource::new(script())), None, false);
        let mut skipping = Collector::new(Box::new(ScriptedSource::new(script())), None, true);

        for _ in 0..3 {
            plain.tick().unwrap();
            skipping.tick().unwrap();
            for name in ["eth0", "lo", "wlan0"] {
                assert_eq!(plain.engine().store().get(name), skipping.engine().store().get(name));
            }
        }
    }

    #[test]
    fn allow_list_keeps_others_out_of_the_store() {
        let filter = InterfaceFilter::parse("eth0");
        let mut c = Collector::new(Box::new(ScriptedSource::new(script())), filter, false);
        c.tick().unwrap();
        let report = c.tick().unwrap();
        assert_eq!(report.filtered, 1);
        assert_eq!(report.rows.len(), 1);
        assert!(c.engine().store().get("lo").is_none());
    }

    #[test]
    fn fetch_error_leaves_state_alone() {
        let ticks = vec![
            Ok(vec![snap("eth0", 0, 0, 0.0)]),
            Err(SourceError::Unavailable("boom".into())),
            Ok(vec![snap("eth0", 4096, 0, 2.0)]),
        ];
        let mut c = Collector::new(Box::new(ScriptedSource::new(ticks)), None, false);
        c.tick().unwrap();
        assert!(c.tick().is_err());
        assert_eq!(c.engine().store().get("eth0").map(|s| s.timestamp), Some(0.0));

        let report = c.tick().unwrap();
        assert_eq!(report.rows[0].read_kbps, 2.0);
    }

    #[test]
    fn refresh_fills_app_and_honours_pause() {
        let mut c = Collector::new(Box::new(ScriptedSource::new(script())), None, false);
        let mut app = App::new();

        c.refresh(&mut app);
        assert!(app.rows.is_empty());
        assert_eq!(app.tick, 1);

        c.refresh(&mut app);
        assert_eq!(app.rows.len(), 2);
        assert_eq!(app.totals.read_kbps, 2.0);
        assert_eq!(app.interfaces_seen, 2);

        app.paused = true;
        c.refresh(&mut app);
        assert_eq!(app.tick, 2);
    }

    #[test]
    fn refresh_follows_app_skip_zero_toggle() {
        let mut c = Collector::new(Box::new(ScriptedSource::new(script())), None, false);
        let mut app = App::new();
        c.refresh(&mut app);

        app.skip_zero = true;
        c.refresh(&mut app);
        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.rows[0].name, "eth0");
        assert_eq!(app.suppressed, 1);
    }

    #[test]
    fn refresh_records_fetch_errors() {
        let mut c = Collector::new(Box::new(ScriptedSource::new(vec![])), None, false);
        let mut app = App::new();
        c.refresh(&mut app);
        assert!(app.last_error.as_deref().unwrap_or("").contains("script exhausted"));
    }
}
