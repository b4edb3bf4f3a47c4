//! Rate derivation: turns consecutive cumulative-counter snapshots of an
//! interface into per-second rates, utilization and saturation.
//!
//! Counter deltas are taken as signed differences. A counter that goes
//! backwards (reset, 32-bit wrap at the source) therefore shows up as a
//! negative rate instead of being hidden; the counter width is not known
//! here, so wrap correction is left to the source.

use tracing::debug;

use crate::system::filter::InterfaceFilter;
use crate::system::network::{DerivedMetrics, InterfaceSnapshot};
use crate::system::store::SampleStore;

const BYTES_PER_KB: f64 = 1024.0;
const BITS_PER_BYTE: f64 = 8.0;
const MAX_UTILIZATION_PCT: f64 = 100.0;

/// What happened to one interface snapshot during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Not in the allow-list; nothing evaluated or stored
    Filtered,
    /// First sighting; stored as the baseline
    Bootstrap,
    /// Elapsed time since the prior snapshot was <= 0; stored, nothing emitted
    Stalled { elapsed: f64 },
    Emitted(DerivedMetrics),
}

impl Outcome {
    pub fn into_metrics(self) -> Option<DerivedMetrics> {
        match self {
            Outcome::Emitted(m) => Some(m),
            _ => None,
        }
    }
}

/// Stateful rate engine. Owns the per-interface prior snapshots.
#[derive(Debug, Default)]
pub struct RateEngine {
    store: SampleStore,
}

impl RateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Evaluate one interface against its prior snapshot.
    ///
    /// Unless filtered out, `current` always becomes the new prior,
    /// whether or not a row is produced.
    pub fn step(&mut self, current: InterfaceSnapshot, filter: Option<&InterfaceFilter>) -> Outcome {
        if let Some(filter) = filter {
            if !filter.allows(&current.name) {
                return Outcome::Filtered;
            }
        }

        let outcome = match self.store.get(&current.name) {
            None => {
                debug!(interface = %current.name, "bootstrap sample");
                Outcome::Bootstrap
            }
            Some(prior) => match derive(prior, &current) {
                Some(metrics) => Outcome::Emitted(metrics),
                None => {
                    let elapsed = current.timestamp - prior.timestamp;
                    debug!(interface = %current.name, elapsed, "non-advancing sample, skipped");
                    Outcome::Stalled { elapsed }
                }
            },
        };

        self.store.put(current.name.clone(), current);
        outcome
    }

    pub fn evaluate(
        &mut self,
        current: InterfaceSnapshot,
        filter: Option<&InterfaceFilter>,
    ) -> Option<DerivedMetrics> {
        self.step(current, filter).into_metrics()
    }
}

/// Pure rate computation between two snapshots of the same interface.
/// Returns None when no time has passed (or the clock went backwards).
pub fn derive(prior: &InterfaceSnapshot, current: &InterfaceSnapshot) -> Option<DerivedMetrics> {
    let elapsed = current.timestamp - prior.timestamp;
    if elapsed.is_nan() || elapsed <= 0.0 {
        return None;
    }

    let delta = |cur: u64, prev: u64| cur as f64 - prev as f64;

    let read_bps = delta(current.read_bytes, prior.read_bytes) / elapsed;
    let write_bps = delta(current.write_bytes, prior.write_bytes) / elapsed;
    let read_pktps = delta(current.read_packets, prior.read_packets) / elapsed;
    let write_pktps = delta(current.write_packets, prior.write_packets) / elapsed;

    let read_avg_size = if read_pktps > 0.0 { read_bps / read_pktps } else { 0.0 };
    let write_avg_size = if write_pktps > 0.0 { write_bps / write_pktps } else { 0.0 };

    // Unknown speed: utilization can't be measured, report 0
    let utilization_pct = if current.speed > 0 {
        let pct = (read_bps + write_bps) * BITS_PER_BYTE * 100.0 / current.speed as f64;
        pct.min(MAX_UTILIZATION_PCT)
    } else {
        0.0
    };

    let saturation_per_sec = delta(current.saturation_events, prior.saturation_events) / elapsed;

    Some(DerivedMetrics {
        name: current.name.clone(),
        read_kbps: read_bps / BYTES_PER_KB,
        write_kbps: write_bps / BYTES_PER_KB,
        read_pktps,
        write_pktps,
        read_avg_size,
        write_avg_size,
        utilization_pct,
        saturation_per_sec,
        suppressible: read_bps + write_bps == 0.0,
    })
}
