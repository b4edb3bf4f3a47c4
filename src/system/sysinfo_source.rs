use sysinfo::Networks;

use crate::system::network::InterfaceSnapshot;
use crate::system::source::{CounterSource, MonotonicClock, SourceError};

/// Portable counter source using the `sysinfo` crate.
///
/// sysinfo exposes byte and packet totals only: link speed is reported as
/// unknown (utilization 0) and saturation as 0.
pub struct SysinfoSource {
    networks: Networks,
    clock: MonotonicClock,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            clock: MonotonicClock::new(),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SysinfoSource {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn fetch(&mut self) -> Result<Vec<InterfaceSnapshot>, SourceError> {
        // true = drop interfaces that went away
        self.networks.refresh(true);
        let timestamp = self.clock.now_secs();

        let snapshots = self
            .networks
            .iter()
            .map(|(name, data)| InterfaceSnapshot {
                name: name.clone(),
                read_bytes: data.total_received(),
                write_bytes: data.total_transmitted(),
                read_packets: data.total_packets_received(),
                write_packets: data.total_packets_transmitted(),
                speed: 0,
                saturation_events: 0,
                timestamp,
            })
            .collect();
        Ok(snapshots)
    }
}
