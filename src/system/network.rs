/// One interface's cumulative counters at a point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceSnapshot {
    pub name: String,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_packets: u64,
    pub write_packets: u64,
    /// Nominal link speed in bits/s, 0 = unknown
    pub speed: u64,
    /// Sum of whichever buffer/defer/no-buffer counters the source exposes
    pub saturation_events: u64,
    /// Monotonic seconds, same origin for every snapshot of one source
    pub timestamp: f64,
}

impl InterfaceSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Rates derived from two snapshots of the same interface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedMetrics {
    pub name: String,
    pub read_kbps: f64,
    pub write_kbps: f64,
    pub read_pktps: f64,
    pub write_pktps: f64,
    /// Bytes per packet
    pub read_avg_size: f64,
    pub write_avg_size: f64,
    /// 0..=100
    pub utilization_pct: f64,
    pub saturation_per_sec: f64,
    /// No bytes moved in either direction this interval
    pub suppressible: bool,
}

/// Aggregate rates across the rows of one tick (TUI header)
#[derive(Debug, Clone, Default)]
pub struct NetworkTotals {
    pub read_kbps: f64,
    pub write_kbps: f64,
    pub read_pktps: f64,
    pub write_pktps: f64,
    pub interfaces: usize,
}

impl NetworkTotals {
    pub fn from_rows(rows: &[DerivedMetrics]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.read_kbps += row.read_kbps;
            acc.write_kbps += row.write_kbps;
            acc.read_pktps += row.read_pktps;
            acc.write_pktps += row.write_pktps;
            acc.interfaces += 1;
            acc
        })
    }
}

/// Format a KB/s rate to a short human-readable string (K, M, G)
pub fn format_kbps(kbps: f64) -> String {
    const MIB: f64 = 1024.0;
    const GIB: f64 = 1024.0 * MIB;

    let abs = kbps.abs();
    if abs >= GIB {
        format!("{:.1}G/s", kbps / GIB)
    } else if abs >= MIB {
        format!("{:.1}M/s", kbps / MIB)
    } else {
        format!("{:.1}K/s", kbps)
    }
}
