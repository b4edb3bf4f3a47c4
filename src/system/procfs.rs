//! Linux counter source: `/proc/net/dev` for cumulative counters,
//! `/sys/class/net/<iface>/speed` for the nominal link speed.
//!
//! `/proc/net/dev` layout (after two header lines), per interface:
//!   name: rx_bytes rx_packets rx_errs rx_drop rx_fifo rx_frame rx_compressed rx_multicast
//!         tx_bytes tx_packets tx_errs tx_drop tx_fifo tx_colls tx_carrier tx_compressed

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::system::network::InterfaceSnapshot;
use crate::system::source::{CounterSource, MonotonicClock, SourceError};

pub const PROC_NET_DEV: &str = "/proc/net/dev";
pub const SYS_CLASS_NET: &str = "/sys/class/net";

const FIELD_COUNT: usize = 16;
const RX_BYTES: usize = 0;
const RX_PACKETS: usize = 1;
const RX_DROP: usize = 3;
const RX_FIFO: usize = 4;
const TX_BYTES: usize = 8;
const TX_PACKETS: usize = 9;
const TX_DROP: usize = 11;
const TX_FIFO: usize = 12;

/// sysfs reports Mb/s
const BITS_PER_MBIT: u64 = 1_000_000;

pub struct ProcNetSource {
    proc_net_dev: PathBuf,
    sys_class_net: PathBuf,
    clock: MonotonicClock,
}

impl ProcNetSource {
    pub fn available() -> bool {
        Path::new(PROC_NET_DEV).is_file()
    }

    pub fn new() -> Result<Self, SourceError> {
        if !Self::available() {
            return Err(SourceError::Unavailable(format!("{} not found", PROC_NET_DEV)));
        }
        Ok(Self::with_paths(PROC_NET_DEV, SYS_CLASS_NET))
    }

    pub fn with_paths(proc_net_dev: impl Into<PathBuf>, sys_class_net: impl Into<PathBuf>) -> Self {
        Self {
            proc_net_dev: proc_net_dev.into(),
            sys_class_net: sys_class_net.into(),
            clock: MonotonicClock::new(),
        }
    }

    /// Link speed in bits/s, 0 when sysfs has no usable value
    /// (virtual interfaces, links that are down report -1 or EINVAL).
    fn link_speed(&self, name: &str) -> u64 {
        let path = self.sys_class_net.join(name).join("speed");
        match fs::read_to_string(&path) {
            Ok(raw) => parse_speed_mbits(&raw).map(|m| m * BITS_PER_MBIT).unwrap_or(0),
            Err(_) => 0,
        }
    }
}

impl CounterSource for ProcNetSource {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn fetch(&mut self) -> Result<Vec<InterfaceSnapshot>, SourceError> {
        let content = fs::read_to_string(&self.proc_net_dev)
            .map_err(|e| SourceError::io(&self.proc_net_dev, e))?;
        let timestamp = self.clock.now_secs();

        let mut snapshots = parse_proc_net_dev(&content);
        for snap in &mut snapshots {
            snap.speed = self.link_speed(&snap.name);
            snap.timestamp = timestamp;
        }
        Ok(snapshots)
    }
}

/// Parse `/proc/net/dev` content. Speed and timestamp are left at 0.
pub fn parse_proc_net_dev(content: &str) -> Vec<InterfaceSnapshot> {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<InterfaceSnapshot> {
    // Header lines contain '|' and no ':'
    let (name, rest) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let fields: Vec<u64> = match rest
        .split_whitespace()
        .map(str::parse::<u64>)
        .collect::<Result<_, _>>()
    {
        Ok(f) => f,
        Err(e) => {
            debug!(interface = name, error = %e, "skipping malformed /proc/net/dev line");
            return None;
        }
    };
    if fields.len() < FIELD_COUNT {
        debug!(interface = name, fields = fields.len(), "skipping short /proc/net/dev line");
        return None;
    }

    Some(InterfaceSnapshot {
        name: name.to_string(),
        read_bytes: fields[RX_BYTES],
        write_bytes: fields[TX_BYTES],
        read_packets: fields[RX_PACKETS],
        write_packets: fields[TX_PACKETS],
        speed: 0,
        saturation_events: [RX_DROP, RX_FIFO, TX_DROP, TX_FIFO]
            .iter()
            .fold(0u64, |sum, &i| sum.saturating_add(fields[i])),
        timestamp: 0.0,
    })
}

fn parse_speed_mbits(raw: &str) -> Option<u64> {
    let mbits: i64 = raw.trim().parse().ok()?;
    u64::try_from(mbits).ok().filter(|&m| m > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  123456     789    0    0    0     0          0         0   123456     789    0    0    0     0       0          0
  eth0: 98765432  65432    1    2    3     0          0        12 12345678  23456    0    4    5     6       0          0
wlan0:0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
";

    #[test]
    fn parses_interfaces_and_skips_headers() {
        let snaps = parse_proc_net_dev(SAMPLE);
        let names: Vec<&str> = snaps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["lo", "eth0", "wlan0"]);

        let eth0 = &snaps[1];
        assert_eq!(eth0.read_bytes, 98_765_432);
        assert_eq!(eth0.read_packets, 65_432);
        assert_eq!(eth0.write_bytes, 12_345_678);
        assert_eq!(eth0.write_packets, 23_456);
        // rx drop + rx fifo + tx drop + tx fifo; errs and colls excluded
        assert_eq!(eth0.saturation_events, 2 + 3 + 4 + 5);
        assert_eq!(eth0.speed, 0);
    }

    #[test]
    fn skips_malformed_lines() {
        let content = "eth0: 1 2 3\nbad: x y z 1 2 3 4 5 6 7 8 9 10 11 12 13\n: 1 2\n";
        assert!(parse_proc_net_dev(content).is_empty());
    }

    #[test]
    fn huge_drop_counters_saturate() {
        let half = u64::MAX / 2;
        let line = format!("eth0: 1 1 0 {half} {half} 0 0 0 1 1 0 {half} 0 0 0 0");
        let snaps = parse_proc_net_dev(&line);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].saturation_events, u64::MAX);
    }

    #[test]
    fn speed_values() {
        assert_eq!(parse_speed_mbits("1000\n"), Some(1000));
        assert_eq!(parse_speed_mbits("-1\n"), None);
        assert_eq!(parse_speed_mbits("0"), None);
        assert_eq!(parse_speed_mbits("garbage"), None);
    }

    #[test]
    fn fetch_reads_counters_and_link_speed() {
        let dir = tempfile::tempdir().unwrap();
        let dev = dir.path().join("dev");
        fs::write(&dev, SAMPLE).unwrap();

        let sys = dir.path().join("class_net");
        fs::create_dir_all(sys.join("eth0")).unwrap();
        fs::write(sys.join("eth0").join("speed"), "1000\n").unwrap();
        fs::create_dir_all(sys.join("wlan0")).unwrap();
        fs::write(sys.join("wlan0").join("speed"), "-1\n").unwrap();

        let mut source = ProcNetSource::with_paths(&dev, &sys);
        let snaps = source.fetch().unwrap();
        assert_eq!(snaps.len(), 3);

        let speed = |n: &str| snaps.iter().find(|s| s.name == n).map(|s| s.speed);
        assert_eq!(speed("eth0"), Some(1_000_000_000));
        assert_eq!(speed("wlan0"), Some(0));
        assert_eq!(speed("lo"), Some(0));

        let t = snaps[0].timestamp;
        assert!(snaps.iter().all(|s| s.timestamp == t));

        let later = source.fetch().unwrap();
        assert!(later[0].timestamp >= t);
    }

    #[test]
    fn fetch_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ProcNetSource::with_paths(dir.path().join("nope"), dir.path());
        match source.fetch() {
            Err(SourceError::Io { path, .. }) => assert!(path.ends_with("nope")),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
