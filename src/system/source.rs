use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::system::network::InterfaceSnapshot;
use crate::system::procfs::ProcNetSource;
use crate::system::sysinfo_source::SysinfoSource;

/// Errors raised while reading raw interface counters
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("counter source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Anything that can produce one snapshot per known interface per tick.
pub trait CounterSource {
    fn name(&self) -> &'static str;

    /// All snapshots from one call share a single timestamp.
    fn fetch(&mut self) -> Result<Vec<InterfaceSnapshot>, SourceError>;
}

/// Monotonic seconds since construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    pub fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Which counter source to use (`--source`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    Auto,
    Procfs,
    Sysinfo,
}

impl SourceKind {
    pub fn all() -> &'static [SourceKind] {
        &[SourceKind::Auto, SourceKind::Procfs, SourceKind::Sysinfo]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Auto => "auto",
            SourceKind::Procfs => "procfs",
            SourceKind::Sysinfo => "sysinfo",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceKind::Auto),
            "procfs" | "proc" => Ok(SourceKind::Procfs),
            "sysinfo" => Ok(SourceKind::Sysinfo),
            other => Err(format!("unknown counter source '{}' (expected auto, procfs or sysinfo)", other)),
        }
    }
}

/// Build the requested counter source. `Auto` prefers procfs when it exists.
pub fn open_source(kind: SourceKind) -> Result<Box<dyn CounterSource>, SourceError> {
    let source: Box<dyn CounterSource> = match kind {
        SourceKind::Procfs => Box::new(ProcNetSource::new()?),
        SourceKind::Sysinfo => Box::new(SysinfoSource::new()),
        SourceKind::Auto => {
            if ProcNetSource::available() {
                Box::new(ProcNetSource::new()?)
            } else {
                Box::new(SysinfoSource::new())
            }
        }
    };
    debug!(requested = %kind, selected = source.name(), "counter source opened");
    Ok(source)
}
