//! nicstop configuration persistence (htoprc-style key=value format)
//!
//! Reads/writes `$XDG_CONFIG_HOME/nicstop/nicstoprc`, falling back to
//! `$HOME/.config/nicstop/nicstoprc`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::app::{App, InterfaceSortField};
use crate::system::filter::InterfaceFilter;
use crate::system::source::SourceKind;

pub const MIN_INTERVAL_MS: u64 = 100;
pub const MAX_INTERVAL_MS: u64 = 3_600_000;
pub const DEFAULT_HEADER_EVERY: usize = 20;

/// Default rc file location
pub fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("nicstop").join("nicstoprc"))
}

/// Persistable settings
#[derive(Debug, Clone, PartialEq)]
pub struct NicstopConfig {
    pub interval_ms: u64,
    pub skip_zero: bool,
    pub compact: bool,
    pub interfaces: Option<InterfaceFilter>,
    /// Reprint the line-mode header after this many rows, 0 = once
    pub header_every: usize,
    pub source: SourceKind,

    // TUI sorting
    pub sort_field: InterfaceSortField,
    pub sort_ascending: bool,
}

impl Default for NicstopConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            skip_zero: false,
            compact: false,
            interfaces: None,
            header_every: DEFAULT_HEADER_EVERY,
            source: SourceKind::Auto,
            sort_field: InterfaceSortField::Name,
            sort_ascending: true,
        }
    }
}

impl NicstopConfig {
    /// Load from `path` (or the default location), returning defaults if the file doesn't exist
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(config_path) {
            Some(p) => p,
            None => return Self::default(),
        };

        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded rc file");
                Self::parse(&content)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no rc file, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!(line, "ignoring rc line without '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "interval_ms" => match value.parse::<u64>() {
                    Ok(v) => cfg.interval_ms = v.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS),
                    Err(_) => warn!(key, value, "ignoring invalid rc value"),
                },
                "skip_zero" => cfg.skip_zero = value == "1",
                "compact" => cfg.compact = value == "1",
                "interfaces" => cfg.interfaces = InterfaceFilter::parse(value),
                "header_every" => match value.parse::<usize>() {
                    Ok(v) => cfg.header_every = v,
                    Err(_) => warn!(key, value, "ignoring invalid rc value"),
                },
                "source" => match value.parse::<SourceKind>() {
                    Ok(kind) => cfg.source = kind,
                    Err(e) => warn!(key, value, error = %e, "ignoring invalid rc value"),
                },
                "sort_field" => match value.parse::<usize>() {
                    Ok(idx) if idx < InterfaceSortField::all().len() => {
                        cfg.sort_field = InterfaceSortField::all()[idx];
                    }
                    _ => warn!(key, value, "ignoring invalid rc value"),
                },
                "sort_ascending" => cfg.sort_ascending = value == "1",
                _ => {} // Ignore unknown keys
            }
        }

        cfg
    }

    pub fn to_rc_string(&self) -> String {
        let b = |v: bool| if v { "1" } else { "0" };

        let sort_idx = InterfaceSortField::all()
            .iter()
            .position(|f| *f == self.sort_field)
            .unwrap_or(0);
        let interfaces = self
            .interfaces
            .as_ref()
            .map(|f| f.names().join(","))
            .unwrap_or_default();

        let lines = [
            "# nicstop configuration file".to_string(),
            String::new(),
            format!("interval_ms={}", self.interval_ms),
            format!("skip_zero={}", b(self.skip_zero)),
            format!("compact={}", b(self.compact)),
            format!("interfaces={}", interfaces),
            format!("header_every={}", self.header_every),
            format!("source={}", self.source),
            format!("sort_field={}", sort_idx),
            format!("sort_ascending={}", b(self.sort_ascending)),
        ];
        lines.join("\n") + "\n"
    }

    /// Save to `path` (or the default location)
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(config_path)
            .context("could not determine config path (set HOME or XDG_CONFIG_HOME)")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir {}", parent.display()))?;
        }
        fs::write(&path, self.to_rc_string())
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(path)
    }

    /// Copy the TUI-adjustable settings back from the App
    pub fn update_from_app(&mut self, app: &App) {
        self.skip_zero = app.skip_zero;
        self.compact = app.compact_mode;
        self.sort_field = app.sort_field;
        self.sort_ascending = app.sort_ascending;
    }

    pub fn apply_to(&self, app: &mut App) {
        app.skip_zero = self.skip_zero;
        app.compact_mode = self.compact;
        app.sort_field = self.sort_field;
        app.sort_ascending = self.sort_ascending;
        app.update_interval_ms = self.interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_known_keys() {
        let cfg = NicstopConfig::parse(
            "# comment\n\
             interval_ms=2500\n\
             skip_zero=1\n\
             compact = 1\n\
             interfaces=eth0, wlan0\n\
             header_every=0\n\
             source=sysinfo\n\
             sort_field=1\n\
             sort_ascending=0\n\
             colour=blue\n",
        );
        assert_eq!(cfg.interval_ms, 2500);
        assert!(cfg.skip_zero);
        assert!(cfg.compact);
        assert_eq!(cfg.interfaces.as_ref().map(|f| f.names()), Some(vec!["eth0", "wlan0"]));
        assert_eq!(cfg.header_every, 0);
        assert_eq!(cfg.source, SourceKind::Sysinfo);
        assert_eq!(cfg.sort_field, InterfaceSortField::all()[1]);
        assert!(!cfg.sort_ascending);
    }

    #[test]
    fn parse_ignores_bad_values() {
        let cfg = NicstopConfig::parse("interval_ms=fast\nsource=kstat\nsort_field=99\nheader_every=-1\nnoequals\n");
        assert_eq!(cfg, NicstopConfig::default());
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(NicstopConfig::parse("interval_ms=1").interval_ms, MIN_INTERVAL_MS);
        assert_eq!(NicstopConfig::parse("interval_ms=99999999").interval_ms, MAX_INTERVAL_MS);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("nicstoprc");

        let cfg = NicstopConfig {
            interval_ms: 500,
            skip_zero: true,
            interfaces: InterfaceFilter::parse("eth1,eth0"),
            source: SourceKind::Procfs,
            sort_field: InterfaceSortField::Utilization,
            sort_ascending: false,
            ..NicstopConfig::default()
        };
        let written = cfg.save(Some(&path)).unwrap();
        assert_eq!(written, path);

        assert_eq!(NicstopConfig::load(Some(&path)), cfg);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = NicstopConfig::load(Some(&dir.path().join("absent")));
        assert_eq!(cfg, NicstopConfig::default());
    }

    #[test]
    fn app_round_trip() {
        let mut app = App::new();
        let cfg = NicstopConfig { compact: true, skip_zero: true, ..NicstopConfig::default() };
        cfg.apply_to(&mut app);
        assert!(app.compact_mode);
        assert!(app.skip_zero);

        app.compact_mode = false;
        let mut back = cfg.clone();
        back.update_from_app(&app);
        assert!(!back.compact);
        assert!(back.skip_zero);
    }
}
