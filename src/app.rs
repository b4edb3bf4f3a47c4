use std::cmp::Ordering;

use chrono::{DateTime, Local};

use crate::system::network::{DerivedMetrics, NetworkTotals};

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Column the interface table is sorted by (`<` / `>` cycle, `I` inverts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceSortField {
    Name,
    ReadKbps,
    WriteKbps,
    ReadPktps,
    WritePktps,
    Utilization,
    Saturation,
}

impl InterfaceSortField {
    pub fn all() -> &'static [InterfaceSortField] {
        &[
            InterfaceSortField::Name,
            InterfaceSortField::ReadKbps,
            InterfaceSortField::WriteKbps,
            InterfaceSortField::ReadPktps,
            InterfaceSortField::WritePktps,
            InterfaceSortField::Utilization,
            InterfaceSortField::Saturation,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterfaceSortField::Name => "Int",
            InterfaceSortField::ReadKbps => "rKB/s",
            InterfaceSortField::WriteKbps => "wKB/s",
            InterfaceSortField::ReadPktps => "rPk/s",
            InterfaceSortField::WritePktps => "wPk/s",
            InterfaceSortField::Utilization => "%Util",
            InterfaceSortField::Saturation => "Sat",
        }
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    fn compare(&self, a: &DerivedMetrics, b: &DerivedMetrics) -> Ordering {
        let num = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match self {
            InterfaceSortField::Name => a.name.cmp(&b.name),
            InterfaceSortField::ReadKbps => num(a.read_kbps, b.read_kbps),
            InterfaceSortField::WriteKbps => num(a.write_kbps, b.write_kbps),
            InterfaceSortField::ReadPktps => num(a.read_pktps, b.read_pktps),
            InterfaceSortField::WritePktps => num(a.write_pktps, b.write_pktps),
            InterfaceSortField::Utilization => num(a.utilization_pct, b.utilization_pct),
            InterfaceSortField::Saturation => num(a.saturation_per_sec, b.saturation_per_sec),
        }
    }
}

/// TUI state
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,
    pub paused: bool,       // Space/p: freeze updates

    // Latest tick
    pub rows: Vec<DerivedMetrics>,
    pub totals: NetworkTotals,
    pub interfaces_seen: usize,
    pub suppressed: usize,
    pub last_error: Option<String>,
    pub last_update: Option<DateTime<Local>>,

    // Static labels for the header
    pub source_name: &'static str,
    pub filter_label: Option<String>,

    // Table state
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,

    // Sorting
    pub sort_field: InterfaceSortField,
    pub sort_ascending: bool,

    // Display options
    pub skip_zero: bool,
    pub compact_mode: bool,
    pub update_interval_ms: u64,

    /// W key: main loop writes the rc file and clears this
    pub save_requested: bool,
    pub status_message: Option<String>,

    pub tick: u64,
}

impl App {
    pub fn new() -> Self {
        Self {
            mode: AppMode::Normal,
            should_quit: false,
            paused: false,

            rows: Vec::new(),
            totals: NetworkTotals::default(),
            interfaces_seen: 0,
            suppressed: 0,
            last_error: None,
            last_update: None,

            source_name: "",
            filter_label: None,

            selected_index: 0,
            scroll_offset: 0,
            visible_rows: 20,

            sort_field: InterfaceSortField::Name,
            sort_ascending: true,

            skip_zero: false,
            compact_mode: false,
            update_interval_ms: 1000,

            save_requested: false,
            status_message: None,

            tick: 0,
        }
    }

    /// Sort rows by the active column. Ties fall back to the name so the
    /// order is stable between ticks.
    pub fn sort_rows(&mut self) {
        let field = self.sort_field;
        let ascending = self.sort_ascending;
        self.rows.sort_by(|a, b| {
            let ord = field.compare(a, b).then_with(|| a.name.cmp(&b.name));
            if ascending { ord } else { ord.reverse() }
        });
    }

    /// Pick a sort column. Selecting the active one again inverts the order.
    pub fn set_sort_field(&mut self, field: InterfaceSortField) {
        if self.sort_field == field {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_field = field;
            // Names read best A-Z, rates biggest first
            self.sort_ascending = field == InterfaceSortField::Name;
        }
        self.sort_rows();
    }

    pub fn invert_sort(&mut self) {
        self.sort_ascending = !self.sort_ascending;
        self.sort_rows();
    }

    pub fn toggle_skip_zero(&mut self) {
        self.skip_zero = !self.skip_zero;
    }

    pub fn toggle_compact(&mut self) {
        self.compact_mode = !self.compact_mode;
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            if self.selected_index < self.scroll_offset {
                self.scroll_offset = self.selected_index;
            }
        }
    }

    pub fn select_next(&mut self) {
        let max = self.rows.len().saturating_sub(1);
        if self.selected_index < max {
            self.selected_index += 1;
            if self.selected_index >= self.scroll_offset + self.visible_rows {
                self.scroll_offset = self.selected_index + 1 - self.visible_rows;
            }
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.selected_index = self.rows.len() - 1;
            if self.selected_index >= self.visible_rows {
                self.scroll_offset = self.selected_index + 1 - self.visible_rows;
            }
        }
    }

    /// Keep selection inside the row list after it shrinks
    pub fn clamp_selection(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            self.selected_index = 0;
            self.scroll_offset = 0;
            return;
        }
        if self.selected_index >= len {
            self.selected_index = len - 1;
        }
        if self.scroll_offset > self.selected_index {
            self.scroll_offset = self.selected_index;
        }
    }

    pub fn selected_row(&self) -> Option<&DerivedMetrics> {
        self.rows.get(self.selected_index)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, read_kbps: f64, util: f64) -> DerivedMetrics {
        DerivedMetrics {
            name: name.to_string(),
            read_kbps,
            utilization_pct: util,
            ..DerivedMetrics::default()
        }
    }

    fn names(app: &App) -> Vec<&str> {
        app.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn sort_by_rate_descending_with_name_tiebreak() {
        let mut app = App::new();
        app.rows = vec![row("wlan0", 1.0, 0.0), row("eth1", 5.0, 0.0), row("eth0", 1.0, 0.0)];

        app.set_sort_field(InterfaceSortField::ReadKbps);
        assert!(!app.sort_ascending);
        assert_eq!(names(&app), vec!["eth1", "wlan0", "eth0"]);

        app.invert_sort();
        assert_eq!(names(&app), vec!["eth0", "wlan0", "eth1"]);
    }

    #[test]
    fn reselecting_field_inverts() {
        let mut app = App::new();
        app.rows = vec![row("b", 0.0, 1.0), row("a", 0.0, 2.0)];
        app.set_sort_field(InterfaceSortField::Name);
        assert!(!app.sort_ascending);
        assert_eq!(names(&app), vec!["b", "a"]);
    }

    #[test]
    fn sort_field_cycles() {
        let last = *InterfaceSortField::all().last().unwrap();
        assert_eq!(last.next(), InterfaceSortField::Name);
        assert_eq!(InterfaceSortField::Name.prev(), last);
        assert_eq!(InterfaceSortField::Name.next(), InterfaceSortField::ReadKbps);
    }

    #[test]
    fn selection_is_clamped_when_rows_shrink() {
        let mut app = App::new();
        app.visible_rows = 2;
        app.rows = (0..5).map(|i| row(&format!("eth{}", i), 0.0, 0.0)).collect();
        app.select_last();
        assert_eq!(app.selected_index, 4);
        assert_eq!(app.scroll_offset, 3);

        app.rows.truncate(2);
        app.clamp_selection();
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.scroll_offset, 1);
        assert_eq!(app.selected_row().map(|r| r.name.as_str()), Some("eth1"));
    }

    #[test]
    fn navigation_scrolls() {
        let mut app = App::new();
        app.visible_rows = 2;
        app.rows = (0..4).map(|i| row(&format!("eth{}", i), 0.0, 0.0)).collect();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_index, 2);
        assert_eq!(app.scroll_offset, 1);
        app.select_first();
        assert_eq!((app.selected_index, app.scroll_offset), (0, 0));
        app.select_prev();
        assert_eq!(app.selected_index, 0);
    }
}
