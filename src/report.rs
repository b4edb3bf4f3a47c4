//! Line-mode reporter: nicstat-style columns on stdout.
//!
//! ```text
//!     Time      Int     rKB/s     wKB/s     rPk/s     wPk/s      rAvs      wAvs  %Util     Sat
//! 12:00:01 eth0          1.00      0.50     10.00      5.00    102.40    102.40   0.00    0.00
//! ```
//!
//! Compact style keeps only Time, Int, rKB/s and wKB/s.

use std::io::{self, Write};

use chrono::NaiveTime;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::network::DerivedMetrics;

const TIME_W: usize = 8;
const INT_W: usize = 8;
const NUM_W: usize = 9;
const UTIL_W: usize = 6;
const SAT_W: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Full,
    Compact,
}

pub struct Reporter<W: Write> {
    out: W,
    style: ReportStyle,
    show_header: bool,
    /// Rows between repeated headers, 0 = header once
    header_every: usize,
    header_printed: bool,
    rows_since_header: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, style: ReportStyle, show_header: bool, header_every: usize) -> Self {
        Self {
            out,
            style,
            show_header,
            header_every,
            header_printed: false,
            rows_since_header: 0,
        }
    }

    /// Write one tick's rows, inserting headers as pagination requires
    pub fn render(&mut self, time: NaiveTime, rows: &[DerivedMetrics]) -> io::Result<()> {
        let stamp = time.format("%H:%M:%S").to_string();
        for row in rows {
            if self.header_due() {
                let header = self.header_line();
                writeln!(self.out, "{}", header)?;
                self.header_printed = true;
                self.rows_since_header = 0;
            }
            let line = self.row_line(&stamp, row);
            writeln!(self.out, "{}", line)?;
            self.rows_since_header += 1;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header_due(&self) -> bool {
        if !self.show_header {
            return false;
        }
        !self.header_printed || (self.header_every > 0 && self.rows_since_header >= self.header_every)
    }

    fn header_line(&self) -> String {
        let mut line = format!("{:>tw$} {:<iw$}", "Time", "Int", tw = TIME_W, iw = INT_W);
        line.push_str(&format!(" {:>w$} {:>w$}", "rKB/s", "wKB/s", w = NUM_W));
        if self.style == ReportStyle::Full {
            line.push_str(&format!(
                " {:>w$} {:>w$} {:>w$} {:>w$} {:>uw$} {:>sw$}",
                "rPk/s", "wPk/s", "rAvs", "wAvs", "%Util", "Sat",
                w = NUM_W, uw = UTIL_W, sw = SAT_W,
            ));
        }
        line
    }

    fn row_line(&self, stamp: &str, row: &DerivedMetrics) -> String {
        let mut line = format!("{:>tw$} {}", stamp, fit_name(&row.name, INT_W), tw = TIME_W);
        line.push_str(&format!(" {:>w$.2} {:>w$.2}", row.read_kbps, row.write_kbps, w = NUM_W));
        if self.style == ReportStyle::Full {
            line.push_str(&format!(
                " {:>w$.2} {:>w$.2} {:>w$.2} {:>w$.2} {:>uw$.2} {:>sw$.2}",
                row.read_pktps,
                row.write_pktps,
                row.read_avg_size,
                row.write_avg_size,
                row.utilization_pct,
                row.saturation_per_sec,
                w = NUM_W, uw = UTIL_W, sw = SAT_W,
            ));
        }
        line
    }
}

/// Left-align `name` to exactly `width` display columns, marking truncation with '~'
pub fn fit_name(name: &str, width: usize) -> String {
    if name.width() <= width {
        let pad = width - name.width();
        return format!("{}{}", name, " ".repeat(pad));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in name.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    if width > 0 {
        out.push('~');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
