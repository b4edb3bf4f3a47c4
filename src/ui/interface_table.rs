use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InterfaceSortField};
use crate::report::fit_name;
use crate::system::network::DerivedMetrics;

/// Column headers and widths, same order as the line reporter.
/// rAvs/wAvs are not sortable.
const HEADERS: &[(&str, usize, Option<InterfaceSortField>)] = &[
    ("Int",    10, Some(InterfaceSortField::Name)),
    ("rKB/s",  11, Some(InterfaceSortField::ReadKbps)),
    ("wKB/s",  11, Some(InterfaceSortField::WriteKbps)),
    ("rPk/s",  11, Some(InterfaceSortField::ReadPktps)),
    ("wPk/s",  11, Some(InterfaceSortField::WritePktps)),
    ("rAvs",    9, None),
    ("wAvs",    9, None),
    ("%Util",   7, Some(InterfaceSortField::Utilization)),
    ("Sat",     9, Some(InterfaceSortField::Saturation)),
];

/// Compact style: Int + the two byte rates
const COMPACT_COLUMNS: usize = 3;

fn visible_headers(app: &App) -> &'static [(&'static str, usize, Option<InterfaceSortField>)] {
    if app.compact_mode {
        &HEADERS[..COMPACT_COLUMNS]
    } else {
        HEADERS
    }
}

/// Draw the interface table
pub fn draw_interface_table(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 2 {
        return;
    }

    // Column header row
    let header_area = Rect { x: area.x, y: area.y, width: area.width, height: 1 };
    let header_style = Style::default().fg(Color::Black).bg(Color::Green);
    f.render_widget(
        Paragraph::new(" ".repeat(area.width as usize)).style(header_style),
        header_area,
    );

    let mut header_spans: Vec<Span> = Vec::new();
    for (i, (name, width, field)) in visible_headers(app).iter().enumerate() {
        let is_sorted = *field == Some(app.sort_field);
        let display = if is_sorted {
            let arrow = if app.sort_ascending { "▲" } else { "▼" };
            format!("{}{}", name, arrow)
        } else {
            name.to_string()
        };
        // Int is left-aligned, numbers right-aligned
        let padded = if i == 0 {
            format!("{:<w$} ", display, w = *width)
        } else {
            format!("{:>w$} ", display, w = *width)
        };
        let style = if is_sorted {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            header_style
        };
        header_spans.push(Span::styled(padded, style));
    }
    f.render_widget(Paragraph::new(Line::from(header_spans)), header_area);

    // --- Interface rows ---
    let rows_area = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height - 1,
    };

    if app.rows.is_empty() {
        let msg = if app.tick <= 1 {
            "Collecting baseline sample..."
        } else if app.suppressed > 0 {
            "All interfaces idle (skip-zero on, press z to show)"
        } else {
            "No interfaces to report"
        };
        f.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(Color::DarkGray))),
            Rect { height: 1, ..rows_area },
        );
        return;
    }

    let visible = rows_area.height as usize;
    let start = app.scroll_offset;
    let end = (start + visible).min(app.rows.len());

    for (i, row_idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: rows_area.x,
            y: rows_area.y + i as u16,
            width: rows_area.width,
            height: 1,
        };
        let selected = row_idx == app.selected_index;
        let line = build_row(&app.rows[row_idx], app, selected);
        let bg = if selected { Color::Cyan } else { Color::Reset };
        f.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row_area);
    }
}

/// Build one interface row as a styled Line
fn build_row(row: &DerivedMetrics, app: &App, selected: bool) -> Line<'static> {
    let bg = if selected { Color::Cyan } else { Color::Reset };
    let fg = if selected { Color::Black } else { Color::White };
    let base = Style::default().bg(bg);

    let util_fg = if selected { Color::Black }
        else if row.utilization_pct >= 90.0 { Color::Red }
        else if row.utilization_pct >= 50.0 { Color::Yellow }
        else { Color::Green };
    let sat_fg = if selected { Color::Black }
        else if row.saturation_per_sec > 0.0 { Color::Red }
        else { Color::DarkGray };
    // Counter resets show as negative rates; make them stand out
    let rate_fg = |v: f64| if !selected && v < 0.0 { Color::Magenta } else { fg };

    let width = |idx: usize| HEADERS[idx].1;
    let mut spans = vec![
        Span::styled(format!("{} ", fit_name(&row.name, width(0))), base.fg(fg).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:>w$.2} ", row.read_kbps, w = width(1)), base.fg(rate_fg(row.read_kbps))),
        Span::styled(format!("{:>w$.2} ", row.write_kbps, w = width(2)), base.fg(rate_fg(row.write_kbps))),
    ];

    if !app.compact_mode {
        spans.extend([
            Span::styled(format!("{:>w$.2} ", row.read_pktps, w = width(3)), base.fg(rate_fg(row.read_pktps))),
            Span::styled(format!("{:>w$.2} ", row.write_pktps, w = width(4)), base.fg(rate_fg(row.write_pktps))),
            Span::styled(format!("{:>w$.2} ", row.read_avg_size, w = width(5)), base.fg(fg)),
            Span::styled(format!("{:>w$.2} ", row.write_avg_size, w = width(6)), base.fg(fg)),
            Span::styled(format!("{:>w$.2} ", row.utilization_pct, w = width(7)), base.fg(util_fg)),
            Span::styled(format!("{:>w$.2} ", row.saturation_per_sec, w = width(8)), base.fg(sat_fg)),
        ]);
    }

    Line::from(spans)
}
