use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::system::network::format_kbps;

/// Header rows:
///
///   nicstop  source: procfs  interval: 1.0s  12:00:01            [PAUSED]
///   Interfaces: 3 shown / 4 seen, 1 idle hidden   filter: eth0,wlan0
///   Total  rx 1.2M/s  tx 340.0K/s   rPk/s 812.00  wPk/s 640.00
pub const HEADER_HEIGHT: u16 = 3;

pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let value = Style::default().fg(Color::White);

    // --- Row 1: source, interval, clock ---
    let clock = app
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let mut first = vec![
        Span::styled("nicstop  ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled("source: ", label),
        Span::styled(format!("{}  ", app.source_name), value),
        Span::styled("interval: ", label),
        Span::styled(format!("{:.1}s  ", app.update_interval_ms as f64 / 1000.0), value),
        Span::styled(clock, value),
    ];
    if app.paused {
        first.push(Span::styled(
            "  [PAUSED]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(first)), rows[0]);

    // --- Row 2: interface counts, filter, or the last fetch error ---
    let second = if let Some(err) = &app.last_error {
        Line::from(vec![
            Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(err.clone(), Style::default().fg(Color::Red)),
        ])
    } else {
        let mut spans = vec![
            Span::styled("Interfaces: ", label),
            Span::styled(format!("{} shown / {} seen", app.rows.len(), app.interfaces_seen), value),
        ];
        if app.skip_zero {
            spans.push(Span::styled(format!(", {} idle hidden", app.suppressed), value));
        }
        if let Some(filter) = &app.filter_label {
            spans.push(Span::styled("   filter: ", label));
            spans.push(Span::styled(filter.clone(), value));
        }
        if let Some(msg) = &app.status_message {
            spans.push(Span::styled(format!("   {}", msg), Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(second), rows[1]);

    // --- Row 3: aggregate throughput ---
    let t = &app.totals;
    let third = Line::from(vec![
        Span::styled("Total  ", label),
        Span::styled("rx ", label),
        Span::styled(format!("{}  ", format_kbps(t.read_kbps)), Style::default().fg(Color::Green)),
        Span::styled("tx ", label),
        Span::styled(format!("{}   ", format_kbps(t.write_kbps)), Style::default().fg(Color::Magenta)),
        Span::styled("rPk/s ", label),
        Span::styled(format!("{:.2}  ", t.read_pktps), value),
        Span::styled("wPk/s ", label),
        Span::styled(format!("{:.2}", t.write_pktps), value),
    ]);
    f.render_widget(Paragraph::new(third), rows[2]);
}
