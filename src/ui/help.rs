use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow)))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " nicstop - per-interface network throughput monitor ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Columns "),
        Line::from("  rKB/s wKB/s  KiB read/written per second"),
        Line::from("  rPk/s wPk/s  packets read/written per second"),
        Line::from("  rAvs wAvs    average packet size in bytes"),
        Line::from("  %Util        rx+tx bits against link speed (0 if speed unknown)"),
        Line::from("  Sat          drop/overrun events per second (lower bound)"),
        Line::from("  Negative rates mean a counter went backwards (reset or wrap)"),
        Line::from(""),
        section(" Keys "),
        Line::from("  ↑/↓ Home/End Move selection"),
        Line::from("  z           Toggle skip-zero (hide idle interfaces)"),
        Line::from("  s           Toggle compact columns"),
        Line::from("  Space/p     Pause/resume sampling"),
        Line::from("  < >         Cycle sort column"),
        Line::from("  I           Invert sort order"),
        Line::from("  W           Write settings to nicstoprc"),
        Line::from("  F1/h/?      Show this help"),
        Line::from("  F10/q       Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc or F1 to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Create a centered rectangle with percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
