pub mod footer;
pub mod header;
pub mod help;
pub mod interface_table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, AppMode};

/// Rows left for the interface table (minus its column header) at a given terminal height
pub fn table_rows(height: u16) -> usize {
    height.saturating_sub(header::HEADER_HEIGHT + 1 + 1) as usize
}

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEADER_HEIGHT), // summary
            Constraint::Min(3),                        // interface table
            Constraint::Length(1),                     // key bar
        ])
        .split(f.area());

    header::draw_header(f, app, chunks[0]);
    interface_table::draw_interface_table(f, app, chunks[1]);
    footer::draw_footer(f, app, chunks[2]);

    if app.mode == AppMode::Help {
        help::draw_help(f);
    }
}
