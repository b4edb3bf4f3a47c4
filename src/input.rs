use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help   => handle_help_mode(app, key),
    }
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,

        KeyCode::F(1) | KeyCode::Char('h') | KeyCode::Char('?') => app.mode = AppMode::Help,

        // ── Navigation ──
        KeyCode::Up   => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End  => app.select_last(),

        // ── Display toggles ──
        KeyCode::Char('z') => {
            app.toggle_skip_zero();
            app.status_message = Some(format!(
                "skip-zero {}",
                if app.skip_zero { "on" } else { "off" }
            ));
        }
        KeyCode::Char('s') => app.toggle_compact(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.paused = !app.paused,

        // ── Sorting ──
        KeyCode::Char('>') | KeyCode::Char('.') => {
            let next = app.sort_field.next();
            app.set_sort_field(next);
        }
        KeyCode::Char('<') | KeyCode::Char(',') => {
            let prev = app.sort_field.prev();
            app.set_sort_field(prev);
        }
        KeyCode::Char('I') => app.invert_sort(),

        // ── Persist settings ──
        KeyCode::Char('W') => app.save_requested = true,

        _ => {}
    }
}

// ── Help popup ──────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?') => {
            app.mode = AppMode::Normal;
        }
        KeyCode::F(10) => app.should_quit = true,
        _ => {}
    }
}
