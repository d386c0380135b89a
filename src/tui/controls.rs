//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    let coarse = if key.modifiers.contains(KeyModifiers::SHIFT) {
        10
    } else {
        1
    };
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => app.toggle_slider(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.nudge(coarse),
        KeyCode::Char('-') | KeyCode::Left => app.nudge(-coarse),
        KeyCode::Char('0') => app.reset_sliders(),
        KeyCode::Char('1') => app.switch_preset("reference"),
        KeyCode::Char('2') => app.switch_preset("on_target"),
        KeyCode::Char('3') => app.switch_preset("outperforming"),
        KeyCode::Char('r') => app.restore_launch_case(),
        KeyCode::Char('e') => app.export(),
        _ => {}
    }
}
