pub mod widgets;

use crate::app::{App, View};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Current screen
            Constraint::Length(1), // Bottom keymap bar
        ])
        .split(frame.area());

    let is_loading = app.is_loading();
    match &mut app.view {
        View::Input { form, .. } => widgets::render_input_screen(frame, form, is_loading, chunks[0]),
        View::Results(view) => widgets::render_results_screen(frame, view, app.status.as_deref(), chunks[0]),
    }
    widgets::render_bottom_bar(frame, app, chunks[1]);

    let area = frame.area();

    // Error toast floats over whichever screen is showing
    if let Some(notice) = &app.notice {
        widgets::render_notice(frame, notice, area);
    }

    if app.show_help {
        widgets::render_help_window(frame, area);
    }
}
