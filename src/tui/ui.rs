//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::app::{App, View};
use super::components::{footer, pair_input, status_bar, tab_bar};
use super::tabs::{cards, table};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
            Constraint::Min(5),    // Market view
            Constraint::Length(3), // Pair input
            Constraint::Length(1), // Footer
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    tab_bar::render(frame, main_layout[0], app);
    status_bar::render(frame, main_layout[1], app);

    match app.view {
        View::Table => table::render(frame, main_layout[2], app),
        View::Cards => cards::render(frame, main_layout[2], app),
    }

    pair_input::render(frame, main_layout[3], app);
    footer::render(frame, main_layout[4], app);
    footer::render_keybindings(frame, main_layout[5], app);
}
