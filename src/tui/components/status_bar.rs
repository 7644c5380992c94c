//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::{App, ConnectionStatus};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.connection_status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting => Color::Yellow,
    };

    let ticking = app
        .symbols()
        .iter()
        .filter(|symbol| app.store.latest(symbol).is_some())
        .count();
    let count_info = format!(" {}/{} live ", ticking, app.symbols().len());

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.connection_status.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        Span::raw(format!(
            "{:>width$}",
            count_info,
            width = area.width.saturating_sub(20) as usize
        )),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
