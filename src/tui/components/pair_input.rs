//! Pair editor field.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::{App, Mode};

/// Renders the pair editor. In insert mode the terminal cursor is placed
/// at the edit position.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_insert = app.mode == Mode::Insert;

    let (title, border_style) = if is_insert {
        (" Pairs (INSERT) ", Style::default().fg(Color::Yellow))
    } else {
        (" Pairs ", Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let prompt = "> ";
    let text = if is_insert {
        format!("{prompt}{}", app.pair_input.as_str())
    } else {
        format!("{prompt}{}", app.watchlist.display_text())
    };

    // Keep the cursor visible on long lists by scrolling horizontally.
    let cursor_col = (prompt.len() + app.pair_input.cursor()) as u16;
    let scroll = if is_insert {
        cursor_col.saturating_sub(inner.width.saturating_sub(1))
    } else {
        0
    };

    let para = Paragraph::new(text).scroll((0, scroll));
    frame.render_widget(para, inner);

    if is_insert {
        frame.set_cursor_position((inner.x + cursor_col - scroll, inner.y));
    }
}
