//! Footer listing the subscribed pairs and the conversion rate.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::{App, Mode};
use crate::tui::format::{currency_prefix, format_price};
use crate::watchlist::format_symbol;

const RATE_DIGITS: u32 = 2;

/// Renders the footer line.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let rate = rate_text(app);

    let line = Line::from(vec![
        Span::styled(" Pairs: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.watchlist.display_text()),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}: ", format_symbol(&app.rate_symbol)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(rate, Style::default().fg(Color::Cyan)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn rate_text(app: &App) -> String {
    if app.rate.is_zero() {
        return "...".to_string();
    }
    format!(
        "{}{}",
        currency_prefix(&app.home_currency()),
        format_price(app.rate, RATE_DIGITS)
    )
}

/// Renders the keybindings help line.
pub fn render_keybindings(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.mode {
        Mode::Insert => "[Enter]apply [Esc]cancel  e.g. btc, ETH/USDT, solusdt",
        Mode::Normal => "[e]edit pairs [r]reset pairs [v]table/cards [q]quit",
    };

    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
