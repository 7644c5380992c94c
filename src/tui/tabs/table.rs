//! Table view: one row per watched pair.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table},
};
use rust_decimal::Decimal;

use crate::store::Direction;
use crate::tui::app::App;
use crate::tui::format::{currency_prefix, format_change, format_price};
use crate::watchlist::format_symbol;

const PRICE_DIGITS: u32 = 4;
const CONVERTED_DIGITS: u32 = 2;
const VOLUME_DIGITS: u32 = 2;

/// Renders the pair table.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let now = Instant::now();
    let home = app.home_currency();

    let header = Row::new(
        [
            "Pair",
            "Last",
            home.as_str(),
            "24h %",
            "High",
            "Low",
            "Volume",
        ]
        .into_iter()
        .enumerate()
        .map(|(i, title)| {
            let line = Line::from(title);
            Cell::from(if i == 0 {
                line
            } else {
                line.alignment(Alignment::Right)
            })
        }),
    )
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .rows()
        .into_iter()
        .map(|row| {
            let has_tick = app.store.latest(&row.symbol).is_some();
            let last_style = match app.direction(&row.symbol, now) {
                Some(Direction::Rising) => Style::default().fg(Color::Black).bg(Color::Green),
                Some(Direction::Falling) => Style::default().fg(Color::Black).bg(Color::Red),
                None => Style::default().fg(Color::White),
            };
            let change_style = if row.change_pct >= Decimal::ZERO {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };

            let converted = match app.converted(row.last) {
                Some(value) if has_tick => format!(
                    "{}{}",
                    currency_prefix(&home),
                    format_price(value, CONVERTED_DIGITS)
                ),
                _ => "-".to_string(),
            };

            Row::new(vec![
                Cell::from(format_symbol(&row.symbol))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                right(format_price(row.last, PRICE_DIGITS)).style(last_style),
                right(converted),
                right(format_change(row.change_pct)).style(change_style),
                right(format_price(row.high, PRICE_DIGITS)),
                right(format_price(row.low, PRICE_DIGITS)),
                right(volume_text(row.volume)).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Length(9),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Min(16),
    ];

    let block = Block::default()
        .title(" Market ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn right<'a>(text: String) -> Cell<'a> {
    Cell::from(Line::from(text).alignment(Alignment::Right))
}

/// Full 24h volume; the card view is where it gets compacted.
fn volume_text(volume: Decimal) -> String {
    format_price(volume, VOLUME_DIGITS)
}
