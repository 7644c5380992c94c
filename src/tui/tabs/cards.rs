//! Card view: a grid of per-pair cards with a price sparkline.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::store::{Direction, Row};
use crate::tui::app::App;
use crate::tui::format::{
    currency_prefix, format_change, format_compact, format_price, sparkline,
};
use crate::watchlist::format_symbol;

const CARD_HEIGHT: u16 = 7;
const MIN_CARD_WIDTH: u16 = 28;

/// Renders the card grid.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app.rows();
    if rows.is_empty() || area.height == 0 {
        return;
    }

    let per_row = (area.width / MIN_CARD_WIDTH).clamp(1, 4) as usize;
    let grid_rows = rows.len().div_ceil(per_row);

    let row_areas = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(
            std::iter::repeat_n(Constraint::Length(CARD_HEIGHT), grid_rows)
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    let now = Instant::now();
    for (chunk, row_area) in rows.chunks(per_row).zip(row_areas.iter()) {
        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints(std::iter::repeat_n(
                Constraint::Ratio(1, per_row as u32),
                per_row,
            ))
            .split(*row_area);

        for (row, card_area) in chunk.iter().zip(columns.iter()) {
            render_card(frame, *card_area, app, row, now);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, app: &App, row: &Row, now: Instant) {
    let direction = app.direction(&row.symbol, now);
    let border_style = match direction {
        Some(Direction::Rising) => Style::default().fg(Color::Green),
        Some(Direction::Falling) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", format_symbol(&row.symbol)),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let change_color = if row.change_pct >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    };
    let last_style = match direction {
        Some(Direction::Rising) => Style::default().fg(Color::Green),
        Some(Direction::Falling) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::White),
    }
    .add_modifier(Modifier::BOLD);

    let home = app.home_currency();
    let converted = match app.converted(row.last) {
        Some(value) if app.store.latest(&row.symbol).is_some() => {
            format!("{}{}", currency_prefix(&home), format_price(value, 2))
        }
        _ => "-".to_string(),
    };

    let history = app
        .store
        .history(&row.symbol)
        .map(|samples| sparkline(samples.iter().copied(), inner.width as usize))
        .unwrap_or_default();

    let lines = vec![
        Line::from(vec![
            Span::styled(format_price(row.last, 4), last_style),
            Span::raw(" "),
            Span::styled(format_change(row.change_pct), Style::default().fg(change_color)),
        ]),
        Line::from(Span::styled(converted, Style::default().fg(Color::Cyan))),
        Line::from(vec![
            Span::styled("H ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_price(row.high, 4)),
            Span::styled("  L ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_price(row.low, 4)),
        ]),
        Line::from(vec![
            Span::styled("Vol ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_compact(row.volume)),
        ]),
        Line::from(Span::styled(history, Style::default().fg(change_color))),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
