//! Event handling for the TUI.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::app::{App, ConnectionStatus, Mode};
use crate::TickerboardError;
use crate::feed::{CloseReason, FeedEvent, FeedHandler};
use crate::models::Tick;

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// Callback from the feed connection of the given generation.
    Feed { generation: u64, event: FeedEvent },
    /// Fresh conversion rate.
    Rate(Decimal),
    /// Request to quit the application.
    Quit,
}

/// Actions that require external handling.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// The watch list changed; replace the feed connection.
    Resubscribe,
}

/// Feed handler that tags every callback with its connection generation
/// and posts it to the main loop.
pub struct FeedForwarder {
    generation: u64,
    tx: mpsc::UnboundedSender<Message>,
}

impl FeedForwarder {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { generation, tx }
    }

    fn forward(&self, event: FeedEvent) {
        let _ = self.tx.send(Message::Feed {
            generation: self.generation,
            event,
        });
    }
}

impl FeedHandler for FeedForwarder {
    fn on_tick(&mut self, tick: Tick) {
        self.forward(FeedEvent::Tick(tick));
    }

    fn on_open(&mut self) {
        self.forward(FeedEvent::Open);
    }

    fn on_close(&mut self, reason: &CloseReason) {
        self.forward(FeedEvent::Close(reason.clone()));
    }

    fn on_error(&mut self, error: &TickerboardError) {
        self.forward(FeedEvent::Error(error.to_string()));
    }
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Feed { generation, event } => {
            if generation != app.feed_generation {
                debug!(generation, current = app.feed_generation, "Dropping stale feed event");
                return None;
            }
            handle_feed(app, event);
            None
        }
        Message::Rate(rate) => {
            if rate > Decimal::ZERO {
                app.rate = rate;
            }
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

fn handle_feed(app: &mut App, event: FeedEvent) {
    match event {
        FeedEvent::Open => {
            app.connection_status = ConnectionStatus::Connected;
        }
        FeedEvent::Tick(tick) => {
            // The stream may still deliver a symbol dropped from the list.
            if app.watchlist.contains(&tick.symbol) {
                app.store.apply(tick, Instant::now());
            }
        }
        FeedEvent::Close(reason) => {
            debug!(?reason, "Feed closed");
            app.connection_status = ConnectionStatus::Reconnecting;
        }
        FeedEvent::Error(error) => {
            warn!("Feed error: {error}");
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.store.sweep_flashes(Instant::now());
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => handle_insert_mode(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('v') | KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_view();
            None
        }
        KeyCode::Char('/') | KeyCode::Char('e') | KeyCode::Char('i') => {
            app.pair_input.set(app.watchlist.display_text());
            app.mode = Mode::Insert;
            None
        }
        KeyCode::Char('r') => {
            let changed = app.reset_pairs();
            info!(pairs = %app.watchlist.display_text(), "Restored default pairs");
            changed.then_some(Action::Resubscribe)
        }
        _ => None,
    }
}

/// Handles keys in insert mode (pair editor).
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => match app.apply_pair_input() {
            Some(changed) => {
                app.mode = Mode::Normal;
                info!(pairs = %app.watchlist.display_text(), changed, "Applied pair list");
                changed.then_some(Action::Resubscribe)
            }
            None => None,
        },
        KeyCode::Esc => {
            app.pair_input.set(app.watchlist.display_text());
            app.mode = Mode::Normal;
            None
        }
        KeyCode::Char(c) => {
            app.pair_input.insert(c);
            None
        }
        KeyCode::Backspace => {
            app.pair_input.backspace();
            None
        }
        KeyCode::Delete => {
            app.pair_input.delete();
            None
        }
        KeyCode::Left => {
            app.pair_input.move_left();
            None
        }
        KeyCode::Right => {
            app.pair_input.move_right();
            None
        }
        KeyCode::Home => {
            app.pair_input.move_home();
            None
        }
        KeyCode::End => {
            app.pair_input.move_end();
            None
        }
        _ => None,
    }
}
