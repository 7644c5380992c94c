//! Terminal User Interface for the ticker board.
//!
//! Provides a Ratatui-based TUI showing live 24h tickers for the watched
//! pairs, with an in-place pair editor and a table or card layout.

pub mod app;
pub mod components;
pub mod event;
pub mod format;
pub mod input;
pub mod tabs;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, FeedForwarder, Message, update};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
