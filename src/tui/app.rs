//! Application state for the TUI.

use std::time::Instant;

use rust_decimal::Decimal;

use super::input::text_input::TextInput;
use crate::models::Symbol;
use crate::store::{Direction, Row, TickerStore};
use crate::watchlist::{WatchList, format_symbol};

/// Central application state container.
///
/// Owned by the main loop; feed and rate tasks only reach it through
/// [`Message`](super::Message)s, so every mutation happens in one place.
pub struct App {
    // -- Market State --
    /// Watched symbols and their persistence.
    pub watchlist: WatchList,
    /// Latest ticks, price history, and direction flashes.
    pub store: TickerStore,
    /// Home-currency units per quote unit; zero until the first fetch.
    pub rate: Decimal,
    /// Pair queried for the conversion rate, e.g. `USDTBRL`.
    pub rate_symbol: String,

    // -- Connection State --
    /// Stream connection status.
    pub connection_status: ConnectionStatus,
    /// Identifies the feed connection whose events are current.
    pub feed_generation: u64,

    // -- UI State --
    /// Table or card view.
    pub view: View,
    /// Current input mode.
    pub mode: Mode,
    /// Pair editor contents.
    pub pair_input: TextInput,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app around a loaded watch list.
    pub fn new(watchlist: WatchList, rate_symbol: impl Into<String>) -> Self {
        let pair_input = TextInput::with_content(watchlist.display_text());

        Self {
            watchlist,
            store: TickerStore::new(),
            rate: Decimal::ZERO,
            rate_symbol: rate_symbol.into(),

            connection_status: ConnectionStatus::Connecting,
            feed_generation: 0,

            view: View::Table,
            mode: Mode::Normal,
            pair_input,

            should_quit: false,
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        self.watchlist.symbols()
    }

    /// Rows in watch-list order.
    pub fn rows(&self) -> Vec<Row> {
        self.store.rows(self.watchlist.symbols())
    }

    pub fn direction(&self, symbol: &Symbol, now: Instant) -> Option<Direction> {
        self.store.direction(symbol, now)
    }

    /// `last` converted to the home currency, or `None` while no rate is known.
    pub fn converted(&self, last: Decimal) -> Option<Decimal> {
        (!self.rate.is_zero()).then(|| last * self.rate)
    }

    /// Home currency code taken from the quote side of the rate pair.
    pub fn home_currency(&self) -> String {
        let pretty = format_symbol(&self.rate_symbol);
        pretty
            .split_once('/')
            .map(|(_, quote)| quote.to_string())
            .unwrap_or(pretty)
    }

    /// Starts a new feed generation and returns it. Events tagged with an
    /// older generation are ignored from now on.
    pub fn next_feed_generation(&mut self) -> u64 {
        self.feed_generation += 1;
        self.connection_status = ConnectionStatus::Connecting;
        self.feed_generation
    }

    /// Applies the pair editor contents.
    ///
    /// Returns `true` if the watched set changed and the feed must be
    /// rebuilt. Invalid input leaves both the list and the editor untouched.
    pub fn apply_pair_input(&mut self) -> Option<bool> {
        let before = self.watchlist.symbols().to_vec();
        if !self.watchlist.apply(self.pair_input.as_str()) {
            return None;
        }

        self.pair_input.set(self.watchlist.display_text());
        Some(self.after_watchlist_change(&before))
    }

    /// Restores the default pairs. Returns `true` if the watched set changed.
    pub fn reset_pairs(&mut self) -> bool {
        let before = self.watchlist.symbols().to_vec();
        self.watchlist.reset();
        self.pair_input.set(self.watchlist.display_text());
        self.after_watchlist_change(&before)
    }

    fn after_watchlist_change(&mut self, before: &[Symbol]) -> bool {
        let changed = before != self.watchlist.symbols();
        if changed {
            self.store.reset(self.watchlist.symbols());
        }
        changed
    }

    /// Switches between table and card view.
    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Table => View::Cards,
            View::Cards => View::Table,
        };
    }
}

/// Market overview layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Table,
    Cards,
}

impl View {
    /// Returns the display title for the view tab.
    pub fn title(&self) -> &'static str {
        match self {
            View::Table => "Table",
            View::Cards => "Cards",
        }
    }
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Editing the pair list.
    Insert,
}

/// Stream connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Waiting for the first open of the current feed.
    #[default]
    Connecting,
    Connected,
    /// Closed on its own; a reconnect is scheduled.
    Reconnecting,
}

impl ConnectionStatus {
    /// Returns a display string for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Reconnecting => "Reconnecting...",
        }
    }
}
