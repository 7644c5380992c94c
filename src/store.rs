//! Per-symbol market state reconciled from the tick stream.
//!
//! [`TickerStore`] keeps the latest tick per symbol, a bounded history of
//! last prices for sparklines, and a short-lived direction flash set when
//! the last price moves. Time is passed in explicitly so the dwell logic is
//! deterministic under test.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use crate::models::{Symbol, Tick};

/// Maximum number of last-price samples kept per symbol.
pub const HISTORY_CAPACITY: usize = 60;

/// How long a direction flash stays visible.
pub const FLASH_DWELL: Duration = Duration::from_millis(900);

/// Which way the last price moved on the most recent change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
}

#[derive(Clone, Copy, Debug)]
struct Flash {
    direction: Direction,
    until: Instant,
}

/// One table row as consumed by the presentation layer.
///
/// Symbols without a tick yet are zero-filled.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub symbol: Symbol,
    pub last: Decimal,
    pub change_pct: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: Decimal,
}

/// Latest-value map, history ring, and direction signal.
#[derive(Debug, Default)]
pub struct TickerStore {
    latest: HashMap<Symbol, Tick>,
    history: HashMap<Symbol, VecDeque<Decimal>>,
    flashes: HashMap<Symbol, Flash>,
}

impl TickerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a tick into the store.
    ///
    /// Returns the direction flash that was set, if the last price changed.
    /// A newer change replaces any flash still pending for the symbol.
    pub fn apply(&mut self, tick: Tick, now: Instant) -> Option<Direction> {
        let previous = self.latest.get(&tick.symbol).map(|t| t.last);

        let direction = match previous {
            Some(old) if old != tick.last => {
                let direction = if tick.last >= old {
                    Direction::Rising
                } else {
                    Direction::Falling
                };
                self.flashes.insert(
                    tick.symbol.clone(),
                    Flash {
                        direction,
                        until: now + FLASH_DWELL,
                    },
                );
                Some(direction)
            }
            _ => None,
        };

        let samples = self
            .history
            .entry(tick.symbol.clone())
            .or_insert_with(|| VecDeque::with_capacity(HISTORY_CAPACITY));
        samples.push_back(tick.last);
        while samples.len() > HISTORY_CAPACITY {
            samples.pop_front();
        }

        self.latest.insert(tick.symbol.clone(), tick);
        direction
    }

    pub fn latest(&self, symbol: &Symbol) -> Option<&Tick> {
        self.latest.get(symbol)
    }

    /// Last-price samples for `symbol`, oldest first.
    pub fn history(&self, symbol: &Symbol) -> Option<&VecDeque<Decimal>> {
        self.history.get(symbol)
    }

    /// Current flash for `symbol`; expired flashes read as `None` even
    /// before [`TickerStore::sweep_flashes`] removes them.
    pub fn direction(&self, symbol: &Symbol, now: Instant) -> Option<Direction> {
        self.flashes
            .get(symbol)
            .filter(|flash| now < flash.until)
            .map(|flash| flash.direction)
    }

    /// Drops every flash whose dwell time has elapsed. Returns how many
    /// were cleared.
    pub fn sweep_flashes(&mut self, now: Instant) -> usize {
        let before = self.flashes.len();
        self.flashes.retain(|_, flash| now < flash.until);
        before - self.flashes.len()
    }

    /// Forgets history and flashes after the watch list changed, and drops
    /// latest values for symbols no longer watched.
    pub fn reset(&mut self, watched: &[Symbol]) {
        self.history.clear();
        self.flashes.clear();
        self.latest.retain(|symbol, _| watched.contains(symbol));
    }

    /// Rows for `watched`, in watch-list order.
    pub fn rows(&self, watched: &[Symbol]) -> Vec<Row> {
        watched
            .iter()
            .map(|symbol| match self.latest.get(symbol) {
                Some(tick) => Row {
                    symbol: symbol.clone(),
                    last: tick.last,
                    change_pct: tick.change_pct,
                    high: tick.high,
                    low: tick.low,
                    volume: tick.volume,
                },
                None => Row {
                    symbol: symbol.clone(),
                    last: Decimal::ZERO,
                    change_pct: Decimal::ZERO,
                    high: Decimal::ZERO,
                    low: Decimal::ZERO,
                    volume: Decimal::ZERO,
                },
            })
            .collect()
    }
}
