//! Watched instrument list: parsing, display formatting, and persistence.
//!
//! The list is stored as a JSON array of strings. Anything unusable on disk
//! (missing file, unreadable, bad JSON, wrong shape, no valid symbols) falls
//! back to [`DEFAULT_PAIRS`]; storage problems are logged, never raised.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::models::Symbol;
use crate::{Result, TickerboardError};

/// Major pairs shown when nothing usable is persisted.
pub const DEFAULT_PAIRS: [&str; 6] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT", "ADAUSDT",
];

/// Quote assets recognised when pretty-printing, in match priority order.
pub const KNOWN_QUOTES: [&str; 9] = [
    "USDT", "BUSD", "USDC", "BTC", "ETH", "BNB", "BRL", "EUR", "TRY",
];

/// Quote assumed for a bare asset code such as `XRP`.
const IMPLIED_QUOTE: &str = "USDT";

/// Shortest string that can still be a base+quote pair.
const MIN_SYMBOL_LEN: usize = 6;

/// Parses free text such as `"BTC/USDT, ethusdt sol"` into symbols.
///
/// Tokens are split on whitespace, commas and semicolons, slashes are
/// stripped, and a bare 2-5 letter asset code gets `USDT` appended. Tokens
/// still shorter than six characters are dropped, as are tokens with anything
/// but ASCII letters and digits, and repeats.
pub fn parse_pairs(text: &str) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = Vec::new();

    for token in text.split(|c: char| c.is_whitespace() || c == ',' || c == ';') {
        let mut normalized = token.replace('/', "").trim().to_uppercase();

        if is_bare_asset(&normalized) {
            normalized.push_str(IMPLIED_QUOTE);
        }
        if !is_pair_code(&normalized) {
            continue;
        }

        let symbol = Symbol::new(normalized);
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    symbols
}

/// At least six ASCII letters or digits, nothing else.
fn is_pair_code(token: &str) -> bool {
    token.len() >= MIN_SYMBOL_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_bare_asset(token: &str) -> bool {
    (2..=5).contains(&token.len()) && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Renders a symbol as `BASE/QUOTE`.
///
/// Quote suffixes are tried in [`KNOWN_QUOTES`] order and must leave a
/// non-empty base. Without a match the last four characters are the quote.
pub fn format_symbol(symbol: &str) -> String {
    let upper = symbol.to_uppercase();

    for quote in KNOWN_QUOTES {
        if let Some(base) = upper.strip_suffix(quote)
            && !base.is_empty()
        {
            return format!("{base}/{quote}");
        }
    }

    let split = upper
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(index, _)| index);
    format!("{}/{}", &upper[..split], &upper[split..])
}

/// Renders a list for the pair input field, e.g. `BTC/USDT, ETH/USDT`.
pub fn format_pairs(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| format_symbol(s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn default_symbols() -> Vec<Symbol> {
    DEFAULT_PAIRS.iter().map(|s| Symbol::new(s)).collect()
}

/// The current watch list and the file it is persisted to.
#[derive(Debug)]
pub struct WatchList {
    symbols: Vec<Symbol>,
    path: PathBuf,
}

impl WatchList {
    /// Loads the persisted list, or the defaults if nothing usable is stored.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let symbols = match read_symbols(&path) {
            Ok(symbols) if !symbols.is_empty() => {
                info!(path = %path.display(), count = symbols.len(), "Loaded watch list");
                symbols
            }
            Ok(_) => {
                warn!(path = %path.display(), "Stored watch list is empty, using defaults");
                default_symbols()
            }
            Err(e) => {
                debug!(path = %path.display(), "No usable stored watch list ({e}), using defaults");
                default_symbols()
            }
        };

        Self { symbols, path }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// Text for the pair input field.
    pub fn display_text(&self) -> String {
        format_pairs(&self.symbols)
    }

    /// Replaces the list with the pairs parsed from `text` and persists it.
    ///
    /// Input with no valid pair is ignored and the current list is kept.
    /// Returns `true` if the list was replaced.
    pub fn apply(&mut self, text: &str) -> bool {
        let parsed = parse_pairs(text);
        if parsed.is_empty() {
            debug!(input = text, "Ignoring pair input without valid symbols");
            return false;
        }

        self.symbols = parsed;
        self.persist();
        true
    }

    /// Restores the default pairs and persists them.
    pub fn reset(&mut self) {
        self.symbols = default_symbols();
        self.persist();
    }

    fn persist(&self) {
        match write_symbols(&self.path, &self.symbols) {
            Ok(()) => debug!(path = %self.path.display(), "Saved watch list"),
            Err(e) => warn!(path = %self.path.display(), "Failed to save watch list: {e}"),
        }
    }
}

/// Reads a JSON array of strings and canonicalizes it.
fn read_symbols(path: &Path) -> Result<Vec<Symbol>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TickerboardError::Io(format!("failed to read {}: {e}", path.display())))?;
    let raw: Vec<String> = serde_json::from_str(&content)?;

    let mut symbols: Vec<Symbol> = Vec::with_capacity(raw.len());
    for symbol in raw.into_iter().map(Symbol::new) {
        if is_pair_code(&symbol) && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    Ok(symbols)
}

fn write_symbols(path: &Path, symbols: &[Symbol]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            TickerboardError::Io(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    let json = serde_json::to_string(symbols)?;
    std::fs::write(path, json)
        .map_err(|e| TickerboardError::Io(format!("failed to write {}: {e}", path.display())))
}
