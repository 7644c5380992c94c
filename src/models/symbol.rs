use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Canonical instrument identifier such as `BTCUSDT`.
///
/// Construction uppercases the input, so two symbols compare equal
/// regardless of the case they were typed or received in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stream name for the 24h ticker of this symbol (`btcusdt@ticker`).
    pub fn ticker_stream(&self) -> String {
        format!("{}@ticker", self.0.to_lowercase())
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}
