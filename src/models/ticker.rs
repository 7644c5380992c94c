use rust_decimal::Decimal;
use serde::Deserialize;

use super::Symbol;

/// Combined-stream envelope wrapping one 24h ticker event.
#[derive(Debug, Deserialize)]
pub struct TickerEnvelope {
    /// Stream name, e.g. `btcusdt@ticker`. Absent on single-stream endpoints.
    #[serde(default)]
    pub stream: Option<String>,
    pub data: Tick,
}

/// 24h rolling ticker snapshot for one symbol.
///
/// Numeric fields arrive as JSON strings and are parsed straight into
/// [`Decimal`] so no precision is lost at the wire boundary.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Tick {
    #[serde(rename = "s")]
    pub symbol: Symbol,
    #[serde(rename = "c", with = "rust_decimal::serde::str")]
    pub last: Decimal,
    #[serde(rename = "P", with = "rust_decimal::serde::str")]
    pub change_pct: Decimal,
    #[serde(rename = "h", with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(rename = "l", with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(rename = "v", with = "rust_decimal::serde::str")]
    pub volume: Decimal,
    /// Event time in milliseconds since the epoch.
    #[serde(rename = "E", default)]
    pub event_time: Option<u64>,
}
