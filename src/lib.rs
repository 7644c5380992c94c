//! Live crypto ticker board.
//!
//! Subscribes to a public combined 24h ticker stream, keeps a bounded
//! rolling window of prices per pair, and converts prices into a home
//! currency using a periodically polled REST rate. The [`feed`] client
//! reconnects with exponential backoff and never calls back after it has
//! been disposed.

pub mod config;
pub mod error;
pub mod feed;
mod gate;
pub mod models;
pub mod rate;
pub mod store;
pub mod tui;
pub mod watchlist;

pub use error::{Result, TickerboardError};
