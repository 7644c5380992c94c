//! Async client for the combined 24h ticker stream.
//!
//! This module is organized by concern:
//! - [`client`] - Connection lifecycle, reconnect, and disposal
//! - [`handler`] - Callback trait and inbound frame decoding
//! - [`backoff`] - Reconnect delay schedule

pub mod backoff;
mod client;
mod handler;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;
use tungstenite::Message;

use crate::Result;
use crate::models::Symbol;

pub use backoff::Backoff;
pub use client::{FeedClient, FeedHandle};
pub use handler::{CloseReason, FeedEvent, FeedHandler, decode_message};

/// Write half of a stream connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a stream connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`TickerboardError`](crate::TickerboardError) if the connection
/// or TLS handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!("WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Builds the combined-stream URL subscribing to every symbol's ticker.
///
/// The subscription is encoded in the path, so one connection covers the
/// whole watch list and changing the list means reconnecting.
///
/// Stream names are not percent-encoded: symbols must be the ASCII
/// alphanumeric codes [`parse_pairs`](crate::watchlist::parse_pairs) yields.
pub fn stream_url(base: &str, symbols: &[Symbol]) -> String {
    debug_assert!(
        symbols
            .iter()
            .all(|s| s.chars().all(|c| c.is_ascii_alphanumeric())),
        "stream symbols must be ASCII alphanumeric"
    );
    let streams = symbols
        .iter()
        .map(Symbol::ticker_stream)
        .collect::<Vec<_>>()
        .join("/");
    let separator = if base.contains('?') { '&' } else { '?' };

    format!("{base}{separator}streams={streams}")
}
