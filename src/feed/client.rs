//! Stream connection lifecycle management.
//!
//! [`FeedClient`] owns one multiplexed connection for a fixed symbol set.
//! It reconnects with exponential backoff whenever the connection closes
//! on its own, indefinitely, until the returned [`FeedHandle`] is disposed.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tungstenite::Message as WsMessage;

use super::backoff::Backoff;
use super::handler::{CloseReason, FeedHandler, decode_message};
use super::{WsReader, WsWriter, connect, stream_url};
use crate::TickerboardError;
use crate::config::FeedConfig;
use crate::gate::Gate;
use crate::models::Symbol;

/// Commands sent from the handle to the feed task.
enum FeedCommand {
    /// The caller disposed the handle.
    Close,
}

/// How the reader loop exited.
enum ReadOutcome {
    /// The connection dropped; reconnect after backoff.
    Lost(CloseReason),
    /// The caller disposed the handle.
    Disposed,
}

/// Connection manager running on its own task.
pub struct FeedClient {
    url: String,
    symbol_count: usize,
    backoff: Backoff,
    gate: Gate<Box<dyn FeedHandler>>,
    cmd_rx: mpsc::UnboundedReceiver<FeedCommand>,
}

impl FeedClient {
    /// Spawns a feed task subscribed to the ticker stream of every symbol.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect<H: FeedHandler>(
        config: &FeedConfig,
        symbols: &[Symbol],
        handler: H,
    ) -> FeedHandle {
        Self::connect_with_backoff(config, symbols, handler, Backoff::default())
    }

    /// Like [`FeedClient::connect`] with a custom reconnect schedule.
    pub fn connect_with_backoff<H: FeedHandler>(
        config: &FeedConfig,
        symbols: &[Symbol],
        handler: H,
        backoff: Backoff,
    ) -> FeedHandle {
        let gate: Gate<Box<dyn FeedHandler>> = Gate::new(Box::new(handler));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let client = Self {
            url: stream_url(&config.stream_url, symbols),
            symbol_count: symbols.len(),
            backoff,
            gate: gate.clone(),
            cmd_rx,
        };
        let task = tokio::spawn(client.run());

        FeedHandle {
            gate,
            cmd_tx,
            task: Some(task),
        }
    }

    /// Connects, reads, and reconnects until disposed.
    async fn run(mut self) {
        loop {
            info!(url = %self.url, symbols = self.symbol_count, "Connecting to stream");

            let attempt = tokio::select! {
                result = connect(&self.url) => result,
                _ = self.cmd_rx.recv() => return,
            };

            let reason = match attempt {
                Ok((mut write, read)) => {
                    self.backoff.reset();
                    if self.gate.with(|h| h.on_open()).is_none() {
                        let _ = write.close().await;
                        return;
                    }
                    info!("Stream connected");

                    match self.read_loop(write, read).await {
                        ReadOutcome::Lost(reason) => reason,
                        ReadOutcome::Disposed => {
                            info!("Feed disposed, connection closed");
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("Stream connection failed: {e}");
                    self.gate.with(|h| h.on_error(&e));
                    CloseReason::ConnectFailed
                }
            };

            if self.gate.with(|h| h.on_close(&reason)).is_none() {
                return;
            }

            let delay = self.backoff.next_delay();
            info!(
                ?reason,
                delay_ms = delay.as_millis() as u64,
                retries = self.backoff.retries(),
                "Connection lost, backing off"
            );

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = self.cmd_rx.recv() => return,
            }
        }
    }

    /// Delivers ticks until the connection drops or the handle is disposed.
    async fn read_loop(&mut self, mut write: WsWriter, mut read: WsReader) -> ReadOutcome {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            let Some(tick) = decode_message(&text) else {
                                debug!(len = text.len(), "Dropping undecodable frame");
                                continue;
                            };
                            if self.gate.with(|h| h.on_tick(tick)).is_none() {
                                let _ = write.close().await;
                                return ReadOutcome::Disposed;
                            }
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.as_str().to_string()))
                                .unwrap_or((1005, String::new()));
                            warn!(code, reason = %reason, "Server closed the stream");
                            return ReadOutcome::Lost(CloseReason::ClosedByServer { code, reason });
                        }
                        Some(Ok(_)) => {} // Binary/Ping/Pong frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            let error = TickerboardError::from(e);
                            self.gate.with(|h| h.on_error(&error));
                            return ReadOutcome::Lost(CloseReason::ReadError);
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return ReadOutcome::Lost(CloseReason::StreamEnded);
                        }
                    }
                }

                _ = self.cmd_rx.recv() => {
                    if let Err(e) = write.close().await {
                        debug!("Close handshake failed: {e}");
                    }
                    return ReadOutcome::Disposed;
                }
            }
        }
    }
}

/// Owner of a running feed connection.
///
/// Dropping the handle disposes it.
pub struct FeedHandle {
    gate: Gate<Box<dyn FeedHandler>>,
    cmd_tx: mpsc::UnboundedSender<FeedCommand>,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Stops reconnecting and closes the socket.
    ///
    /// Idempotent. When this returns the handler has been dropped, so no
    /// further callback can run, even from a pending reconnect timer.
    pub fn dispose(&mut self) {
        if self.gate.close() {
            info!("Disposing feed");
        }
        let _ = self.cmd_tx.send(FeedCommand::Close);
    }

    pub fn is_disposed(&self) -> bool {
        !self.gate.is_open()
    }

    /// Disposes and waits for the feed task to finish its close handshake.
    pub async fn shutdown(mut self) {
        self.dispose();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("Feed task ended abnormally: {e}");
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
