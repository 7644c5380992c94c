//! Feed callbacks and inbound frame decoding.

use tokio::sync::mpsc;

use crate::TickerboardError;
use crate::models::{Tick, TickerEnvelope};

/// Why a connection stopped delivering ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// The handshake never completed.
    ConnectFailed,
    /// The server sent a close frame.
    ClosedByServer { code: u16, reason: String },
    /// Reading from the socket failed.
    ReadError,
    /// The stream ended without a close frame.
    StreamEnded,
}

/// Callbacks invoked by the feed task.
///
/// All calls for one connection happen sequentially on the feed task and
/// never after [`FeedHandle::dispose`](super::FeedHandle::dispose) returns.
/// Implementations must not call `dispose` on their own handle.
pub trait FeedHandler: Send + 'static {
    /// A decoded tick, in arrival order.
    fn on_tick(&mut self, tick: Tick);

    /// The connection is open and subscribed.
    fn on_open(&mut self) {}

    /// The connection closed without the caller asking for it. A reconnect
    /// follows after the backoff delay.
    fn on_close(&mut self, _reason: &CloseReason) {}

    /// A transport error occurred. Informational only.
    fn on_error(&mut self, _error: &TickerboardError) {}
}

/// Feed callbacks flattened into a single event type.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    Open,
    Tick(Tick),
    Close(CloseReason),
    Error(String),
}

/// Forwards every callback into a channel. Send failures are ignored: the
/// receiver going away just means nobody is listening anymore.
impl FeedHandler for mpsc::UnboundedSender<FeedEvent> {
    fn on_tick(&mut self, tick: Tick) {
        let _ = self.send(FeedEvent::Tick(tick));
    }

    fn on_open(&mut self) {
        let _ = self.send(FeedEvent::Open);
    }

    fn on_close(&mut self, reason: &CloseReason) {
        let _ = self.send(FeedEvent::Close(reason.clone()));
    }

    fn on_error(&mut self, error: &TickerboardError) {
        let _ = self.send(FeedEvent::Error(error.to_string()));
    }
}

/// Decodes a combined-stream text frame into a [`Tick`].
///
/// Returns `None` for anything that is not a well-formed ticker envelope,
/// including subscription acknowledgements and non-numeric prices.
pub fn decode_message(text: &str) -> Option<Tick> {
    serde_json::from_str::<TickerEnvelope>(text)
        .ok()
        .map(|envelope| envelope.data)
}
