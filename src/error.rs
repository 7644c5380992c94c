//! Crate-level error types.
//!
//! [`TickerboardError`] unifies every error source (configuration,
//! WebSocket, HTTP, JSON, terminal I/O) behind a single enum so callers can
//! match on the variant they care about while still using `?`.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TickerboardError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum TickerboardError {
    /// An environment variable holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request to the rate endpoint failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// A payload parsed as JSON but did not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}
