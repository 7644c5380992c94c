//! Shared test utilities: a local stream server, a one-shot HTTP responder,
//! and canned ticker payloads.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{WebSocketStream, accept_hdr_async};
use tungstenite::Message;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::protocol::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

/// One accepted stream connection, driven by the test.
pub struct ServerConn {
    /// Request path and query, e.g. `/stream?streams=btcusdt@ticker`.
    pub path: String,
    ws: WebSocketStream<TcpStream>,
}

impl ServerConn {
    /// Sends a text frame. Returns `false` if the client already went away.
    pub async fn send_text(&mut self, text: &str) -> bool {
        self.ws.send(Message::text(text)).await.is_ok()
    }

    /// Closes from the server side with a normal close frame.
    pub async fn close(&mut self, reason: &str) {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: reason.into(),
        };
        let _ = self.ws.close(Some(frame)).await;
    }

    /// Waits for the client to close. Returns `true` if a close frame or
    /// end of stream arrived before the timeout.
    pub async fn expect_client_close(&mut self) -> bool {
        let wait = async {
            loop {
                match self.ws.next().await {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    Some(Ok(_)) => {}
                }
            }
        };
        tokio::time::timeout(WAIT, wait).await.is_ok()
    }
}

/// Starts a WebSocket server on an ephemeral port.
///
/// Returns the `ws://` base URL and a receiver yielding every accepted
/// connection in order.
pub async fn spawn_stream_server() -> (String, mpsc::UnboundedReceiver<ServerConn>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("no local addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let mut path = String::new();
            let accepted = accept_hdr_async(
                stream,
                |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                    path = request.uri().to_string();
                    Ok(response)
                },
            )
            .await;
            let Ok(ws) = accepted else {
                continue;
            };
            if tx.send(ServerConn { path, ws }).is_err() {
                break;
            }
        }
    });

    (format!("ws://{addr}/stream"), rx)
}

/// A connection attempt seen by [`spawn_flaky_stream_server`].
pub struct Attempt {
    /// When the TCP connection was accepted.
    pub at: Instant,
    /// The upgraded connection, or `None` if it was dropped before the
    /// handshake.
    pub conn: Option<ServerConn>,
}

/// Like [`spawn_stream_server`], but drops the first `refuse` TCP
/// connections before the WebSocket handshake so those connects fail.
pub async fn spawn_flaky_stream_server(
    refuse: usize,
) -> (String, mpsc::UnboundedReceiver<Attempt>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("no local addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut refused = 0;
        while let Ok((stream, _)) = listener.accept().await {
            let at = Instant::now();

            if refused < refuse {
                refused += 1;
                drop(stream);
                if tx.send(Attempt { at, conn: None }).is_err() {
                    break;
                }
                continue;
            }

            let mut path = String::new();
            let accepted = accept_hdr_async(
                stream,
                |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                    path = request.uri().to_string();
                    Ok(response)
                },
            )
            .await;
            let Ok(ws) = accepted else {
                continue;
            };
            let conn = Some(ServerConn { path, ws });
            if tx.send(Attempt { at, conn }).is_err() {
                break;
            }
        }
    });

    (format!("ws://{addr}/stream"), rx)
}

/// Waits for the next connection attempt.
pub async fn next_attempt(attempts: &mut mpsc::UnboundedReceiver<Attempt>) -> Attempt {
    tokio::time::timeout(WAIT, attempts.recv())
        .await
        .expect("timed out waiting for a connection attempt")
        .expect("server stopped")
}

/// Waits for the next accepted connection.
pub async fn next_conn(conns: &mut mpsc::UnboundedReceiver<ServerConn>) -> ServerConn {
    tokio::time::timeout(WAIT, conns.recv())
        .await
        .expect("timed out waiting for a connection")
        .expect("server stopped")
}

/// A `ws://` URL nothing listens on.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);
    format!("ws://{addr}/stream")
}

/// Serves one canned HTTP response per entry in `responses`, in order.
///
/// Returns the base URL and a receiver of the raw request heads.
pub async fn spawn_http_server(
    responses: Vec<(u16, String)>,
) -> (String, mpsc::UnboundedReceiver<String>) {
    spawn_slow_http_server(responses, Duration::ZERO).await
}

/// Like [`spawn_http_server`], holding each response back for `delay`
/// after the request arrived.
pub async fn spawn_slow_http_server(
    responses: Vec<(u16, String)>,
    delay: Duration,
) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind http server");
    let addr = listener.local_addr().expect("no local addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };

            let mut buf = vec![0u8; 4096];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            let _ = tx.send(head);
            tokio::time::sleep(delay).await;

            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{addr}/api/v3/ticker/price"), rx)
}

/// A price endpoint body.
pub fn price_body(symbol: &str, price: &str) -> String {
    format!(r#"{{"symbol":"{symbol}","price":"{price}"}}"#)
}

/// A combined-stream ticker frame.
pub fn ticker_frame(symbol: &str, last: &str) -> String {
    format!(
        r#"{{"stream":"{stream}@ticker","data":{{"e":"24hrTicker","E":1700000000000,"s":"{symbol}","p":"1.0","P":"0.76","c":"{last}","h":"70000.00","l":"60000.00","v":"21534.12"}}}}"#,
        stream = symbol.to_lowercase(),
    )
}
