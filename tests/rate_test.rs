//! Rate poller tests against a local HTTP responder.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};

use tickerboard::config::RateConfig;
use tickerboard::rate::{RatePoller, fetch_rate, parse_price};

use common::{WAIT, price_body, spawn_http_server, spawn_slow_http_server, unused_url};

fn rate_config(url: String) -> RateConfig {
    RateConfig {
        url,
        symbol: "USDTBRL".to_string(),
    }
}

async fn next_rate(rates: &mut mpsc::UnboundedReceiver<Decimal>) -> Decimal {
    tokio::time::timeout(WAIT, rates.recv())
        .await
        .expect("timed out waiting for a rate")
        .expect("poller dropped its sink")
}

#[tokio::test]
async fn fetches_immediately_on_start() {
    let (url, mut requests) =
        spawn_http_server(vec![(200, price_body("USDTBRL", "5.43210000"))]).await;
    let (tx, mut rates) = mpsc::unbounded_channel();

    let handle = assert_ok!(RatePoller::start(rate_config(url), move |rate| {
        let _ = tx.send(rate);
    }));

    assert_eq!(next_rate(&mut rates).await, dec!(5.4321));

    let head = requests.recv().await.expect("no request seen");
    assert!(head.starts_with("GET /api/v3/ticker/price?symbol=USDTBRL "));

    drop(handle);
}

#[tokio::test]
async fn failed_fetches_never_reach_the_sink() {
    let (url, _requests) = spawn_http_server(vec![
        (500, r#"{"code":-1000,"msg":"internal"}"#.to_string()),
        (200, "not json".to_string()),
        (200, price_body("USDTBRL", "abc")),
        (200, price_body("USDTBRL", "0.00000000")),
        (200, price_body("USDTBRL", "5.10")),
    ])
    .await;
    let (tx, mut rates) = mpsc::unbounded_channel();

    let mut handle = assert_ok!(RatePoller::start_with_interval(
        rate_config(url),
        Duration::from_millis(20),
        move |rate| {
            let _ = tx.send(rate);
        },
    ));

    assert_eq!(next_rate(&mut rates).await, dec!(5.10));

    handle.stop();
    assert!(handle.is_stopped());
}

#[tokio::test]
async fn fetch_rate_resolves_to_zero_on_failure() {
    let client = reqwest::Client::new();

    let unreachable = rate_config(unused_url().await.replace("ws://", "http://"));
    assert_eq!(fetch_rate(&client, &unreachable).await, Decimal::ZERO);

    let (url, _requests) =
        spawn_http_server(vec![(404, r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string())])
            .await;
    assert_eq!(fetch_rate(&client, &rate_config(url)).await, Decimal::ZERO);
}

#[tokio::test]
async fn stop_discards_in_flight_fetch() {
    let (url, mut requests) = spawn_slow_http_server(
        vec![(200, price_body("USDTBRL", "5.43"))],
        Duration::from_millis(200),
    )
    .await;
    let calls = Arc::new(AtomicUsize::new(0));
    let sink_calls = calls.clone();

    let mut handle = assert_ok!(RatePoller::start(rate_config(url), move |_| {
        sink_calls.fetch_add(1, Ordering::SeqCst);
    }));

    // The request is out; the response is still held back.
    tokio::time::timeout(WAIT, requests.recv())
        .await
        .expect("no request seen");
    handle.stop();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    handle.stop();
    assert!(handle.is_stopped());
}

#[test]
fn price_parsing_rejects_garbage() {
    assert_eq!(assert_ok!(parse_price("5.43")), dec!(5.43));
    assert_err!(parse_price("five"));
    assert_err!(parse_price("-1"));
}
