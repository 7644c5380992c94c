use rust_decimal_macros::dec;

use tickerboard::feed::decode_message;
use tickerboard::models::{PriceResponse, Tick, TickerEnvelope};

#[test]
fn deserialize_combined_stream_envelope() {
    let json = r#"{
        "stream": "btcusdt@ticker",
        "data": {
            "e": "24hrTicker",
            "E": 1700000000123,
            "s": "BTCUSDT",
            "p": "512.34000000",
            "P": "0.762",
            "w": "67400.11000000",
            "c": "67712.01000000",
            "Q": "0.00100000",
            "o": "67199.67000000",
            "h": "68010.00000000",
            "l": "66850.50000000",
            "v": "21534.12345000",
            "q": "1451234567.89000000",
            "n": 1234567
        }
    }"#;

    let envelope: TickerEnvelope = serde_json::from_str(json).unwrap();

    assert_eq!(envelope.stream.as_deref(), Some("btcusdt@ticker"));

    let tick = &envelope.data;
    assert_eq!(tick.symbol.as_str(), "BTCUSDT");
    assert_eq!(tick.last, dec!(67712.01));
    assert_eq!(tick.change_pct, dec!(0.762));
    assert_eq!(tick.high, dec!(68010));
    assert_eq!(tick.low, dec!(66850.5));
    assert_eq!(tick.volume, dec!(21534.12345));
    assert_eq!(tick.event_time, Some(1700000000123));
}

#[test]
fn deserialize_tick_directly() {
    let json = r#"{
        "s": "ethusdt",
        "c": "3501.50",
        "P": "-1.20",
        "h": "3600.00",
        "l": "3400.00",
        "v": "150000.5"
    }"#;

    let tick: Tick = serde_json::from_str(json).unwrap();

    assert_eq!(tick.symbol.as_str(), "ETHUSDT");
    assert_eq!(tick.change_pct, dec!(-1.20));
    assert_eq!(tick.event_time, None);
}

#[test]
fn decode_message_ignores_non_ticker_frames() {
    assert!(decode_message(r#"{"result":null,"id":1}"#).is_none());
    assert!(decode_message(r#"{"stream":"btcusdt@ticker","data":{"s":"BTCUSDT"}}"#).is_none());
    assert!(decode_message("").is_none());
}

#[test]
fn deserialize_price_response() {
    let response: PriceResponse =
        serde_json::from_str(r#"{"symbol":"USDTBRL","price":"5.43210000"}"#).unwrap();

    assert_eq!(response.symbol.as_deref(), Some("USDTBRL"));
    assert_eq!(response.price, "5.43210000");
}
