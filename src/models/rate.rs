use serde::Deserialize;

/// Response of the REST `ticker/price` endpoint.
///
/// `price` stays a string here; the rate poller decides what counts as a
/// usable number.
#[derive(Debug, Deserialize)]
pub struct PriceResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    pub price: String,
}
