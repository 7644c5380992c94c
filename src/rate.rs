//! Conversion rate polling over the public REST price endpoint.
//!
//! The poller runs on its own task, independent of the stream connection.
//! Failed fetches are logged and skipped, so the sink only ever sees usable
//! rates and the caller keeps showing the last good one.

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::RateConfig;
use crate::gate::Gate;
use crate::models::PriceResponse;
use crate::{Result, TickerboardError};

/// How often the rate is refreshed.
pub const RATE_POLL_INTERVAL: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type RateSink = Box<dyn FnMut(Decimal) + Send>;

/// Fetches the current rate, resolving to zero on any failure.
pub async fn fetch_rate(client: &reqwest::Client, config: &RateConfig) -> Decimal {
    match try_fetch_rate(client, config).await {
        Ok(rate) => rate,
        Err(e) => {
            warn!(symbol = %config.symbol, "Rate fetch failed: {e}");
            Decimal::ZERO
        }
    }
}

async fn try_fetch_rate(client: &reqwest::Client, config: &RateConfig) -> Result<Decimal> {
    let response = client
        .get(&config.url)
        .query(&[("symbol", config.symbol.as_str())])
        .send()
        .await?
        .error_for_status()?;

    let body: PriceResponse = response.json().await?;
    if let Some(symbol) = body.symbol.as_deref()
        && symbol != config.symbol
    {
        debug!(expected = %config.symbol, got = symbol, "Rate endpoint echoed another symbol");
    }

    parse_price(&body.price)
}

/// Parses a price string into a strictly positive decimal.
///
/// # Errors
///
/// Returns [`TickerboardError::MalformedMessage`] if the string is not a
/// decimal number or is not greater than zero.
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let price = Decimal::from_str(raw.trim())
        .map_err(|e| TickerboardError::MalformedMessage(format!("invalid price {raw:?}: {e}")))?;

    if price <= Decimal::ZERO {
        return Err(TickerboardError::MalformedMessage(format!(
            "non-positive price {raw:?}"
        )));
    }

    Ok(price)
}

/// Periodic rate fetcher.
pub struct RatePoller;

impl RatePoller {
    /// Starts polling every [`RATE_POLL_INTERVAL`], fetching once right away.
    ///
    /// # Errors
    ///
    /// Returns [`TickerboardError::Http`] if the HTTP client cannot be built.
    pub fn start<F>(config: RateConfig, sink: F) -> Result<RatePollerHandle>
    where
        F: FnMut(Decimal) + Send + 'static,
    {
        Self::start_with_interval(config, RATE_POLL_INTERVAL, sink)
    }

    /// Like [`RatePoller::start`] with a custom refresh interval.
    ///
    /// # Errors
    ///
    /// Returns [`TickerboardError::Http`] if the HTTP client cannot be built.
    pub fn start_with_interval<F>(
        config: RateConfig,
        interval: Duration,
        sink: F,
    ) -> Result<RatePollerHandle>
    where
        F: FnMut(Decimal) + Send + 'static,
    {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let gate: Gate<RateSink> = Gate::new(Box::new(sink));
        let task_gate = gate.clone();

        info!(
            symbol = %config.symbol,
            interval_secs = interval.as_secs(),
            "Starting rate poller"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let rate = fetch_rate(&client, &config).await;
                if rate.is_zero() {
                    continue;
                }

                debug!(symbol = %config.symbol, %rate, "Rate updated");
                if task_gate.with(|sink| sink(rate)).is_none() {
                    return;
                }
            }
        });

        Ok(RatePollerHandle {
            gate,
            task: Some(task),
        })
    }
}

/// Owner of a running rate poller. Dropping the handle stops it.
pub struct RatePollerHandle {
    gate: Gate<RateSink>,
    task: Option<JoinHandle<()>>,
}

impl RatePollerHandle {
    /// Stops polling. A fetch still in flight is discarded when it resolves.
    pub fn stop(&mut self) {
        if self.gate.close() {
            info!("Stopping rate poller");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_stopped(&self) -> bool {
        !self.gate.is_open()
    }
}

impl Drop for RatePollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
