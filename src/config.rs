//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `TICKERBOARD_STREAM_URL`: combined-stream WebSocket endpoint
//! - `TICKERBOARD_RATE_URL`: REST price endpoint used for currency conversion
//! - `TICKERBOARD_RATE_SYMBOL`: pair queried on the rate endpoint
//! - `TICKERBOARD_PAIRS_FILE`: where the watch list is persisted
//! - `TICKERBOARD_LOG_FILE`: log destination while the TUI owns the terminal

use std::path::PathBuf;

use crate::TickerboardError;

/// Default public combined-stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/stream";

/// Default public price endpoint.
pub const DEFAULT_RATE_URL: &str = "https://api.binance.com/api/v3/ticker/price";

/// USDT priced in BRL.
pub const DEFAULT_RATE_SYMBOL: &str = "USDTBRL";

const DEFAULT_LOG_FILE: &str = "tickerboard.log";

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub rate: RateConfig,
    pub pairs_file: PathBuf,
    pub log_file: PathBuf,
}

/// Market data stream settings.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub stream_url: String,
}

/// Conversion rate endpoint settings.
#[derive(Clone, Debug)]
pub struct RateConfig {
    pub url: String,
    pub symbol: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
        }
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RATE_URL.to_string(),
            symbol: DEFAULT_RATE_SYMBOL.to_string(),
        }
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`TickerboardError::Config`] if a URL uses the wrong scheme or
/// the rate symbol is not alphanumeric.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let stream_url =
        non_empty_var("TICKERBOARD_STREAM_URL").unwrap_or_else(|| DEFAULT_STREAM_URL.to_string());
    if !(stream_url.starts_with("ws://") || stream_url.starts_with("wss://")) {
        return Err(TickerboardError::Config(format!(
            "TICKERBOARD_STREAM_URL must start with ws:// or wss://, got {stream_url}"
        )));
    }

    let rate_url =
        non_empty_var("TICKERBOARD_RATE_URL").unwrap_or_else(|| DEFAULT_RATE_URL.to_string());
    if !(rate_url.starts_with("http://") || rate_url.starts_with("https://")) {
        return Err(TickerboardError::Config(format!(
            "TICKERBOARD_RATE_URL must start with http:// or https://, got {rate_url}"
        )));
    }

    let rate_symbol = non_empty_var("TICKERBOARD_RATE_SYMBOL")
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| DEFAULT_RATE_SYMBOL.to_string());
    if !rate_symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TickerboardError::Config(format!(
            "TICKERBOARD_RATE_SYMBOL must be alphanumeric, got {rate_symbol}"
        )));
    }

    let pairs_file = non_empty_var("TICKERBOARD_PAIRS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(default_pairs_file);

    let log_file = non_empty_var("TICKERBOARD_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Ok(AppConfig {
        feed: FeedConfig { stream_url },
        rate: RateConfig {
            url: rate_url,
            symbol: rate_symbol,
        },
        pairs_file,
        log_file,
    })
}

/// `$HOME/.config/tickerboard/pairs.json`, or `pairs.json` without a home.
fn default_pairs_file() -> PathBuf {
    match non_empty_var("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".config")
            .join("tickerboard")
            .join("pairs.json"),
        None => PathBuf::from("pairs.json"),
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes tests that mutate the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let originals: Vec<(&str, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            // SAFETY: every env-mutating test holds ENV_LOCK.
            unsafe {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values while still holding ENV_LOCK.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    const ALL_VARS: [&str; 5] = [
        "TICKERBOARD_STREAM_URL",
        "TICKERBOARD_RATE_URL",
        "TICKERBOARD_RATE_SYMBOL",
        "TICKERBOARD_PAIRS_FILE",
        "TICKERBOARD_LOG_FILE",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|k| (*k, None)).collect()
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&cleared(), || {
            let config = fetch_config().unwrap();
            assert_eq!(config.feed.stream_url, DEFAULT_STREAM_URL);
            assert_eq!(config.rate.url, DEFAULT_RATE_URL);
            assert_eq!(config.rate.symbol, "USDTBRL");
            assert!(config.pairs_file.ends_with("pairs.json"));
            assert_eq!(config.log_file, PathBuf::from("tickerboard.log"));
        });
    }

    #[test]
    fn custom_values_from_env() {
        let mut vars = cleared();
        vars.push(("TICKERBOARD_STREAM_URL", Some("ws://127.0.0.1:9001/stream")));
        vars.push(("TICKERBOARD_RATE_SYMBOL", Some("usdteur")));
        vars.push(("TICKERBOARD_PAIRS_FILE", Some("/tmp/pairs.json")));
        with_env(&vars, || {
            let config = fetch_config().unwrap();
            assert_eq!(config.feed.stream_url, "ws://127.0.0.1:9001/stream");
            assert_eq!(config.rate.symbol, "USDTEUR");
            assert_eq!(config.pairs_file, PathBuf::from("/tmp/pairs.json"));
        });
    }

    #[test]
    fn rejects_non_websocket_stream_url() {
        let mut vars = cleared();
        vars.push(("TICKERBOARD_STREAM_URL", Some("https://stream.example.com")));
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("TICKERBOARD_STREAM_URL"));
        });
    }

    #[test]
    fn rejects_non_http_rate_url() {
        let mut vars = cleared();
        vars.push(("TICKERBOARD_RATE_URL", Some("ftp://prices.example.com")));
        with_env(&vars, || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("TICKERBOARD_RATE_URL"));
        });
    }

    #[test]
    fn rejects_rate_symbol_with_separator() {
        let mut vars = cleared();
        vars.push(("TICKERBOARD_RATE_SYMBOL", Some("USDT/BRL")));
        with_env(&vars, || {
            assert!(matches!(fetch_config(), Err(TickerboardError::Config(_))));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        let vars: Vec<_> = ALL_VARS.iter().map(|k| (*k, Some(""))).collect();
        with_env(&vars, || {
            let config = fetch_config().unwrap();
            assert_eq!(config.feed.stream_url, DEFAULT_STREAM_URL);
            assert_eq!(config.rate.url, DEFAULT_RATE_URL);
            assert_eq!(config.rate.symbol, DEFAULT_RATE_SYMBOL);
        });
    }
}
