use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tickerboard::config::{AppConfig, fetch_config};
use tickerboard::feed::{FeedClient, FeedEvent, FeedHandle};
use tickerboard::rate::RatePoller;
use tickerboard::store::TickerStore;
use tickerboard::tui::event::{spawn_event_reader, spawn_tick_timer};
use tickerboard::tui::terminal::is_interactive;
use tickerboard::tui::{
    Action, App, FeedForwarder, Message, Tui, render, restore_terminal, setup_terminal, update,
};
use tickerboard::watchlist::{WatchList, format_symbol};
use tickerboard::{Result, TickerboardError};

/// Refresh period for redraws and flash expiry.
const UI_TICK_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let headless = std::env::args().skip(1).any(|arg| arg == "--headless") || !is_interactive();

    let app_config = fetch_config()?;

    if headless {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
        run_headless(app_config).await
    } else {
        init_file_logging(&app_config.log_file)?;
        run_tui(app_config).await
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs go to a file while the TUI owns the terminal.
fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        TickerboardError::Io(format!("failed to create log file {}: {e}", path.display()))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Streams ticks to the log until Ctrl-C.
async fn run_headless(config: AppConfig) -> Result<()> {
    let watchlist = WatchList::load(&config.pairs_file);
    info!(
        pairs = %watchlist.display_text(),
        file = %watchlist.path().display(),
        "Starting headless ticker board"
    );

    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel::<FeedEvent>();
    let feed = FeedClient::connect(&config.feed, watchlist.symbols(), feed_tx);

    let (rate_tx, mut rate_rx) = mpsc::unbounded_channel::<Decimal>();
    let mut poller = RatePoller::start(config.rate.clone(), move |rate| {
        let _ = rate_tx.send(rate);
    })?;

    let mut store = TickerStore::new();
    let mut rate = Decimal::ZERO;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, shutting down");
                break;
            }
            Some(new_rate) = rate_rx.recv() => {
                info!(symbol = %format_symbol(&config.rate.symbol), rate = %new_rate, "Conversion rate");
                rate = new_rate;
            }
            event = feed_rx.recv() => match event {
                Some(FeedEvent::Tick(tick)) => {
                    if !watchlist.contains(&tick.symbol) {
                        continue;
                    }
                    let symbol = tick.symbol.clone();
                    let last = tick.last;
                    let change_pct = tick.change_pct;
                    let direction = store.apply(tick, Instant::now());
                    let converted = (!rate.is_zero()).then(|| (last * rate).round_dp(2));

                    info!(
                        pair = %format_symbol(&symbol),
                        %last,
                        %change_pct,
                        converted = ?converted,
                        direction = ?direction,
                        "Tick"
                    );
                }
                Some(FeedEvent::Open) => info!("Feed connected"),
                Some(FeedEvent::Close(reason)) => warn!(?reason, "Feed closed, reconnecting"),
                Some(FeedEvent::Error(error)) => debug!("Feed error: {error}"),
                None => break,
            },
        }
    }

    poller.stop();
    feed.shutdown().await;
    Ok(())
}

/// Runs the interactive dashboard.
async fn run_tui(config: AppConfig) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &config).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Tui, config: &AppConfig) -> Result<()> {
    let watchlist = WatchList::load(&config.pairs_file);
    let mut app = App::new(watchlist, config.rate.symbol.clone());

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), UI_TICK_MS);

    let quit_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = quit_tx.send(Message::Quit);
        }
    });

    let mut feed = start_feed(&mut app, config, &tx);

    let rate_tx = tx.clone();
    let mut poller = RatePoller::start(config.rate.clone(), move |rate| {
        let _ = rate_tx.send(Message::Rate(rate));
    })?;

    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, &app))
            .map_err(|e| TickerboardError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };

        // Drain whatever queued up meanwhile so bursts cost one redraw.
        let mut resubscribe = update(&mut app, message) == Some(Action::Resubscribe);
        while let Ok(message) = rx.try_recv() {
            resubscribe |= update(&mut app, message) == Some(Action::Resubscribe);
        }

        if resubscribe && !app.should_quit {
            info!(pairs = %app.watchlist.display_text(), "Resubscribing");
            feed.dispose();
            feed = start_feed(&mut app, config, &tx);
        }
    }

    poller.stop();
    feed.shutdown().await;
    Ok(())
}

fn start_feed(app: &mut App, config: &AppConfig, tx: &mpsc::UnboundedSender<Message>) -> FeedHandle {
    let generation = app.next_feed_generation();
    FeedClient::connect(
        &config.feed,
        app.symbols(),
        FeedForwarder::new(generation, tx.clone()),
    )
}
