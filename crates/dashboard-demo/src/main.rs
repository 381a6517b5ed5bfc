//! dashboard-demo
//!
//! Headless run of the mock dashboard: builds chart history, pads the trade
//! log, then watches the live ticker and prints the portfolio as it moves.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard_core::{
    EngineConfig, MockPriceFeed, PriceTicker, Range, ReportFormat, SeriesBook, Symbol,
    fixtures::{initial_prices, sample_wallets},
    portfolio::{aggregate_portfolio, dominant_symbol, report, wallet_change},
    series::wallet_series,
    trades::{TradeQuery, generate_trades, pad_history},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env();
    config.validate()?;
    tracing::info!(?config, "configuration loaded");

    let wallets = sample_wallets()?;
    let prices = initial_prices();
    let now = Utc::now();
    let end_ms = now.timestamp_millis();

    // Chart history
    let book = SeriesBook::generate(&prices, &Symbol::all(), end_ms);
    for range in Range::all() {
        for symbol in Symbol::all() {
            let series = book.resolve(range, symbol, &prices, end_ms);
            if let Some(stats) = series.stats() {
                tracing::info!(
                    %range,
                    %symbol,
                    points = series.len(),
                    open = %stats.open,
                    close = %stats.close,
                    change_pct = %(stats.change_pct * dec!(100)).round_dp(2),
                    "series ready"
                );
            }
        }
        for wallet in &wallets {
            let value = wallet_series(wallet, &book, range, &prices, end_ms);
            tracing::debug!(%range, wallet = %wallet.name, points = value.len(), "wallet series ready");
        }
    }

    // Trade history: a short recent log padded back to the full window
    let params = config.trade_params();
    let recent: Vec<_> = generate_trades(&params, now)
        .into_iter()
        .filter(|t| now - t.timestamp < Duration::days(30))
        .collect();
    let supplied = recent.len();
    let history = pad_history(recent, &params, config.pad_seed, now);
    tracing::info!(supplied, total = history.len(), "trade history padded");

    let latest = TradeQuery::default().page(&history, 1);
    for trade in &latest.trades {
        tracing::info!(
            id = %trade.id,
            side = %trade.side,
            symbol = %trade.symbol,
            quantity = %trade.quantity,
            price = %trade.price,
            fee = %trade.fee_usd,
            "recent trade"
        );
    }

    // Live ticker
    let mut ticker = PriceTicker::start(prices, config.tick_interval(), Arc::new(MockPriceFeed::new()))?;
    let mut updates = ticker.subscribe();

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("watching {} ticks every {:?}", config.demo_ticks, config.tick_interval());
    tracing::info!("══════════════════════════════════════════════════");

    let target = config.demo_ticks as u64;
    while target > 0 {
        if updates.changed().await.is_err() {
            tracing::warn!("ticker closed early");
            break;
        }
        let snapshot = updates.borrow_and_update().clone();
        // The connect notice carries no price movement
        if snapshot.ticks == 0 {
            continue;
        }

        for wallet in &wallets {
            let change = wallet_change(wallet, &snapshot.current, &snapshot.previous);
            tracing::info!(
                wallet = %wallet.name,
                value = %change.current.round_dp(2),
                delta = %change.delta.round_dp(2),
                direction = ?change.direction,
                top = ?dominant_symbol(wallet, &snapshot.current),
                tick = snapshot.ticks,
                "wallet update"
            );
        }

        let summary = aggregate_portfolio(&wallets, &snapshot.current);
        match config.report {
            ReportFormat::Text => println!("{}", report::render_text(&summary, &snapshot.current)),
            ReportFormat::Json => println!("{}", report::render_json(&summary)?),
        }

        if snapshot.ticks >= target {
            break;
        }
    }

    ticker.stop().await;
    tracing::info!(status = ?ticker.status(), "done");

    Ok(())
}
