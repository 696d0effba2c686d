//! BTC price watcher entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use btc_sentinel::config::Config;
use btc_sentinel::engine;
use btc_sentinel::market::MarketClient;
use btc_sentinel::notify::Notifier;
use btc_sentinel::state::StateStore;

/// BTC price watcher posting threshold alerts to a webhook.
#[derive(Parser, Debug)]
#[command(name = "btc-sentinel")]
#[command(about = "Polls the spot price and posts ATH/band/summary alerts to a webhook")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Log alerts instead of posting them.
    #[arg(long)]
    dry_run: Option<bool>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one watch pass (default).
    Run {
        /// Log alerts instead of posting them.
        #[arg(long)]
        dry_run: Option<bool>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the persisted state record.
    ShowState,

    /// Fetch and print the current spot price.
    Price,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("btc_sentinel=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::ShowState) => cmd_show_state(),
        Some(Command::Price) => cmd_price().await,
        Some(Command::Run { dry_run }) => cmd_run(dry_run).await,
        None => cmd_run(args.dry_run).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BTC SENTINEL - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Coin: {} ({})", config.coin_id, config.vs_currency);
    println!("  State File: {}", config.state_file.display());
    println!(
        "  Alert Bands: {}",
        config
            .alert_bands
            .iter()
            .map(|b| format!("{}%", b))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Retry: {} attempts, {}s base delay",
        config.retry_attempts, config.retry_base_delay_secs
    );
    println!("  UTC Offset: {:+}h", config.utc_offset_hours);
    println!(
        "  Weekly Summary: {} at {:02}:00",
        config.weekly_summary_weekday, config.weekly_summary_hour
    );
    println!(
        "  Monthly Summary: last day of month at {:02}:00",
        config.monthly_summary_hour
    );
    println!("  Webhook: {}", if config.discord_webhook_url.is_empty() { "not set" } else { "present" });
    println!("  Dry Run: {}", config.dry_run);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the persisted state record.
fn cmd_show_state() -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = StateStore::new(&config.state_file);

    println!("State file: {}", store.path().display());
    let state = store.load();
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}

/// Fetch and print the current spot price.
async fn cmd_price() -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = MarketClient::new(&config);

    let price = client.fetch_price().await?;
    println!("{}: {}", config.coin_id, btc_sentinel::format::fmt_usd(price));

    Ok(())
}

/// Run one watch pass: fetch, evaluate, notify, persist.
async fn cmd_run(dry_run_override: Option<bool>) -> anyhow::Result<()> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(dry_run) = dry_run_override {
        config.dry_run = dry_run;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Mode: {}", if config.dry_run { "DRY RUN" } else { "LIVE" });
    info!("Watching {} ({})", config.coin_id, config.vs_currency);

    let store = StateStore::new(&config.state_file);
    let client = MarketClient::new(&config);
    let notifier = Notifier::new(&config);

    let now = chrono::Utc::now().with_timezone(&config.timezone());
    let today = now.date_naive();

    let mut state = store.load();

    // Primary fetch: exhausted retries end the run with a non-zero exit,
    // after a best-effort failure alert.
    let price = match client.fetch_price().await {
        Ok(p) => p,
        Err(e) => {
            error!("price fetch failed after {} attempts: {}", config.retry_attempts, e);
            notifier
                .notify(&format!(
                    "⚠️ {} price fetch failed after {} attempts: {}",
                    config.coin_id, config.retry_attempts, e
                ))
                .await;
            return Err(e.into());
        }
    };
    info!(price, "fetched spot price");

    // First-ever run: seed the record, announce, and stop early.
    if !state.initialized {
        let seeded_ath = client.fetch_market_data().await.map(|s| s.ath);
        let event = engine::initialize(&mut state, price, seeded_ath, today);
        notifier.notify(&event.render(&now)).await;
        store.save(&state)?;
        info!("state initialized, run complete");
        return Ok(());
    }

    let mut events = engine::evaluate_tick(&mut state, price, today, &config.alert_bands);

    if let Some(weekday) = config.weekly_weekday() {
        if engine::weekly_summary_due(&state, &now, weekday, config.weekly_summary_hour) {
            match client.fetch_market_data().await {
                Some(snapshot) => {
                    events.push(engine::apply_weekly_summary(&mut state, price, &snapshot, today));
                }
                None => info!("weekly summary skipped: market data unavailable"),
            }
        }
    }

    if engine::monthly_summary_due(&state, &now, config.monthly_summary_hour) {
        match client.fetch_market_data().await {
            Some(snapshot) => {
                events.push(engine::apply_monthly_summary(&mut state, price, &snapshot, today));
            }
            None => info!("monthly summary skipped: market data unavailable"),
        }
    }

    state.last_price = price;

    // Delivery failures are swallowed inside the notifier, so the record
    // below persists regardless.
    for event in &events {
        notifier.notify(&event.render(&now)).await;
    }

    store.save(&state)?;

    info!(events = events.len(), "run complete");
    Ok(())
}
