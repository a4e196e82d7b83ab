use anyhow::Context;
use aviator_engine::{Engine, EngineConfig, Scheduler};
use aviator_server::Api;
use aviator_types::game::{self, MIN_CRASH_BPS};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Round clock tick in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Delay between a crash and the next round, in milliseconds.
    #[arg(long, default_value_t = 3_000)]
    cooldown_ms: u64,

    /// Delay before the first round, in milliseconds.
    #[arg(long, default_value_t = 5_000)]
    initial_delay_ms: u64,

    /// Crash point used until an operator overrides it.
    #[arg(long, default_value_t = 2.50)]
    default_crash_point: f64,

    /// Balance seeded into newly registered accounts.
    #[arg(long, default_value_t = 10_000)]
    starting_balance: u64,

    /// Completed rounds retained in history.
    #[arg(long, default_value_t = 50)]
    history_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let default_crash_bps = game::multiplier_to_bps(args.default_crash_point)
        .filter(|bps| *bps >= MIN_CRASH_BPS)
        .context("default crash point must be a finite value of at least 1.01")?;

    let config = EngineConfig {
        starting_balance: args.starting_balance,
        default_crash_bps,
        tick_interval: Duration::from_millis(args.tick_ms),
        cooldown: Duration::from_millis(args.cooldown_ms),
        initial_delay: Duration::from_millis(args.initial_delay_ms),
        history_capacity: args.history_capacity,
        ..EngineConfig::default()
    };

    let engine = Arc::new(Engine::new(config));
    let api = Api::new(engine.clone());
    let app = api.router();

    // Drive rounds for the lifetime of the process.
    tokio::spawn(Scheduler::new(engine).run());

    // Start server
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("axum server error")?;

    Ok(())
}
