//! Smoke-test bot: registers a player, then bets and cashes out at a target
//! multiplier for a number of rounds against a live server.

use anyhow::Context;
use aviator_client::{Client, Error};
use clap::Parser;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    url: String,

    #[arg(long, default_value = "bot@example.com")]
    player: String,

    #[arg(long, default_value_t = 100)]
    wager: u64,

    /// Cash out once the live multiplier reaches this value.
    #[arg(long, default_value_t = 1.5)]
    target_multiplier: f64,

    #[arg(long, default_value_t = 5)]
    rounds: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let client = Client::new(&args.url).context("invalid server url")?;

    match client.register(&args.player).await {
        Ok(response) => info!(balance = response.balance, "registered"),
        Err(Error::Rejected { code, .. }) if code == "PlayerAlreadyRegistered" => {
            let balance = client.balance(&args.player).await?.balance;
            info!(balance, "already registered");
        }
        Err(err) => return Err(err).context("registration failed"),
    }

    for _ in 0..args.rounds {
        // Wait for a round to accept bets.
        let round_id = loop {
            let status = client.round().await?;
            if status.active {
                break status.round_id;
            }
            sleep(Duration::from_millis(200)).await;
        };

        let bet = match client.place_bet(&args.player, args.wager).await {
            Ok(bet) => bet,
            Err(Error::Rejected { code, message }) => {
                // Lost the race with the crash; try the next round.
                warn!(code, message, "bet rejected");
                continue;
            }
            Err(err) => return Err(err).context("bet failed"),
        };
        info!(round = round_id, balance = bet.new_balance, "bet placed");

        // Ride until the target multiplier or the crash.
        loop {
            let status = client.round().await?;
            if !status.active || status.round_id != round_id {
                warn!(round = round_id, "crashed before target");
                break;
            }
            if status.multiplier >= args.target_multiplier {
                match client.cash_out(&args.player).await {
                    Ok(receipt) => info!(
                        round = round_id,
                        multiplier = receipt.multiplier,
                        payout = receipt.payout,
                        balance = receipt.new_balance,
                        "cashed out"
                    ),
                    Err(Error::Rejected { code, message }) => {
                        warn!(code, message, "cashout rejected")
                    }
                    Err(err) => return Err(err).context("cashout failed"),
                }
                break;
            }
            sleep(Duration::from_millis(50)).await;
        }
    }

    let balance = client.balance(&args.player).await?.balance;
    info!(balance, "done");
    Ok(())
}
