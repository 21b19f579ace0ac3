//! RPS Judge Agent
//!
//! Judges a round once exactly two moves are visible and shares the result
//! with both players.

use clap::Parser;
use rps_core::{collect_round, judge_round, share_result_with_players, RoundError, RoundId};
use rps_store::HttpRecordStore;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit code for "too early, try again later"
const EXIT_PENDING: u8 = 2;

#[derive(Parser)]
#[command(name = "rps-judge", version, about = "Judge a rock-paper-scissors round")]
struct Cli {
    /// The round number
    round: RoundId,

    /// Only re-share this judge's results with the round's players
    #[arg(long)]
    share_only: bool,

    /// The judge's client ID
    #[arg(long, env = "RPS_CLIENT_ID")]
    client_id: String,

    /// Record store service URL
    #[arg(long, env = "RPS_STORE_URL", default_value = "http://localhost:3000")]
    store_url: String,
}

async fn run(cli: Cli) -> Result<(), RoundError> {
    let store = HttpRecordStore::new(cli.store_url, cli.client_id);

    if cli.share_only {
        let view = collect_round(&store, cli.round).await?;
        share_result_with_players(&store, view.players()).await?;
        println!("Shared results with {} and {}", view.first.player_name, view.second.player_name);
        return Ok(());
    }

    match judge_round(&store, cli.round).await {
        Ok(judgement) => {
            println!("Successfully saved result for round {}", cli.round);
            println!("Wrote record {}", judgement.record_id);
            println!("Round {} Judged! Winner: {}", cli.round, judgement.winner);
            Ok(())
        }
        Err(err @ RoundError::Sharing { .. }) => {
            if let Some(record_id) = err.written_record() {
                println!("Successfully saved result for round {}", cli.round);
                println!("Wrote record {}", record_id);
            }
            eprintln!("Result was saved but not shared; retry with --share-only");
            Err(err)
        }
        Err(err) => Err(err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting up logging: {}", err);
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_transient() => {
            eprintln!("{}; try again later", err);
            ExitCode::from(EXIT_PENDING)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
