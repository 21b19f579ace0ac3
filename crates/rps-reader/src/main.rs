//! RPS Result Reader
//!
//! Reports the judged winner of a round.

use clap::Parser;
use rps_core::{lookup_result, ResultStatus, RoundError, RoundId};
use rps_store::HttpRecordStore;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit code for "not judged yet"
const EXIT_PENDING: u8 = 2;

#[derive(Parser)]
#[command(name = "rps-reader", version, about = "Show the winner of a rock-paper-scissors round")]
struct Cli {
    /// The round number
    round: RoundId,

    /// The reader's client ID
    #[arg(long, env = "RPS_CLIENT_ID")]
    client_id: String,

    /// Record store service URL
    #[arg(long, env = "RPS_STORE_URL", default_value = "http://localhost:3000")]
    store_url: String,
}

async fn run(cli: Cli) -> Result<ResultStatus, RoundError> {
    let store = HttpRecordStore::new(cli.store_url, cli.client_id);
    lookup_result(&store, cli.round).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting up logging: {}", err);
    }

    let cli = Cli::parse();
    let round = cli.round;
    match run(cli).await {
        Ok(ResultStatus::Judged { winner, .. }) => {
            println!("Round {} Winner: {}", round, winner);
            ExitCode::SUCCESS
        }
        Ok(ResultStatus::Pending) => {
            eprintln!("There is no result for round {} yet", round);
            ExitCode::from(EXIT_PENDING)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
