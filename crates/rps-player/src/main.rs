//! RPS Player Agent
//!
//! Submits one move for a round and shares it with the judge.

use clap::Parser;
use rps_core::{
    resolve_judge_id, share_moves_with_judge, submit_move, ClientId, Move, MoveSubmission,
    RoundError, RoundId,
};
use rps_store::{HttpRecordStore, RecordStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "rps-player", version, about = "Submit a rock-paper-scissors move")]
struct Cli {
    /// The round number
    #[arg(required_unless_present = "share_only")]
    round: Option<RoundId>,

    /// The player name
    #[arg(required_unless_present = "share_only")]
    name: Option<String>,

    /// The player move: rock, paper or scissors (any case)
    #[arg(value_name = "MOVE", required_unless_present = "share_only")]
    player_move: Option<Move>,

    /// Client ID of the judge; overrides the config file
    #[arg(long)]
    judge_id: Option<String>,

    /// JSON file holding `judge_client_id` [default: judge-client-id.json]
    #[arg(long)]
    judge_config: Option<PathBuf>,

    /// Only re-share this player's moves with the judge, without writing a move
    #[arg(long)]
    share_only: bool,

    /// This player's client ID
    #[arg(long, env = "RPS_CLIENT_ID")]
    client_id: String,

    /// Record store service URL
    #[arg(long, env = "RPS_STORE_URL", default_value = "http://localhost:3000")]
    store_url: String,
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let judge_id = resolve_judge_id(cli.judge_id.map(ClientId::from), cli.judge_config.as_deref())?;
    let store = HttpRecordStore::new(cli.store_url, cli.client_id);

    if cli.share_only {
        share_moves_with_judge(&store, &judge_id).await?;
        println!("Shared moves with judge {}", judge_id);
        return Ok(());
    }

    let (Some(round), Some(name), Some(player_move)) = (cli.round, cli.name, cli.player_move)
    else {
        return Err("round, name and move are required".into());
    };
    let submission =
        MoveSubmission::new(round, name, player_move.as_str(), store.client_id().clone())?;

    match submit_move(&store, &submission, &judge_id).await {
        Ok(record_id) => {
            println!("Successfully saved move for round {}", round);
            println!("Wrote record {}", record_id);
            info!(%round, judge = %judge_id, "move shared with judge");
            Ok(())
        }
        Err(err @ RoundError::Sharing { .. }) => {
            if let Some(record_id) = err.written_record() {
                println!("Successfully saved move for round {}", round);
                println!("Wrote record {}", record_id);
            }
            eprintln!("Move was saved but not shared; retry with --share-only");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
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
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
