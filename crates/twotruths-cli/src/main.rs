//! Operator CLI for the Two Truths and a Lie backend.
//!
//! Commands:
//! - demo-round: play a scripted three-player round against the store
//! - export-csv <session_id>: dump statements, votes and scores as CSVs
//! - reset-session <session_id>: wipe a session's partition

mod demo;
mod export;
mod reset;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::warn;

use twotruths_core::store::TableStore;
use twotruths_game::repository::GameRepository;
use twotruths_table_store::{MemoryTableStore, PgTableStore};

#[derive(Parser)]
#[command(name = "twotruths-cli")]
#[command(about = "Operator tooling for the Two Truths and a Lie backend")]
struct Args {
    /// Postgres connection string; falls back to the DATABASE_URL
    /// environment variable
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a scripted three-player round and print the reveal
    DemoRound {
        /// Seed for the presentation shuffles and demo votes
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Export a session's statements, votes and scores as CSV files
    ExportCsv {
        /// Session identifier to export
        session_id: String,

        /// Output directory for the CSV files
        #[arg(long, default_value = "./exports")]
        out: String,
    },

    /// Delete every record in a session's partition
    ResetSession {
        /// Session identifier to wipe
        session_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok());
    let store: Arc<dyn TableStore> = match database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await?;
            let store = PgTableStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, using an in-memory store that is discarded on exit");
            Arc::new(MemoryTableStore::new())
        }
    };
    let repo = GameRepository::new(store);

    match args.command {
        Command::DemoRound { seed } => demo::run(&repo, seed).await?,
        Command::ExportCsv { session_id, out } => export::run(&repo, &session_id, &out).await?,
        Command::ResetSession { session_id } => reset::run(&repo, &session_id).await?,
    }

    Ok(())
}
