use crate::{
    pkg::{internal::worker, server::listen},
    prelude::Result,
};
use clap::{Parser, Subcommand};

mod migrate;
mod seed;

#[derive(Parser)]
#[command(about = "candidate evaluation services")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// serve the evaluation api
    Listen,
    /// consume queued evaluation jobs
    Work,
    Migrate,
    /// populate default rubrics and their embeddings
    Seed,
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Work) => {
            worker::work().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::Seed) => {
            seed::apply().await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
