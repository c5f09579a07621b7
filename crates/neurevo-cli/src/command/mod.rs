use clap::{Parser, Subcommand};

use self::{replay::ReplayArg, train::TrainArg};

mod replay;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve networks with the genetic algorithm
    Train(TrainArg),
    /// Replay a persisted network in the demo environment
    Replay(ReplayArg),
}

pub fn run() -> anyhow::Result<()> {
    match CommandArgs::parse().mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}
