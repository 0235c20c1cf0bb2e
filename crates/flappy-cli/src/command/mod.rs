use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flappy_engine::SimConfig;

use crate::util;

use self::{
    dump_config::DumpConfigArg, evaluate::EvaluateArg, record::RecordArg, train::TrainArg,
};

mod dump_config;
mod evaluate;
mod record;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve flap controllers with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Fly a trained model through several obstacle courses
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Record one generation frame by frame for an external renderer
    Record(#[clap(flatten)] RecordArg),
    /// Print the default simulation config as JSON
    DumpConfig(#[clap(flatten)] DumpConfigArg),
}

/// Simulation options shared by every command that flies birds.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimArg {
    /// JSON file overriding the default simulation config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop a generation after this many ticks (0 disables the budget)
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,
}

impl SimArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<SimConfig> {
        let config = match &self.config {
            Some(path) => util::read_json_file::<SimConfig, _>("simulation config", path)?,
            None => SimConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn tick_budget(&self) -> Option<u64> {
        (self.max_ticks > 0).then_some(self.max_ticks)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Record(arg) => record::run(&arg)?,
        Mode::DumpConfig(arg) => dump_config::run(&arg)?,
    }
    Ok(())
}
