use std::path::PathBuf;

use chrono::Utc;
use flappy_engine::{BoxedController, GenerationRunner, Idle, ObstacleSeed};
use rand::Rng as _;

use crate::{
    command::SimArg,
    schema::{
        model::BirdModel,
        record::{PilotInfo, RecordedRun},
    },
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RecordArg {
    /// Trained model flying the birds; birds never flap when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of birds in the cohort
    #[arg(long, default_value_t = 1)]
    birds: usize,
    /// Obstacle seed (hex); random when omitted
    #[arg(long)]
    pub(crate) seed: Option<ObstacleSeed>,
    #[clap(flatten)]
    sim: SimArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RecordArg) -> anyhow::Result<()> {
    let RecordArg {
        model,
        birds,
        seed,
        sim,
        output,
    } = arg;
    let config = sim.load_config()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    let pilot = match model {
        Some(path) => PilotInfo::Model {
            model: BirdModel::open(path)?,
        },
        None => PilotInfo::Idle,
    };
    let controllers = (0..*birds)
        .map(|_| -> anyhow::Result<BoxedController> {
            match &pilot {
                PilotInfo::Idle => Ok(Box::new(Idle)),
                PilotInfo::Model { model } => Ok(Box::new(model.to_network()?)),
            }
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut runner = GenerationRunner::new(config.clone(), seed, controllers)?
        .with_tick_budget(sim.tick_budget());
    let mut frames = vec![runner.simulation().snapshot()];
    runner.run_with(|simulation, _| frames.push(simulation.snapshot()))?;
    let outcome = runner.finish();

    tracing::info!(
        %seed,
        frames = frames.len(),
        score = outcome.score,
        end = ?outcome.end,
        "run recorded"
    );
    let record = RecordedRun {
        recorded_at: Utc::now(),
        seed,
        config,
        pilot,
        frames,
        outcome,
    };
    Output::save_json(&record, output.clone())?;

    if let Some(path) = output {
        eprintln!("Recording saved to {}", path.display());
    }
    Ok(())
}
