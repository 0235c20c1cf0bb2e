use std::path::PathBuf;

use flappy_engine::{BoxedController, GenerationRunner, ObstacleSeed};
use flappy_training::stats::DescriptiveStats;
use rand::Rng as _;

use crate::{command::SimArg, schema::model::BirdModel};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Trained model file
    #[arg(long)]
    model: PathBuf,
    /// Number of obstacle courses to fly
    #[arg(long, default_value_t = 5)]
    runs: usize,
    /// Base obstacle seed (hex); random when omitted
    #[arg(long)]
    seed: Option<ObstacleSeed>,
    #[clap(flatten)]
    pub(crate) sim: SimArg,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        model,
        runs,
        seed,
        sim,
    } = arg;
    let config = sim.load_config()?;
    let model = BirdModel::open(model)?;
    let base_seed = seed.unwrap_or_else(|| rand::rng().random());

    eprintln!("Evaluating {} ({})", model.name, model.topology);
    eprintln!("  Run  Seed                              Score    Ticks   Fitness  End");
    let mut scores = Vec::with_capacity(*runs);
    for run in 0..*runs {
        let seed = base_seed.nth(run as u64);
        let controllers: Vec<BoxedController> = vec![Box::new(model.to_network()?)];
        let mut runner = GenerationRunner::new(config.clone(), seed, controllers)?
            .with_tick_budget(sim.tick_budget());
        runner.run()?;
        let outcome = runner.finish();
        eprintln!(
            "  {run:3}  {seed}  {:5}  {:7}  {:8.2}  {:?}",
            outcome.score, outcome.ticks, outcome.fitness[0], outcome.end
        );
        #[expect(clippy::cast_precision_loss)]
        scores.push(outcome.score as f32);
    }

    if let Some(stats) = DescriptiveStats::new(scores) {
        eprintln!();
        eprintln!("Score Stats:");
        eprintln!("  Min:    {:.1}", stats.min);
        eprintln!("  Max:    {:.1}", stats.max);
        eprintln!("  Mean:   {:.2}", stats.mean);
        eprintln!("  Median: {:.1}", stats.median);
    }
    Ok(())
}
