use std::path::PathBuf;

use chrono::Utc;
use flappy_engine::ObstacleSeed;
use flappy_training::{
    genetic::{Population, PopulationEvolver},
    network::Topology,
};
use rand::Rng as _;

use crate::{command::SimArg, schema::model::BirdModel, util::Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    fn from_generation(generation: usize) -> Self {
        match generation {
            0..10 => Self::Exploration,
            10..30 => Self::Transition,
            _ => Self::Convergence,
        }
    }
}

const ELITE_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 3;
const MAX_WEIGHT: f32 = 5.0;
const MUTATION_RATE: f32 = 0.3;
const BLX_ALPHA: f32 = 0.2;

const fn mutation_sigma_by_phase(phase: EvolutionPhase) -> f32 {
    match phase {
        EvolutionPhase::Exploration => 0.5,
        EvolutionPhase::Transition => 0.2,
        EvolutionPhase::Convergence => 0.05,
    }
}

const fn evolver_by_phase(phase: EvolutionPhase) -> PopulationEvolver {
    PopulationEvolver {
        elite_count: ELITE_COUNT,
        tournament_size: TOURNAMENT_SIZE,
        max_weight: MAX_WEIGHT,
        mutation_sigma: mutation_sigma_by_phase(phase),
        blx_alpha: BLX_ALPHA,
        mutation_rate: MUTATION_RATE,
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Maximum number of generations to evolve
    #[arg(long, default_value_t = 50)]
    pub(crate) generations: usize,
    /// Individuals per generation
    #[arg(long, default_value_t = 50)]
    pub(crate) population: usize,
    /// Obstacle courses each generation is flown on; fitness is averaged over them
    #[arg(long, default_value_t = 3)]
    cohorts: usize,
    /// Hidden neurons in the controller network (0 for none)
    #[arg(long, default_value_t = 0)]
    hidden: usize,
    /// Stop early once the best individual reaches this fitness
    #[arg(long)]
    pub(crate) fitness_threshold: Option<f32>,
    /// Base obstacle seed (hex); random when omitted
    #[arg(long)]
    seed: Option<ObstacleSeed>,
    /// Name stored in the saved model
    #[arg(long, default_value = "flappy")]
    name: String,
    #[clap(flatten)]
    pub(crate) sim: SimArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        generations,
        population: population_count,
        cohorts,
        hidden,
        fitness_threshold,
        seed,
        name,
        sim,
        output,
    } = arg;
    anyhow::ensure!(*population_count > 0, "population must not be empty");
    anyhow::ensure!(*cohorts > 0, "at least one cohort is required");

    let config = sim.load_config()?;
    let max_ticks = sim.tick_budget();
    let topology = Topology { hidden: *hidden };
    let mut rng = rand::rng();
    let base_seed = seed.unwrap_or_else(|| rng.random());
    tracing::info!(%base_seed, %topology, population = population_count, "training started");

    let mut population = Population::random(topology, *population_count, &mut rng, MAX_WEIGHT);
    let mut evaluated = 0;
    for generation in 0..*generations {
        let phase = EvolutionPhase::from_generation(generation);
        let seeds: Vec<ObstacleSeed> = (0..*cohorts)
            .map(|i| base_seed.nth((generation * cohorts + i) as u64))
            .collect();
        population.evaluate_fitness(&config, &seeds, max_ticks)?;
        evaluated = generation + 1;

        if let Some(stats) = population.compute_fitness_stats() {
            tracing::info!(
                generation,
                %phase,
                best = stats.max,
                mean = stats.mean,
                median = stats.median,
                std_dev = stats.std_dev,
                "generation evaluated"
            );
        }

        let best = population
            .best_individual()
            .map_or(f32::MIN, |ind| ind.fitness());
        if fitness_threshold.is_some_and(|threshold| best >= threshold) {
            tracing::info!(generation, best, "fitness threshold reached");
            break;
        }
        if generation + 1 < *generations {
            population = evolver_by_phase(phase).evolve(&population);
        }
    }

    eprintln!("Best Individuals:");
    for (i, ind) in population.individuals().iter().take(5).enumerate() {
        eprintln!("  {i:2}: {:.3?} => {:.3}", ind.weights(), ind.fitness());
    }

    let best = population
        .best_individual()
        .ok_or_else(|| anyhow::anyhow!("population is empty"))?;
    let model = BirdModel {
        name: name.clone(),
        trained_at: Utc::now(),
        generations: evaluated,
        final_fitness: best.fitness(),
        topology,
        weights: best.weights().to_vec(),
    };
    Output::save_json(&model, output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generations: {}", model.generations);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Topology: {}", model.topology);

    Ok(())
}
