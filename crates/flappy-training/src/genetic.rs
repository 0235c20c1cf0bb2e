//! Genetic algorithm evolving network weights.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - Every individual flies in one cohort per obstacle seed;
//!    its fitness is the mean over those cohorts
//! 2. **Elite Selection** - Top performers survive unchanged
//! 3. **Tournament Selection** - Parents are the fittest of a random sample
//! 4. **Crossover (BLX-α)** - Two parents' weights are blended into a child
//! 5. **Mutation** - Gaussian noise is added to some of the child's weights
//!
//! # Parallelization
//!
//! A cohort runs on a single thread, and the whole population flies together in
//! it. Cohorts for different seeds are independent, so
//! [`Population::evaluate_fitness`] runs each on its own scoped thread.
//!
//! # Example
//!
//! ```
//! use flappy_engine::{ObstacleSeed, SimConfig};
//! use flappy_training::{
//!     genetic::{Population, PopulationEvolver},
//!     network::Topology,
//! };
//!
//! let mut rng = rand::rng();
//! let mut population = Population::random(Topology::default(), 8, &mut rng, 1.0);
//! let evolver = PopulationEvolver {
//!     elite_count: 2,
//!     max_weight: 1.0,
//!     tournament_size: 2,
//!     mutation_sigma: 0.1,
//!     blx_alpha: 0.2,
//!     mutation_rate: 0.3,
//! };
//! let seeds = [ObstacleSeed::from_bytes([3; 16])];
//!
//! for _ in 0..3 {
//!     population
//!         .evaluate_fitness(&SimConfig::default(), &seeds, Some(500))
//!         .unwrap();
//!     population = evolver.evolve(&population);
//! }
//! assert_eq!(population.individuals().len(), 8);
//! ```

use std::{panic, thread};

use flappy_engine::{BoxedController, GenerationError, ObstacleSeed, SimConfig};
use rand::{Rng, seq::IndexedRandom};

use crate::{
    network::{FeedForwardNetwork, Topology},
    stats::DescriptiveStats,
    weights,
};

/// A candidate network: its weights and last evaluated fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    weights: Vec<f32>,
    fitness: f32,
}

impl Individual {
    /// Creates an individual with weights uniform in `[-max_weight, max_weight]`.
    pub fn random<R>(rng: &mut R, max_weight: f32, topology: Topology) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            weights: weights::random(rng, max_weight, topology.weight_count()),
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Mean fitness over the cohorts of the last evaluation.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    fn network(&self, topology: Topology) -> FeedForwardNetwork {
        FeedForwardNetwork::new(topology, self.weights.clone())
            .expect("individual weights always match the population topology")
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    topology: Topology,
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn random<R>(topology: Topology, count: usize, rng: &mut R, max_weight: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, max_weight, topology))
            .collect();
        Self {
            topology,
            individuals,
        }
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The fittest individual. Only meaningful after [`Population::evaluate_fitness`].
    #[must_use]
    pub fn best_individual(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Flies the whole population once per seed and stores each individual's mean fitness.
    ///
    /// Each seed gets its own cohort on its own thread. Afterwards, individuals
    /// are sorted by fitness in descending order (best first).
    pub fn evaluate_fitness(
        &mut self,
        config: &SimConfig,
        seeds: &[ObstacleSeed],
        max_ticks: Option<u64>,
    ) -> Result<(), GenerationError> {
        let topology = self.topology;
        let individuals = &self.individuals;
        let results: Vec<Result<Vec<f32>, GenerationError>> = thread::scope(|s| {
            let handles: Vec<_> = seeds
                .iter()
                .map(|&seed| {
                    s.spawn(move || -> Result<Vec<f32>, GenerationError> {
                        let controllers: Vec<BoxedController> = individuals
                            .iter()
                            .map(|ind| Box::new(ind.network(topology)) as BoxedController)
                            .collect();
                        let fitness = flappy_engine::evaluate_generation(
                            config.clone(),
                            seed,
                            controllers,
                            max_ticks,
                        )?;
                        tracing::debug!(
                            %seed,
                            best = fitness.iter().copied().fold(f32::MIN, f32::max),
                            "cohort evaluated"
                        );
                        Ok(fitness)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });

        let mut totals = vec![0.0; self.individuals.len()];
        for fitness in results {
            for (total, value) in totals.iter_mut().zip(fitness?) {
                *total += value;
            }
        }
        #[expect(clippy::cast_precision_loss)]
        let cohorts = seeds.len().max(1) as f32;
        for (ind, total) in self.individuals.iter_mut().zip(totals) {
            ind.fitness = total / cohorts;
        }

        // sort by fitness descending
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        Ok(())
    }

    /// Fitness distribution of the population. `None` if it is empty.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Parameters of one evolution step.
///
/// Callers can vary them over time (e.g. lower mutation as training
/// converges) by building a different evolver per generation.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of top individuals preserved unchanged
    pub elite_count: usize,
    /// Weights are clipped to `[-max_weight, max_weight]`
    pub max_weight: f32,
    /// Tournament size for selection (larger = stronger selection pressure)
    pub tournament_size: usize,
    /// Standard deviation for Gaussian mutation noise
    pub mutation_sigma: f32,
    /// BLX-α crossover parameter
    pub blx_alpha: f32,
    /// Probability of mutating each weight
    pub mutation_rate: f32,
}

impl PopulationEvolver {
    /// Creates the next generation, the same size as `population`.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not sorted by fitness (best first).
    #[must_use]
    pub fn evolve(&self, population: &Population) -> Population {
        let mut rng = rand::rng();
        let mut next_individuals = vec![];
        assert!(
            population
                .individuals
                .is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be evaluated before evolving"
        );

        let elite_count = self.elite_count.min(population.individuals.len());
        next_individuals.extend(population.individuals[..elite_count].iter().cloned());

        while next_individuals.len() < population.individuals.len() {
            let p1 = tournament_select(&population.individuals, self.tournament_size, &mut rng);
            let p2 = tournament_select(&population.individuals, self.tournament_size, &mut rng);

            let mut child = weights::blx_alpha(
                &p1.weights,
                &p2.weights,
                self.blx_alpha,
                self.max_weight,
                &mut rng,
            );
            weights::mutate(
                &mut child,
                self.mutation_sigma,
                self.max_weight,
                self.mutation_rate,
                &mut rng,
            );

            next_individuals.push(Individual {
                weights: child,
                fitness: f32::MIN,
            });
        }

        Population {
            topology: population.topology,
            individuals: next_individuals,
        }
    }
}

/// Returns the fittest of `tournament_size` individuals drawn without replacement.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament drawn from an empty population")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEEDS: [ObstacleSeed; 2] = [
        ObstacleSeed::from_bytes([1; 16]),
        ObstacleSeed::from_bytes([2; 16]),
    ];

    fn population(fitness: &[f32]) -> Population {
        Population {
            topology: Topology::default(),
            individuals: fitness
                .iter()
                .map(|&fitness| Individual {
                    weights: vec![fitness; Topology::default().weight_count()],
                    fitness,
                })
                .collect(),
        }
    }

    fn evolver() -> PopulationEvolver {
        PopulationEvolver {
            elite_count: 2,
            max_weight: 10.0,
            tournament_size: 2,
            mutation_sigma: 0.5,
            blx_alpha: 0.2,
            mutation_rate: 0.3,
        }
    }

    #[test]
    fn test_random_population_shape() {
        let population = Population::random(Topology { hidden: 3 }, 5, &mut rand::rng(), 1.0);
        assert_eq!(population.individuals().len(), 5);
        for ind in population.individuals() {
            assert_eq!(ind.weights().len(), 19);
            assert!(ind.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
        }
    }

    #[test]
    fn test_evaluate_fitness_sorts_and_averages() {
        let mut population = Population::random(Topology::default(), 6, &mut rand::rng(), 2.0);
        population
            .evaluate_fitness(&SimConfig::default(), &SEEDS, Some(300))
            .unwrap();

        let fitness: Vec<f32> = population.individuals().iter().map(Individual::fitness).collect();
        assert!(fitness.is_sorted_by(|a, b| a >= b));
        // every bird earns at least one tick of survival before dying
        assert!(fitness.iter().all(|f| *f >= 0.1 - 1.0 - 1e-4));
        // capped at 300 ticks of survival plus at most four passed pipes
        assert!(fitness.iter().all(|f| *f <= 300.0 * 0.1 + 4.0 * 5.0 + 1e-3));

        let stats = population.compute_fitness_stats().unwrap();
        assert_eq!(stats.max, fitness[0]);
        assert_eq!(
            population.best_individual().map(Individual::fitness),
            Some(fitness[0])
        );
    }

    #[test]
    fn test_identical_individuals_get_identical_fitness() {
        let mut population = population(&[0.3; 4]);
        population
            .evaluate_fitness(&SimConfig::default(), &SEEDS, Some(200))
            .unwrap();
        let first = population.individuals()[0].fitness();
        assert!(population.individuals().iter().all(|ind| ind.fitness() == first));
    }

    #[test]
    fn test_evaluate_fitness_reports_config_errors() {
        let mut population = population(&[0.0; 2]);
        let config = SimConfig {
            scroll_speed: 0.0,
            ..SimConfig::default()
        };
        let err = population.evaluate_fitness(&config, &SEEDS, None).unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
    }

    #[test]
    fn test_evolve_keeps_elites_and_size() {
        let population = population(&[4.0, 3.0, 2.0, 1.0, 0.0]);
        let next = evolver().evolve(&population);
        assert_eq!(next.individuals().len(), 5);
        assert_eq!(next.individuals()[0].weights(), population.individuals()[0].weights());
        assert_eq!(next.individuals()[1].weights(), population.individuals()[1].weights());
        for ind in &next.individuals()[2..] {
            assert_eq!(ind.weights().len(), 5);
            assert!(ind.weights().iter().all(|w| (-10.0..=10.0).contains(w)));
        }
    }

    #[test]
    #[should_panic(expected = "evaluated")]
    fn test_evolve_requires_sorted_population() {
        let _ = evolver().evolve(&population(&[1.0, 2.0]));
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let population = population(&[1.0, 5.0, 3.0]);
        let winner = tournament_select(&population.individuals, 3, &mut rand::rng());
        assert_eq!(winner.fitness(), 5.0);
    }
}
