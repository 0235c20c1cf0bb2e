use serde::{Deserialize, Serialize};

use crate::{ConfigError, GenerationError, StepError};

use super::{
    config::SimConfig,
    controller::BoxedController,
    seed::ObstacleSeed,
    simulation::{Simulation, StepReport},
};

/// Why a generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum GenerationEnd {
    /// Every agent was eliminated.
    Extinct,
    /// The tick budget ran out with agents still alive.
    TickBudget,
}

/// Final result of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// One value per controller, in the order the controllers were given.
    pub fitness: Vec<f32>,
    pub score: u32,
    pub ticks: u64,
    pub end: GenerationEnd,
}

/// Drives one cohort from spawn until extinction.
///
/// The runner is the interface a trainer uses: hand it one controller per
/// candidate, run it, and read the fitness values back in the same order.
///
/// # Example
///
/// ```
/// use flappy_engine::{BoxedController, GenerationRunner, Idle, ObstacleSeed, SimConfig};
///
/// let controllers: Vec<BoxedController> = vec![Box::new(Idle), Box::new(Idle)];
/// let seed = ObstacleSeed::from_bytes([1; 16]);
/// let mut runner = GenerationRunner::new(SimConfig::default(), seed, controllers)
///     .unwrap()
///     .with_tick_budget(Some(1000));
///
/// runner.run().unwrap();
/// let outcome = runner.finish();
/// assert!(outcome.end.is_extinct());
/// assert_eq!(outcome.fitness.len(), 2);
/// ```
#[derive(Debug)]
pub struct GenerationRunner {
    simulation: Simulation,
    max_ticks: Option<u64>,
}

impl GenerationRunner {
    pub fn new(
        config: SimConfig,
        seed: ObstacleSeed,
        controllers: Vec<BoxedController>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            simulation: Simulation::new(config, seed, controllers)?,
            max_ticks: None,
        })
    }

    /// Stops the generation after `max_ticks` ticks even if agents are still alive.
    #[must_use]
    pub fn with_tick_budget(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.simulation.state().is_terminal() || self.budget_exhausted()
    }

    fn budget_exhausted(&self) -> bool {
        self.max_ticks
            .is_some_and(|max| self.simulation.tick() >= max)
    }

    /// Advances one tick. Returns `None` once the generation is finished.
    pub fn step(&mut self) -> Option<Result<StepReport, StepError>> {
        if self.is_finished() {
            return None;
        }
        Some(self.simulation.step())
    }

    /// Runs until every agent is eliminated or the tick budget is spent.
    pub fn run(&mut self) -> Result<(), StepError> {
        self.run_with(|_, _| {})
    }

    /// Like [`GenerationRunner::run`], calling `on_tick` after every applied tick.
    pub fn run_with<F>(&mut self, mut on_tick: F) -> Result<(), StepError>
    where
        F: FnMut(&Simulation, &StepReport),
    {
        while let Some(report) = self.step() {
            let report = report?;
            on_tick(&self.simulation, &report);
        }
        Ok(())
    }

    /// Consumes the runner and reports the fitness of every agent.
    #[must_use]
    pub fn finish(self) -> GenerationOutcome {
        let sim = &self.simulation;
        let end = if sim.state().is_terminal() {
            GenerationEnd::Extinct
        } else {
            GenerationEnd::TickBudget
        };
        let outcome = GenerationOutcome {
            fitness: sim.cohort().fitness_values(),
            score: sim.score(),
            ticks: sim.tick(),
            end,
        };
        tracing::debug!(
            seed = %sim.seed(),
            agents = outcome.fitness.len(),
            score = outcome.score,
            ticks = outcome.ticks,
            end = ?outcome.end,
            "generation finished"
        );
        outcome
    }
}

/// Runs one generation to the end and returns each controller's fitness.
pub fn evaluate_generation(
    config: SimConfig,
    seed: ObstacleSeed,
    controllers: Vec<BoxedController>,
    max_ticks: Option<u64>,
) -> Result<Vec<f32>, GenerationError> {
    let mut runner = GenerationRunner::new(config, seed, controllers)?.with_tick_budget(max_ticks);
    runner.run()?;
    Ok(runner.finish().fitness)
}

#[cfg(test)]
mod tests {
    use crate::{
        ControllerError,
        engine::controller::{self, Controller, Idle},
    };

    use super::*;

    const SEED: ObstacleSeed = ObstacleSeed::from_bytes([0x5A; 16]);

    fn boxed<C: Controller + 'static>(controller: C) -> BoxedController {
        Box::new(controller)
    }

    #[test]
    fn test_fitness_keeps_controller_order() {
        // a constant signal stays latched, so each flapper flaps exactly once
        let controllers = vec![
            boxed(Idle),
            boxed(controller::from_fn(|_| 1.0)),
            boxed(Idle),
            boxed(controller::from_fn(|_| 1.0)),
        ];
        let fitness =
            evaluate_generation(SimConfig::default(), SEED, controllers, None).unwrap();
        assert_eq!(fitness.len(), 4);
        assert_eq!(fitness[0], fitness[2]);
        assert_eq!(fitness[1], fitness[3]);
        // a single flap keeps the bird airborne longer than falling straight down
        assert!(fitness[1] > fitness[0]);
    }

    #[test]
    fn test_tick_budget_stops_generation() {
        let controllers = vec![boxed(Idle)];
        let mut runner = GenerationRunner::new(SimConfig::default(), SEED, controllers)
            .unwrap()
            .with_tick_budget(Some(10));
        let mut ticks = Vec::new();
        runner
            .run_with(|sim, report| {
                assert_eq!(sim.tick(), report.tick);
                ticks.push(report.tick);
            })
            .unwrap();
        assert_eq!(ticks, (1..=10).collect::<Vec<_>>());
        assert!(runner.is_finished());
        assert!(runner.step().is_none());

        let outcome = runner.finish();
        assert_eq!(outcome.end, GenerationEnd::TickBudget);
        assert_eq!(outcome.ticks, 10);
        assert!((outcome.fitness[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_extinct_generation_outcome() {
        let mut runner =
            GenerationRunner::new(SimConfig::default(), SEED, vec![boxed(Idle)]).unwrap();
        runner.run().unwrap();
        let outcome = runner.finish();
        assert!(outcome.end.is_extinct());
        assert_eq!(outcome.ticks, 27);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_empty_cohort_yields_no_fitness() {
        let fitness = evaluate_generation(SimConfig::default(), SEED, Vec::new(), None).unwrap();
        assert!(fitness.is_empty());
    }

    #[test]
    fn test_errors_are_propagated() {
        let config = SimConfig {
            pipe_gap: -1.0,
            ..SimConfig::default()
        };
        let err = evaluate_generation(config, SEED, vec![boxed(Idle)], None).unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));

        let failing = controller::try_from_fn(|_| Err(ControllerError::new("boom")));
        let err =
            evaluate_generation(SimConfig::default(), SEED, vec![boxed(failing)], None).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Step(StepError::Controller { .. })
        ));
    }
}
