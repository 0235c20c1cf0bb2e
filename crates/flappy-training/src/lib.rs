//! Reference trainer evolving flappy-bird controllers with a genetic algorithm.
//!
//! The simulation in `flappy-engine` only asks for one [`Controller`](flappy_engine::Controller)
//! per agent and returns one fitness value per controller. This crate is one
//! trainer built on that contract: each individual is a small feed-forward
//! network, and the population is evolved from the fitness the simulation reports.
//!
//! # How Training Works
//!
//! 1. **Population** - Create individuals with random network weights
//! 2. **Evaluation** - The whole population flies together, once per obstacle seed
//! 3. **Fitness** - Each individual's fitness is averaged over those flights
//! 4. **Reproduction** - Elites survive; the rest come from tournament selection,
//!    BLX-α crossover and Gaussian mutation
//! 5. **Repeat** - Until the generation limit or a fitness threshold is reached
//!
//! # Architecture
//!
//! ```text
//! Individual weights
//!     ↓ built into
//! FeedForwardNetwork (network)
//!     ↓ drives an agent in
//! Simulation cohort (flappy-engine)
//!     ↓ reports
//! Fitness
//!     ↓ guides
//! Selection & Reproduction (genetic, weights)
//! ```
//!
//! # Modules
//!
//! - [`network`] - Fixed-topology `tanh` networks implementing `Controller`
//! - [`weights`] - Initialization, crossover and mutation of flat weight vectors
//! - [`genetic`] - Population, fitness evaluation and evolution
//! - [`stats`] - Fitness summaries for progress reports

pub mod genetic;
pub mod network;
pub mod stats;
pub mod weights;
