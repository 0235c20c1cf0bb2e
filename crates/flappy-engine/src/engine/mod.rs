//! Step engine and everything needed to run a generation.
//!
//! # Modules
//!
//! - [`config`] - Field, physics and reward constants ([`SimConfig`])
//! - [`seed`] - Reproducible obstacle placement ([`ObstacleSeed`])
//! - [`controller`] - The decision interface agents are driven by ([`Controller`])
//! - [`cohort`] - Stable-index arena of agents ([`Cohort`])
//! - [`simulation`] - Per-tick physics, collisions and scoring ([`Simulation`])
//! - [`snapshot`] - Render data ([`FrameSnapshot`])
//! - [`runner`] - Spawn-to-extinction driver returning fitness ([`GenerationRunner`])
//!
//! # Generation Lifecycle
//!
//! ```text
//! controllers ──► GenerationRunner::new ──► Simulation (Running)
//!                                              │
//!                        ┌── step() ◄──────────┤
//!                        ▼                     │
//!                   StepReport ── alive > 0 ───┘
//!                        │
//!                   alive == 0 / budget
//!                        ▼
//!                  GenerationOutcome { fitness[i] for controllers[i] }
//! ```

pub use self::{
    cohort::*,
    config::*,
    controller::{BoxedController, Controller, FnController, Idle, SENSOR_COUNT, Sensors},
    runner::*,
    seed::*,
    simulation::*,
    snapshot::*,
};

pub mod cohort;
pub mod config;
pub mod controller;
pub mod runner;
pub mod seed;
pub mod simulation;
pub mod snapshot;
