//! Deterministic simulation core for a cohort of flapping agents.
//!
//! The crate is split the same way the simulation is layered:
//!
//! - [`core`] - Plain game objects: geometry, collision masks, birds, pipes and the ground strip
//! - [`engine`] - The per-tick step engine, the cohort arena, controllers and the generation runner
//!
//! Nothing in this crate performs I/O or knows about rendering. A renderer reads
//! [`FrameSnapshot`](engine::FrameSnapshot)s, and a trainer supplies [`Controller`](engine::Controller)s
//! and receives one fitness value per controller back.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a [`SimConfig`](engine::SimConfig) describes an impossible field.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[display("sprite `{field}` is {width} pixels wide, masks support at most {max}")]
    SpriteTooWide {
        field: &'static str,
        width: u32,
        max: u32,
    },
    #[display("gap top range {min}..={max} is empty")]
    EmptyGapRange { min: i32, max: i32 },
    #[display("spawn position ({x}, {y}) lies outside the playable field")]
    SpawnOutsideField { x: f32, y: f32 },
}

/// Error returned by a [`Controller`](engine::Controller) that could not produce a decision.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("controller failed: {message}")]
pub struct ControllerError {
    message: String,
}

impl ControllerError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error returned when a simulation tick cannot be applied.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StepError {
    #[display("simulation already reached its terminal state")]
    AlreadyTerminated,
    #[display("controller of agent {agent} failed")]
    Controller {
        agent: engine::AgentId,
        source: ControllerError,
    },
    #[display("controller of agent {agent} returned non-finite output {output}")]
    MalformedOutput { agent: engine::AgentId, output: f32 },
}

/// Error returned by [`evaluate_generation`](engine::evaluate_generation).
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GenerationError {
    #[display("invalid simulation config")]
    Config(#[error(source)] ConfigError),
    #[display("generation aborted")]
    Step(#[error(source)] StepError),
}
