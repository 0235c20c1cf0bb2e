use chrono::{DateTime, Utc};
use flappy_engine::{FrameSnapshot, GenerationOutcome, ObstacleSeed, SimConfig};
use serde::{Deserialize, Serialize};

use crate::schema::model::BirdModel;

/// One generation captured frame by frame, for replay in an external renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedRun {
    /// Timestamp when the recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Obstacle seed; together with `config` it reproduces the course
    pub seed: ObstacleSeed,
    pub config: SimConfig,
    /// Who flew the birds
    pub pilot: PilotInfo,
    /// The spawn frame followed by one frame per tick
    pub frames: Vec<FrameSnapshot>,
    pub outcome: GenerationOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PilotInfo {
    /// Birds that never flap
    Idle,
    /// Copies of a trained network
    Model { model: BirdModel },
}
