//! Read-only view of a frame for renderers and recorders.

use serde::{Deserialize, Serialize};

use crate::core::{Ground, Rect};

use super::cohort::AgentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub score: u32,
    pub alive: usize,
    /// Living agents only, in id order.
    pub agents: Vec<AgentSnapshot>,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub ground: Ground,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub hitbox: Rect,
    /// Vertical velocity; renderers tilt the sprite by it.
    pub velocity: f32,
    /// Wing animation frame, `0..3`, shared by every agent.
    pub wing_frame: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub top: Rect,
    pub bottom: Rect,
    pub passed: bool,
}
