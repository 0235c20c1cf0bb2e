use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use flappy_training::network::{FeedForwardNetwork, Topology};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained flap controller as saved by `flappy train`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BirdModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Number of generations evaluated before the model was saved.
    pub generations: usize,
    pub final_fitness: f32,
    pub topology: Topology,
    pub weights: Vec<f32>,
}

impl BirdModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let model: Self = util::read_json_file("bird model", path)?;
        model
            .to_network()
            .with_context(|| format!("Invalid bird model: {}", path.display()))?;
        Ok(model)
    }

    pub fn to_network(&self) -> anyhow::Result<FeedForwardNetwork> {
        Ok(FeedForwardNetwork::new(self.topology, self.weights.clone())?)
    }
}
