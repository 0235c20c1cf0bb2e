//! Fixed-topology feed-forward networks used as agent controllers.
//!
//! A network maps the four sensor values to one flap signal. Every neuron
//! applies `tanh` to its bias plus the weighted sum of its inputs, so the output
//! lies in `(-1, 1)` and is positive exactly when the network wants to flap.
//!
//! # Weight Layout
//!
//! Weights are stored flat, one neuron after another, each neuron's input
//! weights followed by its bias:
//!
//! ```text
//! hidden = 0:  [ out: w0 w1 w2 w3 b ]
//! hidden = 2:  [ h0: w0 w1 w2 w3 b | h1: w0 w1 w2 w3 b | out: v0 v1 b ]
//! ```
//!
//! This flat vector is what the genetic operators in [`weights`](crate::weights)
//! work on.

use std::fmt;

use flappy_engine::{Controller, ControllerError, SENSOR_COUNT, Sensors};
use serde::{Deserialize, Serialize};

/// Sensor values are pixel distances; scaling keeps `tanh` out of saturation.
pub const INPUT_SCALE: f32 = 0.01;

/// Shape of a [`FeedForwardNetwork`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Neurons in the single hidden layer. Zero connects inputs straight to the output.
    pub hidden: usize,
}

impl Topology {
    /// Length of the flat weight vector this topology needs.
    ///
    /// ```
    /// use flappy_training::network::Topology;
    ///
    /// assert_eq!(Topology { hidden: 0 }.weight_count(), 5);
    /// assert_eq!(Topology { hidden: 3 }.weight_count(), 3 * 5 + 4);
    /// ```
    #[must_use]
    pub const fn weight_count(self) -> usize {
        if self.hidden == 0 {
            SENSOR_COUNT + 1
        } else {
            self.hidden * (SENSOR_COUNT + 1) + self.hidden + 1
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hidden == 0 {
            write!(f, "{SENSOR_COUNT}-1")
        } else {
            write!(f, "{SENSOR_COUNT}-{}-1", self.hidden)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("topology {topology} needs {expected} weights, got {actual}")]
    WeightCount {
        topology: Topology,
        expected: usize,
        actual: usize,
    },
}

/// Network whose weight vector is known to match its topology.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedForwardNetwork {
    topology: Topology,
    weights: Vec<f32>,
}

impl FeedForwardNetwork {
    pub fn new(topology: Topology, weights: Vec<f32>) -> Result<Self, NetworkError> {
        let expected = topology.weight_count();
        if weights.len() != expected {
            return Err(NetworkError::WeightCount {
                topology,
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { topology, weights })
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Runs the network on raw (unscaled) sensor values.
    #[must_use]
    pub fn output(&self, inputs: [f32; SENSOR_COUNT]) -> f32 {
        let inputs = inputs.map(|v| v * INPUT_SCALE);
        if self.topology.hidden == 0 {
            return neuron(&inputs, &self.weights);
        }

        let (hidden_weights, output_weights) = self
            .weights
            .split_at(self.topology.hidden * (SENSOR_COUNT + 1));
        let hidden: Vec<f32> = hidden_weights
            .chunks_exact(SENSOR_COUNT + 1)
            .map(|weights| neuron(&inputs, weights))
            .collect();
        neuron(&hidden, output_weights)
    }
}

impl Controller for FeedForwardNetwork {
    fn activate(&self, sensors: &Sensors) -> Result<f32, ControllerError> {
        Ok(self.output(sensors.to_array()))
    }
}

/// `weights` holds one weight per input followed by the bias.
fn neuron(inputs: &[f32], weights: &[f32]) -> f32 {
    debug_assert_eq!(weights.len(), inputs.len() + 1);
    let (input_weights, bias) = weights.split_at(inputs.len());
    let sum: f32 = inputs.iter().zip(input_weights).map(|(x, w)| x * w).sum();
    (sum + bias[0]).tanh()
}
