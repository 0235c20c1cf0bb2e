use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ControllerError,
    core::{Bird, Pipe},
};

/// Number of values a controller receives each tick.
pub const SENSOR_COUNT: usize = 4;

/// Everything an agent knows about the world on a given tick.
///
/// All values are measured from the top-left corner of the agent's hitbox against
/// the tracked pipe (the nearest pipe not yet fully behind the flock).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    /// Horizontal distance to the pipe's leading edge.
    pub horizontal_distance: f32,
    /// Absolute vertical position.
    pub altitude: f32,
    /// Vertical distance to the gap's top edge.
    pub gap_top_distance: f32,
    /// Vertical distance to the gap's bottom edge.
    pub gap_bottom_distance: f32,
}

impl Sensors {
    #[must_use]
    pub fn measure(bird: &Bird, pipe: &Pipe) -> Self {
        let hitbox = bird.hitbox();
        Self {
            horizontal_distance: (hitbox.left() - pipe.x()).abs(),
            altitude: hitbox.top(),
            gap_top_distance: (hitbox.top() - pipe.gap_top()).abs(),
            gap_bottom_distance: (hitbox.top() - pipe.gap_bottom()).abs(),
        }
    }

    /// Signed vertical offset from the gap's center, positive when the agent is below it.
    #[must_use]
    pub fn gap_center_offset(&self) -> f32 {
        (self.gap_top_distance - self.gap_bottom_distance) / 2.0
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; SENSOR_COUNT] {
        [
            self.horizontal_distance,
            self.altitude,
            self.gap_top_distance,
            self.gap_bottom_distance,
        ]
    }
}

/// Decision function driving a single agent.
///
/// Called once per tick per living agent with that tick's [`Sensors`]. The returned
/// value is the flap signal: positive requests a flap, zero or negative releases
/// the flap latch.
///
/// Implementations must be pure with respect to the simulation: the same
/// sensors should lead to the same decision, and errors are reported instead of
/// falling back to a default action.
pub trait Controller: fmt::Debug {
    fn activate(&self, sensors: &Sensors) -> Result<f32, ControllerError>;
}

pub type BoxedController = Box<dyn Controller>;

/// Controller that never flaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Controller for Idle {
    fn activate(&self, _sensors: &Sensors) -> Result<f32, ControllerError> {
        Ok(-1.0)
    }
}

/// Controller backed by a closure. See [`from_fn`] and [`try_from_fn`].
#[derive(Clone, Copy)]
pub struct FnController<F>(F);

impl<F> fmt::Debug for FnController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnController").finish_non_exhaustive()
    }
}

impl<F> Controller for FnController<F>
where
    F: Fn(&Sensors) -> Result<f32, ControllerError>,
{
    fn activate(&self, sensors: &Sensors) -> Result<f32, ControllerError> {
        (self.0)(sensors)
    }
}

/// Creates a controller from an infallible closure.
///
/// # Example
///
/// ```
/// use flappy_engine::{BoxedController, Controller as _, Sensors, controller};
///
/// // Flap whenever the bird is below the middle of the gap.
/// let seeker: BoxedController =
///     Box::new(controller::from_fn(|s: &Sensors| s.gap_center_offset()));
///
/// let sensors = Sensors {
///     horizontal_distance: 100.0,
///     altitude: 320.0,
///     gap_top_distance: 120.0,
///     gap_bottom_distance: 30.0,
/// };
/// assert!(seeker.activate(&sensors).unwrap() > 0.0);
/// ```
pub fn from_fn<F>(f: F) -> FnController<impl Fn(&Sensors) -> Result<f32, ControllerError>>
where
    F: Fn(&Sensors) -> f32,
{
    FnController(move |sensors: &Sensors| Ok(f(sensors)))
}

/// Creates a controller from a closure that may fail.
pub fn try_from_fn<F>(f: F) -> FnController<F>
where
    F: Fn(&Sensors) -> Result<f32, ControllerError>,
{
    FnController(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_against_pipe() {
        let bird = Bird::new(200.0, 300.0, 34.0, 24.0);
        let pipe = Pipe::new(400.0, 250.0, 150.0, 52.0, 320.0);
        let sensors = Sensors::measure(&bird, &pipe);
        assert_eq!(sensors.horizontal_distance, 217.0);
        assert_eq!(sensors.altitude, 288.0);
        assert_eq!(sensors.gap_top_distance, 38.0);
        assert_eq!(sensors.gap_bottom_distance, 112.0);
        assert_eq!(sensors.gap_center_offset(), -37.0);
        assert_eq!(sensors.to_array(), [217.0, 288.0, 38.0, 112.0]);
    }

    #[test]
    fn test_gap_center_offset_sign() {
        let pipe = Pipe::new(400.0, 100.0, 150.0, 52.0, 320.0);
        // hitbox top at 288, gap spans 100..250
        let below = Sensors::measure(&Bird::new(200.0, 300.0, 34.0, 24.0), &pipe);
        assert!(below.gap_center_offset() > 0.0);
        // hitbox top at 38
        let above = Sensors::measure(&Bird::new(200.0, 50.0, 34.0, 24.0), &pipe);
        assert!(above.gap_center_offset() < 0.0);
    }

    #[test]
    fn test_closure_controllers() {
        let sensors = Sensors {
            horizontal_distance: 0.0,
            altitude: 0.0,
            gap_top_distance: 0.0,
            gap_bottom_distance: 0.0,
        };
        assert_eq!(from_fn(|_| 0.25).activate(&sensors), Ok(0.25));
        assert_eq!(Idle.activate(&sensors), Ok(-1.0));

        let failing = try_from_fn(|_| Err(ControllerError::new("no network")));
        let err = failing.activate(&sensors).unwrap_err();
        assert_eq!(err.message(), "no network");
    }
}
