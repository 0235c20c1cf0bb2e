use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// A single flapping agent body.
///
/// The bird's position is the center of its hitbox. Only the vertical axis moves;
/// the field scrolls past the bird instead.
///
/// # Flap Latch
///
/// `flapping` is set by [`Bird::flap`] and cleared by [`Bird::release`]. A controller
/// that keeps requesting a flap only flaps once until it lets go, so a sustained
/// signal cannot pin the bird to the ceiling.
///
/// # Example
///
/// ```
/// use flappy_engine::Bird;
///
/// let mut bird = Bird::new(200.0, 300.0, 34.0, 24.0);
/// bird.apply_gravity(0.5, None);
/// assert_eq!(bird.y(), 300.5);
///
/// bird.flap(-10.0);
/// assert_eq!(bird.velocity(), -10.0);
/// assert!(bird.is_flapping());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    velocity: f32,
    flapping: bool,
}

impl Bird {
    /// Creates a bird at rest, centered on `(x, y)`.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity: 0.0,
            flapping: false,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    #[must_use]
    pub const fn is_flapping(&self) -> bool {
        self.flapping
    }

    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.x, self.y, self.width, self.height)
    }

    /// Accelerates the bird by `gravity` and moves it by the new velocity.
    ///
    /// When `max_fall_speed` is given, downward velocity is capped to it.
    pub fn apply_gravity(&mut self, gravity: f32, max_fall_speed: Option<f32>) {
        self.velocity += gravity;
        if let Some(max) = max_fall_speed {
            self.velocity = self.velocity.min(max);
        }
        self.y += self.velocity;
    }

    /// Replaces the current velocity with `impulse` and engages the latch.
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = impulse;
        self.flapping = true;
    }

    /// Clears the flap latch.
    pub fn release(&mut self) {
        self.flapping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_fall_accumulates_velocity() {
        let mut bird = Bird::new(200.0, 300.0, 34.0, 24.0);
        for _ in 0..4 {
            bird.apply_gravity(0.5, None);
        }
        // 0.5 + 1.0 + 1.5 + 2.0
        assert_eq!(bird.velocity(), 2.0);
        assert_eq!(bird.y(), 305.0);
    }

    #[test]
    fn test_fall_speed_cap() {
        let mut bird = Bird::new(200.0, 300.0, 34.0, 24.0);
        for _ in 0..100 {
            bird.apply_gravity(0.5, Some(8.0));
        }
        assert_eq!(bird.velocity(), 8.0);
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let mut bird = Bird::new(200.0, 300.0, 34.0, 24.0);
        for _ in 0..10 {
            bird.apply_gravity(0.5, None);
        }
        bird.flap(-10.0);
        assert_eq!(bird.velocity(), -10.0);
        bird.apply_gravity(0.5, None);
        assert_eq!(bird.velocity(), -9.5);
    }

    #[test]
    fn test_latch() {
        let mut bird = Bird::new(200.0, 300.0, 34.0, 24.0);
        assert!(!bird.is_flapping());
        bird.flap(-10.0);
        assert!(bird.is_flapping());
        bird.release();
        assert!(!bird.is_flapping());
    }

    #[test]
    fn test_hitbox_follows_position() {
        let mut bird = Bird::new(200.0, 300.0, 34.0, 24.0);
        bird.flap(-10.0);
        bird.apply_gravity(0.5, None);
        let hitbox = bird.hitbox();
        assert_eq!(hitbox.left(), 183.0);
        assert_eq!(hitbox.top(), 278.5);
        assert_eq!(hitbox.bottom(), 302.5);
    }
}
