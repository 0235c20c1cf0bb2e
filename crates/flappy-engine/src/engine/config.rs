use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{CollisionMask, MAX_MASK_WIDTH},
};

/// Shape used for the bird's collision mask.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Silhouette {
    /// Ellipse inscribed in the sprite box, matching a round bird sprite.
    #[default]
    Ellipse,
    /// Whole sprite box is solid: collisions degrade to a rectangle test.
    Rectangle,
}

/// Constants of a simulation run.
///
/// Every value is fixed for the lifetime of a [`Simulation`](super::Simulation).
/// [`SimConfig::default`] reproduces the classic 800x600 field.
///
/// Missing fields fall back to the defaults when deserializing, so a JSON
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub field_width: f32,
    pub field_height: f32,
    /// Height of the ground strip; its top edge is the ground collision plane.
    pub ground_height: f32,
    pub ground_tile_width: f32,
    /// Velocity added to every bird each tick.
    pub gravity: f32,
    /// Velocity a bird is set to when it flaps (negative is up).
    pub flap_impulse: f32,
    /// Optional cap on downward velocity. `None` lets birds accelerate without bound.
    pub max_fall_speed: Option<f32>,
    /// Horizontal distance pipes and ground move per tick.
    pub scroll_speed: f32,
    pub pipe_gap: f32,
    /// A new pipe spawns once the newest one is this far inside the field.
    pub pipe_spacing: f32,
    /// Inclusive range the gap's top edge is drawn from.
    pub gap_top_min: i32,
    pub gap_top_max: i32,
    pub pipe_width: u32,
    pub pipe_height: u32,
    pub bird_width: u32,
    pub bird_height: u32,
    pub bird_silhouette: Silhouette,
    /// Center of every bird at the start of a generation.
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub survival_reward: f32,
    pub pass_bonus: f32,
    /// Subtracted from a bird's fitness when it hits a pipe.
    pub collision_penalty: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            ground_height: 100.0,
            ground_tile_width: 835.0,
            gravity: 0.5,
            flap_impulse: -10.0,
            max_fall_speed: None,
            scroll_speed: 5.0,
            pipe_gap: 150.0,
            pipe_spacing: 250.0,
            gap_top_min: 100,
            gap_top_max: 300,
            pipe_width: 52,
            pipe_height: 320,
            bird_width: 34,
            bird_height: 24,
            bird_silhouette: Silhouette::Ellipse,
            spawn_x: 200.0,
            spawn_y: 300.0,
            survival_reward: 0.1,
            pass_bonus: 5.0,
            collision_penalty: 1.0,
        }
    }
}

impl SimConfig {
    /// Y coordinate of the ground collision plane.
    #[must_use]
    pub fn ground_y(&self) -> f32 {
        self.field_height - self.ground_height
    }

    /// X coordinate new pipes appear at.
    #[must_use]
    pub fn spawn_edge(&self) -> f32 {
        self.field_width
    }

    #[must_use]
    pub fn bird_mask(&self) -> CollisionMask {
        match self.bird_silhouette {
            Silhouette::Ellipse => CollisionMask::ellipse(self.bird_width, self.bird_height),
            Silhouette::Rectangle => CollisionMask::filled(self.bird_width, self.bird_height),
        }
    }

    #[must_use]
    pub fn pipe_mask(&self) -> CollisionMask {
        CollisionMask::filled(self.pipe_width, self.pipe_height)
    }

    /// Checks that the configuration describes a playable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("ground_tile_width", self.ground_tile_width),
            ("scroll_speed", self.scroll_speed),
            ("pipe_gap", self.pipe_gap),
            ("pipe_spacing", self.pipe_spacing),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let sprites = [
            ("pipe_width", self.pipe_width, self.pipe_height),
            ("bird_width", self.bird_width, self.bird_height),
        ];
        for (field, width, height) in sprites {
            if width == 0 || height == 0 {
                return Err(ConfigError::NonPositive { field, value: 0.0 });
            }
            if width > MAX_MASK_WIDTH {
                return Err(ConfigError::SpriteTooWide {
                    field,
                    width,
                    max: MAX_MASK_WIDTH,
                });
            }
        }

        if self.gap_top_min > self.gap_top_max {
            return Err(ConfigError::EmptyGapRange {
                min: self.gap_top_min,
                max: self.gap_top_max,
            });
        }

        #[expect(clippy::cast_precision_loss)]
        let half_height = self.bird_height as f32 / 2.0;
        let inside_x = (0.0..=self.field_width).contains(&self.spawn_x);
        let inside_y =
            self.spawn_y - half_height >= 0.0 && self.spawn_y + half_height < self.ground_y();
        if !inside_x || !inside_y {
            return Err(ConfigError::SpawnOutsideField {
                x: self.spawn_x,
                y: self.spawn_y,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.ground_y(), 500.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let config = SimConfig {
            scroll_speed: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "scroll_speed",
                value: 0.0
            })
        );

        let config = SimConfig {
            pipe_gap: f32::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "pipe_gap",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_wide_sprites() {
        let config = SimConfig {
            pipe_width: 200,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpriteTooWide { width: 200, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_gap_range() {
        let config = SimConfig {
            gap_top_min: 300,
            gap_top_max: 100,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGapRange { min: 300, max: 100 })
        );
    }

    #[test]
    fn test_rejects_spawn_below_ground() {
        let config = SimConfig {
            spawn_y: 495.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutsideField { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "gravity": 0.8, "bird_silhouette": "rectangle" }"#).unwrap();
        assert_eq!(config.gravity, 0.8);
        assert_eq!(config.bird_silhouette, Silhouette::Rectangle);
        assert_eq!(config.field_height, 600.0);
    }

    #[test]
    fn test_silhouette_masks() {
        let config = SimConfig::default();
        assert_eq!(config.bird_mask(), CollisionMask::ellipse(34, 24));
        let config = SimConfig {
            bird_silhouette: Silhouette::Rectangle,
            ..config
        };
        assert_eq!(config.bird_mask().count(), 34 * 24);
    }

    #[test]
    fn test_silhouette_from_str() {
        assert_eq!("ellipse".parse::<Silhouette>().unwrap(), Silhouette::Ellipse);
        assert_eq!(
            "Rectangle".parse::<Silhouette>().unwrap(),
            Silhouette::Rectangle
        );
    }
}
