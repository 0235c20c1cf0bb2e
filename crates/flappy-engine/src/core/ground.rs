use serde::{Deserialize, Serialize};

/// Scrolling ground strip drawn as two repeating tiles.
///
/// Only `y` matters to the simulation: it is the collision plane birds must stay
/// above. The tile offsets exist so a renderer can draw a seamless strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    y: f32,
    tile_width: f32,
    offsets: [f32; 2],
}

impl Ground {
    #[must_use]
    pub const fn new(y: f32, tile_width: f32) -> Self {
        Self {
            y,
            tile_width,
            offsets: [0.0, tile_width],
        }
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    #[must_use]
    pub const fn offsets(&self) -> [f32; 2] {
        self.offsets
    }

    /// Scrolls both tiles, moving a tile behind the other once it leaves the field.
    pub fn advance(&mut self, scroll_speed: f32) {
        let [x1, x2] = &mut self.offsets;
        *x1 -= scroll_speed;
        *x2 -= scroll_speed;
        if *x1 + self.tile_width < 0.0 {
            *x1 = *x2 + self.tile_width;
        }
        if *x2 + self.tile_width < 0.0 {
            *x2 = *x1 + self.tile_width;
        }
    }
}
