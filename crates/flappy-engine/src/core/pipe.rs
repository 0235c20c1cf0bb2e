use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// A pair of pipe segments with a vertical gap between them.
///
/// Coordinates follow the sprite origins: `top` is the y of the top segment's upper
/// edge (usually negative, the segment hangs from above the field) and `bottom` is
/// the y of the bottom segment's upper edge.
///
/// # Invariant
///
/// `bottom == top + segment_height + gap` for every pipe, so the gap spans
/// `gap_top()..gap_bottom()` and has the same height for every pipe of a run.
///
/// # Example
///
/// ```
/// use flappy_engine::Pipe;
///
/// let pipe = Pipe::new(800.0, 200.0, 150.0, 52.0, 320.0);
/// assert_eq!(pipe.top(), -120.0);
/// assert_eq!(pipe.bottom(), 350.0);
/// assert_eq!(pipe.gap_top(), 200.0);
/// assert_eq!(pipe.gap_bottom(), 350.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    x: f32,
    top: f32,
    bottom: f32,
    width: f32,
    segment_height: f32,
    passed: bool,
}

impl Pipe {
    /// Creates a pipe whose gap starts at `gap_top` and is `gap` pixels high.
    #[must_use]
    pub fn new(x: f32, gap_top: f32, gap: f32, width: f32, segment_height: f32) -> Self {
        let top = gap_top - segment_height;
        Self {
            x,
            top,
            bottom: top + segment_height + gap,
            width,
            segment_height,
            passed: false,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Trailing edge of the pipe.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.bottom
    }

    #[must_use]
    pub fn gap_top(&self) -> f32 {
        self.top + self.segment_height
    }

    #[must_use]
    pub const fn gap_bottom(&self) -> f32 {
        self.bottom
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn top_segment(&self) -> Rect {
        Rect::new(self.x, self.top, self.width, self.segment_height)
    }

    #[must_use]
    pub fn bottom_segment(&self) -> Rect {
        Rect::new(self.x, self.bottom, self.width, self.segment_height)
    }

    /// Scrolls the pipe towards the leading edge of the field.
    pub fn advance(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
    }

    /// Returns `true` once the trailing edge has scrolled past `x = 0`.
    #[must_use]
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    /// Marks the pipe as passed by an agent whose left edge is at `agent_left`.
    ///
    /// Returns `true` only on the call that flips the flag.
    pub fn try_pass(&mut self, agent_left: f32) -> bool {
        if self.passed || self.x >= agent_left {
            return false;
        }
        self.passed = true;
        true
    }
}
