use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in field coordinates.
///
/// `x`/`y` is the top-left corner; y grows downwards, as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size whose center is `(cx, cy)`.
    #[must_use]
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Snaps the origin to the nearest pixel.
    #[must_use]
    pub fn to_pixel(&self) -> PixelRect {
        PixelRect {
            x: round_to_pixel(self.x),
            y: round_to_pixel(self.y),
            width: round_to_pixel(self.width),
            height: round_to_pixel(self.height),
        }
    }
}

/// Rectangle on the integer pixel grid used by the collision phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    /// Returns `true` if the two rectangles share at least one pixel.
    ///
    /// Rectangles that merely touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Offset of `other`'s origin relative to this rectangle's origin.
    #[must_use]
    pub fn offset_to(&self, other: &Self) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }
}

#[expect(clippy::cast_possible_truncation)]
pub(crate) fn round_to_pixel(value: f32) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_edges() {
        let rect = Rect::centered(200.0, 300.0, 34.0, 24.0);
        assert_eq!(rect.left(), 183.0);
        assert_eq!(rect.right(), 217.0);
        assert_eq!(rect.top(), 288.0);
        assert_eq!(rect.bottom(), 312.0);
    }

    #[test]
    fn test_pixel_rect_rounds_origin() {
        let rect = Rect::new(10.4, -3.6, 52.0, 320.0).to_pixel();
        assert_eq!(
            rect,
            PixelRect {
                x: 10,
                y: -4,
                width: 52,
                height: 320
            }
        );
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0).to_pixel();
        let b = Rect::new(10.0, 0.0, 10.0, 10.0).to_pixel();
        let c = Rect::new(9.0, 9.0, 10.0, 10.0).to_pixel();
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_offset_to() {
        let a = Rect::new(183.0, 288.0, 34.0, 24.0).to_pixel();
        let b = Rect::new(200.0, 400.0, 52.0, 320.0).to_pixel();
        assert_eq!(a.offset_to(&b), (17, 112));
    }
}
