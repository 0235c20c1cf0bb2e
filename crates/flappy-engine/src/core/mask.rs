/// Widest sprite a [`CollisionMask`] can describe (one `u128` per row).
pub const MAX_MASK_WIDTH: u32 = u128::BITS;

/// Per-pixel solidity mask of a sprite.
///
/// Each row is stored as a 128-bit bitmask where bit `x` (LSB first) is set when the
/// pixel at column `x` is solid. Overlap tests are then a shift and an AND per row.
///
/// # Bit Layout
///
/// ```text
/// bit:   0 1 2 3 ... width-1 | width ... 127
///        sprite columns      | always zero
/// ```
///
/// # Example
///
/// ```
/// use flappy_engine::CollisionMask;
///
/// let bird = CollisionMask::ellipse(34, 24);
/// let pipe = CollisionMask::filled(52, 320);
///
/// // Pipe origin 20px right of the bird origin: the ellipse reaches it.
/// assert!(bird.overlap(&pipe, (20, 0)).is_some());
/// // Pipe origin starts exactly where the bird's bounding box ends.
/// assert!(bird.overlap(&pipe, (34, 0)).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    rows: Vec<u128>,
}

const fn full_row(width: u32) -> u128 {
    if width >= MAX_MASK_WIDTH {
        u128::MAX
    } else {
        (1_u128 << width) - 1
    }
}

impl CollisionMask {
    /// Creates a mask where every pixel is solid.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_MASK_WIDTH`].
    #[must_use]
    pub fn filled(width: u32, height: u32) -> Self {
        assert!(width <= MAX_MASK_WIDTH, "mask width {width} too large");
        Self {
            width,
            rows: vec![full_row(width); height as usize],
        }
    }

    /// Creates a mask holding the ellipse inscribed in a `width` x `height` box.
    ///
    /// A pixel is solid when its center lies inside the ellipse.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_MASK_WIDTH`].
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn ellipse(width: u32, height: u32) -> Self {
        assert!(width <= MAX_MASK_WIDTH, "mask width {width} too large");
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        let rows = (0..height)
            .map(|y| {
                let dy = (y as f32 + 0.5 - ry) / ry;
                (0..width).fold(0_u128, |row, x| {
                    let dx = (x as f32 + 0.5 - rx) / rx;
                    if dx * dx + dy * dy <= 1.0 {
                        row | (1_u128 << x)
                    } else {
                        row
                    }
                })
            })
            .collect();
        Self { width, rows }
    }

    /// Builds a mask from text rows, `#` marking a solid pixel and anything else empty.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths or are wider than [`MAX_MASK_WIDTH`].
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let rows = rows
            .iter()
            .map(|row| {
                assert_eq!(row.chars().count(), width, "mask rows must have equal width");
                row.chars()
                    .enumerate()
                    .filter(|(_, ch)| *ch == '#')
                    .fold(0_u128, |bits, (x, _)| bits | (1_u128 << x))
            })
            .collect();
        let width = u32::try_from(width).unwrap_or(u32::MAX);
        assert!(width <= MAX_MASK_WIDTH, "mask width {width} too large");
        Self { width, rows }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Returns `true` if the pixel at `(x, y)` is solid. Out-of-bounds pixels are empty.
    #[must_use]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width
            && self
                .rows
                .get(y as usize)
                .is_some_and(|row| row & (1_u128 << x) != 0)
    }

    /// Number of solid pixels.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Returns the mask mirrored top to bottom.
    #[must_use]
    pub fn flipped_vertical(&self) -> Self {
        Self {
            width: self.width,
            rows: self.rows.iter().rev().copied().collect(),
        }
    }

    /// Finds a pixel solid in both masks when `other`'s origin is placed at `offset`
    /// relative to this mask's origin.
    ///
    /// Returns the first overlapping pixel in this mask's coordinates (row-major
    /// order), or `None` if the masks do not touch.
    #[must_use]
    pub fn overlap(&self, other: &Self, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (dx, dy) = offset;
        for (y, row) in (0_i32..).zip(&self.rows) {
            let Ok(other_y) = usize::try_from(y - dy) else {
                continue;
            };
            let Some(other_row) = other.rows.get(other_y) else {
                break;
            };
            let shifted = if dx >= 0 {
                other_row.checked_shl(dx.unsigned_abs()).unwrap_or(0)
            } else {
                other_row.checked_shr(dx.unsigned_abs()).unwrap_or(0)
            };
            let hits = row & shifted;
            if hits != 0 {
                return Some((hits.trailing_zeros(), y.unsigned_abs()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_mask_counts_every_pixel() {
        let mask = CollisionMask::filled(52, 320);
        assert_eq!(mask.width(), 52);
        assert_eq!(mask.height(), 320);
        assert_eq!(mask.count(), 52 * 320);
        assert!(mask.is_set(51, 319));
        assert!(!mask.is_set(52, 0));
        assert!(!mask.is_set(0, 320));
    }

    #[test]
    fn test_full_width_mask() {
        let mask = CollisionMask::filled(MAX_MASK_WIDTH, 2);
        assert_eq!(mask.count(), 2 * MAX_MASK_WIDTH);
        assert!(mask.is_set(127, 1));
    }

    #[test]
    fn test_ellipse_corners_are_empty() {
        let mask = CollisionMask::ellipse(34, 24);
        assert!(!mask.is_set(0, 0));
        assert!(!mask.is_set(33, 0));
        assert!(!mask.is_set(0, 23));
        assert!(!mask.is_set(33, 23));
        assert!(mask.is_set(17, 12));
        assert!(mask.is_set(0, 12));
        assert!(mask.is_set(17, 0));
        assert!(mask.count() < 34 * 24);
    }

    #[test]
    fn test_from_rows_and_flip() {
        let mask = CollisionMask::from_rows(&["#..", ".#.", "..#", "###"]);
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.height(), 4);
        assert!(mask.is_set(0, 0));
        assert!(mask.is_set(2, 2));
        assert!(!mask.is_set(1, 0));

        let flipped = mask.flipped_vertical();
        assert!(flipped.is_set(1, 0));
        assert!(flipped.is_set(2, 1));
        assert!(flipped.is_set(0, 3));
        assert_eq!(flipped.flipped_vertical(), mask);
    }

    #[test]
    fn test_overlap_with_positive_offset() {
        let a = CollisionMask::filled(4, 4);
        let b = CollisionMask::filled(4, 4);
        assert_eq!(a.overlap(&b, (3, 3)), Some((3, 3)));
        assert_eq!(a.overlap(&b, (4, 0)), None);
        assert_eq!(a.overlap(&b, (0, 4)), None);
    }

    #[test]
    fn test_overlap_with_negative_offset() {
        let a = CollisionMask::filled(4, 4);
        let b = CollisionMask::filled(4, 4);
        assert_eq!(a.overlap(&b, (-3, -3)), Some((0, 0)));
        assert_eq!(a.overlap(&b, (-4, 0)), None);
        assert_eq!(a.overlap(&b, (0, -4)), None);
    }

    #[test]
    fn test_overlap_respects_holes() {
        let ring = CollisionMask::from_rows(&["###", "#.#", "###"]);
        let dot = CollisionMask::from_rows(&["#"]);
        assert_eq!(ring.overlap(&dot, (1, 1)), None);
        assert_eq!(ring.overlap(&dot, (2, 1)), Some((2, 1)));
    }

    #[test]
    fn test_overlap_far_offsets() {
        let a = CollisionMask::filled(MAX_MASK_WIDTH, 1);
        let b = CollisionMask::filled(MAX_MASK_WIDTH, 1);
        assert_eq!(a.overlap(&b, (128, 0)), None);
        assert_eq!(a.overlap(&b, (-128, 0)), None);
        assert_eq!(a.overlap(&b, (127, 0)), Some((127, 0)));
        assert_eq!(a.overlap(&b, (i32::MIN, 0)), None);
    }

    #[test]
    fn test_ellipse_grazing_corner_misses() {
        let bird = CollisionMask::ellipse(34, 24);
        let pipe = CollisionMask::filled(52, 320);
        // Pipe's top-left corner sits on the bird's bottom-right bounding-box pixel.
        assert!(bird.overlap(&pipe, (33, 23)).is_none());
        assert!(CollisionMask::filled(34, 24).overlap(&pipe, (33, 23)).is_some());
    }
}
