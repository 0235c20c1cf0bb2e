//! Game objects the simulation is built from.
//!
//! - [`Rect`] / [`PixelRect`] - Hitboxes and sprite placement, float and pixel-snapped
//! - [`CollisionMask`] - Bit-row sprite masks for pixel-exact overlap tests
//! - [`Bird`] - Agent body under gravity with a latched flap impulse
//! - [`Pipe`] - Top/bottom obstacle pair with a fixed gap
//! - [`Ground`] - Tiling ground strip and the lower collision plane
//!
//! None of these types know about each other's rules; the
//! [`Simulation`](crate::engine::Simulation) applies them together once per tick.

pub use self::{bird::*, geometry::*, ground::*, mask::*, pipe::*};

pub(crate) mod bird;
pub(crate) mod geometry;
pub(crate) mod ground;
pub(crate) mod mask;
pub(crate) mod pipe;
