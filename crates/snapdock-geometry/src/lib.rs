//! Pure math/data shared by the snapdock crates
//!
//! Screen-space geometry (points, sizes, rectangles, safe-area insets) and
//! color tokens. Nothing in here knows about gestures or animation.

mod color;
mod geometry;

pub use color::*;
pub use geometry::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{EdgeInsets, Point, Rect, Size};
}

#[cfg(test)]
#[path = "tests/geometry_tests.rs"]
mod tests;
