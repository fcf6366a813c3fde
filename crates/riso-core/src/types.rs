// File: crates/riso-core/src/types.rs
// Summary: Fallback surface size and the padding box charts lay out inside.

use crate::geometry::Rect;

/// Fallback logical width when neither the config nor the container provide one.
pub const WIDTH: f32 = 600.0;
/// Fallback logical height.
pub const HEIGHT: f32 = 400.0;

/// Padding box around the plot area, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    /// Negative sides are clamped to zero.
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left: left.max(0.0), right: right.max(0.0), top: top.max(0.0), bottom: bottom.max(0.0) }
    }

    /// Grow each side by the given amounts.
    pub fn expand(self, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self::new(self.left + left, self.right + right, self.top + top, self.bottom + bottom)
    }

    /// Area left over inside a `width` x `height` surface; never negative.
    pub fn content(&self, width: f32, height: f32) -> Rect {
        let right = (width - self.right).max(self.left);
        let bottom = (height - self.bottom).max(self.top);
        Rect::from_ltrb(self.left, self.top, right, bottom)
    }
}

impl Default for Insets {
    /// Room for the title block above and the source line below.
    fn default() -> Self {
        Self::new(24.0, 24.0, 60.0, 48.0)
    }
}
