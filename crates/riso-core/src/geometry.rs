// File: crates/riso-core/src/geometry.rs
// Summary: Layout rectangle plus the rounded shape paths the renderers fill.

use skia_safe as skia;

/// Axis-aligned rectangle in logical pixels (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { x: left, y: top, w: right - left, h: bottom - top }
    }
    pub fn right(&self) -> f32 { self.x + self.w }
    pub fn bottom(&self) -> f32 { self.y + self.h }
    pub fn area(&self) -> f32 { self.w * self.h }
    pub fn center(&self) -> (f32, f32) { (self.x + self.w * 0.5, self.y + self.h * 0.5) }

    /// Shrink by `d` on every side; never produces a negative size.
    pub fn inset(&self, d: f32) -> Self {
        Self {
            x: self.x + d,
            y: self.y + d,
            w: (self.w - 2.0 * d).max(0.0),
            h: (self.h - 2.0 * d).max(0.0),
        }
    }

    /// True when the interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Rect, eps: f32) -> bool {
        self.x + eps < other.right()
            && other.x + eps < self.right()
            && self.y + eps < other.bottom()
            && other.y + eps < self.bottom()
    }

    pub fn to_skia(&self) -> skia::Rect {
        skia::Rect::from_xywh(self.x, self.y, self.w, self.h)
    }
}

/// Rectangle with all four corners rounded by `r` (quadratic corners).
pub fn rounded_rect_path(r: &Rect, radius: f32) -> skia::Path {
    let (x, y, w, h) = (r.x, r.y, r.w, r.h);
    let cr = radius.min(w * 0.5).min(h * 0.5).max(0.0);
    let mut path = skia::Path::new();
    path.move_to((x + cr, y));
    path.line_to((x + w - cr, y));
    path.quad_to((x + w, y), (x + w, y + cr));
    path.line_to((x + w, y + h - cr));
    path.quad_to((x + w, y + h), (x + w - cr, y + h));
    path.line_to((x + cr, y + h));
    path.quad_to((x, y + h), (x, y + h - cr));
    path.line_to((x, y + cr));
    path.quad_to((x, y), (x + cr, y));
    path.close();
    path
}

/// Vertical bar: rounded top corners, square base.
pub fn top_rounded_path(r: &Rect, radius: f32) -> skia::Path {
    let (x, y, w, h) = (r.x, r.y, r.w, r.h);
    let cr = radius.min(h * 0.5).min(w * 0.5).max(0.0);
    let mut path = skia::Path::new();
    path.move_to((x + cr, y));
    path.line_to((x + w - cr, y));
    path.quad_to((x + w, y), (x + w, y + cr));
    path.line_to((x + w, y + h));
    path.line_to((x, y + h));
    path.line_to((x, y + cr));
    path.quad_to((x, y), (x + cr, y));
    path.close();
    path
}

/// Horizontal bar growing rightwards: rounded right end, square left edge.
pub fn right_rounded_path(r: &Rect, radius: f32) -> skia::Path {
    let (x, y, w, h) = (r.x, r.y, r.w, r.h);
    let cr = radius.min(w * 0.5).min(h * 0.5).max(0.0);
    let mut path = skia::Path::new();
    path.move_to((x, y));
    path.line_to((x + w - cr, y));
    path.quad_to((x + w, y), (x + w, y + cr));
    path.line_to((x + w, y + h - cr));
    path.quad_to((x + w, y + h), (x + w - cr, y + h));
    path.line_to((x, y + h));
    path.close();
    path
}

/// Annular sector between `inner` and `outer` radii, angles in radians
/// (0 = +x axis, clockwise with y down).
pub fn annular_sector_path(cx: f32, cy: f32, outer: f32, inner: f32, start: f32, end: f32) -> skia::Path {
    let oval = |r: f32| skia::Rect::from_ltrb(cx - r, cy - r, cx + r, cy + r);
    let start_deg = start.to_degrees();
    let sweep_deg = (end - start).to_degrees();
    let mut path = skia::Path::new();
    path.arc_to(oval(outer), start_deg, sweep_deg, true);
    path.arc_to(oval(inner), start_deg + sweep_deg, -sweep_deg, false);
    path.close();
    path
}
