// File: crates/riso-core/src/treemap.rs
// Summary: Squarified treemap layout: area-proportional tiling driven by the worst aspect ratio of each row.

use serde::Deserialize;

use crate::geometry::Rect;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TreemapItem {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub children: Vec<TreemapItem>,
}

impl TreemapItem {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value, highlight: false, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<TreemapItem>) -> Self {
        self.children = children;
        self
    }

    /// Non-finite and non-positive values weigh nothing.
    fn weight(&self) -> f64 {
        if self.value.is_finite() && self.value > 0.0 { self.value } else { 0.0 }
    }
}

/// One laid-out item.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    pub rect: Rect,
    pub item: &'a TreemapItem,
    /// Position of `item` in the slice it was laid out from.
    pub index: usize,
    pub depth: usize,
}

/// Tile `items` into `bounds`. Items are taken heaviest first; items with
/// no weight get no tile. Zero total weight yields no tiles.
pub fn squarify<'a>(items: &'a [TreemapItem], bounds: Rect, depth: usize) -> Vec<Tile<'a>> {
    let mut order: Vec<usize> = (0..items.len()).filter(|&i| items[i].weight() > 0.0).collect();
    let total: f64 = order.iter().map(|&i| items[i].weight()).sum();
    if order.is_empty() || total <= 0.0 {
        return Vec::new();
    }
    // Stable: equal weights keep input order.
    order.sort_by(|&a, &b| items[b].weight().total_cmp(&items[a].weight()));

    let mut tiles = Vec::with_capacity(order.len());
    let (mut x, mut y) = (bounds.x as f64, bounds.y as f64);
    let (mut w, mut h) = (bounds.w as f64, bounds.h as f64);
    let mut remaining = total;
    let mut row: Vec<usize> = Vec::new();
    let mut row_weights: Vec<f64> = Vec::new();
    let mut row_total = 0.0;

    for (k, &idx) in order.iter().enumerate() {
        let wt = items[idx].weight();
        row.push(idx);
        row_weights.push(wt);
        row_total += wt;

        let close = match order.get(k + 1) {
            None => true,
            Some(&next) => {
                let next_wt = items[next].weight();
                // Ties close the row.
                worst(&row_weights, None, row_total, w, h, remaining)
                    <= worst(&row_weights, Some(next_wt), row_total + next_wt, w, h, remaining)
            }
        };
        if !close {
            continue;
        }

        let horizontal = w >= h;
        let frac = if remaining > 0.0 { row_total / remaining } else { 1.0 };
        let thickness = if horizontal { w * frac } else { h * frac };
        let mut pos = if horizontal { y } else { x };
        for (&ri, &rw) in row.iter().zip(&row_weights) {
            let share = rw / row_total;
            let len = if horizontal { h * share } else { w * share };
            let rect = if horizontal {
                Rect::new(x as f32, pos as f32, thickness as f32, len as f32)
            } else {
                Rect::new(pos as f32, y as f32, len as f32, thickness as f32)
            };
            tiles.push(Tile { rect, item: &items[ri], index: ri, depth });
            pos += len;
        }
        if horizontal {
            x += thickness;
            w = (w - thickness).max(0.0);
        } else {
            y += thickness;
            h = (h - thickness).max(0.0);
        }
        remaining -= row_total;
        row.clear();
        row_weights.clear();
        row_total = 0.0;
    }
    tiles
}

/// Worst aspect ratio of a candidate row (plus an optional extra member)
/// laid against the shorter side of the `w x h` remaining rectangle.
fn worst(row: &[f64], extra: Option<f64>, row_total: f64, w: f64, h: f64, remaining: f64) -> f64 {
    if row.is_empty() || remaining <= 0.0 || row_total <= 0.0 {
        return f64::INFINITY;
    }
    let longer = w.max(h);
    let shorter = w.min(h);
    let thickness = row_total / remaining * longer;
    if thickness <= 0.0 {
        return f64::INFINITY;
    }
    row.iter()
        .copied()
        .chain(extra)
        .map(|v| {
            let len = v / row_total * shorter;
            if len <= 0.0 { f64::INFINITY } else { (thickness / len).max(len / thickness) }
        })
        .fold(0.0, f64::max)
}

/// Tile `items`, then recurse into any children inside their parent's tile.
/// Children sit below a `header` band and `pad` from the other edges.
pub fn squarify_nested(items: &[TreemapItem], bounds: Rect, header: f32, pad: f32) -> Vec<Tile<'_>> {
    let mut out = Vec::new();
    nest(items, bounds, 0, header, pad, &mut out);
    out
}

fn nest<'a>(items: &'a [TreemapItem], bounds: Rect, depth: usize, header: f32, pad: f32, out: &mut Vec<Tile<'a>>) {
    for tile in squarify(items, bounds, depth) {
        out.push(tile);
        if tile.item.children.is_empty() {
            continue;
        }
        let r = tile.rect;
        let inner = Rect::new(r.x + pad, r.y + header, r.w - 2.0 * pad, r.h - header - pad);
        if inner.w > 0.0 && inner.h > 0.0 {
            nest(&tile.item.children, inner, depth + 1, header, pad, out);
        }
    }
}
