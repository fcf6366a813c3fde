// File: crates/riso-core/src/charts/treemap.rs
// Summary: Treemap renderer: squarified (optionally nested) tiles with gradient fills that fade in.

use std::time::Duration;

use super::{fade, fill_paint, shader_paint, ChartKind, ChartRenderer, Frame};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::geometry::{rounded_rect_path, Rect};
use crate::grid::format_compact;
use crate::shading::{fill_lava, linear_shader, seeded_unit, Blob};
use crate::text::Align;
use crate::treemap::{squarify_nested, Tile, TreemapItem};
use crate::types::Insets;

const GAP: f32 = 3.0;
const RADIUS: f32 = 6.0;
/// Band at the top of a parent tile that holds its label.
const HEADER: f32 = 18.0;
const NEST_PAD: f32 = 3.0;
const BLOB_MID_ALPHA: u8 = 0x77;

pub struct TreemapChart {
    data: Vec<TreemapItem>,
}

impl TreemapChart {
    pub fn new(data: Vec<TreemapItem>) -> Self {
        Self { data }
    }

    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self::new(config.data_as()?))
    }

    pub fn plot(width: f32, height: f32, padding: Insets) -> Rect {
        padding.expand(4.0, 4.0, 8.0, 8.0).content(width, height)
    }

    pub fn tiles(&self, plot: Rect) -> Vec<Tile<'_>> {
        squarify_nested(&self.data, plot, HEADER, NEST_PAD)
    }

    fn draw_tile(&self, frame: &Frame<'_>, ordinal: usize, tile: &Tile<'_>, active: bool, progress: f32) {
        let theme = frame.theme;
        let r = tile.rect;
        let cell = Rect::new(r.x + GAP / 2.0, r.y + GAP / 2.0, r.w - GAP, r.h - GAP);
        if cell.w < 2.0 || cell.h < 2.0 {
            return;
        }
        let item = tile.item;
        let pair = if item.highlight { theme.highlight } else { theme.gradient(ordinal) };
        let path = rounded_rect_path(&cell, RADIUS.min(cell.w / 4.0).min(cell.h / 4.0));
        let grown = (progress * 1.5).min(1.0);

        if active {
            let base = shader_paint(linear_shader((cell.x, cell.y), (cell.right(), cell.bottom()), &pair.as_array()), pair.start);
            let s = |n: usize| seeded_unit(ordinal, n) as f32;
            let blob = Blob {
                cx: cell.x + cell.w * (0.2 + s(0) * 0.6),
                cy: cell.y + cell.h * (0.2 + s(1) * 0.6),
                radius: cell.w.max(cell.h) * 0.5,
                color: 1,
            };
            fill_lava(frame.canvas, &path, &base, &[blob], pair, BLOB_MID_ALPHA, 0.15 + 0.7 * grown);
        } else {
            let mut paint = fill_paint(theme.muted(0.05, 0.03));
            paint.set_alpha_f(paint.alpha_f() * grown);
            frame.canvas.draw_path(&path, &paint);
        }

        if progress <= 0.4 || cell.w <= 40.0 || cell.h <= 24.0 {
            return;
        }
        let alpha = fade(progress, 0.4, 0.4);
        let ink = if active { theme.ink_on_fill() } else { theme.text_source };

        if !item.children.is_empty() {
            let spec = frame.sans(11.0, 600, ink).faded(alpha);
            let text = frame.text.truncate(&item.label, cell.w - 12.0, &spec);
            frame.label_middle(&text, cell.x + 6.0, cell.y + HEADER / 2.0, Align::Left, &spec);
            return;
        }
        let size = 14.0f32.min(cell.w / 8.0).min(cell.h / 3.0);
        let (cx, cy) = cell.center();
        let spec = frame.sans(size, 600, ink).faded(alpha);
        let text = frame.text.truncate(&item.label, cell.w - 8.0, &spec);
        frame.label_middle(&text, cx, cy - size * 0.3, Align::Center, &spec);
        if cell.h > 40.0 {
            let spec = frame.mono((size * 0.7).max(9.0), 400, ink).faded(alpha);
            frame.label_middle(&format_compact(item.value), cx, cy + size * 0.6, Align::Center, &spec);
        }
    }
}

/// Activeness per tile, in layout order: with no highlight anywhere every
/// tile is active; otherwise a tile is active when it or an ancestor is
/// highlighted.
pub fn active_flags(tiles: &[Tile<'_>]) -> Vec<bool> {
    let any = tiles.iter().any(|t| t.item.highlight);
    let mut lit: Vec<bool> = Vec::new();
    tiles
        .iter()
        .map(|t| {
            let inherited = t.depth > 0 && lit.get(t.depth - 1).copied().unwrap_or(false);
            let here = t.item.highlight || inherited;
            lit.truncate(t.depth);
            lit.push(here);
            !any || here
        })
        .collect()
}

impl ChartRenderer for TreemapChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Treemap
    }

    fn duration(&self) -> Duration {
        Duration::from_millis(600)
    }

    fn draw(&self, frame: &mut Frame<'_>, progress: f32) {
        frame.draw_background();
        frame.draw_title();
        frame.draw_source();
        frame.snapshot_background();

        let tiles = self.tiles(Self::plot(frame.width, frame.height, frame.padding));
        let active = active_flags(&tiles);
        for (ordinal, (tile, active)) in tiles.iter().zip(active).enumerate() {
            self.draw_tile(frame, ordinal, tile, active, progress);
        }
    }
}
