// File: crates/riso-core/src/charts/sankey.rs
// Summary: Sankey renderer: ribbons that thicken with progress, gradient nodes and side labels.

use std::time::Duration;

use skia_safe as skia;

use super::{fade, fill_paint, shader_paint, ChartKind, ChartRenderer, Frame};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::geometry::{rounded_rect_path, Rect};
use crate::sankey::{layout, Ribbon, SankeyGraph, SankeyLayout};
use crate::shading::linear_shader;
use crate::text::Align;
use crate::types::Insets;

/// Horizontal room kept for node labels on either side.
const LABEL_ROOM: f32 = 60.0;
const RIBBON_ALPHA: u8 = 0x55;

pub struct SankeyChart {
    graph: SankeyGraph,
}

impl SankeyChart {
    pub fn new(graph: SankeyGraph) -> Self {
        Self { graph }
    }

    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self::new(config.data_as()?))
    }

    pub fn plot(width: f32, height: f32, padding: Insets) -> Rect {
        padding.expand(LABEL_ROOM, LABEL_ROOM, 8.0, 8.0).content(width, height)
    }

    pub fn layout(&self, plot: Rect) -> SankeyLayout {
        layout(&self.graph, plot)
    }
}

/// Closed ribbon outline with its thickness scaled by `progress`.
pub fn ribbon_path(r: &Ribbon, progress: f32) -> skia::Path {
    let half = r.thickness / 2.0 * progress;
    let (c1, c2) = r.control_xs();
    let mut path = skia::Path::new();
    path.move_to((r.x0, r.y0 - half));
    path.cubic_to((c1, r.y0 - half), (c2, r.y1 - half), (r.x1, r.y1 - half));
    path.line_to((r.x1, r.y1 + half));
    path.cubic_to((c2, r.y1 + half), (c1, r.y0 + half), (r.x0, r.y0 + half));
    path.close();
    path
}

impl ChartRenderer for SankeyChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Sankey
    }

    fn duration(&self) -> Duration {
        Duration::from_millis(900)
    }

    fn padding(&self) -> Insets {
        Insets::new(24.0, 24.0, 60.0, 24.0)
    }

    fn draw(&self, frame: &mut Frame<'_>, progress: f32) {
        let theme = frame.theme;
        frame.draw_background();
        frame.draw_title();
        let laid = self.layout(Self::plot(frame.width, frame.height, frame.padding));
        frame.draw_source();
        frame.snapshot_background();

        let any_highlight = self.graph.links.iter().any(|l| l.highlight);
        for ribbon in &laid.ribbons {
            let link = &self.graph.links[ribbon.link];
            let paint = if !any_highlight || link.highlight {
                let pair = if link.highlight { theme.highlight } else { theme.gradient(ribbon.link) };
                let colors = [pair.start.with_a(RIBBON_ALPHA), pair.end.with_a(RIBBON_ALPHA)];
                shader_paint(linear_shader((ribbon.x0, 0.0), (ribbon.x1, 0.0), &colors), colors[0])
            } else {
                fill_paint(theme.muted(0.04, 0.02))
            };
            frame.canvas.draw_path(&ribbon_path(ribbon, progress), &paint);
        }

        let label_alpha = fade(progress, 0.5, 0.5);
        for (ni, node) in laid.nodes.iter().enumerate() {
            let Some(node) = node else { continue };
            let r = node.rect;
            let pair = theme.gradient(ni);
            let paint = shader_paint(linear_shader((r.x, r.y), (r.x, r.bottom()), &pair.as_array()), pair.start);
            frame.canvas.draw_path(&rounded_rect_path(&r, 4.0f32.min(r.w / 4.0)), &paint);

            if progress > 0.5 {
                let spec = frame.sans(11.0, 500, theme.text_secondary).faded(label_alpha);
                let label = &self.graph.nodes[ni].label;
                let cy = r.y + r.h / 2.0;
                if node.column == 0 {
                    frame.label_middle(label, r.x - 8.0, cy, Align::Right, &spec);
                } else {
                    frame.label_middle(label, r.right() + 8.0, cy, Align::Left, &spec);
                }
            }
        }
    }
}
