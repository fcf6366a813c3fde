// File: crates/riso-core/src/charts/line.rs
// Summary: Multi-series line chart with progressive point reveal, lava-lit area fills, dots and legend.

use serde::Deserialize;
use skia_safe as skia;

use super::{fade, fill_paint, stroke_paint, ChartKind, ChartRenderer, Frame};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::{format_compact, linspace};
use crate::shading::{linear_shader, seeded_unit};
use crate::text::Align;
use crate::theme::parse_hex_color;

/// X coordinate as given: numeric, or text that may hold a number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
}

impl XValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            XValue::Number(v) => Some(*v),
            XValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn label(&self) -> String {
        match self {
            XValue::Number(v) => format!("{v}"),
            XValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LinePoint {
    pub x: XValue,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub data: Vec<LinePoint>,
    /// `#rrggbb` stroke override.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LineOptions {
    pub show_dots: bool,
    pub show_area: bool,
    pub y_prefix: String,
    pub y_suffix: String,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self { show_dots: true, show_area: true, y_prefix: String::new(), y_suffix: String::new() }
    }
}

/// Data-to-pixel mapping for the plot area. X comes from the first series;
/// non-numeric x values map by position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineScale {
    pub plot: Rect,
    pub min_x: f64,
    pub x_range: f64,
    pub min_y: f64,
    pub y_range: f64,
}

impl LineScale {
    /// `None` when there is no finite y value to scale.
    pub fn fit(plot: Rect, series: &[LineSeries]) -> Option<Self> {
        let ys = series.iter().flat_map(|s| s.data.iter().map(|p| p.y)).filter(|y| y.is_finite());
        let (lo, hi) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
        if lo > hi {
            return None;
        }
        let (min_y, max_y) = (lo * 0.95, hi * 1.05);
        let xs: Vec<f64> = series.first().map(|s| x_positions(s)).unwrap_or_default();
        let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_x = if min_x.is_finite() { min_x } else { 0.0 };
        Some(Self { plot, min_x, x_range: nonzero(max_x - min_x), min_y, y_range: nonzero(max_y - min_y) })
    }

    pub fn px(&self, x: f64) -> f32 {
        self.plot.x + ((x - self.min_x) / self.x_range) as f32 * self.plot.w
    }

    pub fn py(&self, y: f64) -> f32 {
        self.plot.bottom() - ((y - self.min_y) / self.y_range) as f32 * self.plot.h
    }
}

fn nonzero(range: f64) -> f64 {
    if range.is_finite() && range != 0.0 { range } else { 1.0 }
}

fn x_positions(series: &LineSeries) -> Vec<f64> {
    series.data.iter().enumerate().map(|(i, p)| p.x.as_f64().unwrap_or(i as f64)).collect()
}

/// Points shown at `progress`: at least one, growing with the timeline.
pub fn visible_count(len: usize, progress: f32) -> usize {
    ((len as f32 * progress).floor() as usize).clamp(1, len.max(1)).min(len)
}

pub struct LineChart {
    series: Vec<LineSeries>,
    options: LineOptions,
}

impl LineChart {
    pub fn new(series: Vec<LineSeries>, options: LineOptions) -> Self {
        Self { series, options }
    }

    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self::new(config.data_as()?, config.options_as()?))
    }

    fn plot(frame: &Frame<'_>) -> Rect {
        frame.padding.expand(50.0, 0.0, 8.0, 20.0).content(frame.width, frame.height)
    }

    fn stroke_color(&self, frame: &Frame<'_>, si: usize) -> skia::Color {
        self.series[si]
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or_else(|| frame.theme.gradient(si).start)
    }

    fn draw_axes(&self, frame: &Frame<'_>, scale: &LineScale) {
        let theme = frame.theme;
        let plot = scale.plot;
        let grid = stroke_paint(theme.grid, 1.0);
        let tick = frame.mono(10.0, 400, theme.text_secondary);
        for frac in linspace(0.0, 1.0, 6) {
            let y = plot.bottom() - frac as f32 * plot.h;
            frame.canvas.draw_line((plot.x, y), (plot.right(), y), &grid);
            let value = scale.min_y + frac * scale.y_range;
            let text = format!("{}{}{}", self.options.y_prefix, format_compact(value), self.options.y_suffix);
            frame.label(&text, plot.x - 8.0, y + 4.0, Align::Right, &tick);
        }

        if let Some(first) = self.series.first() {
            let xs = x_positions(first);
            let shown = xs.len().min(8);
            let step = if shown == 0 { 1 } else { (xs.len() / shown).max(1) };
            for (x, p) in xs.iter().zip(&first.data).step_by(step) {
                frame.label(&p.x.label(), scale.px(*x), plot.bottom() + 16.0, Align::Center, &tick);
            }
        }

        let baseline = stroke_paint(theme.text_secondary.with_a(0x40), 1.0);
        frame.canvas.draw_line((plot.x, plot.bottom()), (plot.right(), plot.bottom()), &baseline);
    }

    fn draw_legend(&self, frame: &Frame<'_>, plot: &Rect) {
        if self.series.len() < 2 {
            return;
        }
        let spec = frame.mono(10.0, 400, frame.theme.text_secondary);
        let y = plot.bottom() + 32.0;
        let mut x = plot.x;
        for (si, s) in self.series.iter().enumerate() {
            let swatch = skia::Rect::from_xywh(x, y - 4.0, 12.0, 3.0);
            frame.canvas.draw_rect(swatch, &fill_paint(self.stroke_color(frame, si)));
            frame.label(&s.label, x + 16.0, y, Align::Left, &spec);
            x += frame.text.measure_width(&s.label, &spec) + 32.0;
        }
    }

    fn draw_area(&self, frame: &Frame<'_>, scale: &LineScale, si: usize, visible: &[(f32, f32)]) {
        let plot = scale.plot;
        let pair = frame.theme.gradient(si);
        let (first_x, last_x) = (visible[0].0, visible[visible.len() - 1].0);

        let mut area = skia::Path::new();
        area.move_to((first_x, plot.bottom()));
        for &p in visible {
            area.line_to(p);
        }
        area.line_to((last_x, plot.bottom()));
        area.close();

        let canvas = frame.canvas;
        canvas.save();
        canvas.clip_path(&area, None, true);
        let base = linear_shader((0.0, plot.y), (0.0, plot.bottom()), &[pair.start.with_a(0x50), pair.start.with_a(0x05)]);
        canvas.draw_rect(plot.to_skia(), &super::shader_paint(base, pair.start.with_a(0x20)));

        let area_w = last_x - first_x;
        let s = |n: usize| seeded_unit(si, n) as f32;
        for i in 0..6 {
            let (bx, by) = (first_x + area_w * (0.05 + s(i) * 0.9), plot.y + plot.h * (0.2 + s(i * 3 + 1) * 0.6));
            let radius = (plot.h * (0.3 + s(i * 3 + 2) * 0.4)).max(0.5);
            let color = pair.pick(i);
            let colors = [color.with_a(0x60), color.with_a(0x30), color.with_a(0)];
            let stops: [f32; 3] = [0.0, 0.5, 1.0];
            let shader =
                skia::Shader::radial_gradient((bx, by), radius, &colors[..], &stops[..], skia::TileMode::Clamp, None, None);
            if let Some(shader) = shader {
                let mut paint = fill_paint(color);
                paint.set_shader(shader);
                canvas.draw_rect(plot.to_skia(), &paint);
            }
        }
        canvas.restore();
    }
}

impl ChartRenderer for LineChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn draw(&self, frame: &mut Frame<'_>, progress: f32) {
        frame.draw_background();
        frame.draw_title();

        let plot = Self::plot(frame);
        let scale = LineScale::fit(plot, &self.series);
        if let Some(scale) = &scale {
            self.draw_axes(frame, scale);
        }
        self.draw_legend(frame, &plot);

        frame.draw_source();
        frame.snapshot_background();

        let Some(scale) = scale else { return };
        for (si, s) in self.series.iter().enumerate() {
            if s.data.is_empty() {
                continue;
            }
            let color = self.stroke_color(frame, si);
            let points: Vec<(f32, f32)> =
                x_positions(s).into_iter().zip(&s.data).map(|(x, p)| (scale.px(x), scale.py(p.y))).collect();
            let visible = &points[..visible_count(points.len(), progress)];

            if self.options.show_area && visible.len() > 1 {
                self.draw_area(frame, &scale, si, visible);
            }

            if visible.len() > 1 {
                let mut line = skia::Path::new();
                line.move_to(visible[0]);
                for &p in &visible[1..] {
                    line.line_to(p);
                }
                let mut paint = stroke_paint(color, 2.5);
                paint.set_stroke_join(skia::paint::Join::Round);
                paint.set_stroke_cap(skia::paint::Cap::Round);
                frame.canvas.draw_path(&line, &paint);
            }

            if self.options.show_dots && progress > 0.8 {
                let alpha = fade(progress, 0.8, 0.2);
                let mut dot = fill_paint(color);
                dot.set_alpha_f(alpha);
                let mut ring = stroke_paint(frame.theme.background, 1.5);
                ring.set_alpha_f(alpha);
                for &p in visible {
                    frame.canvas.draw_circle(p, 3.0, &dot);
                    frame.canvas.draw_circle(p, 3.0, &ring);
                }
            }
        }
    }
}
