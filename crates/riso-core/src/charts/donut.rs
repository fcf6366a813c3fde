// File: crates/riso-core/src/charts/donut.rs
// Summary: Donut and 270-degree gauge: progress-scaled sweeps, annular lava fills, callout labels.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::Deserialize;

use super::{fade, fill_paint, shader_paint, stroke_paint, ChartKind, ChartRenderer, Datum, Frame};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::geometry::annular_sector_path;
use crate::shading::{annular_blob_layout, fill_lava, linear_shader};
use crate::text::Align;
use crate::theme::GradientPair;
use crate::types::Insets;

const BLOBS: usize = 4;
const BLOB_MID_ALPHA: u8 = 0x88;
const GAUGE_START: f32 = PI * 0.75;
const GAUGE_SWEEP: f32 = PI * 1.5;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DonutOptions {
    pub center_label: Option<String>,
    pub center_value: Option<String>,
    pub gauge: bool,
    /// Gauge reading on a 0-100 scale.
    pub gauge_value: f64,
    /// Ring thickness as a fraction of the outer radius.
    pub ring_width: f32,
}

impl Default for DonutOptions {
    fn default() -> Self {
        Self { center_label: None, center_value: None, gauge: false, gauge_value: 0.0, ring_width: 0.35 }
    }
}

/// One slice: start angle and sweep in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start: f32,
    pub sweep: f32,
    /// Share of the total in `[0, 1]`.
    pub share: f64,
}

impl Segment {
    pub fn mid(&self) -> f32 {
        self.start + self.sweep / 2.0
    }
}

/// Slices for `data` with sweeps scaled by `progress`. Non-positive values
/// take no room; an all-zero total yields nothing.
pub fn segments(data: &[Datum], progress: f32) -> Vec<Segment> {
    let weight = |d: &Datum| if d.value.is_finite() && d.value > 0.0 { d.value } else { 0.0 };
    let total: f64 = data.iter().map(weight).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = -FRAC_PI_2;
    data.iter()
        .enumerate()
        .map(|(index, d)| {
            let share = weight(d) / total;
            let sweep = share as f32 * TAU * progress;
            let seg = Segment { index, start: angle, sweep, share };
            angle += sweep;
            seg
        })
        .collect()
}

/// Angle reached by the gauge fill.
pub fn gauge_end(value: f64, progress: f32) -> f32 {
    GAUGE_START + GAUGE_SWEEP * (value.clamp(0.0, 100.0) / 100.0) as f32 * progress
}

struct Ring {
    cx: f32,
    cy: f32,
    outer: f32,
    inner: f32,
}

pub struct DonutChart {
    data: Vec<Datum>,
    options: DonutOptions,
}

impl DonutChart {
    pub fn new(data: Vec<Datum>, options: DonutOptions) -> Self {
        Self { data, options }
    }

    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self::new(config.data_as()?, config.options_as()?))
    }

    fn ring(&self, width: f32, height: f32, padding: Insets) -> Ring {
        let area = padding.content(width, height);
        let outer = (area.w / 2.0 - 20.0).min(area.h / 2.0 - 20.0).max(0.0);
        let ratio = if self.options.ring_width > 0.0 { self.options.ring_width.min(1.0) } else { 0.35 };
        Ring { cx: width / 2.0, cy: area.y + area.h / 2.0 + 8.0, outer, inner: outer * (1.0 - ratio) }
    }

    /// Gradient sector with annular lava, kept inside `path`.
    fn fill_sector(frame: &Frame<'_>, ring: &Ring, path: &skia_safe::Path, pair: GradientPair, from: (f32, f32), to: (f32, f32), seed: usize) {
        let base = shader_paint(linear_shader(from, to, &pair.as_array()), pair.start);
        let blobs = annular_blob_layout(seed, ring.cx, ring.cy, ring.outer, BLOBS);
        fill_lava(frame.canvas, path, &base, &blobs, pair, BLOB_MID_ALPHA, 1.0);
    }

    fn center_text(frame: &Frame<'_>, text: &str, cx: f32, cy: f32, size: f32, alpha: f32) {
        let pair = frame.theme.highlight;
        let spec = frame.sans(size.round().max(1.0), 700, frame.theme.text_primary).faded(alpha);
        frame.gradient_label(text, cx, cy + spec.size * 0.35, Align::Center, &spec, (cx - 30.0, cx + 30.0), pair.as_array());
    }

    fn draw_donut(&self, frame: &Frame<'_>, ring: &Ring, progress: f32) {
        let theme = frame.theme;
        let any_highlight = self.data.iter().any(|d| d.highlight);
        let gap = stroke_paint(theme.background, 2.0);

        for seg in segments(&self.data, progress) {
            let d = &self.data[seg.index];
            let active = !any_highlight || d.highlight;
            let path = annular_sector_path(ring.cx, ring.cy, ring.outer, ring.inner, seg.start, seg.start + seg.sweep);

            if active {
                let pair = if d.highlight { theme.highlight } else { theme.gradient(seg.index) };
                let (c, s) = (seg.mid().cos(), seg.mid().sin());
                let half = ring.outer * 0.5;
                let from = (ring.cx + c * half, ring.cy + s * half);
                let to = (ring.cx - c * half, ring.cy - s * half);
                Self::fill_sector(frame, ring, &path, pair, from, to, seg.index);
            } else {
                frame.canvas.draw_path(&path, &fill_paint(theme.muted(0.06, 0.04)));
            }
            frame.canvas.draw_path(&path, &gap);

            if progress > 0.7 && seg.sweep > 0.15 {
                let mid = seg.mid();
                let r = ring.outer + 14.0;
                let (lx, ly) = (ring.cx + mid.cos() * r, ring.cy + mid.sin() * r);
                let right = mid.cos() > 0.0;
                let color = if active { theme.text_primary } else { theme.text_source };
                let spec = frame.mono(11.0, 500, color).faded(fade(progress, 0.7, 0.3));
                let text = format!("{} {}%", d.label, (seg.share * 100.0).round());
                let (x, align) = if right { (lx + 4.0, Align::Left) } else { (lx - 4.0, Align::Right) };
                frame.label_middle(&text, x, ly, align, &spec);
            }
        }

        if let Some(value) = self.options.center_value.as_deref() {
            if progress > 0.5 {
                let alpha = ((progress - 0.5) * 2.0).min(1.0);
                Self::center_text(frame, value, ring.cx, ring.cy - 4.0, ring.inner * 0.55, alpha);
                if let Some(label) = self.options.center_label.as_deref() {
                    let spec = frame.sans(12.0, 400, theme.text_secondary).faded(alpha);
                    frame.label_middle(label, ring.cx, ring.cy + ring.inner * 0.35, Align::Center, &spec);
                }
            }
        }
    }

    fn draw_gauge(&self, frame: &Frame<'_>, ring: &Ring, progress: f32) {
        let theme = frame.theme;
        let value = self.options.gauge_value.clamp(0.0, 100.0);
        let track = annular_sector_path(ring.cx, ring.cy, ring.outer, ring.inner, GAUGE_START, GAUGE_START + GAUGE_SWEEP);
        frame.canvas.draw_path(&track, &fill_paint(theme.muted(0.05, 0.04)));

        if value > 0.0 && progress > 0.0 {
            let path = annular_sector_path(ring.cx, ring.cy, ring.outer, ring.inner, GAUGE_START, gauge_end(value, progress));
            let o = ring.outer;
            Self::fill_sector(frame, ring, &path, theme.highlight, (ring.cx - o, ring.cy - o), (ring.cx + o, ring.cy + o), 0);
        }

        let cp = ((progress - 0.2) / 0.6).min(1.0);
        if cp > 0.0 {
            let shown = (value * cp as f64).round();
            let alpha = (cp * 1.5).min(1.0);
            Self::center_text(frame, &format!("{shown}"), ring.cx, ring.cy - 6.0, ring.outer * 0.45, alpha);
            if let Some(label) = self.options.center_label.as_deref() {
                let spec = frame.sans(13.0, 400, theme.text_secondary).faded(alpha);
                frame.label_middle(label, ring.cx, ring.cy + ring.outer * 0.25, Align::Center, &spec);
            }
        }
    }
}

impl ChartRenderer for DonutChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Donut
    }

    fn draw(&self, frame: &mut Frame<'_>, progress: f32) {
        frame.draw_background();
        frame.draw_title();
        let ring = self.ring(frame.width, frame.height, frame.padding);
        frame.draw_source();
        frame.snapshot_background();

        if ring.outer <= 0.0 {
            return;
        }
        if self.options.gauge {
            self.draw_gauge(frame, &ring, progress);
        } else {
            self.draw_donut(frame, &ring, progress);
        }
    }
}
