// File: crates/riso-core/src/charts/mod.rs
// Summary: Renderer contract shared by every chart kind, the per-frame drawing context and kind dispatch.

use std::time::Duration;

use serde::Deserialize;
use skia_safe as skia;
use tracing::warn;

use crate::animation::DEFAULT_DURATION;
use crate::config::ChartConfig;
use crate::error::Result;
use crate::surface::{read_canvas_pixels, PixelBuffer};
use crate::text::{Align, TextShaper, TextSpec};
use crate::theme::ThemeSpec;
use crate::types::Insets;

pub mod bar;
pub mod donut;
pub mod hbar;
pub mod line;
pub mod sankey;
pub mod treemap;

/// Chart kinds with a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    HBar,
    Line,
    Donut,
    Treemap,
    Sankey,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] =
        [ChartKind::Bar, ChartKind::HBar, ChartKind::Line, ChartKind::Donut, ChartKind::Treemap, ChartKind::Sankey];

    /// Match the config `type` string; `None` for kinds without a renderer.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::HBar => "hbar",
            ChartKind::Line => "line",
            ChartKind::Donut => "donut",
            ChartKind::Treemap => "treemap",
            ChartKind::Sankey => "sankey",
        }
    }
}

/// One chart kind. Renderers hold their decoded data and options and are
/// redrawn from scratch on every frame.
pub trait ChartRenderer {
    fn kind(&self) -> ChartKind;

    fn duration(&self) -> Duration {
        DEFAULT_DURATION
    }

    fn padding(&self) -> Insets {
        Insets::default()
    }

    /// Height to use when the config leaves it open.
    fn preferred_height(&self) -> Option<f32> {
        None
    }

    /// Draw the whole chart at `progress` in `[0, 1]`. Must call
    /// `frame.snapshot_background()` once the static chrome is down.
    fn draw(&self, frame: &mut Frame<'_>, progress: f32);
}

/// Decode `config` into the renderer for `kind`.
pub fn build(kind: ChartKind, config: &ChartConfig) -> Result<Box<dyn ChartRenderer>> {
    Ok(match kind {
        ChartKind::Bar => Box::new(bar::BarChart::from_config(config)?),
        ChartKind::HBar => Box::new(hbar::HBarChart::from_config(config)?),
        ChartKind::Line => Box::new(line::LineChart::from_config(config)?),
        ChartKind::Donut => Box::new(donut::DonutChart::from_config(config)?),
        ChartKind::Treemap => Box::new(treemap::TreemapChart::from_config(config)?),
        ChartKind::Sankey => Box::new(sankey::SankeyChart::from_config(config)?),
    })
}

/// A labeled value, the record shape of bar, ranking and donut data.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Datum {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub highlight: bool,
}

impl Datum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value, highlight: false }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// Largest finite value, or `None` when nothing positive is present.
pub(crate) fn peak(data: &[Datum]) -> Option<f64> {
    let m = data.iter().map(|d| d.value).filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    (m > 0.0).then_some(m)
}

/// Title block and source attribution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chrome {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub source: Option<String>,
}

impl Chrome {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self { title: config.title.clone(), subtitle: config.subtitle.clone(), source: config.source.clone() }
    }

    pub fn source_line(&self) -> String {
        format!("Source: {} | dropthe.org", self.source.as_deref().unwrap_or("DropThe"))
    }
}

/// Everything a renderer needs for one frame. Coordinates are logical pixels.
pub struct Frame<'a> {
    pub canvas: &'a skia::Canvas,
    pub theme: &'a ThemeSpec,
    pub text: &'a TextShaper,
    pub chrome: &'a Chrome,
    pub padding: Insets,
    pub width: f32,
    pub height: f32,
    pub(crate) physical: (i32, i32),
    pub(crate) snapshot: &'a mut Option<PixelBuffer>,
}

impl Frame<'_> {
    pub fn draw_background(&self) {
        self.canvas.clear(self.theme.background);
    }

    pub fn draw_title(&self) {
        let Some(title) = self.chrome.title.as_deref() else { return };
        let left = self.padding.left;
        self.text.draw(self.canvas, title, left, 32.0, Align::Left, &self.sans(18.0, 600, self.theme.text_primary));
        if let Some(sub) = self.chrome.subtitle.as_deref() {
            self.text.draw(self.canvas, sub, left, 50.0, Align::Left, &self.sans(13.0, 400, self.theme.text_secondary));
        }
    }

    pub fn draw_source(&self) {
        let spec = self.mono(10.0, 400, self.theme.text_source);
        self.text.draw(self.canvas, &self.chrome.source_line(), self.padding.left, self.height - 12.0, Align::Left, &spec);
    }

    /// Remember the raster as it is now, before animated elements go on top.
    pub fn snapshot_background(&mut self) {
        *self.snapshot = read_canvas_pixels(self.canvas, self.physical);
        if self.snapshot.is_none() {
            warn!(width = self.physical.0, height = self.physical.1, "background snapshot failed");
        }
    }

    pub fn sans(&self, size: f32, weight: i32, color: skia::Color) -> TextSpec<'static> {
        TextSpec { size, weight, color, families: self.theme.font_families }
    }

    pub fn mono(&self, size: f32, weight: i32, color: skia::Color) -> TextSpec<'static> {
        TextSpec { size, weight, color, families: self.theme.mono_families }
    }

    /// Text on `y` as baseline.
    pub fn label(&self, text: &str, x: f32, y: f32, align: Align, spec: &TextSpec<'_>) {
        self.text.draw(self.canvas, text, x, y, align, spec);
    }

    /// Text vertically centered on `y`.
    pub fn label_middle(&self, text: &str, x: f32, y: f32, align: Align, spec: &TextSpec<'_>) {
        self.text.draw_middle(self.canvas, text, x, y, align, spec);
    }

    /// Text filled with a horizontal two-color gradient spanning `x0..x1`.
    pub fn gradient_label(&self, text: &str, x: f32, y: f32, align: Align, spec: &TextSpec<'_>, span: (f32, f32), colors: [skia::Color; 2]) {
        let Some(shader) = crate::shading::linear_shader((span.0, y), (span.1, y), &colors) else {
            self.label(text, x, y, align, spec);
            return;
        };
        let bounds = skia::Rect::from_ltrb(0.0, 0.0, self.width, self.height);
        self.canvas.save_layer(&skia::canvas::SaveLayerRec::default().bounds(&bounds));
        self.label(text, x, y, align, &TextSpec { color: skia::Color::BLACK.with_a(spec.color.a()), ..*spec });
        let mut paint = skia::Paint::default();
        paint.set_shader(shader);
        paint.set_blend_mode(skia::BlendMode::SrcIn);
        self.canvas.draw_rect(bounds, &paint);
        self.canvas.restore();
    }
}

/// Fraction of an element's fade-in reached at `progress`, starting at
/// `from` and taking `span` of the timeline.
pub(crate) fn fade(progress: f32, from: f32, span: f32) -> f32 {
    ((progress - from) / span).clamp(0.0, 1.0)
}

/// Ease-out-quad used for counting-up value labels.
pub(crate) fn count_up(progress: f32) -> f64 {
    let cp = fade(progress, 0.3, 0.7) as f64;
    1.0 - (1.0 - cp).powi(2)
}

pub(crate) fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_color(color);
    p
}

pub(crate) fn stroke_paint(color: skia::Color, width: f32) -> skia::Paint {
    let mut p = fill_paint(color);
    p.set_style(skia::paint::Style::Stroke);
    p.set_stroke_width(width);
    p
}

pub(crate) fn shader_paint(shader: Option<skia::Shader>, fallback: skia::Color) -> skia::Paint {
    let mut p = fill_paint(fallback);
    if let Some(s) = shader {
        p.set_shader(s);
    }
    p
}

/// Draw a de-emphasized shape: translucent neutral fill with a faint outline.
pub(crate) fn draw_muted(frame: &Frame<'_>, path: &skia::Path) {
    frame.canvas.draw_path(path, &fill_paint(frame.theme.muted(0.08, 0.06)));
    frame.canvas.draw_path(path, &stroke_paint(frame.theme.muted(0.06, 0.04), 1.0));
}
