// File: crates/riso-core/src/text.rs
// Summary: Text shaper/renderer on Skia textlayout: themed families, weights, alignment and truncation.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// How a run of text looks.
#[derive(Clone, Copy, Debug)]
pub struct TextSpec<'a> {
    pub size: f32,
    pub weight: i32,
    pub color: skia::Color,
    pub families: &'a [&'a str],
}

impl TextSpec<'_> {
    /// Same spec with the color's alpha scaled by `a`.
    pub fn faded(mut self, a: f32) -> Self {
        let alpha = (self.color.a() as f32 * a.clamp(0.0, 1.0)).round() as u8;
        self.color = self.color.with_a(alpha);
        self
    }
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(spec: &TextSpec<'_>) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(spec.size.max(1.0));
        ts.set_color(spec.color);
        ts.set_font_families(spec.families);
        ts.set_font_style(skia::FontStyle::new(
            skia::font_style::Weight::from(spec.weight),
            skia::font_style::Width::NORMAL,
            skia::font_style::Slant::Upright,
        ));
        ts
    }

    pub fn layout(&self, text: &str, spec: &TextSpec<'_>) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        pstyle.set_max_lines(1);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(spec));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, spec: &TextSpec<'_>) -> f32 {
        self.layout(text, spec).longest_line()
    }

    /// Draw with `y` as the baseline and `x` anchored per `align`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, align: Align, spec: &TextSpec<'_>) {
        if text.is_empty() || spec.color.a() == 0 {
            return;
        }
        let mut p = self.layout(text, spec);
        let w = p.longest_line();
        let left = match align {
            Align::Left => x,
            Align::Center => x - w * 0.5,
            Align::Right => x - w,
        };
        // Paragraph draws from top-left; adjust baseline by glyph height approximation
        p.paint(canvas, (left, y - spec.size * 0.8));
    }

    /// Draw vertically centered on `y`.
    pub fn draw_middle(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, align: Align, spec: &TextSpec<'_>) {
        self.draw(canvas, text, x, y + spec.size * 0.35, align, spec);
    }

    /// Trim `text` with a trailing `..` until it fits `max_width`.
    pub fn truncate(&self, text: &str, max_width: f32, spec: &TextSpec<'_>) -> String {
        if self.measure_width(text, spec) <= max_width {
            return text.to_string();
        }
        let mut chars: Vec<char> = text.chars().collect();
        while chars.len() > 2 {
            chars.pop();
            let candidate: String = chars.iter().collect::<String>() + "..";
            if self.measure_width(&candidate, spec) <= max_width {
                return candidate;
            }
        }
        chars.into_iter().collect::<String>() + ".."
    }
}
