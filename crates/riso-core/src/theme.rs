// File: crates/riso-core/src/theme.rs
// Summary: Built-in midnight/sand themes: palette, gradient pairs, fonts and grain settings.

use serde::Deserialize;
use skia_safe as skia;

/// Which pixels the grain post-process touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum GrainTarget {
    /// Every pixel of the raster.
    #[serde(rename = "all")]
    All,
    /// Only pixels that changed since the background snapshot.
    #[serde(rename = "elements")]
    ElementsOnly,
}

/// Two-color endpoint pair for linear/radial fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientPair {
    pub start: skia::Color,
    pub end: skia::Color,
}

impl GradientPair {
    pub const fn new(start: skia::Color, end: skia::Color) -> Self {
        Self { start, end }
    }
    /// Endpoint by parity, used when alternating blob colors.
    pub fn pick(&self, i: usize) -> skia::Color {
        if i % 2 == 0 { self.start } else { self.end }
    }
    pub fn as_array(&self) -> [skia::Color; 2] {
        [self.start, self.end]
    }
}

#[derive(Clone, Debug)]
pub struct ThemeSpec {
    pub name: &'static str,
    pub dark: bool,
    pub background: skia::Color,
    pub surface: skia::Color,
    pub grid: skia::Color,
    pub text_primary: skia::Color,
    pub text_secondary: skia::Color,
    pub text_source: skia::Color,
    /// Cycled by series/segment index.
    pub gradients: Vec<GradientPair>,
    pub highlight: GradientPair,
    pub line_stroke: skia::Color,
    pub font_families: &'static [&'static str],
    pub mono_families: &'static [&'static str],
    /// Grain intensity; zero disables the grain pass.
    pub grain: f32,
    pub grain_target: GrainTarget,
}

const SANS: &[&str] = &["Space Grotesk", "Segoe UI", "Helvetica", "DejaVu Sans", "sans-serif"];
const MONO: &[&str] = &["SF Mono", "Fira Code", "Menlo", "DejaVu Sans Mono", "monospace"];

fn rgb(hex: u32) -> skia::Color {
    skia::Color::from_argb(255, (hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

fn pastel_gradients() -> Vec<GradientPair> {
    vec![
        GradientPair::new(rgb(0xc4b5fd), rgb(0xf9a8d4)), // violet -> pink
        GradientPair::new(rgb(0x93b8fd), rgb(0xc4b5fd)), // blue -> violet
        GradientPair::new(rgb(0x86efac), rgb(0x93b8fd)), // green -> blue
        GradientPair::new(rgb(0xfdd08a), rgb(0xf9a8d4)), // amber -> pink
        GradientPair::new(rgb(0xfdba74), rgb(0xfdd08a)), // orange -> amber
        GradientPair::new(rgb(0x5eead4), rgb(0x86efac)), // teal -> green
    ]
}

impl ThemeSpec {
    pub fn midnight() -> Self {
        Self {
            name: "midnight",
            dark: true,
            background: rgb(0x0a0a0f),
            surface: rgb(0x141419),
            grid: rgb(0x1a1a22),
            text_primary: rgb(0xf0f0f0),
            text_secondary: rgb(0x555566),
            text_source: rgb(0x333344),
            gradients: pastel_gradients(),
            highlight: GradientPair::new(rgb(0xf9a8d4), rgb(0x93b8fd)),
            line_stroke: rgb(0xc4b5fd),
            font_families: SANS,
            mono_families: MONO,
            grain: 0.055,
            grain_target: GrainTarget::ElementsOnly,
        }
    }

    pub fn sand() -> Self {
        Self {
            name: "sand",
            dark: false,
            background: rgb(0xebe5d9),
            surface: rgb(0xe0dace),
            grid: rgb(0xd4cec2),
            text_primary: rgb(0x1a1815),
            text_secondary: rgb(0x8a8478),
            text_source: rgb(0xb0a89c),
            gradients: pastel_gradients(),
            highlight: GradientPair::new(rgb(0xf9a8d4), rgb(0x93b8fd)),
            line_stroke: rgb(0xc4b5fd),
            font_families: SANS,
            mono_families: MONO,
            grain: 0.055,
            grain_target: GrainTarget::ElementsOnly,
        }
    }

    /// Gradient for the `i`-th series/segment; wraps around the palette.
    pub fn gradient(&self, i: usize) -> GradientPair {
        self.gradients[i % self.gradients.len()]
    }

    /// Neutral translucent fill for de-emphasized elements.
    pub fn muted(&self, dark_alpha: f32, light_alpha: f32) -> skia::Color {
        if self.dark {
            skia::Color::from_argb(alpha(dark_alpha), 255, 255, 240)
        } else {
            skia::Color::from_argb(alpha(light_alpha), 0, 0, 0)
        }
    }

    /// Text drawn on top of a gradient fill.
    pub fn ink_on_fill(&self) -> skia::Color {
        if self.dark {
            skia::Color::from_argb(alpha(0.85), 10, 10, 15)
        } else {
            skia::Color::from_argb(alpha(0.9), 255, 255, 255)
        }
    }
}

fn alpha(a: f32) -> u8 {
    (a.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Return the built-in theme presets.
pub fn presets() -> Vec<ThemeSpec> {
    vec![ThemeSpec::midnight(), ThemeSpec::sand()]
}

/// Find a theme by its `name` (or the `dark`/`light` alias), falling back to midnight.
pub fn resolve(name: Option<&str>) -> ThemeSpec {
    let Some(name) = name else { return ThemeSpec::midnight() };
    if name.eq_ignore_ascii_case("light") {
        return ThemeSpec::sand();
    }
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    ThemeSpec::midnight()
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into a color.
pub fn parse_hex_color(s: &str) -> Option<skia::Color> {
    let hex = s.trim().strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
            Some(skia::Color::from_argb(255, nib(0)?, nib(1)?, nib(2)?))
        }
        6 => Some(skia::Color::from_argb(255, byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(skia::Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_absent_names_fall_back_to_midnight() {
        assert_eq!(resolve(None).name, "midnight");
        assert_eq!(resolve(Some("neon")).name, "midnight");
        assert_eq!(resolve(Some("SAND")).name, "sand");
        assert_eq!(resolve(Some("light")).name, "sand");
    }

    #[test]
    fn gradients_cycle_by_index() {
        let t = ThemeSpec::midnight();
        let n = t.gradients.len();
        assert_eq!(t.gradient(0), t.gradient(n));
        assert_eq!(t.gradient(2), t.gradient(2 + 3 * n));
        assert_ne!(t.gradient(0), t.gradient(1));
    }

    #[test]
    fn both_themes_share_the_palette() {
        assert_eq!(ThemeSpec::midnight().gradients, ThemeSpec::sand().gradients);
        assert_ne!(ThemeSpec::midnight().background, ThemeSpec::sand().background);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0000"), Some(skia::Color::from_argb(255, 255, 0, 0)));
        assert_eq!(parse_hex_color("#0f0"), Some(skia::Color::from_argb(255, 0, 255, 0)));
        assert_eq!(parse_hex_color("#0000ff80"), Some(skia::Color::from_argb(0x80, 0, 0, 255)));
        assert_eq!(parse_hex_color("blue"), None);
    }
}
