// File: crates/riso-core/src/charts/bar.rs
// Summary: Vertical bar chart: centered bar packing, rounded tops with lava fills, counting value labels.

use serde::Deserialize;

use super::{count_up, draw_muted, fill_paint, peak, stroke_paint, ChartKind, ChartRenderer, Datum, Frame};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::geometry::{top_rounded_path, Rect};
use crate::grid::format_compact;
use crate::shading::{blob_layout, fill_lava, LavaStyle};
use crate::text::{Align, TextShaper, TextSpec};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BarOptions {
    pub value_prefix: String,
    pub value_suffix: String,
    pub show_values: bool,
    /// Put values inside tall bars instead of above them.
    pub values_on_bar: bool,
    pub bar_radius: f32,
    /// Only the first N bars get the full treatment.
    pub highlight_top: Option<usize>,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            value_prefix: String::new(),
            value_suffix: String::new(),
            show_values: true,
            values_on_bar: false,
            bar_radius: 6.0,
            highlight_top: None,
        }
    }
}

/// Horizontal packing of `n` bars inside a plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub plot: Rect,
    pub bar_width: f32,
    pub gap: f32,
    pub start_x: f32,
    /// Pixels per unit value; the tallest bar reaches 1/1.15 of the plot.
    pub scale_y: f32,
}

impl BarLayout {
    pub fn new(plot: Rect, n: usize, max_value: Option<f64>) -> Self {
        let gap = (plot.w * 0.08).max(12.0);
        let n = n.max(1) as f32;
        let gaps = (n - 1.0) * gap;
        let bar_width = ((plot.w - gaps) / n).min(80.0).max(0.0);
        let start_x = plot.x + (plot.w - (n * bar_width + gaps)) / 2.0;
        let scale_y = max_value.map_or(0.0, |m| plot.h / (m * 1.15) as f32);
        Self { plot, bar_width, gap, start_x, scale_y }
    }

    pub fn x(&self, i: usize) -> f32 {
        self.start_x + i as f32 * (self.bar_width + self.gap)
    }

    /// The bar for `value` grown to `progress`; `None` when it has no height.
    pub fn bar(&self, i: usize, value: f64, progress: f32) -> Option<Rect> {
        let h = value as f32 * self.scale_y * progress;
        (h.is_finite() && h > 0.0).then(|| Rect::new(self.x(i), self.plot.bottom() - h, self.bar_width, h))
    }
}

pub struct BarChart {
    data: Vec<Datum>,
    options: BarOptions,
}

impl BarChart {
    pub fn new(data: Vec<Datum>, options: BarOptions) -> Self {
        Self { data, options }
    }

    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self::new(config.data_as()?, config.options_as()?))
    }

    fn is_active(&self, i: usize) -> bool {
        if let Some(n) = self.options.highlight_top {
            return i < n;
        }
        if self.data.iter().any(|d| d.highlight) {
            return self.data[i].highlight;
        }
        true
    }

    fn has_contrast(&self) -> bool {
        match self.options.highlight_top {
            Some(n) => n < self.data.len(),
            None => self.data.iter().any(|d| d.highlight),
        }
    }

    fn plot(frame: &Frame<'_>) -> Rect {
        frame.padding.expand(0.0, 0.0, 8.0, 20.0).content(frame.width, frame.height)
    }
}

impl ChartRenderer for BarChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn draw(&self, frame: &mut Frame<'_>, progress: f32) {
        let theme = frame.theme;
        frame.draw_background();
        frame.draw_title();

        let plot = Self::plot(frame);
        let layout = BarLayout::new(plot, self.data.len(), peak(&self.data));
        let contrast = self.has_contrast();

        let grid = stroke_paint(theme.grid, 1.0);
        for i in 1..=3 {
            let y = plot.bottom() - plot.h * i as f32 / 4.0;
            frame.canvas.draw_line((plot.x, y), (plot.right(), y), &grid);
        }
        frame.canvas.draw_line((plot.x, plot.bottom()), (plot.right(), plot.bottom()), &grid);

        for (i, d) in self.data.iter().enumerate() {
            let color = if contrast && !self.is_active(i) { theme.text_source } else { theme.text_secondary };
            let spec = frame.mono(11.0, 400, color);
            let text = fit_label(frame.text, &d.label, layout.bar_width + layout.gap * 0.6, &spec);
            frame.label(&text, layout.x(i) + layout.bar_width / 2.0, plot.bottom() + 16.0, Align::Center, &spec);
        }

        frame.draw_source();
        frame.snapshot_background();

        for (i, d) in self.data.iter().enumerate() {
            let Some(rect) = layout.bar(i, d.value, progress) else { continue };
            let active = self.is_active(i);
            let radius = self.options.bar_radius.min(rect.h / 2.0);
            let path = top_rounded_path(&rect, radius);
            let pair = theme.gradient(i);

            if contrast && !active {
                draw_muted(frame, &path);
            } else {
                let blobs = blob_layout(i, &rect, &LavaStyle::BAR);
                fill_lava(frame.canvas, &path, &fill_paint(pair.start), &blobs, pair, LavaStyle::BAR.mid_alpha, 1.0);
            }

            if !self.options.show_values || progress <= 0.3 {
                continue;
            }
            let alpha = ((progress - 0.3) * 1.43).min(1.0);
            let text = format!(
                "{}{}{}",
                self.options.value_prefix,
                format_compact(d.value * count_up(progress)),
                self.options.value_suffix
            );
            let cx = rect.x + rect.w / 2.0;
            if self.options.values_on_bar && rect.h > 35.0 {
                let (color, spec) = if active {
                    (theme.ink_on_fill(), frame.sans(16.0, 700, theme.ink_on_fill()))
                } else {
                    (theme.muted(0.25, 0.2), frame.sans(14.0, 600, theme.muted(0.25, 0.2)))
                };
                let spec = TextSpec { color, ..spec }.faded(alpha);
                frame.label(&text, cx, rect.y + 22.0, Align::Center, &spec);
            } else if active {
                let spec = frame.sans(18.0, 700, theme.text_primary).faded(alpha);
                frame.gradient_label(&text, cx, rect.y - 12.0, Align::Center, &spec, (rect.x, rect.right()), pair.as_array());
            } else {
                let spec = frame.sans(14.0, 500, theme.text_source).faded(alpha);
                frame.label(&text, cx, rect.y - 12.0, Align::Center, &spec);
            }
        }
    }
}

/// Shorten a category label to `max_width`: whole label, then its first
/// word, then a truncated form.
pub(crate) fn fit_label(shaper: &TextShaper, label: &str, max_width: f32, spec: &TextSpec<'_>) -> String {
    if shaper.measure_width(label, spec) <= max_width {
        return label.to_string();
    }
    if let Some((first, _)) = label.split_once(' ') {
        if shaper.measure_width(first, spec) <= max_width {
            return first.to_string();
        }
    }
    shaper.truncate(label, max_width, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plot() -> Rect {
        Rect::new(24.0, 68.0, 552.0, 264.0)
    }

    #[test]
    fn bars_are_centered_and_disjoint() {
        let l = BarLayout::new(plot(), 4, Some(100.0));
        let bars: Vec<Rect> = (0..4).filter_map(|i| l.bar(i, 50.0, 1.0)).collect();
        assert_eq!(bars.len(), 4);
        for w in bars.windows(2) {
            assert!(w[0].right() < w[1].x);
        }
        let left_margin = bars[0].x - plot().x;
        let right_margin = plot().right() - bars[3].right();
        assert_relative_eq!(left_margin, right_margin, epsilon = 1e-3);
        assert!(l.bar_width <= 80.0);
    }

    #[test]
    fn tallest_bar_leaves_headroom() {
        let l = BarLayout::new(plot(), 3, Some(40.0));
        let r = l.bar(1, 40.0, 1.0).unwrap();
        assert_relative_eq!(r.h, plot().h / 1.15, epsilon = 1e-3);
        assert_relative_eq!(r.bottom(), plot().bottom(), epsilon = 1e-3);
        let half = l.bar(1, 40.0, 0.5).unwrap();
        assert_relative_eq!(half.h, r.h / 2.0, epsilon = 1e-3);
    }

    #[test]
    fn zero_and_negative_values_draw_nothing() {
        let l = BarLayout::new(plot(), 2, Some(10.0));
        assert!(l.bar(0, 0.0, 1.0).is_none());
        assert!(l.bar(0, -3.0, 1.0).is_none());
        assert!(l.bar(0, 10.0, 0.0).is_none());
        let flat = BarLayout::new(plot(), 2, None);
        assert!(flat.bar(0, 5.0, 1.0).is_none());
    }

    #[test]
    fn highlight_top_overrides_item_flags() {
        let data = vec![Datum::new("a", 3.0), Datum::new("b", 2.0).highlighted(), Datum::new("c", 1.0)];
        let chart = BarChart::new(data.clone(), BarOptions { highlight_top: Some(1), ..BarOptions::default() });
        assert!(chart.has_contrast());
        assert!(chart.is_active(0));
        assert!(!chart.is_active(1));

        let flagged = BarChart::new(data.clone(), BarOptions::default());
        assert!(flagged.has_contrast());
        assert!(!flagged.is_active(0));
        assert!(flagged.is_active(1));

        let everyone = BarChart::new(data, BarOptions { highlight_top: Some(10), ..BarOptions::default() });
        assert!(!everyone.has_contrast());
    }

    #[test]
    fn options_decode_with_defaults() {
        let cfg = ChartConfig::new("bar", serde_json::json!([{"label": "x", "value": 2}]))
            .with_option("valuePrefix", serde_json::json!("$"))
            .with_option("highlightTop", serde_json::json!(2));
        let chart = BarChart::from_config(&cfg).unwrap();
        assert_eq!(chart.options.value_prefix, "$");
        assert_eq!(chart.options.highlight_top, Some(2));
        assert!(chart.options.show_values);
        assert_eq!(chart.options.bar_radius, 6.0);
        assert_eq!(chart.data, vec![Datum::new("x", 2.0)]);
    }
}
