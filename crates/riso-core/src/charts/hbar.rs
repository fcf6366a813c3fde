// File: crates/riso-core/src/charts/hbar.rs
// Summary: Ranked horizontal bars with rank pills, auto height from row count and highlight modes.

use serde::Deserialize;

use super::{count_up, draw_muted, fill_paint, peak, shader_paint, ChartKind, ChartRenderer, Datum, Frame};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::geometry::{right_rounded_path, rounded_rect_path, Rect};
use crate::grid::format_compact;
use crate::shading::{blob_layout, fill_lava, linear_shader, LavaStyle};
use crate::text::{Align, TextSpec};

const ROW_GAP: f32 = 8.0;
const LABEL_WIDTH: f32 = 120.0;
const RANK_WIDTH: f32 = 36.0;
const VALUE_ROOM: f32 = 70.0;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HBarOptions {
    pub value_prefix: String,
    pub value_suffix: String,
    pub bar_height: f32,
    pub values_on_bar: bool,
    pub show_rank: bool,
    pub highlight_top: Option<usize>,
    /// 1-based row that alone stays highlighted.
    pub highlight_line: Option<usize>,
}

impl Default for HBarOptions {
    fn default() -> Self {
        Self {
            value_prefix: String::new(),
            value_suffix: String::new(),
            bar_height: 36.0,
            values_on_bar: false,
            show_rank: false,
            highlight_top: None,
            highlight_line: None,
        }
    }
}

pub struct HBarChart {
    data: Vec<Datum>,
    options: HBarOptions,
}

impl HBarChart {
    pub fn new(data: Vec<Datum>, mut options: HBarOptions) -> Self {
        if !(options.bar_height.is_finite() && options.bar_height > 0.0) {
            options.bar_height = HBarOptions::default().bar_height;
        }
        Self { data, options }
    }

    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self::new(config.data_as()?, config.options_as()?))
    }

    /// Height that fits every row plus the title and source bands.
    pub fn auto_height(&self) -> f32 {
        (self.data.len() as f32 * (self.options.bar_height + ROW_GAP) + 100.0).max(300.0)
    }

    fn is_active(&self, i: usize) -> bool {
        let o = &self.options;
        if let Some(line) = o.highlight_line {
            return i + 1 == line;
        }
        if let Some(n) = o.highlight_top {
            return i < n;
        }
        if o.show_rank {
            return i < 3;
        }
        if self.data.iter().any(|d| d.highlight) {
            return self.data[i].highlight;
        }
        true
    }

    fn has_contrast(&self) -> bool {
        let o = &self.options;
        if o.highlight_line.is_some() {
            return true;
        }
        if let Some(n) = o.highlight_top {
            return n < self.data.len();
        }
        if o.show_rank {
            return self.data.len() > 3;
        }
        self.data.iter().any(|d| d.highlight)
    }

    fn row_y(&self, top: f32, i: usize) -> f32 {
        top + i as f32 * (self.options.bar_height + ROW_GAP)
    }

    /// Left edge and width of the bar track.
    fn track(&self, frame: &Frame<'_>) -> (f32, f32) {
        let rank = if self.options.show_rank { RANK_WIDTH } else { 0.0 };
        let left = frame.padding.left + rank + LABEL_WIDTH;
        let right = frame.width - frame.padding.right - VALUE_ROOM;
        (left, (right - left).max(0.0))
    }

    /// Bar `i` grown to `progress`.
    pub fn bar(&self, top: f32, left: f32, track: f32, i: usize, progress: f32) -> Option<Rect> {
        let max = peak(&self.data)?;
        let w = (self.data[i].value / max) as f32 * track * progress;
        (w.is_finite() && w > 0.0).then(|| Rect::new(left, self.row_y(top, i), w, self.options.bar_height))
    }

    fn draw_rank(&self, frame: &Frame<'_>, i: usize, row_y: f32, active: bool) {
        let x = frame.padding.left;
        let cy = row_y + self.options.bar_height / 2.0;
        let label = format!("#{}", i + 1);
        if active {
            let pill = Rect::new(x, cy - 9.0, 26.0, 18.0);
            let pair = frame.theme.gradient(i);
            let shader = linear_shader((pill.x, pill.y), (pill.right(), pill.y), &pair.as_array());
            frame.canvas.draw_path(&rounded_rect_path(&pill, 9.0), &shader_paint(shader, pair.start));
            let spec = frame.sans(10.0, 700, frame.theme.ink_on_fill());
            frame.label(&label, x + 13.0, cy + 3.5, Align::Center, &spec);
        } else {
            let spec = frame.mono(10.0, 400, frame.theme.text_source);
            frame.label(&label, x + 13.0, cy + 4.0, Align::Center, &spec);
        }
    }
}

impl ChartRenderer for HBarChart {
    fn kind(&self) -> ChartKind {
        ChartKind::HBar
    }

    fn preferred_height(&self) -> Option<f32> {
        Some(self.auto_height())
    }

    fn draw(&self, frame: &mut Frame<'_>, progress: f32) {
        let theme = frame.theme;
        frame.draw_background();
        frame.draw_title();

        let top = frame.padding.top + 8.0;
        let (left, track) = self.track(frame);
        let bh = self.options.bar_height;
        let contrast = self.has_contrast();

        for (i, d) in self.data.iter().enumerate() {
            let y = self.row_y(top, i);
            let active = self.is_active(i);
            if self.options.show_rank {
                self.draw_rank(frame, i, y, active);
            }
            let color = if contrast && !active { theme.text_source } else { theme.text_secondary };
            let spec = frame.sans(12.0, if active { 500 } else { 400 }, color);
            frame.label(&d.label, left - 12.0, y + bh / 2.0 + 4.0, Align::Right, &spec);
        }

        frame.draw_source();
        frame.snapshot_background();

        for (i, d) in self.data.iter().enumerate() {
            let Some(rect) = self.bar(top, left, track, i, progress) else { continue };
            let active = self.is_active(i);
            let pair = theme.gradient(i);
            let path = right_rounded_path(&rect, 4.0f32.min(rect.w / 2.0));

            if contrast && !active {
                draw_muted(frame, &path);
            } else {
                let blobs = blob_layout(i, &rect, &LavaStyle::RANK);
                fill_lava(frame.canvas, &path, &fill_paint(pair.start), &blobs, pair, LavaStyle::RANK.mid_alpha, 1.0);
            }

            if progress <= 0.3 {
                continue;
            }
            let alpha = ((progress - 0.3) * 1.43).min(1.0);
            let text = format!(
                "{}{}{}",
                self.options.value_prefix,
                format_compact(d.value * count_up(progress)),
                self.options.value_suffix
            );
            let baseline = rect.y + bh / 2.0 + 5.0;
            if self.options.values_on_bar && rect.w > 70.0 {
                let spec = if active {
                    frame.sans(14.0, 700, theme.ink_on_fill())
                } else {
                    frame.sans(12.0, 600, theme.muted(0.25, 0.2))
                };
                frame.label(&text, rect.right() - 10.0, baseline, Align::Right, &spec.faded(alpha));
            } else if active {
                let x = rect.right() + 8.0;
                let spec = frame.sans(14.0, 700, theme.text_primary).faded(alpha);
                frame.gradient_label(&text, x, baseline, Align::Left, &spec, (x, x + 62.0), pair.as_array());
            } else {
                let spec: TextSpec<'_> = frame.sans(12.0, 400, theme.text_source).faded(alpha);
                frame.label(&text, rect.right() + 8.0, baseline, Align::Left, &spec);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(n: usize) -> Vec<Datum> {
        (0..n).map(|i| Datum::new(format!("r{i}"), (n - i) as f64)).collect()
    }

    #[test]
    fn auto_height_has_a_floor() {
        assert_eq!(HBarChart::new(rows(2), HBarOptions::default()).auto_height(), 300.0);
        // 10 rows of 36 + 8, plus 100 for chrome.
        assert_eq!(HBarChart::new(rows(10), HBarOptions::default()).auto_height(), 540.0);
        let slim = HBarOptions { bar_height: 20.0, ..HBarOptions::default() };
        assert_eq!(HBarChart::new(rows(20), slim).auto_height(), 660.0);
    }

    #[test]
    fn bars_scale_to_the_leader() {
        let c = HBarChart::new(rows(4), HBarOptions::default());
        let lead = c.bar(68.0, 180.0, 300.0, 0, 1.0).unwrap();
        let last = c.bar(68.0, 180.0, 300.0, 3, 1.0).unwrap();
        assert_relative_eq!(lead.w, 300.0);
        assert_relative_eq!(last.w, 75.0);
        assert_relative_eq!(last.y, 68.0 + 3.0 * 44.0);
        assert!(c.bar(68.0, 180.0, 300.0, 0, 0.0).is_none());
    }

    #[test]
    fn highlight_line_wins_over_everything() {
        let o = HBarOptions { highlight_line: Some(2), highlight_top: Some(3), show_rank: true, ..HBarOptions::default() };
        let c = HBarChart::new(rows(5), o);
        assert!(c.has_contrast());
        assert!(!c.is_active(0));
        assert!(c.is_active(1));
        assert!(!c.is_active(2));
    }

    #[test]
    fn show_rank_highlights_podium() {
        let c = HBarChart::new(rows(5), HBarOptions { show_rank: true, ..HBarOptions::default() });
        assert!(c.has_contrast());
        assert!(c.is_active(2));
        assert!(!c.is_active(3));
        let short = HBarChart::new(rows(3), HBarOptions { show_rank: true, ..HBarOptions::default() });
        assert!(!short.has_contrast());
    }

    #[test]
    fn bad_bar_height_falls_back() {
        let c = HBarChart::new(rows(1), HBarOptions { bar_height: -4.0, ..HBarOptions::default() });
        assert_eq!(c.options.bar_height, 36.0);
    }
}
