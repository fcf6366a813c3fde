// File: crates/riso-core/src/chart.rs
// Summary: Chart instances: construction from a config, the frame-driven render loop, grain, export and teardown.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};

use crate::animation::{Animated, Animator, FrameHandle};
use crate::charts::{self, ChartKind, ChartRenderer, Chrome, Frame};
use crate::config::ChartConfig;
use crate::container::Container;
use crate::error::Result;
use crate::shading;
use crate::surface::{PixelBuffer, Surface};
use crate::text::TextShaper;
use crate::theme::{self, ThemeSpec};
use crate::types::Insets;

/// Mutable per-instance state, kept in one place.
struct RuntimeState {
    animator: Animator,
    /// Raster captured right before animated elements were drawn.
    snapshot: Option<PixelBuffer>,
    grain_applied: bool,
    destroyed: bool,
    draws: usize,
    grain_rng: StdRng,
}

/// A live chart bound to one surface.
pub struct ChartInstance {
    renderer: Box<dyn ChartRenderer>,
    surface: Surface,
    theme: ThemeSpec,
    chrome: Chrome,
    text: TextShaper,
    padding: Insets,
    animate: bool,
    state: RuntimeState,
}

/// Build and start a chart in `container`.
///
/// Unknown chart types are logged and yield `Ok(None)`. A missing container
/// or a payload that does not fit the chart type is an error.
pub fn create<'a>(container: impl Into<Container<'a>>, config: ChartConfig) -> Result<Option<ChartInstance>> {
    let Some(kind) = ChartKind::parse(&config.kind) else {
        error!(kind = %config.kind, "unknown chart type");
        return Ok(None);
    };
    let element = container.into().resolve()?;
    let renderer = charts::build(kind, &config)?;
    let height = config.height.or_else(|| renderer.preferred_height());
    let surface = Surface::allocate(&element, config.width, height)?;

    let grain_rng = match config.grain_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut theme = theme::resolve(config.theme.as_deref());
    if let Some(target) = config.grain_target {
        theme.grain_target = target;
    }
    let mut instance = ChartInstance {
        theme,
        chrome: Chrome::from_config(&config),
        text: TextShaper::new(),
        padding: renderer.padding(),
        animate: config.animate,
        state: RuntimeState {
            animator: Animator::new(renderer.duration()),
            snapshot: None,
            grain_applied: false,
            destroyed: false,
            draws: 0,
            grain_rng,
        },
        renderer,
        surface,
    };
    debug!(kind = kind.as_str(), theme = instance.theme.name, animate = instance.animate, "chart created");
    instance.render()?;
    Ok(Some(instance))
}

impl ChartInstance {
    /// Start an animated run, or draw once at full progress and finish.
    fn render(&mut self) -> Result<()> {
        self.state.grain_applied = false;
        if self.animate {
            self.state.animator.start()?;
            return Ok(());
        }
        self.draw_frame(1.0);
        self.state.animator.complete_immediately();
        self.apply_grain()
    }

    /// Redraw from scratch. Fails with `AnimationInProgress` while a run is
    /// still pending; does nothing once destroyed.
    pub fn replay(&mut self) -> Result<()> {
        if self.state.destroyed {
            return Ok(());
        }
        self.render()
    }

    fn draw_frame(&mut self, progress: f32) {
        if self.state.destroyed {
            return;
        }
        let physical = self.surface.physical_size();
        let (width, height) = self.surface.logical_size();
        let Some(canvas) = self.surface.canvas() else { return };
        let restore = canvas.save();
        let mut frame = Frame {
            canvas,
            theme: &self.theme,
            text: &self.text,
            chrome: &self.chrome,
            padding: self.padding,
            width,
            height,
            physical,
            snapshot: &mut self.state.snapshot,
        };
        self.renderer.draw(&mut frame, progress);
        canvas.restore_to_count(restore);
        self.state.draws += 1;
    }

    /// One-shot grain pass over the finished raster.
    fn apply_grain(&mut self) -> Result<()> {
        if self.state.grain_applied || self.state.destroyed {
            return Ok(());
        }
        self.state.grain_applied = true;
        if self.theme.grain <= 0.0 {
            return Ok(());
        }
        let mut pixels = self.surface.read_pixels()?;
        let touched = shading::apply_grain(
            &mut pixels,
            self.state.snapshot.as_deref(),
            self.theme.grain_target,
            &mut self.state.grain_rng,
        );
        self.surface.write_pixels(&pixels)?;
        debug!(touched, target = ?self.theme.grain_target, "grain applied");
        Ok(())
    }

    /// Cancel any pending frame and free the surface and snapshot. Safe to
    /// repeat; exports fail with `Released` afterwards.
    pub fn destroy(&mut self) {
        if self.state.destroyed {
            return;
        }
        self.state.destroyed = true;
        let cancelled = self.state.animator.cancel();
        self.surface.release();
        self.state.snapshot = None;
        debug!(surface = self.surface.id(), cancelled, draws = self.state.draws, "chart destroyed");
    }

    pub fn to_png(&mut self) -> Result<Vec<u8>> {
        self.surface.encode_png()
    }

    /// PNG as a `data:image/png;base64,...` URI.
    pub fn export_image(&mut self) -> Result<String> {
        self.surface.to_data_uri()
    }

    pub fn theme(&self) -> &ThemeSpec {
        &self.theme
    }

    pub fn kind(&self) -> ChartKind {
        self.renderer.kind()
    }

    pub fn duration(&self) -> Duration {
        self.state.animator.duration()
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn logical_size(&self) -> (f32, f32) {
        self.surface.logical_size()
    }

    pub fn progress(&self) -> f32 {
        self.state.animator.progress()
    }

    /// Number of times the renderer has drawn.
    pub fn frames_drawn(&self) -> usize {
        self.state.draws
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.destroyed
    }

    /// Drawn at full progress with grain applied.
    pub fn is_complete(&self) -> bool {
        self.state.animator.is_finished() && self.state.grain_applied
    }

    /// Current raster as unpremultiplied RGBA.
    pub fn pixels(&mut self) -> Result<PixelBuffer> {
        self.surface.read_pixels()
    }

    /// Background raster captured before the last frame's animated elements.
    pub fn snapshot(&self) -> Option<&[u8]> {
        self.state.snapshot.as_deref()
    }
}

impl Animated for ChartInstance {
    fn pending_frame(&self) -> Option<FrameHandle> {
        if self.state.destroyed {
            return None;
        }
        self.state.animator.pending()
    }

    fn on_frame(&mut self, handle: FrameHandle, now: Duration) {
        if self.state.destroyed {
            return;
        }
        let Some(step) = self.state.animator.step(handle, now) else { return };
        self.draw_frame(step.progress);
        if step.finished {
            if let Err(err) = self.apply_grain() {
                warn!(error = %err, "grain pass failed");
            }
        }
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.destroy();
    }
}
