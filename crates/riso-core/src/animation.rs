// File: crates/riso-core/src/animation.rs
// Summary: Cooperative frame-driven animation: eased progress per instance, frame handles, and a headless frame loop.

use std::time::Duration;

use tracing::debug;

use crate::error::{ChartError, Result};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(800);
/// Roughly one 60 Hz frame.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Fixed cubic ease-out: `1 - (1 - t)^3`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}

/// Token for one requested frame callback. Stale tokens are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    /// `start` is recorded by the first frame.
    Scheduled { handle: FrameHandle, start: Option<Duration> },
    Finished,
    Cancelled,
}

/// Result of servicing one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub progress: f32,
    pub finished: bool,
}

/// Per-instance animation state.
#[derive(Debug, Clone)]
pub struct Animator {
    duration: Duration,
    phase: Phase,
    next_handle: u64,
    progress: f32,
}

impl Animator {
    pub fn new(duration: Duration) -> Self {
        Self { duration, phase: Phase::Idle, next_handle: 1, progress: 0.0 }
    }

    pub fn duration(&self) -> Duration { self.duration }

    /// Last eased progress handed out.
    pub fn progress(&self) -> f32 { self.progress }

    pub fn is_running(&self) -> bool { matches!(self.phase, Phase::Scheduled { .. }) }

    pub fn is_finished(&self) -> bool { matches!(self.phase, Phase::Finished) }

    /// Request the first frame. Fails while a run is already in flight.
    pub fn start(&mut self) -> Result<FrameHandle> {
        if self.is_running() {
            return Err(ChartError::AnimationInProgress);
        }
        self.progress = 0.0;
        let handle = self.issue();
        self.phase = Phase::Scheduled { handle, start: None };
        debug!(duration_ms = self.duration.as_millis() as u64, "animation started");
        Ok(handle)
    }

    /// Mark a synchronous, non-animated render as complete.
    pub fn complete_immediately(&mut self) {
        self.progress = 1.0;
        self.phase = Phase::Finished;
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        match self.phase {
            Phase::Scheduled { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Service the frame `handle` at host time `now`. Returns `None` for a
    /// stale or cancelled handle.
    pub fn step(&mut self, handle: FrameHandle, now: Duration) -> Option<Step> {
        let Phase::Scheduled { handle: pending, start } = self.phase else { return None };
        if pending != handle {
            return None;
        }
        let start = start.unwrap_or(now);
        let elapsed = now.saturating_sub(start);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
        };
        let finished = t >= 1.0;
        // Host clocks may jitter backwards; never hand out a smaller value.
        self.progress = if finished { 1.0 } else { ease_out_cubic(t).max(self.progress) };
        if finished {
            self.phase = Phase::Finished;
            debug!("animation finished");
        } else {
            let next = self.issue();
            self.phase = Phase::Scheduled { handle: next, start: Some(start) };
        }
        Some(Step { progress: self.progress, finished })
    }

    /// Drop any pending frame. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_running();
        self.phase = Phase::Cancelled;
        was_pending
    }

    fn issue(&mut self) -> FrameHandle {
        let h = FrameHandle(self.next_handle);
        self.next_handle += 1;
        h
    }
}

/// Anything that can be driven by host frame callbacks.
pub trait Animated {
    fn pending_frame(&self) -> Option<FrameHandle>;
    fn on_frame(&mut self, handle: FrameHandle, now: Duration);
}

/// Simulated host scheduler: fires every pending frame at a fixed interval
/// until nothing is pending.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    now: Duration,
    interval: Duration,
    max_frames: usize,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl FrameLoop {
    pub fn new(interval: Duration) -> Self {
        Self { now: Duration::ZERO, interval: interval.max(Duration::from_millis(1)), max_frames: 100_000 }
    }

    pub fn now(&self) -> Duration { self.now }

    /// Run until every item is idle; returns the number of ticks taken.
    pub fn run<A: Animated>(&mut self, items: &mut [A]) -> usize {
        let mut ticks = 0;
        while ticks < self.max_frames {
            let mut fired = false;
            for item in items.iter_mut() {
                if let Some(handle) = item.pending_frame() {
                    item.on_frame(handle, self.now);
                    fired = true;
                }
            }
            if !fired {
                break;
            }
            ticks += 1;
            self.now += self.interval;
        }
        ticks
    }
}
