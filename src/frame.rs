//! Per-renderer frame scheduling.
//!
//! A [`FrameDriver`] owns the one pending frame request of a renderer. The
//! host facility that actually schedules callbacks sits behind
//! [`FrameScheduler`]; in the browser that is `requestAnimationFrame`.

use crate::error::VizError;

/// Opaque handle returned by the host when a frame is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

pub trait FrameScheduler {
    fn request(&mut self) -> Result<FrameHandle, VizError>;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Decides which host frames are drawn.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    min_interval_ms: Option<f64>,
    last_drawn_ms: Option<f64>,
}

impl FrameClock {
    /// Draw on every host frame.
    pub fn unthrottled() -> Self {
        Self::default()
    }

    /// Skip host frames arriving sooner than `interval_ms` after the last drawn one.
    pub fn throttled(interval_ms: f64) -> Self {
        Self {
            min_interval_ms: Some(interval_ms),
            last_drawn_ms: None,
        }
    }

    pub fn due(&mut self, now_ms: f64) -> bool {
        if let (Some(min), Some(last)) = (self.min_interval_ms, self.last_drawn_ms) {
            if now_ms - last < min {
                return false;
            }
        }
        self.last_drawn_ms = Some(now_ms);
        true
    }
}

pub struct FrameDriver<S> {
    scheduler: S,
    clock: FrameClock,
    pending: Option<FrameHandle>,
    running: bool,
}

impl<S: FrameScheduler> FrameDriver<S> {
    pub fn new(scheduler: S, clock: FrameClock) -> Self {
        Self {
            scheduler,
            clock,
            pending: None,
            running: false,
        }
    }

    pub fn start(&mut self) -> Result<(), VizError> {
        if self.running {
            return Ok(());
        }
        self.running = true;
        self.pending = Some(self.scheduler.request()?);
        Ok(())
    }

    /// Host frame callback. Draws when the clock says so and requests the
    /// next frame. Does nothing once stopped.
    pub fn on_frame<F: FnMut(f64)>(&mut self, now_ms: f64, draw: &mut F) -> Result<(), VizError> {
        self.pending = None;
        if !self.running {
            return Ok(());
        }
        if self.clock.due(now_ms) {
            draw(now_ms);
        }
        self.pending = Some(self.scheduler.request()?);
        Ok(())
    }

    /// Cancel the pending frame. After this returns no draw happens again.
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_throttles_to_interval() {
        let mut clock = FrameClock::throttled(33.0);
        assert!(clock.due(0.0));
        assert!(!clock.due(16.0));
        assert!(!clock.due(32.9));
        assert!(clock.due(33.0));
        assert!(!clock.due(50.0));
        assert!(clock.due(70.0));
    }

    #[test]
    fn unthrottled_clock_draws_every_frame() {
        let mut clock = FrameClock::unthrottled();
        assert!((0..5).all(|i| clock.due(i as f64)));
    }
}
