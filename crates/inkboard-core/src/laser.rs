//! Laser pointer trail.
//!
//! The trail lives outside the scene and history and is never broadcast.
//! After the pointer lifts, a repeating per-frame task fades it out; the
//! host advances that task from its frame callback (or a test clock) and
//! cancels it through a [`CancelToken`] when the view goes away.

use kurbo::Point;
use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag for a scheduled task.
///
/// Clones observe the same flag, so the owner of a view can keep one and
/// cancel the task it handed out.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Result of advancing a repeating task by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTick {
    /// Ask for another frame.
    Continue,
    /// Task finished or was cancelled; do not schedule again.
    Done,
}

/// Per-frame opacity decay.
#[derive(Debug, Clone)]
struct FadeTask {
    step: f64,
    token: CancelToken,
}

/// Ephemeral laser trail in world coordinates.
#[derive(Debug, Clone)]
pub struct LaserTrail {
    points: Vec<Point>,
    opacity: f64,
    fade: Option<FadeTask>,
}

impl Default for LaserTrail {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            opacity: 1.0,
            fade: None,
        }
    }
}

impl LaserTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh trail at `point`, cancelling any running fade.
    pub fn begin(&mut self, point: Point) {
        self.cancel_fade();
        self.points.clear();
        self.points.push(point);
        self.opacity = 1.0;
    }

    /// Extend the trail while the pointer is down.
    pub fn extend(&mut self, point: Point) {
        self.points.push(point);
        self.opacity = 1.0;
    }

    /// Schedule the fade-out. Returns a token that cancels it.
    pub fn start_fade(&mut self, step: f64) -> CancelToken {
        self.cancel_fade();
        let token = CancelToken::new();
        self.fade = Some(FadeTask {
            step,
            token: token.clone(),
        });
        token
    }

    /// Advance the fade by one animation frame.
    ///
    /// Once opacity reaches zero the trail is cleared and the task ends.
    pub fn tick(&mut self) -> FrameTick {
        let Some(task) = &self.fade else {
            return FrameTick::Done;
        };
        if task.token.is_cancelled() {
            self.fade = None;
            return FrameTick::Done;
        }
        self.opacity -= task.step;
        if self.opacity <= 0.0 {
            self.opacity = 0.0;
            self.points.clear();
            self.fade = None;
            return FrameTick::Done;
        }
        FrameTick::Continue
    }

    /// Stop a running fade, leaving the trail as it is.
    pub fn cancel_fade(&mut self) {
        if let Some(task) = self.fade.take() {
            task.token.cancel();
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade.as_ref().is_some_and(|task| !task.token.is_cancelled())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Drop for LaserTrail {
    fn drop(&mut self) {
        self.cancel_fade();
    }
}
