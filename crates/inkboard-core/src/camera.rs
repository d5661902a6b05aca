//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor a camera will accept.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor a camera will accept.
pub const MAX_ZOOM: f64 = 5.0;
/// Multiplier applied per wheel notch and per zoom button press.
pub const ZOOM_STEP: f64 = 1.1;

/// Camera manages the view transform for the canvas.
///
/// `screen = world * zoom + offset`. The zoom always stays inside
/// `[min_zoom, max_zoom]`: [`Camera::zoom_at`] refuses targets outside the
/// range instead of clamping them, so a burst of wheel or pinch deltas can
/// never push the view past its limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom limits.
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.zoom,
            (screen_point.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.offset.x,
            world_point.y * self.zoom + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Whether `zoom` lies inside this camera's limits.
    pub fn accepts_zoom(&self, zoom: f64) -> bool {
        zoom.is_finite() && zoom >= self.min_zoom && zoom <= self.max_zoom
    }

    /// Set the zoom to `new_zoom`, keeping the world point under
    /// `screen_center` fixed on screen.
    ///
    /// Targets outside `[min_zoom, max_zoom]` leave the camera untouched.
    /// Returns whether the camera changed.
    pub fn zoom_at(&mut self, new_zoom: f64, screen_center: Point) -> bool {
        if !self.accepts_zoom(new_zoom) {
            log::debug!("Rejected zoom {new_zoom}, limits [{}, {}]", self.min_zoom, self.max_zoom);
            return false;
        }

        let world_point = self.screen_to_world(screen_center);
        self.zoom = new_zoom;
        self.offset = Vec2::new(
            screen_center.x - world_point.x * new_zoom,
            screen_center.y - world_point.y * new_zoom,
        );
        true
    }

    /// Apply one wheel notch at `screen_point`: scrolling up (negative
    /// `delta_y`) zooms in by `step`, anything else zooms out.
    pub fn wheel_zoom(&mut self, screen_point: Point, delta_y: f64, step: f64) -> bool {
        let target = if delta_y < 0.0 {
            self.zoom * step
        } else {
            self.zoom / step
        };
        self.zoom_at(target, screen_point)
    }

    /// Pinch-zoom from two finger positions.
    ///
    /// The zoom is multiplied by `distance / previous_distance` around the
    /// finger midpoint. With no previous distance the factor is 1.
    pub fn pinch(&mut self, first: Point, second: Point, previous_distance: Option<f64>) -> bool {
        let distance = first.distance(second);
        let previous = match previous_distance {
            Some(d) if d > 0.0 => d,
            _ => distance,
        };
        if previous <= 0.0 {
            return false;
        }
        let center = first.midpoint(second);
        self.zoom_at(self.zoom * (distance / previous), center)
    }

    /// Zoom in by `step`, clamped to the maximum. The offset is kept.
    pub fn zoom_in(&mut self, step: f64) {
        self.zoom = (self.zoom * step).min(self.max_zoom);
    }

    /// Zoom out by `step`, clamped to the minimum. The offset is kept.
    pub fn zoom_out(&mut self, step: f64) {
        self.zoom = (self.zoom / step).max(self.min_zoom);
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
