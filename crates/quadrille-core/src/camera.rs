//! Viewport transform: pan offset and scale with anchor-preserving zoom.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default wheel-zoom step factor.
pub const DEFAULT_SCALE_STEP: f64 = 1.05;

/// Camera owns the pan offset and scale applied to the whole drawable scene.
///
/// It converts between window coordinates and layer-local coordinates, and
/// is mutated only through the operations below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan).
    pub offset: Vec2,
    /// Current scale factor.
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a window-space point to layer-local coordinates.
    pub fn screen_to_local(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a layer-local point to window coordinates.
    pub fn local_to_screen(&self, local: Point) -> Point {
        Point::new(
            local.x * self.scale + self.offset.x,
            local.y * self.scale + self.offset.y,
        )
    }

    /// Pan by a delta in window coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Apply one frame of a two-finger pinch.
    ///
    /// Rescales by the distance ratio, then repositions so the local point
    /// that sat under the prior center lands under the new center, shifted
    /// by the center's own travel between frames.
    pub fn apply_pinch(
        &mut self,
        new_center: Point,
        new_distance: f64,
        prior_center: Point,
        prior_distance: f64,
    ) {
        let local = self.screen_to_local(prior_center);
        let scale = self.scale * (new_distance / prior_distance);
        self.scale = scale;

        let drift = new_center - prior_center;
        self.offset = Vec2::new(
            new_center.x - local.x * scale + drift.x,
            new_center.y - local.y * scale + drift.y,
        );
    }

    /// Ctrl-wheel zoom anchored at the pointer. Positive `delta_y` zooms
    /// out (divides the scale by `step`), negative zooms in.
    pub fn apply_wheel_zoom(&mut self, pointer: Point, delta_y: f64, step: f64) {
        let local = self.screen_to_local(pointer);
        let scale = if delta_y > 0.0 {
            self.scale / step
        } else {
            self.scale * step
        };
        self.scale = scale;
        self.offset = Vec2::new(
            pointer.x - local.x * scale,
            pointer.y - local.y * scale,
        );
    }

    /// Plain wheel: translate the viewport by the wheel delta.
    pub fn apply_wheel_pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
