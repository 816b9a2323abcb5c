//! Scene-surface capability consumed by the session.

use kurbo::{Point, Size};

use crate::stroke::{Stroke, StrokeId, StrokeStyle};

/// Drawing surface the session draws through.
///
/// Implementations own every stroke; the session and history engine hold
/// only [`StrokeId`] handles. Undo and redo toggle visibility rather than
/// deleting, so a hidden stroke can be brought back cheaply.
pub trait SceneSurface {
    /// Register a new stroke and return its handle.
    fn create_stroke(&mut self, points: Vec<Point>, style: StrokeStyle) -> StrokeId;

    /// Append a point to an in-progress stroke. Unknown handles are ignored.
    fn append_point(&mut self, id: StrokeId, point: Point);

    /// Remove a stroke entirely (a cancelled gesture).
    fn destroy_stroke(&mut self, id: StrokeId);

    /// Hide a stroke (undone).
    fn hide(&mut self, id: StrokeId);

    /// Show a hidden stroke (redone).
    fn show(&mut self, id: StrokeId);

    /// Drawable bounds in layer-local coordinates.
    fn hit_bounds(&self) -> Size;

    /// Snapshot of all strokes in paint order.
    fn strokes(&self) -> Vec<Stroke>;

    /// Replace the scene contents with a restored stroke set.
    fn load_scene(&mut self, strokes: Vec<Stroke>);

    /// Drop everything.
    fn clear(&mut self);
}
