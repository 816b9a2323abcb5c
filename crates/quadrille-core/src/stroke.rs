//! Stroke model: one continuous freehand line plus its style.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to a stroke owned by the scene surface.
pub type StrokeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Default ink color for new strokes.
    pub fn ink() -> Self {
        Self::new(0x30, 0x2e, 0x2e, 255)
    }
}

/// Composite mode for a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushMode {
    /// Normal ink ("source-over").
    #[default]
    Paint,
    /// Removes ink underneath ("destination-out").
    Erase,
}

/// Style attributes applied to a stroke at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub mode: BrushMode,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::ink(),
            width: 4.0,
            mode: BrushMode::Paint,
        }
    }
}

/// A freehand line from gesture-start to gesture-end.
///
/// Strokes are owned exclusively by the scene surface; everything else holds
/// only `StrokeId` handles. Points are appended while the stroke is actively
/// drawn; after commit only the visibility flag changes (undo hides, redo
/// shows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    /// Points in layer-local coordinates.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: StrokeStyle,
    /// Cleared by undo, restored by redo.
    pub visible: bool,
}

impl Stroke {
    /// Create a new visible stroke from its seed points.
    pub fn new(points: Vec<Point>, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style,
            visible: true,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Append a point to the line.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Number of points in the line.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box of the points.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }
}
