//! Retained scene surface.

use std::collections::HashMap;

use kurbo::{Point, Size};
use log::debug;

use quadrille_core::stroke::{Stroke, StrokeId, StrokeStyle};
use quadrille_core::surface::SceneSurface;

/// Retained stroke store backing a drawing session.
///
/// Owns every stroke in paint order. A real backend renders from this model;
/// tests read it directly.
#[derive(Debug, Clone)]
pub struct RetainedScene {
    strokes: HashMap<StrokeId, Stroke>,
    /// Paint order (back to front).
    order: Vec<StrokeId>,
    bounds: Size,
}

impl RetainedScene {
    /// Create an empty scene with the given drawable bounds.
    pub fn new(bounds: Size) -> Self {
        Self {
            strokes: HashMap::new(),
            order: Vec::new(),
            bounds,
        }
    }

    /// Number of strokes in the scene.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Look up a stroke by handle.
    pub fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.get(&id)
    }

    /// Strokes in paint order (back to front).
    pub fn strokes_ordered(&self) -> impl Iterator<Item = &Stroke> {
        self.order.iter().filter_map(|id| self.strokes.get(id))
    }

    /// Strokes a renderer should actually draw.
    pub fn visible_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes_ordered().filter(|s| s.visible)
    }
}

impl SceneSurface for RetainedScene {
    fn create_stroke(&mut self, points: Vec<Point>, style: StrokeStyle) -> StrokeId {
        let stroke = Stroke::new(points, style);
        let id = stroke.id();
        self.order.push(id);
        self.strokes.insert(id, stroke);
        id
    }

    fn append_point(&mut self, id: StrokeId, point: Point) {
        match self.strokes.get_mut(&id) {
            Some(stroke) => stroke.add_point(point),
            None => debug!("append to unknown stroke {id}, ignoring"),
        }
    }

    fn destroy_stroke(&mut self, id: StrokeId) {
        self.order.retain(|&sid| sid != id);
        self.strokes.remove(&id);
    }

    fn hide(&mut self, id: StrokeId) {
        if let Some(stroke) = self.strokes.get_mut(&id) {
            stroke.visible = false;
        }
    }

    fn show(&mut self, id: StrokeId) {
        if let Some(stroke) = self.strokes.get_mut(&id) {
            stroke.visible = true;
        }
    }

    fn hit_bounds(&self) -> Size {
        self.bounds
    }

    fn strokes(&self) -> Vec<Stroke> {
        self.strokes_ordered().cloned().collect()
    }

    fn load_scene(&mut self, strokes: Vec<Stroke>) {
        self.strokes.clear();
        self.order.clear();
        for stroke in strokes {
            let id = stroke.id();
            self.order.push(id);
            self.strokes.insert(id, stroke);
        }
    }

    fn clear(&mut self) {
        self.strokes.clear();
        self.order.clear();
    }
}
