//! Gesture state for pointer and touch input.

use kurbo::Point;

use crate::stroke::StrokeId;

/// Current interaction mode.
///
/// The three modes are mutually exclusive; a stroke can only exist in
/// `Drawing` and pinch tracking only in `PinchZoom`, so the invalid flag
/// combinations of an ad-hoc boolean soup cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// No active gesture.
    Idle,
    /// A single pointer laying down a stroke.
    Drawing { stroke: StrokeId },
    /// Two fingers panning and zooming the viewport.
    ///
    /// `last_center` stays `None` for the first frame so the gesture can
    /// record its baseline without producing a transform jump; the distance
    /// baseline fills on the following frame.
    PinchZoom {
        last_center: Option<Point>,
        last_distance: f64,
    },
}

impl Default for Gesture {
    fn default() -> Self {
        Self::Idle
    }
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Gesture::Drawing { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self, Gesture::PinchZoom { .. })
    }

    /// Handle of the stroke currently being drawn, if any.
    pub fn active_stroke(&self) -> Option<StrokeId> {
        match self {
            Gesture::Drawing { stroke } => Some(*stroke),
            _ => None,
        }
    }
}

/// Transient gesture tracking owned by a session.
///
/// Resets to idle on every touch-end that leaves no touches down.
#[derive(Debug, Clone, Default)]
pub struct GestureState {
    pub(crate) mode: Gesture,
    /// Set when a pinch ends with a finger still down; the next single-touch
    /// move resumes panning instead of drawing.
    pub(crate) resume_pending: bool,
    /// Last window position of the finger continuing the pan.
    pub(crate) resume_anchor: Option<Point>,
}

impl GestureState {
    pub fn mode(&self) -> Gesture {
        self.mode
    }

    /// Clear everything back to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
