//! Session configuration read once at startup.

use crate::camera::DEFAULT_SCALE_STEP;
use crate::stroke::StrokeStyle;

/// Startup-read settings for a drawing session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Persist the scene on dispose and after each committed stroke.
    pub save_enabled: bool,
    /// Style applied to new strokes.
    pub brush: StrokeStyle,
    /// Wheel-zoom step factor.
    pub scale_by: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_enabled: true,
            brush: StrokeStyle::default(),
            scale_by: DEFAULT_SCALE_STEP,
        }
    }
}
