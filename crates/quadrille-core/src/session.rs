//! Session context: routes input events into strokes, history, and camera.

use std::sync::Arc;

use kurbo::{Point, Vec2};
use log::{debug, warn};

use crate::camera::Camera;
use crate::config::SessionConfig;
use crate::geometry::{distance, midpoint};
use crate::gesture::{Gesture, GestureState};
use crate::history::{CommitOutcome, HistoryError, StrokeHistory};
use crate::shortcuts::{match_shortcut, HistoryCommand, KeyModifiers};
use crate::store::{
    restore_from, HistorySnapshot, RestoredScene, SceneSnapshot, SessionStore, StoreError,
    StoreResult,
};
use crate::stroke::StrokeId;
use crate::surface::SceneSurface;

/// One drawing session over one surface.
///
/// The session owns all mutable state: the gesture tracker, the stroke
/// history, the camera, and the surface itself. Construct with [`Session::new`],
/// feed it input events, and call [`Session::dispose`] on teardown for the
/// final best-effort save. Multiple sessions over different surfaces are
/// fully independent.
///
/// All event handlers run to completion on the caller's thread; there is no
/// internal queuing or locking.
pub struct Session<S: SceneSurface> {
    surface: S,
    history: StrokeHistory,
    gesture: GestureState,
    camera: Camera,
    config: SessionConfig,
    store: Option<Arc<dyn SessionStore>>,
}

impl<S: SceneSurface> Session<S> {
    /// Create a session over a surface with the given settings.
    pub fn new(surface: S, config: SessionConfig) -> Self {
        Self {
            surface,
            history: StrokeHistory::new(),
            gesture: GestureState::default(),
            camera: Camera::new(),
            config,
            store: None,
        }
    }

    /// Attach a persistence store.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture.mode()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Tear the session down, performing the final best-effort save.
    pub fn dispose(self) {
        self.autosave();
    }

    // ---- pointer events (mouse) ----

    /// Mouse button pressed at a window position.
    pub fn pointer_down(&mut self, window: Point) {
        if self.gesture.mode.is_idle() && !self.gesture.resume_pending {
            self.begin_stroke(window);
        }
    }

    /// Mouse moved to a window position.
    pub fn pointer_move(&mut self, window: Point) {
        self.single_touch_move(window);
    }

    /// Mouse button released.
    pub fn pointer_up(&mut self) -> Result<(), HistoryError> {
        self.finish_gesture()
    }

    // ---- touch events ----

    /// Fingers landed; `touches` holds every active touch in window
    /// coordinates.
    pub fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [] => {}
            [p] => {
                if self.gesture.mode.is_idle() && !self.gesture.resume_pending {
                    self.begin_stroke(*p);
                }
            }
            _ => self.enter_pinch(),
        }
    }

    /// Fingers moved; `touches` holds every active touch.
    pub fn touch_move(&mut self, touches: &[Point]) {
        match touches {
            [] => {}
            [p] => self.single_touch_move(*p),
            [p1, p2, ..] => self.pinch_move(*p1, *p2),
        }
    }

    /// A finger lifted; `remaining` holds the touches still down.
    pub fn touch_end(&mut self, remaining: &[Point]) -> Result<(), HistoryError> {
        if remaining.is_empty() {
            return self.finish_gesture();
        }
        // A finger lifted but others remain. Leaving the pinch here defers
        // the drag-resume decision to the next move event.
        if self.gesture.mode.is_pinching() {
            self.gesture.mode = Gesture::Idle;
            self.gesture.resume_pending = true;
            self.gesture.resume_anchor = None;
        }
        Ok(())
    }

    // ---- wheel and keyboard ----

    /// Wheel event at a window position. Ctrl-wheel zooms at the pointer,
    /// a plain wheel pans.
    pub fn wheel(&mut self, pointer: Point, delta: Vec2, ctrl: bool) {
        if ctrl {
            self.camera
                .apply_wheel_zoom(pointer, delta.y, self.config.scale_by);
        } else {
            self.camera.apply_wheel_pan(delta);
        }
    }

    /// Key press. Returns `true` when the event matched a shortcut and the
    /// embedding page must suppress the default browser handling.
    pub fn key_press(&mut self, key: &str, modifiers: KeyModifiers) -> Result<bool, HistoryError> {
        match match_shortcut(key, modifiers) {
            Some(HistoryCommand::Undo) => {
                self.undo()?;
                Ok(true)
            }
            Some(HistoryCommand::Redo) => {
                self.redo()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ---- history commands ----

    /// Hide the most recent stroke. Returns whether anything was undone.
    pub fn undo(&mut self) -> Result<bool, HistoryError> {
        match self.history.undo()? {
            Some(id) => {
                self.surface.hide(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Bring back the most recently undone stroke. Returns whether anything
    /// was redone.
    pub fn redo(&mut self) -> Result<bool, HistoryError> {
        match self.history.redo()? {
            Some(id) => {
                self.surface.show(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wipe the surface and the history, and forget the saved scene.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.history.reset();
        self.gesture.reset();
        if self.config.save_enabled {
            if let Some(store) = &self.store {
                if let Err(e) = store.clear() {
                    warn!("failed to clear saved scene: {e}");
                }
            }
        }
    }

    // ---- persistence ----

    /// Capture the current scene, history, and camera.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            strokes: self.surface.strokes(),
            history: HistorySnapshot {
                entries: self.history.entries().to_vec(),
                cursor: self.history.cursor(),
            },
            camera: self.camera,
        }
    }

    /// Persist the scene now, propagating failures to the caller.
    pub fn save(&self) -> StoreResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(&self.snapshot().to_json()?)
    }

    /// Replace this session's contents with whatever the store holds.
    ///
    /// Returns `false` for a fresh (never saved) session. A malformed saved
    /// scene is an explicit error; the session is left untouched.
    pub fn restore(&mut self) -> StoreResult<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        match restore_from(store.as_ref())? {
            RestoredScene::Fresh => Ok(false),
            RestoredScene::Restored(snapshot) => {
                let SceneSnapshot {
                    strokes,
                    history,
                    camera,
                } = snapshot;
                let rebuilt = StrokeHistory::from_parts(history.entries, history.cursor)
                    .map_err(|e| StoreError::InvalidScene(e.to_string()))?;
                self.surface.load_scene(strokes);
                self.history = rebuilt;
                self.camera = camera;
                self.gesture.reset();
                Ok(true)
            }
        }
    }

    // ---- internals ----

    fn in_bounds(&self, local: Point) -> bool {
        let bounds = self.surface.hit_bounds();
        local.x >= 0.0 && local.y >= 0.0 && local.x < bounds.width && local.y < bounds.height
    }

    fn begin_stroke(&mut self, window: Point) {
        let local = self.camera.screen_to_local(window);
        if !self.in_bounds(local) {
            debug!("press outside surface bounds, ignoring");
            return;
        }
        // seed the point twice so a simple tap still leaves a visible dot
        let id = self
            .surface
            .create_stroke(vec![local, local], self.config.brush.clone());
        self.gesture.mode = Gesture::Drawing { stroke: id };
    }

    fn single_touch_move(&mut self, window: Point) {
        // a pan interrupted by a pinch resumes here, on the move itself
        if self.gesture.resume_pending {
            match self.gesture.resume_anchor {
                None => self.gesture.resume_anchor = Some(window),
                Some(prev) => {
                    self.camera.pan(window - prev);
                    self.gesture.resume_anchor = Some(window);
                }
            }
            return;
        }
        if let Gesture::Drawing { stroke } = self.gesture.mode {
            let local = self.camera.screen_to_local(window);
            if self.in_bounds(local) {
                self.surface.append_point(stroke, local);
            } else {
                debug!("move outside surface bounds, point dropped");
            }
        }
    }

    fn enter_pinch(&mut self) {
        if let Gesture::Drawing { stroke } = self.gesture.mode {
            // a second finger landing means the partial stroke was accidental
            self.surface.destroy_stroke(stroke);
        }
        self.gesture.resume_pending = false;
        self.gesture.resume_anchor = None;
        self.gesture.mode = Gesture::PinchZoom {
            last_center: None,
            last_distance: 0.0,
        };
    }

    fn pinch_move(&mut self, p1: Point, p2: Point) {
        if !self.gesture.mode.is_pinching() {
            // two fingers may land without a separate start event
            self.enter_pinch();
        }
        let (prior_center, prior_distance) = match self.gesture.mode {
            Gesture::PinchZoom {
                last_center,
                last_distance,
            } => (last_center, last_distance),
            _ => return,
        };

        let center = midpoint(p1, p2);
        let Some(prior_center) = prior_center else {
            // first frame records the baseline only, so the view cannot jump
            self.gesture.mode = Gesture::PinchZoom {
                last_center: Some(center),
                last_distance: 0.0,
            };
            return;
        };

        let dist = distance(p1, p2);
        let prior_distance = if prior_distance == 0.0 {
            dist
        } else {
            prior_distance
        };
        if dist > 0.0 && prior_distance > 0.0 {
            self.camera
                .apply_pinch(center, dist, prior_center, prior_distance);
        }
        self.gesture.mode = Gesture::PinchZoom {
            last_center: Some(center),
            last_distance: dist,
        };
    }

    fn finish_gesture(&mut self) -> Result<(), HistoryError> {
        let active = self.gesture.mode.active_stroke();
        self.gesture.reset();
        if let Some(stroke) = active {
            match self.history.commit(stroke)? {
                CommitOutcome::Committed => {}
                CommitOutcome::DroppedAtCapacity => {
                    debug!("stroke {stroke} left untracked: history at capacity");
                }
            }
            self.autosave();
        }
        Ok(())
    }

    fn autosave(&self) {
        if !self.config.save_enabled {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        let json = match self.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("scene snapshot failed: {e}");
                return;
            }
        };
        if let Err(e) = store.save(&json) {
            warn!("session save failed, continuing unsaved: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::stroke::{Stroke, StrokeStyle};
    use kurbo::Size;

    /// Minimal recording surface: 800x600 bounds, strokes in paint order.
    struct TestSurface {
        strokes: Vec<Stroke>,
    }

    impl TestSurface {
        fn new() -> Self {
            Self {
                strokes: Vec::new(),
            }
        }

        fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
            self.strokes.iter().find(|s| s.id() == id)
        }

        fn len(&self) -> usize {
            self.strokes.len()
        }
    }

    impl SceneSurface for TestSurface {
        fn create_stroke(&mut self, points: Vec<Point>, style: StrokeStyle) -> StrokeId {
            let stroke = Stroke::new(points, style);
            let id = stroke.id();
            self.strokes.push(stroke);
            id
        }

        fn append_point(&mut self, id: StrokeId, point: Point) {
            if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id() == id) {
                stroke.add_point(point);
            }
        }

        fn destroy_stroke(&mut self, id: StrokeId) {
            self.strokes.retain(|s| s.id() != id);
        }

        fn hide(&mut self, id: StrokeId) {
            if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id() == id) {
                stroke.visible = false;
            }
        }

        fn show(&mut self, id: StrokeId) {
            if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id() == id) {
                stroke.visible = true;
            }
        }

        fn hit_bounds(&self) -> Size {
            Size::new(800.0, 600.0)
        }

        fn strokes(&self) -> Vec<Stroke> {
            self.strokes.clone()
        }

        fn load_scene(&mut self, strokes: Vec<Stroke>) {
            self.strokes = strokes;
        }

        fn clear(&mut self) {
            self.strokes.clear();
        }
    }

    fn session() -> Session<TestSurface> {
        Session::new(TestSurface::new(), SessionConfig::default())
    }

    fn draw_stroke(session: &mut Session<TestSurface>, from: Point, to: Point) -> StrokeId {
        session.pointer_down(from);
        let id = session.gesture().active_stroke().unwrap();
        session.pointer_move(to);
        session.pointer_up().unwrap();
        id
    }

    #[test]
    fn test_tap_commits_a_dot_stroke() {
        let mut s = session();
        s.pointer_down(Point::new(10.0, 20.0));
        assert!(s.gesture().is_drawing());

        let id = s.gesture().active_stroke().unwrap();
        // two copies of the start point
        assert_eq!(s.surface().stroke(id).unwrap().len(), 2);

        s.pointer_up().unwrap();
        assert!(s.gesture().is_idle());
        assert_eq!(s.history().cursor(), 1);
    }

    #[test]
    fn test_press_outside_bounds_is_ignored() {
        let mut s = session();
        s.pointer_down(Point::new(-1.0, 10.0));
        assert!(s.gesture().is_idle());
        assert_eq!(s.surface().len(), 0);

        s.pointer_down(Point::new(10.0, 700.0));
        assert!(s.gesture().is_idle());
    }

    #[test]
    fn test_moves_outside_bounds_drop_points_without_ending_stroke() {
        let mut s = session();
        s.pointer_down(Point::new(10.0, 10.0));
        let id = s.gesture().active_stroke().unwrap();

        s.pointer_move(Point::new(20.0, 20.0));
        s.pointer_move(Point::new(-5.0, 20.0));
        s.pointer_move(Point::new(900.0, 20.0));
        s.pointer_move(Point::new(30.0, 30.0));

        // seed pair plus the two in-bounds moves
        assert_eq!(s.surface().stroke(id).unwrap().len(), 4);
        assert!(s.gesture().is_drawing());
    }

    #[test]
    fn test_second_touch_discards_active_stroke() {
        let mut s = session();
        s.touch_start(&[Point::new(50.0, 50.0)]);
        assert!(s.gesture().is_drawing());
        let id = s.gesture().active_stroke().unwrap();

        s.touch_move(&[Point::new(55.0, 55.0), Point::new(200.0, 200.0)]);
        assert!(s.gesture().is_pinching());
        assert!(s.surface().stroke(id).is_none());

        // never committed
        s.touch_end(&[]).unwrap();
        assert_eq!(s.history().cursor(), 0);
    }

    #[test]
    fn test_two_finger_start_goes_straight_to_pinch() {
        let mut s = session();
        s.touch_start(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        assert!(s.gesture().is_pinching());
        assert_eq!(s.surface().len(), 0);
    }

    #[test]
    fn test_pinch_first_frame_records_baseline_only() {
        let mut s = session();
        let before = *s.camera();
        s.touch_start(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);

        s.touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        assert_eq!(*s.camera(), before);

        // second frame fills the distance baseline: still no change
        s.touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        assert_eq!(*s.camera(), before);
    }

    #[test]
    fn test_pinch_spread_scales_by_distance_ratio() {
        let mut s = session();
        s.touch_start(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        s.touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        s.touch_move(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);

        // fingers spread to double the distance around the same center
        s.touch_move(&[Point::new(50.0, 100.0), Point::new(250.0, 100.0)]);
        assert!((s.camera().scale - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pan_resumes_after_pinch_instead_of_drawing() {
        let mut s = session();
        s.touch_start(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)]);
        s.touch_end(&[Point::new(100.0, 100.0)]).unwrap();
        assert!(s.gesture().is_idle());

        // first move only anchors the resumed pan
        s.touch_move(&[Point::new(100.0, 100.0)]);
        let before = *s.camera();

        s.touch_move(&[Point::new(110.0, 95.0)]);
        assert!((s.camera().offset.x - before.offset.x - 10.0).abs() < 1e-12);
        assert!((s.camera().offset.y - before.offset.y + 5.0).abs() < 1e-12);
        assert_eq!(s.surface().len(), 0);

        // all fingers up: the next touch draws again
        s.touch_end(&[]).unwrap();
        s.touch_start(&[Point::new(10.0, 10.0)]);
        assert!(s.gesture().is_drawing());
    }

    #[test]
    fn test_undo_redo_toggle_visibility() {
        let mut s = session();
        let id = draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert!(s.surface().stroke(id).unwrap().visible);

        assert!(s.undo().unwrap());
        assert!(!s.surface().stroke(id).unwrap().visible);
        assert_eq!(s.history().cursor(), 0);
        assert_eq!(s.history().redo_depth(), 1);

        assert!(s.redo().unwrap());
        assert!(s.surface().stroke(id).unwrap().visible);
        assert_eq!(s.history().cursor(), 1);
        assert_eq!(s.history().redo_depth(), 0);
    }

    #[test]
    fn test_undo_with_nothing_drawn_is_a_noop() {
        let mut s = session();
        assert!(!s.undo().unwrap());
        assert!(!s.redo().unwrap());
        assert_eq!(s.history().cursor(), 0);
    }

    #[test]
    fn test_keyboard_shortcuts_drive_history() {
        let mut s = session();
        let id = draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));

        let ctrl = KeyModifiers {
            ctrl: true,
            ..Default::default()
        };
        assert!(s.key_press("z", ctrl).unwrap());
        assert!(!s.surface().stroke(id).unwrap().visible);

        let ctrl_shift = KeyModifiers {
            ctrl: true,
            shift: true,
            ..Default::default()
        };
        assert!(s.key_press("Z", ctrl_shift).unwrap());
        assert!(s.surface().stroke(id).unwrap().visible);

        assert!(s.key_press("z", ctrl).unwrap());
        assert!(s.key_press("y", ctrl).unwrap());
        assert!(s.surface().stroke(id).unwrap().visible);

        // unmodified keys are left to the page
        assert!(!s.key_press("z", KeyModifiers::default()).unwrap());
    }

    #[test]
    fn test_wheel_routes_zoom_and_pan() {
        let mut s = session();
        s.wheel(Point::new(100.0, 100.0), Vec2::new(0.0, 10.0), true);
        assert!((s.camera().scale - 1.0 / 1.05).abs() < 1e-12);

        let mut s = session();
        s.wheel(Point::new(100.0, 100.0), Vec2::new(3.0, -8.0), false);
        assert!((s.camera().scale - 1.0).abs() < f64::EPSILON);
        assert!((s.camera().offset.x - 3.0).abs() < f64::EPSILON);
        assert!((s.camera().offset.y + 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_commit_autosaves_to_store() {
        let store = Arc::new(MemoryStore::new());
        let mut s = Session::new(TestSurface::new(), SessionConfig::default())
            .with_store(store.clone());

        draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        let saved = store.load().unwrap().expect("scene saved on commit");
        let snapshot = SceneSnapshot::from_json(&saved).unwrap();
        assert_eq!(snapshot.strokes.len(), 1);
        assert_eq!(snapshot.history.cursor, 1);
    }

    #[test]
    fn test_save_disabled_skips_store() {
        let store = Arc::new(MemoryStore::new());
        let config = SessionConfig {
            save_enabled: false,
            ..Default::default()
        };
        let mut s = Session::new(TestSurface::new(), config).with_store(store.clone());

        draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_failure_does_not_interrupt_drawing() {
        struct BrokenStore;
        impl SessionStore for BrokenStore {
            fn save(&self, _scene: &str) -> StoreResult<()> {
                Err(StoreError::Io("disk full".into()))
            }
            fn load(&self) -> StoreResult<Option<String>> {
                Ok(None)
            }
            fn clear(&self) -> StoreResult<()> {
                Ok(())
            }
        }

        let mut s =
            Session::new(TestSurface::new(), SessionConfig::default()).with_store(Arc::new(BrokenStore));
        draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert_eq!(s.history().cursor(), 1);
    }

    #[test]
    fn test_dispose_then_restore_roundtrip() {
        let store = Arc::new(MemoryStore::new());

        let mut s = Session::new(TestSurface::new(), SessionConfig::default())
            .with_store(store.clone());
        draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        let second = draw_stroke(&mut s, Point::new(30.0, 30.0), Point::new(40.0, 40.0));
        s.undo().unwrap();
        s.wheel(Point::new(0.0, 0.0), Vec2::new(0.0, -10.0), true);
        let camera = *s.camera();
        s.dispose();

        let mut restored = Session::new(TestSurface::new(), SessionConfig::default())
            .with_store(store);
        assert!(restored.restore().unwrap());

        assert_eq!(restored.surface().len(), 2);
        assert!(!restored.surface().stroke(second).unwrap().visible);
        assert_eq!(restored.history().cursor(), 1);
        assert_eq!(restored.history().len(), 2);
        assert_eq!(*restored.camera(), camera);

        // the undone stroke cannot be redone across sessions
        assert!(!restored.redo().unwrap());
    }

    #[test]
    fn test_restore_without_saved_scene_is_fresh() {
        let mut s = Session::new(TestSurface::new(), SessionConfig::default())
            .with_store(Arc::new(MemoryStore::new()));
        assert!(!s.restore().unwrap());
    }

    #[test]
    fn test_restore_of_malformed_scene_fails_explicitly() {
        let store = Arc::new(MemoryStore::new());
        store.save("{\"what\": true}").unwrap();

        let mut s = Session::new(TestSurface::new(), SessionConfig::default()).with_store(store);
        assert!(matches!(s.restore(), Err(StoreError::InvalidScene(_))));
        // session untouched
        assert_eq!(s.surface().len(), 0);
    }

    #[test]
    fn test_clear_wipes_surface_history_and_store() {
        let store = Arc::new(MemoryStore::new());
        let mut s = Session::new(TestSurface::new(), SessionConfig::default())
            .with_store(store.clone());

        draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert!(store.load().unwrap().is_some());

        s.clear();
        assert_eq!(s.surface().len(), 0);
        assert_eq!(s.history().cursor(), 0);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_dispose_saves_final_state() {
        let store = Arc::new(MemoryStore::new());
        let mut s = Session::new(TestSurface::new(), SessionConfig::default())
            .with_store(store.clone());

        draw_stroke(&mut s, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        s.undo().unwrap();
        s.dispose();

        let saved = store.load().unwrap().unwrap();
        let snapshot = SceneSnapshot::from_json(&saved).unwrap();
        assert_eq!(snapshot.history.cursor, 0);
        assert_eq!(snapshot.history.entries.len(), 1);
        assert!(!snapshot.strokes[0].visible);
    }
}
