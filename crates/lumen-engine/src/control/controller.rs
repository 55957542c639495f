use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use glam::{Mat2, Vec2, Vec3};

use crate::camera::Camera;
use crate::input::{InputEvent, Key, KeyState, PointerMoveEvent};
use crate::lighting::MAX_LIGHTS;

use super::bindings::{binding_for, Action, MoveAxis, MOVEMENT_KEYS};

/// Radians of rotation per pixel of cursor travel.
pub const DEFAULT_SENSITIVITY: f32 = 0.002;

/// Field-of-view change per wheel line, in radians.
pub const ZOOM_STEP: f32 = 0.1;

pub const MIN_FIELD_OF_VIEW: f32 = 0.01 * FRAC_PI_2;
pub const MAX_FIELD_OF_VIEW: f32 = FRAC_PI_2;

/// Quarter turn in the image plane: `(dx, dy) -> (dy, -dx)`.
///
/// Horizontal cursor motion lands on yaw, vertical on pitch.
const IMAGE_PLANE_TURN: Mat2 = Mat2::from_cols_array(&[0.0, -1.0, 1.0, 0.0]);

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub sensitivity: f32,
    /// Point lights active at startup, clamped to `[0, MAX_LIGHTS]`.
    pub initial_lights: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            initial_lights: 1,
        }
    }
}

/// Motion and mode state fed by input events.
///
/// Holds the held movement keys, the per-frame movement intent and the viewer's
/// toggles. Movement intent is always zero or unit length, so diagonal
/// movement is no faster than axial movement.
#[derive(Debug, Clone)]
pub struct Controller {
    /// Movement keys currently down; an axis is active while any of its
    /// keys is in here.
    held: HashSet<Key>,
    movement: Vec3,

    paused: bool,
    flashlight_on: bool,
    wireframe: bool,
    quit_requested: bool,
    light_count: usize,

    last_cursor: Option<Vec2>,
    sensitivity: f32,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            held: HashSet::new(),
            movement: Vec3::ZERO,
            paused: false,
            flashlight_on: false,
            wireframe: false,
            quit_requested: false,
            light_count: config.initial_lights.min(MAX_LIGHTS),
            last_cursor: None,
            sensitivity: config.sensitivity,
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn flashlight_on(&self) -> bool {
        self.flashlight_on
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn light_count(&self) -> usize {
        self.light_count
    }

    pub fn axis_active(&self, axis: MoveAxis) -> bool {
        self.held.iter().any(|key| binding_for(*key) == Some(Action::Move(axis)))
    }

    /// Movement intent computed by the last [`update_movement`](Self::update_movement).
    pub fn movement_direction(&self) -> Vec3 {
        self.movement
    }

    // ── event dispatch ────────────────────────────────────────────────────

    /// Routes one input event to the matching handler.
    ///
    /// Returns the toggle action the event fired, if any.
    pub fn handle_event(&mut self, camera: &mut Camera, event: &InputEvent) -> Option<Action> {
        match event {
            InputEvent::Key { key, state, repeat, .. } => self.handle_key(*key, *state, *repeat),
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.handle_cursor(camera, *x, *y);
                None
            }
            InputEvent::MouseWheel { delta } => {
                self.handle_scroll(camera, delta.lines_y());
                None
            }
            InputEvent::PointerEntered | InputEvent::PointerLeft => {
                self.reset_cursor();
                None
            }
            InputEvent::Focused(focused) => {
                if !focused {
                    self.held.clear();
                }
                self.reset_cursor();
                None
            }
        }
    }

    /// Applies a key transition.
    ///
    /// Press and repeat mark a movement key held, release clears it. An axis
    /// bound to two keys stays active until both are up.
    /// Toggles fire on the press edge only; the fired action is returned.
    pub fn handle_key(&mut self, key: Key, state: KeyState, repeat: bool) -> Option<Action> {
        let action = binding_for(key)?;

        if action.axis().is_some() {
            match state {
                KeyState::Pressed => self.held.insert(key),
                KeyState::Released => self.held.remove(&key),
            };
            return None;
        }

        if state != KeyState::Pressed || repeat {
            return None;
        }

        match action {
            Action::TogglePause => self.paused = !self.paused,
            Action::ToggleFlashlight => self.flashlight_on = !self.flashlight_on,
            Action::ToggleWireframe => self.wireframe = !self.wireframe,
            Action::MoreLights => self.light_count = (self.light_count + 1).min(MAX_LIGHTS),
            Action::FewerLights => self.light_count = self.light_count.saturating_sub(1),
            Action::Quit => self.quit_requested = true,
            Action::Move(_) => {}
        }

        Some(action)
    }

    /// Re-derives the movement axes from a snapshot of held keys.
    ///
    /// Alternative to feeding key events: call once per frame with the
    /// current key state. No edge state is kept.
    pub fn poll_axes(&mut self, is_down: impl Fn(Key) -> bool) {
        self.held = MOVEMENT_KEYS.into_iter().filter(|key| is_down(*key)).collect();
    }

    // ── motion ────────────────────────────────────────────────────────────

    /// Combines the active axes with the camera basis into a unit (or zero)
    /// movement direction and stores it.
    pub fn update_movement(&mut self, camera: &Camera) -> Vec3 {
        let signed = |pos: MoveAxis, neg: MoveAxis| {
            f32::from(u8::from(self.axis_active(pos))) - f32::from(u8::from(self.axis_active(neg)))
        };

        let forward = signed(MoveAxis::Forward, MoveAxis::Back);
        let right = signed(MoveAxis::Right, MoveAxis::Left);

        let acc = forward * camera.forward() + right * camera.right();
        self.movement = acc.normalize_or_zero();
        self.movement
    }

    /// Returns the movement intent and resets it to zero.
    pub fn take_movement(&mut self) -> Vec3 {
        std::mem::take(&mut self.movement)
    }

    /// Forgets the last cursor position; the next sample only re-anchors.
    pub fn reset_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Turns the camera by the cursor travel since the previous sample.
    ///
    /// The first sample after construction or [`reset_cursor`](Self::reset_cursor)
    /// only records the position.
    pub fn handle_cursor(&mut self, camera: &mut Camera, x: f32, y: f32) {
        let current = Vec2::new(x, y);

        if let Some(last) = self.last_cursor {
            let turn = self.sensitivity * (IMAGE_PLANE_TURN * (current - last));
            camera.set_orientation(camera.orientation() - turn.extend(0.0));
        }

        self.last_cursor = Some(current);
    }

    /// Zooms by changing the field of view, clamped to
    /// `[MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW]`.
    pub fn handle_scroll(&mut self, camera: &mut Camera, offset: f32) {
        let fov = (camera.field_of_view() - ZOOM_STEP * offset).clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW);
        camera.set_field_of_view(fov);
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(FRAC_PI_2 / 2.0, Vec3::new(1.0, 3.0, 1.0), Vec3::new(-0.5, 2.3, 0.0))
    }

    fn press(c: &mut Controller, key: Key) -> Option<Action> {
        c.handle_key(key, KeyState::Pressed, false)
    }

    fn release(c: &mut Controller, key: Key) {
        c.handle_key(key, KeyState::Released, false);
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn no_axes_means_no_movement() {
        let mut c = Controller::default();
        assert_eq!(c.update_movement(&camera()), Vec3::ZERO);
    }

    #[test]
    fn single_axis_is_unit_length() {
        let cam = camera();
        for key in [Key::W, Key::S, Key::A, Key::D] {
            let mut c = Controller::default();
            press(&mut c, key);
            let m = c.update_movement(&cam);
            assert!((m.length() - 1.0).abs() < 1e-5, "{key}");
        }
    }

    #[test]
    fn forward_follows_camera() {
        let cam = camera();
        let mut c = Controller::default();
        press(&mut c, Key::W);
        assert!(c.update_movement(&cam).abs_diff_eq(cam.forward(), 1e-6));
    }

    #[test]
    fn diagonal_has_no_speed_boost() {
        let cam = camera();
        for (a, b) in [(Key::W, Key::D), (Key::W, Key::A), (Key::S, Key::D), (Key::S, Key::A)] {
            let mut c = Controller::default();
            press(&mut c, a);
            press(&mut c, b);
            assert!((c.update_movement(&cam).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn opposite_axes_cancel() {
        let mut c = Controller::default();
        press(&mut c, Key::W);
        press(&mut c, Key::S);
        assert_eq!(c.update_movement(&camera()), Vec3::ZERO);
    }

    #[test]
    fn release_deactivates_axis() {
        let mut c = Controller::default();
        press(&mut c, Key::A);
        c.handle_key(Key::A, KeyState::Pressed, true);
        assert!(c.axis_active(MoveAxis::Left));
        release(&mut c, Key::A);
        assert!(!c.axis_active(MoveAxis::Left));
        assert_eq!(c.update_movement(&camera()), Vec3::ZERO);
    }

    #[test]
    fn axis_stays_active_while_second_key_held() {
        let cam = camera();
        let mut c = Controller::default();
        press(&mut c, Key::W);
        press(&mut c, Key::ArrowUp);
        release(&mut c, Key::ArrowUp);
        assert!(c.axis_active(MoveAxis::Forward));
        assert!(c.update_movement(&cam).abs_diff_eq(cam.forward(), 1e-6));

        release(&mut c, Key::W);
        assert!(!c.axis_active(MoveAxis::Forward));
        assert_eq!(c.update_movement(&cam), Vec3::ZERO);
    }

    #[test]
    fn take_movement_resets_intent() {
        let mut c = Controller::default();
        press(&mut c, Key::D);
        c.update_movement(&camera());
        assert!(c.take_movement().length() > 0.9);
        assert_eq!(c.movement_direction(), Vec3::ZERO);
    }

    #[test]
    fn polled_axes_follow_snapshot() {
        let mut c = Controller::default();
        c.poll_axes(|k| k == Key::ArrowUp || k == Key::D);
        assert!(c.axis_active(MoveAxis::Forward));
        assert!(c.axis_active(MoveAxis::Right));
        c.poll_axes(|_| false);
        assert!(!c.axis_active(MoveAxis::Forward));
    }

    #[test]
    fn focus_loss_clears_axes() {
        let mut cam = camera();
        let mut c = Controller::default();
        press(&mut c, Key::W);
        c.handle_event(&mut cam, &InputEvent::Focused(false));
        assert_eq!(c.update_movement(&cam), Vec3::ZERO);
    }

    // ── cursor ────────────────────────────────────────────────────────────

    #[test]
    fn first_cursor_sample_does_not_turn() {
        let mut cam = camera();
        let before = cam.orientation();
        let mut c = Controller::default();
        c.handle_cursor(&mut cam, 9000.0, -4000.0);
        assert_eq!(cam.orientation(), before);
    }

    #[test]
    fn first_sample_after_reset_does_not_turn() {
        let mut cam = camera();
        let mut c = Controller::default();
        c.handle_cursor(&mut cam, 0.0, 0.0);
        c.reset_cursor();
        let before = cam.orientation();
        c.handle_cursor(&mut cam, 500.0, 500.0);
        assert_eq!(cam.orientation(), before);
    }

    #[test]
    fn horizontal_motion_turns_yaw() {
        let mut cam = camera();
        let mut c = Controller::default();
        c.handle_cursor(&mut cam, 100.0, 100.0);
        let before = cam.orientation();
        c.handle_cursor(&mut cam, 110.0, 100.0);
        let after = cam.orientation();
        assert!((after.y - (before.y + 10.0 * DEFAULT_SENSITIVITY)).abs() < 1e-6);
        assert_eq!(after.x, before.x);
    }

    #[test]
    fn moving_cursor_down_looks_down() {
        let mut cam = camera();
        let mut c = Controller::default();
        c.handle_cursor(&mut cam, 100.0, 100.0);
        let before = cam.orientation();
        c.handle_cursor(&mut cam, 100.0, 150.0);
        let after = cam.orientation();
        assert!((after.x - (before.x - 50.0 * DEFAULT_SENSITIVITY)).abs() < 1e-6);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn cursor_pitch_is_clamped() {
        let mut cam = camera();
        let mut c = Controller::default();
        c.handle_cursor(&mut cam, 0.0, 0.0);
        c.handle_cursor(&mut cam, 0.0, -1.0e6);
        assert_eq!(cam.orientation().x, crate::camera::PITCH_LIMIT);
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn scroll_zooms_in_and_out() {
        let mut cam = camera();
        let mut c = Controller::default();
        let fov = cam.field_of_view();
        c.handle_scroll(&mut cam, 1.0);
        assert!((cam.field_of_view() - (fov - ZOOM_STEP)).abs() < 1e-6);
    }

    #[test]
    fn scroll_clamps_to_bounds_exactly() {
        let mut cam = camera();
        let mut c = Controller::default();
        c.handle_scroll(&mut cam, 1000.0);
        assert_eq!(cam.field_of_view(), MIN_FIELD_OF_VIEW);
        c.handle_scroll(&mut cam, -1000.0);
        assert_eq!(cam.field_of_view(), MAX_FIELD_OF_VIEW);
    }

    // ── toggles ───────────────────────────────────────────────────────────

    #[test]
    fn toggles_fire_on_press_edge_only() {
        let mut c = Controller::default();
        assert_eq!(press(&mut c, Key::Space), Some(Action::TogglePause));
        assert!(c.paused());
        assert_eq!(c.handle_key(Key::Space, KeyState::Pressed, true), None);
        release(&mut c, Key::Space);
        assert!(c.paused());
        press(&mut c, Key::Space);
        assert!(!c.paused());

        press(&mut c, Key::F);
        assert!(c.flashlight_on());
        press(&mut c, Key::T);
        assert!(c.wireframe());
        press(&mut c, Key::Escape);
        assert!(c.quit_requested());
    }

    #[test]
    fn light_count_saturates() {
        let mut c = Controller::new(ControllerConfig {
            initial_lights: 0,
            ..ControllerConfig::default()
        });
        press(&mut c, Key::Q);
        assert_eq!(c.light_count(), 0);
        for _ in 0..20 {
            press(&mut c, Key::E);
        }
        assert_eq!(c.light_count(), MAX_LIGHTS);
    }

    #[test]
    fn initial_light_count_is_clamped() {
        let c = Controller::new(ControllerConfig {
            initial_lights: 99,
            ..ControllerConfig::default()
        });
        assert_eq!(c.light_count(), MAX_LIGHTS);
    }
}
