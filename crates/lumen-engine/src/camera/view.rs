use glam::{Mat4, Vec3};

use super::orientation::{clamp_pitch, forward_from_euler, up_from_euler};

/// First-person camera pose.
///
/// `forward` and `up` are derived from `orientation` on every orientation
/// write and are always unit length. Pitch is clamped there; position and
/// field of view are stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    field_of_view: f32,
    position: Vec3,
    orientation: Vec3,
    forward: Vec3,
    up: Vec3,
}

impl Camera {
    /// Creates a camera; `orientation` goes through the same clamp as
    /// [`set_orientation`](Self::set_orientation).
    pub fn new(field_of_view: f32, position: Vec3, orientation: Vec3) -> Self {
        let mut camera = Self {
            field_of_view,
            position,
            orientation: Vec3::ZERO,
            forward: Vec3::X,
            up: Vec3::Y,
        };
        camera.set_orientation(orientation);
        camera
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// `(pitch, yaw, roll)` in radians, pitch already clamped.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize()
    }

    /// Field of view is not validated here; the controller clamps zoom.
    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = field_of_view;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Vec3) {
        self.orientation = clamp_pitch(orientation);
        self.forward = forward_from_euler(self.orientation);
        self.up = up_from_euler(self.orientation);
    }

    /// Right-handed look-at from `position` toward `position + forward`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.field_of_view, aspect_ratio, near, far)
    }
}
