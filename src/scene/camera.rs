use glam::{Mat4, Quat, Vec3};
use winit::keyboard::KeyCode;

use crate::input::KeyState;

/// Degrees the position orbits per frame while a rotation key is held.
pub const ROTATION_STEP: f32 = 2.0;
pub const ZOOM_OUT_FACTOR: f32 = 1.05;
pub const ZOOM_IN_FACTOR: f32 = 0.95;
/// Pitch stops short of the poles, where the orbit axis is undefined.
pub const MAX_ELEVATION: f32 = 89.0;

/// Look-at camera orbiting a fixed target.
///
/// Setters only store values; [`Camera::set`] rebuilds the view and projection
/// matrices and must run once per frame before they are read.
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub fov: f32, // vertical, degrees
    pub near: f32,
    pub far: f32,
    pub width: u32,
    pub height: u32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 10.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0,
            near: 0.1,
            far: 10000.0,
            width,
            height,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_look_at(&mut self, look_at: Vec3) {
        self.look_at = look_at;
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Recomputes both matrices from the current state.
    pub fn set(&mut self) {
        self.view_matrix = Mat4::look_at_rh(self.position, self.look_at, self.up);
        self.projection_matrix = Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect(),
            self.near,
            self.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.look_at).length()
    }

    /// Orbits and zooms from the held keys. Steps are per frame; `_elapsed`
    /// is accepted so callers can pass frame time once movement is time-scaled.
    pub fn handle_keys(&mut self, keys: &KeyState, _elapsed: f32) {
        let mut offset = self.position - self.look_at;

        if keys.is_pressed(KeyCode::KeyA) {
            offset = Quat::from_axis_angle(Vec3::Y, ROTATION_STEP.to_radians()) * offset;
        }
        if keys.is_pressed(KeyCode::KeyD) {
            offset = Quat::from_axis_angle(Vec3::Y, -ROTATION_STEP.to_radians()) * offset;
        }
        if keys.is_pressed(KeyCode::KeyW) {
            offset = self.pitch(offset, ROTATION_STEP);
        }
        if keys.is_pressed(KeyCode::KeyS) {
            offset = self.pitch(offset, -ROTATION_STEP);
        }
        if keys.is_pressed(KeyCode::KeyV) {
            offset *= ZOOM_OUT_FACTOR;
        }
        if keys.is_pressed(KeyCode::KeyB) {
            offset *= ZOOM_IN_FACTOR;
        }

        self.position = self.look_at + offset;
    }

    /// Degrees between `offset` and the plane normal to `up`.
    pub fn elevation(&self, offset: Vec3) -> f32 {
        let up = self.up.normalize_or_zero();
        match offset.try_normalize() {
            Some(direction) => direction.dot(up).clamp(-1.0, 1.0).asin().to_degrees(),
            None => 0.0,
        }
    }

    // Positive steps lower the camera. A step that would leave the elevation
    // range is dropped instead of carrying the offset over the pole.
    fn pitch(&self, offset: Vec3, degrees: f32) -> Vec3 {
        if (self.elevation(offset) - degrees).abs() > MAX_ELEVATION {
            return offset;
        }
        Quat::from_axis_angle(self.pitch_axis(offset), degrees.to_radians()) * offset
    }

    // Horizontal axis perpendicular to the view offset; +X for the default camera.
    fn pitch_axis(&self, offset: Vec3) -> Vec3 {
        self.up.cross(offset).try_normalize().unwrap_or(Vec3::X)
    }
}

impl std::fmt::Display for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "x:{:.1}, y:{:.1}, z:{:.1}",
            self.position.x, self.position.y, self.position.z
        )
    }
}
