pub mod animation;
pub mod camera;
pub mod renderer;
pub mod scooter;
pub mod transform;
#[cfg(test)]
mod tests;

pub use animation::{AnimationState, AnimationSteps};
pub use camera::Camera;
pub use renderer::{draw_scooter, FrameStats, SceneRenderer};
pub use scooter::{PartMesh, PartNode, ScooterModel};
pub use transform::{StackUnderflow, Transform, TransformStack};

use glam::Vec3;
use std::time::Instant;

use crate::input::KeyState;

/// Light terms uploaded once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Vec3,
    pub directional_color: Vec3,
    pub directional_direction: Vec3,
    pub point_position: Vec3,
    pub point_color: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.3),
            directional_color: Vec3::splat(0.6),
            directional_direction: Vec3::new(0.0, -1.0, -1.0).normalize(),
            point_position: Vec3::new(5.0, 10.0, 5.0),
            point_color: Vec3::ONE,
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub animation: AnimationState,
    pub steps: AnimationSteps,
    pub lighting: Lighting,
    last_update: Instant,
}

impl Scene {
    pub fn new(mut camera: Camera, steps: AnimationSteps) -> Self {
        camera.set();
        Self {
            camera,
            animation: AnimationState::new(),
            steps,
            lighting: Lighting::default(),
            last_update: Instant::now(),
        }
    }

    /// Advances one frame from the held keys.
    pub fn update(&mut self, keys: &KeyState) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        self.animation.handle_keys(keys, &self.steps);
        self.camera.handle_keys(keys, dt);
        self.camera.set();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.camera.set_viewport(width, height);
        self.camera.set();
    }

    pub fn set_ambient_light(&mut self, intensity: f32) {
        self.lighting.ambient = Vec3::splat(intensity.clamp(0.0, 1.0));
    }

    pub fn set_directional_light(&mut self, color: Vec3, direction: Vec3) {
        self.lighting.directional_color = color.clamp(Vec3::ZERO, Vec3::ONE);
        self.lighting.directional_direction = direction.normalize_or_zero();
    }

    pub fn set_point_light(&mut self, position: Vec3, color: Vec3) {
        self.lighting.point_position = position;
        self.lighting.point_color = color.clamp(Vec3::ZERO, Vec3::ONE);
    }
}
