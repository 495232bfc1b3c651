use winit::keyboard::KeyCode;

use crate::input::KeyState;

pub const MAX_STEERING_ANGLE: f32 = 45.0;

/// Per-frame increments applied while animation keys are held, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSteps {
    pub wheel: f32,
    pub steering: f32,
}

impl Default for AnimationSteps {
    fn default() -> Self {
        Self {
            wheel: 5.0,
            steering: 2.0,
        }
    }
}

/// The two animated scalars of the scooter, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Unbounded; only ever consumed through periodic rotations.
    pub wheel_rotation: f32,
    /// Always within `[-MAX_STEERING_ANGLE, MAX_STEERING_ANGLE]`.
    pub steering_angle: f32,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll(&mut self, degrees: f32) {
        self.wheel_rotation += degrees;
    }

    pub fn steer(&mut self, degrees: f32) {
        self.steering_angle =
            (self.steering_angle + degrees).clamp(-MAX_STEERING_ANGLE, MAX_STEERING_ANGLE);
    }

    /// F/G roll the wheels, arrow keys steer.
    pub fn handle_keys(&mut self, keys: &KeyState, steps: &AnimationSteps) {
        if keys.is_pressed(KeyCode::KeyF) {
            self.roll(steps.wheel);
        }
        if keys.is_pressed(KeyCode::KeyG) {
            self.roll(-steps.wheel);
        }
        if keys.is_pressed(KeyCode::ArrowLeft) {
            self.steer(-steps.steering);
        }
        if keys.is_pressed(KeyCode::ArrowRight) {
            self.steer(steps.steering);
        }
    }
}
