use glam::{Mat3, Mat4, Vec3};
use thiserror::Error;

/// Raised when `pop` or `peek` is called on an empty [`TransformStack`].
///
/// An underflow always means a traversal pushed and popped out of step, so
/// callers propagate it rather than recovering.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("transform stack underflow in {operation}")]
pub struct StackUnderflow {
    pub operation: &'static str,
}

/// Translation, XYZ euler rotation (radians) and scale, composed as `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new() -> Self {
        Self::IDENTITY
    }

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    pub fn with_rotation_degrees(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x.to_radians(), y.to_radians(), z.to_radians());
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(self.position);
        let rotation = Mat4::from_euler(glam::EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        let scale = Mat4::from_scale(self.scale);
        translation * rotation * scale
    }
}

/// Inverse-transpose of `model`, used to carry surface normals through
/// non-uniform scale. A singular model matrix yields the identity.
pub fn normal_matrix(model: &Mat4) -> Mat4 {
    if model.determinant().abs() <= f32::EPSILON {
        return Mat4::IDENTITY;
    }
    model.inverse().transpose()
}

/// Upper-left 3x3 of [`normal_matrix`], for callers that transform bare normals.
pub fn normal_matrix3(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(normal_matrix(model))
}

/// LIFO stack of model matrices.
///
/// `Mat4` is `Copy`, so every push stores its own value and every peek hands
/// back an independent copy: mutating either never reaches the stored entry.
#[derive(Debug, Default, Clone)]
pub struct TransformStack {
    matrices: Vec<Mat4>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, matrix: Mat4) {
        self.matrices.push(matrix);
    }

    /// Pushes a copy of the current top.
    pub fn push_top(&mut self) -> Result<(), StackUnderflow> {
        let top = self.peek()?;
        self.push(top);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Mat4, StackUnderflow> {
        self.matrices.pop().ok_or(StackUnderflow { operation: "pop" })
    }

    pub fn peek(&self) -> Result<Mat4, StackUnderflow> {
        self.matrices.last().copied().ok_or(StackUnderflow { operation: "peek" })
    }

    pub fn clear(&mut self) {
        self.matrices.clear();
    }

    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}
