//! The seam between scene code and the GPU.
//!
//! [`Graphics`] is a small GL-style state machine: meshes upload their buffers
//! once, then per draw they bind attributes, set uniforms and submit. The wgpu
//! [`Renderer`](crate::renderer::Renderer) and the test [`Recorder`] both
//! implement it.

mod recorder;

pub use recorder::{Command, DrawRecord, Recorder};

use anyhow::Result;
use glam::{Mat4, Vec3, Vec4};
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    Lines,
}

pub trait Graphics {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle;
    fn create_index_buffer(&mut self, data: &[u16]) -> BufferHandle;
    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle>;

    fn begin_frame(&mut self, clear_color: [f32; 4]);
    fn end_frame(&mut self) -> Result<()>;
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn set_vertex_attribute(&mut self, location: AttribLocation, components: u32, buffer: BufferHandle);
    fn disable_vertex_attribute(&mut self, location: AttribLocation);
    fn bind_index_buffer(&mut self, buffer: BufferHandle);
    fn bind_texture(&mut self, texture: TextureHandle);

    fn set_uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4);
    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3);
    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4);
    fn set_uniform_int(&mut self, location: UniformLocation, value: i32);

    fn draw_indexed(&mut self, primitive: Primitive, count: u32);
    fn draw_arrays(&mut self, primitive: Primitive, count: u32);
}

/// Fixed slots understood by both graphics implementations.
pub mod locations {
    use super::{AttribLocation, UniformLocation};

    pub const VERTEX_POSITION: AttribLocation = AttribLocation(0);
    pub const VERTEX_NORMAL: AttribLocation = AttribLocation(1);
    pub const TEXTURE_COORDINATES: AttribLocation = AttribLocation(2);
    pub const VERTEX_COLOR: AttribLocation = AttribLocation(3);

    pub const MODEL_MATRIX: UniformLocation = UniformLocation(0);
    pub const VIEW_MATRIX: UniformLocation = UniformLocation(1);
    pub const PROJECTION_MATRIX: UniformLocation = UniformLocation(2);
    pub const NORMAL_MATRIX: UniformLocation = UniformLocation(3);
    pub const AMBIENT_LIGHT: UniformLocation = UniformLocation(4);
    pub const DIRECTIONAL_LIGHT: UniformLocation = UniformLocation(5);
    pub const DIRECTIONAL_DIR: UniformLocation = UniformLocation(6);
    pub const POINT_LIGHT_POS: UniformLocation = UniformLocation(7);
    pub const POINT_LIGHT_COLOR: UniformLocation = UniformLocation(8);
    pub const SAMPLER: UniformLocation = UniformLocation(9);
    pub const USE_TEXTURE: UniformLocation = UniformLocation(10);
    pub const FRAGMENT_COLOR: UniformLocation = UniformLocation(11);
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AttribLocations {
    pub vertex_position: Option<AttribLocation>,
    pub vertex_normal: Option<AttribLocation>,
    pub texture_coordinates: Option<AttribLocation>,
    pub vertex_color: Option<AttribLocation>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct UniformLocations {
    pub model_matrix: Option<UniformLocation>,
    pub view_matrix: Option<UniformLocation>,
    pub projection_matrix: Option<UniformLocation>,
    pub normal_matrix: Option<UniformLocation>,
    pub ambient_light: Option<UniformLocation>,
    pub directional_light: Option<UniformLocation>,
    pub directional_dir: Option<UniformLocation>,
    pub point_light_pos: Option<UniformLocation>,
    pub point_light_color: Option<UniformLocation>,
    pub sampler: Option<UniformLocation>,
    pub use_texture: Option<UniformLocation>,
    pub fragment_color: Option<UniformLocation>,
}

/// Attribute and uniform locations of the active shader.
///
/// Any location may be missing; every helper below skips a `None` location.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ShaderInfo {
    pub attrib_locations: AttribLocations,
    pub uniform_locations: UniformLocations,
}

impl ShaderInfo {
    /// Every location bound to its standard slot.
    pub fn standard() -> Self {
        use locations::*;
        Self {
            attrib_locations: AttribLocations {
                vertex_position: Some(VERTEX_POSITION),
                vertex_normal: Some(VERTEX_NORMAL),
                texture_coordinates: Some(TEXTURE_COORDINATES),
                vertex_color: Some(VERTEX_COLOR),
            },
            uniform_locations: UniformLocations {
                model_matrix: Some(MODEL_MATRIX),
                view_matrix: Some(VIEW_MATRIX),
                projection_matrix: Some(PROJECTION_MATRIX),
                normal_matrix: Some(NORMAL_MATRIX),
                ambient_light: Some(AMBIENT_LIGHT),
                directional_light: Some(DIRECTIONAL_LIGHT),
                directional_dir: Some(DIRECTIONAL_DIR),
                point_light_pos: Some(POINT_LIGHT_POS),
                point_light_color: Some(POINT_LIGHT_COLOR),
                sampler: Some(SAMPLER),
                use_texture: Some(USE_TEXTURE),
                fragment_color: Some(FRAGMENT_COLOR),
            },
        }
    }

    /// Same descriptor without normal attribute or normal matrix, which
    /// leaves every draw unlit.
    pub fn without_normals(mut self) -> Self {
        self.attrib_locations.vertex_normal = None;
        self.uniform_locations.normal_matrix = None;
        self
    }
}

pub fn set_attribute(
    gfx: &mut dyn Graphics,
    location: Option<AttribLocation>,
    components: u32,
    buffer: Option<BufferHandle>,
) {
    let Some(location) = location else { return };
    match buffer {
        Some(buffer) => gfx.set_vertex_attribute(location, components, buffer),
        None => gfx.disable_vertex_attribute(location),
    }
}

pub fn set_matrix4(gfx: &mut dyn Graphics, location: Option<UniformLocation>, value: &Mat4) {
    if let Some(location) = location {
        gfx.set_uniform_matrix4(location, value);
    }
}

pub fn set_vec3(gfx: &mut dyn Graphics, location: Option<UniformLocation>, value: Vec3) {
    if let Some(location) = location {
        gfx.set_uniform_vec3(location, value);
    }
}

pub fn set_vec4(gfx: &mut dyn Graphics, location: Option<UniformLocation>, value: Vec4) {
    if let Some(location) = location {
        gfx.set_uniform_vec4(location, value);
    }
}

pub fn set_int(gfx: &mut dyn Graphics, location: Option<UniformLocation>, value: i32) {
    if let Some(location) = location {
        gfx.set_uniform_int(location, value);
    }
}
