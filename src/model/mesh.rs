use glam::{Mat4, Vec4};

use super::geometry::{Geometry, WheelGeometry};
use super::texture::TextureSet;
use crate::config::ViewerConfig;
use crate::graphics::{self, BufferHandle, Graphics, Primitive, ShaderInfo, TextureHandle};
use crate::scene::transform::normal_matrix;

pub const CYLINDER_RADIUS: f32 = 0.1;
pub const CYLINDER_HEIGHT: f32 = 1.0;
pub const WHEEL_RADIUS: f32 = 0.2;
pub const WHEEL_WIDTH: f32 = 0.2;

const METAL_COLOR: Vec4 = Vec4::new(0.7, 0.7, 0.75, 1.0);
const TIRE_COLOR: Vec4 = Vec4::new(0.15, 0.15, 0.15, 1.0);
const RIM_COLOR: Vec4 = Vec4::new(0.8, 0.8, 0.85, 1.0);

/// Draw contract shared by every part that renders with its model matrix alone.
pub trait Drawable {
    fn draw(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4);
}

/// Geometry streams uploaded once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBuffers {
    pub positions: BufferHandle,
    pub normals: Option<BufferHandle>,
    pub tex_coords: Option<BufferHandle>,
    pub colors: Option<BufferHandle>,
    pub indices: Option<BufferHandle>,
    pub element_count: u32,
    pub primitive: Primitive,
}

impl MeshBuffers {
    pub fn upload(gfx: &mut dyn Graphics, geometry: &Geometry) -> Self {
        let positions = gfx.create_vertex_buffer(bytemuck::cast_slice(&geometry.positions));
        let normals = geometry
            .normals
            .as_ref()
            .map(|normals| gfx.create_vertex_buffer(bytemuck::cast_slice(normals)));
        let tex_coords = geometry
            .tex_coords
            .as_ref()
            .map(|tex_coords| gfx.create_vertex_buffer(bytemuck::cast_slice(tex_coords)));
        let colors = geometry
            .colors
            .as_ref()
            .map(|colors| gfx.create_vertex_buffer(bytemuck::cast_slice(colors)));
        let indices = geometry
            .is_indexed()
            .then(|| gfx.create_index_buffer(&geometry.indices));
        let element_count = if geometry.is_indexed() {
            geometry.index_count()
        } else {
            geometry.vertex_count()
        };

        Self {
            positions,
            normals,
            tex_coords,
            colors,
            indices,
            element_count: element_count as u32,
            primitive: geometry.primitive,
        }
    }

    /// Binds every stream; streams this mesh lacks are disabled so state left
    /// by the previous draw cannot leak in.
    pub fn bind(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo) {
        let attribs = &shader.attrib_locations;
        graphics::set_attribute(gfx, attribs.vertex_position, 3, Some(self.positions));
        graphics::set_attribute(gfx, attribs.vertex_normal, 3, self.normals);
        graphics::set_attribute(gfx, attribs.texture_coordinates, 2, self.tex_coords);
        graphics::set_attribute(gfx, attribs.vertex_color, 4, self.colors);
        if let Some(indices) = self.indices {
            gfx.bind_index_buffer(indices);
        }
    }

    pub fn submit(&self, gfx: &mut dyn Graphics) {
        if self.indices.is_some() {
            gfx.draw_indexed(self.primitive, self.element_count);
        } else {
            gfx.draw_arrays(self.primitive, self.element_count);
        }
    }
}

/// Optional texture with a flat fallback color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub texture: Option<TextureHandle>,
    pub color: Vec4,
}

impl Material {
    pub fn new(texture: Option<TextureHandle>, color: Vec4) -> Self {
        Self { texture, color }
    }

    pub fn apply(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo) {
        let uniforms = &shader.uniform_locations;
        match self.texture {
            Some(texture) => {
                gfx.bind_texture(texture);
                graphics::set_int(gfx, uniforms.sampler, 0);
                graphics::set_int(gfx, uniforms.use_texture, 1);
            }
            None => graphics::set_int(gfx, uniforms.use_texture, 0),
        }
        graphics::set_vec4(gfx, uniforms.fragment_color, self.color);
    }
}

/// Uploads the model matrix and, when the shader takes one, its normal matrix.
pub fn set_model_matrix(gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4) {
    let uniforms = &shader.uniform_locations;
    graphics::set_matrix4(gfx, uniforms.model_matrix, model);
    if uniforms.normal_matrix.is_some() {
        graphics::set_matrix4(gfx, uniforms.normal_matrix, &normal_matrix(model));
    }
}

pub struct Cube {
    pub buffers: MeshBuffers,
    pub material: Material,
}

impl Cube {
    pub fn new(gfx: &mut dyn Graphics, texture: Option<TextureHandle>) -> Self {
        Self {
            buffers: MeshBuffers::upload(gfx, &Geometry::cube()),
            material: Material::new(texture, METAL_COLOR),
        }
    }
}

impl Drawable for Cube {
    fn draw(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4) {
        self.buffers.bind(gfx, shader);
        self.material.apply(gfx, shader);
        set_model_matrix(gfx, shader, model);
        self.buffers.submit(gfx);
    }
}

pub struct Cylinder {
    pub buffers: MeshBuffers,
    pub material: Material,
}

impl Cylinder {
    pub fn new(gfx: &mut dyn Graphics, slices: u32, texture: Option<TextureHandle>) -> Self {
        Self {
            buffers: MeshBuffers::upload(gfx, &Geometry::cylinder(slices, CYLINDER_RADIUS, CYLINDER_HEIGHT)),
            material: Material::new(texture, METAL_COLOR),
        }
    }
}

impl Drawable for Cylinder {
    fn draw(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4) {
        self.buffers.bind(gfx, shader);
        self.material.apply(gfx, shader);
        set_model_matrix(gfx, shader, model);
        self.buffers.submit(gfx);
    }
}

/// Tire and rims around the local Y axle.
pub struct Wheel {
    pub tire: MeshBuffers,
    pub rims: MeshBuffers,
    pub tire_material: Material,
    pub rim_material: Material,
}

impl Wheel {
    pub fn new(gfx: &mut dyn Graphics, slices: u32, tire_texture: Option<TextureHandle>) -> Self {
        let geometry = WheelGeometry::new(slices, WHEEL_RADIUS, WHEEL_WIDTH);
        Self {
            tire: MeshBuffers::upload(gfx, &geometry.tire),
            rims: MeshBuffers::upload(gfx, &geometry.rims),
            tire_material: Material::new(tire_texture, TIRE_COLOR),
            rim_material: Material::new(None, RIM_COLOR),
        }
    }

    /// Spins the tire by `spin_degrees` about the axle on top of `model`; the
    /// rims are drawn with `model` itself and the caller's matrix is left
    /// untouched.
    pub fn draw(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4, spin_degrees: f32) {
        let spun = *model * Mat4::from_rotation_y(spin_degrees.to_radians());

        self.tire.bind(gfx, shader);
        self.tire_material.apply(gfx, shader);
        set_model_matrix(gfx, shader, &spun);
        self.tire.submit(gfx);

        // Rims are not spun.
        self.rims.bind(gfx, shader);
        self.rim_material.apply(gfx, shader);
        set_model_matrix(gfx, shader, model);
        self.rims.submit(gfx);
    }
}

/// Unlit line grid drawn in a single flat color.
pub struct Grid {
    pub buffers: MeshBuffers,
    pub color: Vec4,
}

impl Grid {
    pub fn new(gfx: &mut dyn Graphics, width: f32, depth: f32, cells: u32, color: Vec4) -> Self {
        Self {
            buffers: MeshBuffers::upload(gfx, &Geometry::grid(width, depth, cells)),
            color,
        }
    }
}

impl Drawable for Grid {
    fn draw(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4) {
        let uniforms = &shader.uniform_locations;
        self.buffers.bind(gfx, shader);
        graphics::set_int(gfx, uniforms.use_texture, 0);
        graphics::set_vec4(gfx, uniforms.fragment_color, self.color);
        graphics::set_matrix4(gfx, uniforms.model_matrix, model);
        self.buffers.submit(gfx);
    }
}

/// Axis marker colored per vertex.
pub struct Axes {
    pub buffers: MeshBuffers,
}

impl Axes {
    pub fn new(gfx: &mut dyn Graphics, length: f32) -> Self {
        Self {
            buffers: MeshBuffers::upload(gfx, &Geometry::axes(length)),
        }
    }
}

impl Drawable for Axes {
    fn draw(&self, gfx: &mut dyn Graphics, shader: &ShaderInfo, model: &Mat4) {
        self.buffers.bind(gfx, shader);
        graphics::set_int(gfx, shader.uniform_locations.use_texture, 0);
        graphics::set_matrix4(gfx, shader.uniform_locations.model_matrix, model);
        self.buffers.submit(gfx);
    }
}

/// Every mesh the viewer draws, built once before the first frame.
pub struct MeshLibrary {
    pub cube: Cube,
    pub cylinder: Cylinder,
    pub wheel: Wheel,
    pub grid: Grid,
    pub axes: Axes,
}

impl MeshLibrary {
    pub fn new(gfx: &mut dyn Graphics, config: &ViewerConfig, textures: &TextureSet) -> Self {
        Self {
            cube: Cube::new(gfx, textures.metal),
            cylinder: Cylinder::new(gfx, config.slices, textures.metal),
            wheel: Wheel::new(gfx, config.slices, textures.tire),
            grid: Grid::new(
                gfx,
                config.grid.width,
                config.grid.depth,
                config.grid.cells,
                Vec4::from_array(config.grid.color),
            ),
            axes: Axes::new(gfx, config.axes_length),
        }
    }
}
