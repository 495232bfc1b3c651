use anyhow::Result;
use glam::{Mat4, Vec3};

use super::animation::AnimationState;
use super::scooter::{PartMesh, ScooterModel};
use super::transform::{StackUnderflow, TransformStack};
use super::{Lighting, Scene};
use crate::config::ViewerConfig;
use crate::graphics::{self, Graphics, ShaderInfo};
use crate::model::{Drawable, MeshLibrary};

/// Counts reported after each frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Scooter parts drawn; a wheel counts once.
    pub parts: usize,
    pub max_stack_depth: usize,
}

/// Uploads camera and lighting uniforms. Called once per frame, before any part.
pub fn set_frame_uniforms(
    gfx: &mut dyn Graphics,
    shader: &ShaderInfo,
    view: &Mat4,
    projection: &Mat4,
    lighting: &Lighting,
) {
    let uniforms = &shader.uniform_locations;
    graphics::set_matrix4(gfx, uniforms.view_matrix, view);
    graphics::set_matrix4(gfx, uniforms.projection_matrix, projection);
    graphics::set_vec3(gfx, uniforms.ambient_light, lighting.ambient);
    graphics::set_vec3(gfx, uniforms.directional_light, lighting.directional_color);
    graphics::set_vec3(gfx, uniforms.directional_dir, lighting.directional_direction);
    graphics::set_vec3(gfx, uniforms.point_light_pos, lighting.point_position);
    graphics::set_vec3(gfx, uniforms.point_light_color, lighting.point_color);
}

struct Traversal<'a> {
    gfx: &'a mut dyn Graphics,
    shader: &'a ShaderInfo,
    meshes: &'a MeshLibrary,
    scooter: &'a ScooterModel,
    animation: &'a AnimationState,
    stack: &'a mut TransformStack,
    stats: FrameStats,
}

impl Traversal<'_> {
    fn visit(&mut self, index: usize) -> Result<(), StackUnderflow> {
        let node = self.scooter.node(index);
        let world = self.stack.peek()? * node.local_matrix(self.animation);
        self.stack.push(world);
        self.stats.max_stack_depth = self.stats.max_stack_depth.max(self.stack.depth());

        if let Some(mesh) = node.mesh {
            let model = world * node.shape.to_matrix();
            match mesh {
                PartMesh::Cube => self.meshes.cube.draw(self.gfx, self.shader, &model),
                PartMesh::Cylinder => self.meshes.cylinder.draw(self.gfx, self.shader, &model),
                PartMesh::Wheel => {
                    self.meshes
                        .wheel
                        .draw(self.gfx, self.shader, &model, self.animation.wheel_rotation)
                }
            }
            self.stats.parts += 1;
        }

        for &child in self.scooter.children(index) {
            self.visit(child)?;
        }
        self.stack.pop()?;
        Ok(())
    }
}

/// Draws every scooter part depth-first, composing parent matrices on
/// `stack`. The stack is left as it was found.
pub fn draw_scooter(
    gfx: &mut dyn Graphics,
    shader: &ShaderInfo,
    meshes: &MeshLibrary,
    scooter: &ScooterModel,
    animation: &AnimationState,
    stack: &mut TransformStack,
) -> Result<FrameStats, StackUnderflow> {
    stack.push(Mat4::IDENTITY);
    let mut traversal = Traversal {
        gfx,
        shader,
        meshes,
        scooter,
        animation,
        stack: &mut *stack,
        stats: FrameStats::default(),
    };
    for root in scooter.roots() {
        traversal.visit(root)?;
    }
    let stats = traversal.stats;
    stack.pop()?;
    Ok(stats)
}

/// Everything built once at startup and read by every frame.
pub struct SceneRenderer {
    pub shader: ShaderInfo,
    pub meshes: MeshLibrary,
    pub scooter: ScooterModel,
    pub stack: TransformStack,
    grid_model: Mat4,
    show_axes: bool,
    clear_color: [f32; 4],
}

impl SceneRenderer {
    pub fn new(shader: ShaderInfo, meshes: MeshLibrary, config: &ViewerConfig) -> Self {
        Self {
            shader,
            meshes,
            scooter: ScooterModel::new(config.variant),
            stack: TransformStack::new(),
            grid_model: Mat4::from_translation(Vec3::new(0.0, config.grid.elevation, 0.0)),
            show_axes: config.show_axes,
            clear_color: config.clear_color,
        }
    }

    pub fn render(&mut self, gfx: &mut dyn Graphics, scene: &Scene) -> Result<FrameStats> {
        gfx.begin_frame(self.clear_color);
        set_frame_uniforms(
            gfx,
            &self.shader,
            &scene.camera.view_matrix(),
            &scene.camera.projection_matrix(),
            &scene.lighting,
        );

        self.meshes.grid.draw(gfx, &self.shader, &self.grid_model);
        if self.show_axes {
            self.meshes.axes.draw(gfx, &self.shader, &Mat4::IDENTITY);
        }

        let stats = draw_scooter(
            gfx,
            &self.shader,
            &self.meshes,
            &self.scooter,
            &scene.animation,
            &mut self.stack,
        )?;
        if !self.stack.is_empty() {
            anyhow::bail!("transform stack left at depth {} after traversal", self.stack.depth());
        }

        gfx.end_frame()?;
        log::debug!(
            "Drew {} parts (steering {:.1}, wheel {:.1})",
            stats.parts,
            scene.animation.steering_angle,
            scene.animation.wheel_rotation
        );
        Ok(stats)
    }
}
