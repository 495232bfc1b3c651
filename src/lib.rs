pub mod config;
pub mod graphics;
pub mod input;
pub mod model;
pub mod renderer;
pub mod scene;

use anyhow::{Context, Result};

use config::ViewerConfig;
use graphics::{Graphics, Recorder, ShaderInfo};
use input::KeyState;
use model::{MeshLibrary, TextureSet};
use scene::{Camera, FrameStats, Scene, SceneRenderer};

/// Scene, meshes and the graphics backend they draw through.
pub struct Viewer<G: Graphics> {
    gfx: G,
    pub scene: Scene,
    renderer: SceneRenderer,
    frames: u64,
}

impl<G: Graphics> Viewer<G> {
    /// Uploads every mesh and texture; nothing is built after this returns.
    pub fn new(mut gfx: G, config: &ViewerConfig) -> Result<Self> {
        config.validate()?;

        let textures = if config.variant.is_textured() {
            TextureSet::load(
                &mut gfx,
                config.metal_texture.as_deref(),
                config.wheel_texture.as_deref(),
            )
            .context("failed to load part textures")?
        } else {
            TextureSet::default()
        };

        let shader = if config.variant.is_lit() {
            ShaderInfo::standard()
        } else {
            ShaderInfo::standard().without_normals()
        };

        let meshes = MeshLibrary::new(&mut gfx, config, &textures);
        let renderer = SceneRenderer::new(shader, meshes, config);
        log::info!(
            "Built {:?} scooter: {} parts, {} slices",
            config.variant,
            renderer.scooter.part_count(),
            config.slices
        );

        let camera = Camera::new(config.width, config.height);
        let scene = Scene::new(camera, config.animation_steps());

        Ok(Self {
            gfx,
            scene,
            renderer,
            frames: 0,
        })
    }

    /// Samples the held keys once, then draws.
    pub fn frame(&mut self, keys: &KeyState) -> Result<FrameStats> {
        self.scene.update(keys);
        let stats = self
            .renderer
            .render(&mut self.gfx, &self.scene)
            .with_context(|| format!("frame {} failed", self.frames))?;
        self.frames += 1;
        Ok(stats)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gfx.resize(width, height);
        self.scene.resize(width, height);
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn graphics(&self) -> &G {
        &self.gfx
    }
}

impl Viewer<Recorder> {
    /// One-line report of a headless run.
    pub fn summary(&self) -> String {
        let animation = self.scene.animation;
        format!(
            "{} frames, {} parts per frame, {} draw calls; steering {:.1}, wheel {:.1}, camera {}",
            self.gfx.frame_count(),
            self.renderer.scooter.part_count(),
            self.gfx.draws().len(),
            animation.steering_angle,
            animation.wheel_rotation,
            self.scene.camera
        )
    }
}
