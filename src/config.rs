use std::path::PathBuf;

use crate::scene::animation::AnimationSteps;

/// Which authored scooter tree to render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScooterVariant {
    /// Deck, column, handlebar and wheels; unlit, untextured, coarse steering.
    Minimal,
    /// Full tree, lit, textured.
    #[default]
    Textured,
    /// Full tree, lit, flat colors.
    Cached,
}

impl ScooterVariant {
    pub fn steering_step(self) -> f32 {
        match self {
            Self::Minimal => 22.5,
            Self::Textured | Self::Cached => 2.0,
        }
    }

    pub fn is_lit(self) -> bool {
        !matches!(self, Self::Minimal)
    }

    pub fn is_textured(self) -> bool {
        matches!(self, Self::Textured)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub width: f32,
    pub depth: f32,
    pub cells: u32,
    pub color: [f32; 4],
    /// Height of the grid plane.
    pub elevation: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            depth: 40.0,
            cells: 40,
            color: [0.2, 0.2, 0.2, 1.0],
            elevation: -0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub variant: ScooterVariant,
    pub slices: u32,
    pub grid: GridConfig,
    pub show_axes: bool,
    pub axes_length: f32,
    pub metal_texture: Option<PathBuf>,
    pub wheel_texture: Option<PathBuf>,
    pub clear_color: [f32; 4],
    /// Overrides the variant's steering step when set.
    pub steering_step: Option<f32>,
    pub wheel_step: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            variant: ScooterVariant::default(),
            slices: 32,
            grid: GridConfig::default(),
            show_axes: false,
            axes_length: 5.0,
            metal_texture: None,
            wheel_texture: None,
            clear_color: [0.9, 0.9, 0.9, 1.0],
            steering_step: None,
            wheel_step: 5.0,
            width: 960,
            height: 640,
        }
    }
}

impl ViewerConfig {
    pub fn animation_steps(&self) -> AnimationSteps {
        AnimationSteps {
            wheel: self.wheel_step,
            steering: self.steering_step.unwrap_or_else(|| self.variant.steering_step()),
        }
    }

    /// Rejects parameters the mesh generators do not guard against.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.slices >= 3, "slice count must be at least 3, got {}", self.slices);
        anyhow::ensure!(self.slices <= 4096, "slice count {} overflows 16-bit indices", self.slices);
        anyhow::ensure!(self.grid.cells > 0, "grid needs at least one cell");
        anyhow::ensure!(
            self.grid.width > 0.0 && self.grid.depth > 0.0,
            "grid dimensions must be positive"
        );
        anyhow::ensure!(self.axes_length > 0.0, "axis length must be positive");
        Ok(())
    }
}
