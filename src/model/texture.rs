use std::path::Path;

use anyhow::{Context, Result};
use image::{imageops, Rgba, RgbaImage};

use crate::graphics::{Graphics, TextureHandle};

/// How an image is laid out on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPolicy {
    /// Power-of-two sides: full mip chain, repeat addressing.
    Mipmapped,
    /// Anything else: single level, clamp-to-edge, linear minification.
    ClampToEdge,
}

impl UploadPolicy {
    pub fn for_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        if is_power_of_two(width) && is_power_of_two(height) {
            Self::Mipmapped
        } else {
            Self::ClampToEdge
        }
    }
}

pub fn is_power_of_two(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Level 0 followed by successively halved copies down to 1x1.
pub fn mip_chain(image: &RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![image.clone()];
    let (mut width, mut height) = image.dimensions();
    while width > 1 || height > 1 {
        width = (width / 2).max(1);
        height = (height / 2).max(1);
        let previous = levels.last().unwrap_or(image);
        let next = imageops::resize(previous, width, height, imageops::FilterType::Triangle);
        levels.push(next);
    }
    levels
}

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to load texture {}", path.display()))?;
    Ok(image.to_rgba8())
}

/// Square checkerboard with `squares` cells per side.
pub fn checkerboard(size: u32, squares: u32, light: [u8; 4], dark: [u8; 4]) -> RgbaImage {
    let square_size = (size / squares.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        let is_light = (x / square_size + y / square_size) % 2 == 0;
        Rgba(if is_light { light } else { dark })
    })
}

/// Loads `path`, or falls back to a generated checkerboard when no path is set.
pub fn load_or_generate(
    gfx: &mut dyn Graphics,
    path: Option<&Path>,
    light: [u8; 4],
    dark: [u8; 4],
) -> Result<TextureHandle> {
    let image = match path {
        Some(path) => load_image(path)?,
        None => checkerboard(256, 8, light, dark),
    };
    log::info!(
        "Uploading {}x{} texture ({:?})",
        image.width(),
        image.height(),
        UploadPolicy::for_image(&image)
    );
    gfx.create_texture(&image)
}

/// Textures shared by the scooter parts.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TextureSet {
    pub metal: Option<TextureHandle>,
    pub tire: Option<TextureHandle>,
}

impl TextureSet {
    pub fn load(gfx: &mut dyn Graphics, metal: Option<&Path>, tire: Option<&Path>) -> Result<Self> {
        Ok(Self {
            metal: Some(load_or_generate(gfx, metal, [200, 200, 210, 255], [150, 150, 160, 255])?),
            tire: Some(load_or_generate(gfx, tire, [60, 60, 60, 255], [25, 25, 25, 255])?),
        })
    }
}
