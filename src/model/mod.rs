mod geometry;
mod mesh;
mod texture;

pub use geometry::{Geometry, WheelGeometry, AXIS_COLORS};
pub use mesh::{
    set_model_matrix, Axes, Cube, Cylinder, Drawable, Grid, Material, MeshBuffers, MeshLibrary, Wheel,
    CYLINDER_HEIGHT, CYLINDER_RADIUS, WHEEL_RADIUS, WHEEL_WIDTH,
};
pub use texture::{checkerboard, is_power_of_two, load_image, load_or_generate, mip_chain, TextureSet, UploadPolicy};

#[cfg(test)]
mod tests;
