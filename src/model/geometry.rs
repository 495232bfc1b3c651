use std::f32::consts::TAU;

use crate::graphics::Primitive;

/// CPU-side vertex streams for one procedural shape.
///
/// Built once from shape parameters and never modified after upload. Slice
/// counts below 3 and non-positive dimensions produce degenerate geometry;
/// callers validate before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub indices: Vec<u16>,
    pub primitive: Primitive,
}

// Each face: outward normal, then four corners wound around it.
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    ([0.0, 0.0, -1.0], [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]]),
    ([0.0, 1.0, 0.0], [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
    ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
    ([1.0, 0.0, 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
    ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
];

const FACE_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

pub const AXIS_COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Axis-aligned cube spanning -1..1, four unshared vertices per face so
    /// every face keeps a flat normal.
    pub fn cube() -> Self {
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut tex_coords = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, (normal, corners)) in CUBE_FACES.iter().enumerate() {
            positions.extend_from_slice(corners);
            normals.extend(std::iter::repeat(*normal).take(4));
            tex_coords.extend_from_slice(&FACE_TEX_COORDS);

            let base = (face * 4) as u16;
            indices.extend([0, 1, 2, 0, 2, 3].map(|i| base + i));
        }

        Self {
            positions,
            normals: Some(normals),
            tex_coords: Some(tex_coords),
            colors: None,
            indices,
            primitive: Primitive::Triangles,
        }
    }

    /// Open tube around the Y axis from `-height/2` to `height/2`.
    ///
    /// Vertices alternate top/bottom for `slices + 1` steps; the last step
    /// repeats the first position with `u = 1` to close the texture seam.
    pub fn cylinder(slices: u32, radius: f32, height: f32) -> Self {
        let half = height / 2.0;
        let ring = slices as usize + 1;
        let mut positions = Vec::with_capacity(ring * 2);
        let mut normals = Vec::with_capacity(ring * 2);
        let mut tex_coords = Vec::with_capacity(ring * 2);

        for i in 0..=slices {
            let theta = i as f32 * TAU / slices as f32;
            let (sin, cos) = theta.sin_cos();
            let (x, z) = (radius * cos, radius * sin);
            let u = i as f32 / slices as f32;

            positions.push([x, half, z]);
            positions.push([x, -half, z]);
            normals.push([cos, 0.0, sin]);
            normals.push([cos, 0.0, sin]);
            tex_coords.push([u, 0.0]);
            tex_coords.push([u, 1.0]);
        }

        let mut indices = Vec::with_capacity(slices as usize * 6);
        for i in 0..slices as u16 {
            let top = i * 2;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;
            indices.extend([top, bottom, next_top, bottom, next_bottom, next_top]);
        }

        Self {
            positions,
            normals: Some(normals),
            tex_coords: Some(tex_coords),
            colors: None,
            indices,
            primitive: Primitive::Triangles,
        }
    }

    /// Flat disc in the plane `y`, built as a fan around its center.
    /// `facing_up` picks the normal and winds the fan to face it.
    pub fn disc(slices: u32, radius: f32, y: f32, facing_up: bool) -> Self {
        let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
        let mut positions = vec![[0.0, y, 0.0]];
        let mut tex_coords = vec![[0.5, 0.5]];

        for i in 0..=slices {
            let theta = i as f32 * TAU / slices as f32;
            let (sin, cos) = theta.sin_cos();
            positions.push([radius * cos, y, radius * sin]);
            tex_coords.push([0.5 + 0.5 * cos, 0.5 + 0.5 * sin]);
        }

        let mut indices = Vec::with_capacity(slices as usize * 3);
        for i in 1..=slices as u16 {
            if facing_up {
                indices.extend([0, i + 1, i]);
            } else {
                indices.extend([0, i, i + 1]);
            }
        }

        Self {
            normals: Some(vec![normal; positions.len()]),
            positions,
            tex_coords: Some(tex_coords),
            colors: None,
            indices,
            primitive: Primitive::Triangles,
        }
    }

    /// Ground grid of `cells + 1` lines along each axis, centered at the
    /// origin in the XZ plane. Positions only.
    pub fn grid(width: f32, depth: f32, cells: u32) -> Self {
        let (half_width, half_depth) = (width / 2.0, depth / 2.0);
        let mut positions = Vec::with_capacity((cells as usize + 1) * 4);

        for i in 0..=cells {
            let z = -half_depth + i as f32 * depth / cells as f32;
            positions.push([-half_width, 0.0, z]);
            positions.push([half_width, 0.0, z]);
        }
        for j in 0..=cells {
            let x = -half_width + j as f32 * width / cells as f32;
            positions.push([x, 0.0, -half_depth]);
            positions.push([x, 0.0, half_depth]);
        }

        Self {
            positions,
            normals: None,
            tex_coords: None,
            colors: None,
            indices: Vec::new(),
            primitive: Primitive::Lines,
        }
    }

    /// Three colored segments spanning `-length..length` on X (red),
    /// Y (green) and Z (blue).
    pub fn axes(length: f32) -> Self {
        let mut positions = Vec::with_capacity(6);
        let mut colors = Vec::with_capacity(6);

        for (axis, color) in AXIS_COLORS.iter().enumerate() {
            let mut end = [0.0; 3];
            end[axis] = length;
            positions.push(end.map(|v| -v));
            positions.push(end);
            colors.extend([*color, *color]);
        }

        Self {
            positions,
            normals: None,
            tex_coords: None,
            colors: Some(colors),
            indices: Vec::new(),
            primitive: Primitive::Lines,
        }
    }

    /// Appends `other`, offsetting its indices. Both sides must carry the
    /// same optional streams.
    pub fn merge(mut self, other: Geometry) -> Self {
        let offset = self.positions.len() as u16;
        self.positions.extend(other.positions);
        if let (Some(normals), Some(more)) = (self.normals.as_mut(), other.normals) {
            normals.extend(more);
        }
        if let (Some(tex_coords), Some(more)) = (self.tex_coords.as_mut(), other.tex_coords) {
            tex_coords.extend(more);
        }
        if let (Some(colors), Some(more)) = (self.colors.as_mut(), other.colors) {
            colors.extend(more);
        }
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
        self
    }
}

/// Tire tube plus one rim disc on each open face.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelGeometry {
    pub tire: Geometry,
    pub rims: Geometry,
}

impl WheelGeometry {
    pub fn new(slices: u32, radius: f32, width: f32) -> Self {
        let half = width / 2.0;
        Self {
            tire: Geometry::cylinder(slices, radius, width),
            rims: Geometry::disc(slices, radius, half, true)
                .merge(Geometry::disc(slices, radius, -half, false)),
        }
    }
}
