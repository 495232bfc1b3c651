use super::*;
use crate::config::ViewerConfig;
use crate::graphics::{locations, Command, Graphics, Primitive, Recorder, ShaderInfo};
use approx::assert_relative_eq;
use assert_fs::prelude::*;
use glam::{Mat4, Vec3, Vec4};

fn length(v: [f32; 3]) -> f32 {
    Vec3::from_array(v).length()
}

#[test]
fn test_cube_counts_and_faces() {
    let cube = Geometry::cube();
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.index_count(), 36);
    assert_eq!(cube.primitive, Primitive::Triangles);

    let normals = cube.normals.as_ref().unwrap();
    for face in 0..6 {
        let normal = normals[face * 4];
        assert_relative_eq!(length(normal), 1.0);
        for corner in 0..4 {
            assert_eq!(normals[face * 4 + corner], normal);
            // Every corner of a face lies on the plane its normal points at.
            let position = Vec3::from_array(cube.positions[face * 4 + corner]);
            assert_relative_eq!(position.dot(Vec3::from_array(normal)), 1.0);
        }
        let base = (face * 4) as u16;
        assert_eq!(
            &cube.indices[face * 6..face * 6 + 6],
            &[base, base + 1, base + 2, base, base + 2, base + 3]
        );
    }
    assert_eq!(cube.tex_coords.as_ref().unwrap().len(), 24);
}

#[test]
fn test_cylinder_counts() {
    for slices in [3, 8, 32, 100] {
        let cylinder = Geometry::cylinder(slices, 0.1, 1.0);
        assert_eq!(cylinder.vertex_count(), 2 * (slices as usize + 1));
        assert_eq!(cylinder.index_count(), 6 * slices as usize);
        let max = *cylinder.indices.iter().max().unwrap() as usize;
        assert_eq!(max, cylinder.vertex_count() - 1);
    }
}

#[test]
fn test_cylinder_shape() {
    let slices = 16;
    let cylinder = Geometry::cylinder(slices, 0.25, 2.0);
    let normals = cylinder.normals.as_ref().unwrap();

    for (position, normal) in cylinder.positions.iter().zip(normals) {
        assert_relative_eq!((position[0] * position[0] + position[2] * position[2]).sqrt(), 0.25, epsilon = 1e-6);
        assert!(position[1] == 1.0 || position[1] == -1.0);
        assert_relative_eq!(length(*normal), 1.0, epsilon = 1e-6);
        assert_eq!(normal[1], 0.0);
        // Radial: parallel to the XZ part of the position.
        assert_relative_eq!(normal[0] * 0.25, position[0], epsilon = 1e-6);
        assert_relative_eq!(normal[2] * 0.25, position[2], epsilon = 1e-6);
    }

    // The seam column repeats the first one with u = 1.
    let last = cylinder.vertex_count() - 2;
    assert_relative_eq!(cylinder.positions[last][0], cylinder.positions[0][0], epsilon = 1e-6);
    assert_relative_eq!(cylinder.positions[last][2], cylinder.positions[0][2], epsilon = 1e-5);
    let tex_coords = cylinder.tex_coords.as_ref().unwrap();
    assert_eq!(tex_coords[0], [0.0, 0.0]);
    assert_eq!(tex_coords[1], [0.0, 1.0]);
    assert_eq!(tex_coords[last], [1.0, 0.0]);

    assert_eq!(&cylinder.indices[..6], &[0, 1, 2, 1, 3, 2]);
}

#[test]
fn test_disc_fan() {
    let slices = 12;
    let disc = Geometry::disc(slices, 0.2, 0.1, false);
    assert_eq!(disc.vertex_count(), slices as usize + 2);
    assert_eq!(disc.index_count(), 3 * slices as usize);
    assert_eq!(disc.positions[0], [0.0, 0.1, 0.0]);
    assert_eq!(&disc.indices[..3], &[0, 1, 2]);
    assert!(disc.normals.unwrap().iter().all(|n| *n == [0.0, -1.0, 0.0]));

    let up = Geometry::disc(slices, 0.2, 0.1, true);
    assert_eq!(&up.indices[..3], &[0, 2, 1]);
}

#[test]
fn test_wheel_geometry() {
    let slices = 32;
    let wheel = WheelGeometry::new(slices, WHEEL_RADIUS, WHEEL_WIDTH);
    assert_eq!(wheel.tire.vertex_count(), 2 * (slices as usize + 1));
    assert_eq!(wheel.rims.vertex_count(), 2 * (slices as usize + 2));
    assert_eq!(wheel.rims.index_count(), 6 * slices as usize);

    // Second rim indices point into the second half of the buffer.
    let second = &wheel.rims.indices[3 * slices as usize..];
    assert!(second.iter().all(|&i| i as usize >= slices as usize + 2));
    let heights: Vec<f32> = wheel.rims.positions.iter().map(|p| p[1]).collect();
    assert!(heights[..slices as usize + 2].iter().all(|&y| y == 0.1));
    assert!(heights[slices as usize + 2..].iter().all(|&y| y == -0.1));
}

#[test]
fn test_grid_lines() {
    let grid = Geometry::grid(40.0, 20.0, 10);
    assert_eq!(grid.primitive, Primitive::Lines);
    assert_eq!(grid.vertex_count(), 4 * 11);
    assert!(!grid.is_indexed());
    assert!(grid.normals.is_none() && grid.tex_coords.is_none());

    for position in &grid.positions {
        assert_eq!(position[1], 0.0);
        assert!(position[0].abs() <= 20.0 && position[2].abs() <= 10.0);
    }
    assert_eq!(grid.positions[0], [-20.0, 0.0, -10.0]);
    assert_eq!(grid.positions[1], [20.0, 0.0, -10.0]);
    assert_eq!(grid.positions[grid.vertex_count() - 1], [20.0, 0.0, 10.0]);
}

#[test]
fn test_axes_colors() {
    let axes = Geometry::axes(5.0);
    assert_eq!(axes.vertex_count(), 6);
    let colors = axes.colors.as_ref().unwrap();
    for axis in 0..3 {
        assert_eq!(colors[axis * 2], AXIS_COLORS[axis]);
        assert_eq!(colors[axis * 2 + 1], AXIS_COLORS[axis]);
        assert_eq!(axes.positions[axis * 2][axis], -5.0);
        assert_eq!(axes.positions[axis * 2 + 1][axis], 5.0);
    }
}

#[test]
fn test_upload_creates_one_buffer_per_stream() {
    let mut recorder = Recorder::new();
    let cube = MeshBuffers::upload(&mut recorder, &Geometry::cube());
    assert_eq!(recorder.buffer_count(), 4);
    assert_eq!(cube.element_count, 36);
    assert_eq!(recorder.vertex_data(cube.positions).unwrap().len(), 72);
    assert_eq!(recorder.index_data(cube.indices.unwrap()).unwrap().len(), 36);

    let grid = MeshBuffers::upload(&mut recorder, &Geometry::grid(4.0, 4.0, 4));
    assert_eq!(recorder.buffer_count(), 5);
    assert_eq!(grid.element_count, 20);
    assert!(grid.indices.is_none() && grid.normals.is_none());
}

#[test]
fn test_cube_draw_sets_normal_matrix() {
    let mut recorder = Recorder::new();
    let cube = Cube::new(&mut recorder, None);
    let model = Mat4::from_scale(Vec3::new(1.3, 0.1, 0.3));

    cube.draw(&mut recorder, &ShaderInfo::standard(), &model);
    let draws = recorder.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].model, Some(model));
    assert_eq!(draws[0].normal, Some(model.inverse().transpose()));
    assert!(draws[0].has_normals && draws[0].indexed);
    assert_eq!(draws[0].count, 36);
}

#[test]
fn test_draw_tolerates_missing_locations() {
    let mut recorder = Recorder::new();
    let cube = Cube::new(&mut recorder, None);

    cube.draw(&mut recorder, &ShaderInfo::default(), &Mat4::IDENTITY);
    assert_eq!(
        recorder.commands,
        vec![Command::BindIndexBuffer(cube.buffers.indices.unwrap()), Command::DrawIndexed(Primitive::Triangles, 36)]
    );

    recorder.clear_commands();
    cube.draw(&mut recorder, &ShaderInfo::standard().without_normals(), &Mat4::IDENTITY);
    let draws = recorder.draws();
    assert_eq!(draws[0].normal, None);
    assert!(!draws[0].has_normals);
    assert!(!recorder
        .commands
        .iter()
        .any(|command| matches!(command, Command::Matrix4(location, _) if *location == locations::NORMAL_MATRIX)));
}

#[test]
fn test_wheel_spin_does_not_touch_caller_matrix() {
    let mut recorder = Recorder::new();
    let wheel = Wheel::new(&mut recorder, 16, None);
    let model = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let before = model;

    wheel.draw(&mut recorder, &ShaderInfo::standard(), &model, 90.0);
    assert_eq!(model, before);

    let draws = recorder.draws();
    assert_eq!(draws.len(), 2);
    let spun = draws[0].model.unwrap();
    let expected = model * Mat4::from_rotation_y(90f32.to_radians());
    for (a, b) in spun.to_cols_array().iter().zip(expected.to_cols_array().iter()) {
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }
    assert_eq!(draws[1].model, Some(model));
    assert_eq!(draws[1].normal, Some(model.inverse().transpose()));
    assert_eq!(draws[0].count, 6 * 16);
    assert_eq!(draws[1].count, 6 * 16);
}

#[test]
fn test_grid_and_axes_skip_lighting() {
    let mut recorder = Recorder::new();
    let cube = Cube::new(&mut recorder, None);
    let grid = Grid::new(&mut recorder, 10.0, 10.0, 10, Vec4::new(0.2, 0.2, 0.2, 1.0));
    let axes = Axes::new(&mut recorder, 3.0);
    let shader = ShaderInfo::standard();

    cube.draw(&mut recorder, &shader, &Mat4::IDENTITY);
    grid.draw(&mut recorder, &shader, &Mat4::IDENTITY);
    axes.draw(&mut recorder, &shader, &Mat4::IDENTITY);

    let draws = recorder.draws();
    assert!(draws[0].has_normals);
    assert!(!draws[1].has_normals && !draws[1].has_colors);
    assert_eq!(draws[1].primitive, Primitive::Lines);
    assert_eq!(draws[1].count, 44);
    assert_eq!(draws[1].fragment_color, Some(Vec4::new(0.2, 0.2, 0.2, 1.0)));
    assert!(!draws[2].has_normals && draws[2].has_colors);
    assert_eq!(draws[2].count, 6);
}

#[test]
fn test_material_binds_texture() {
    let mut recorder = Recorder::new();
    let texture = recorder.create_texture(&checkerboard(4, 2, [255; 4], [0; 4])).unwrap();
    let cylinder = Cylinder::new(&mut recorder, 8, Some(texture));
    cylinder.draw(&mut recorder, &ShaderInfo::standard(), &Mat4::IDENTITY);

    let draws = recorder.draws();
    assert_eq!(draws[0].texture, Some(texture));
    assert!(recorder.commands.contains(&Command::Int(locations::SAMPLER, 0)));
}

#[test]
fn test_mesh_library_builds_once() {
    let mut recorder = Recorder::new();
    let config = ViewerConfig::default();
    let library = MeshLibrary::new(&mut recorder, &config, &TextureSet::default());
    let uploaded = recorder.buffer_count();
    assert!(uploaded > 0);
    assert_eq!(library.wheel.tire.element_count, 6 * config.slices);
    assert_eq!(library.cylinder.buffers.element_count, 6 * config.slices);
    assert_eq!(library.grid.buffers.element_count, 4 * (config.grid.cells + 1));
}

#[test]
fn test_power_of_two_policy() {
    assert!(is_power_of_two(1));
    assert!(is_power_of_two(256));
    assert!(!is_power_of_two(0));
    assert!(!is_power_of_two(96));

    assert_eq!(UploadPolicy::for_image(&image::RgbaImage::new(64, 32)), UploadPolicy::Mipmapped);
    assert_eq!(UploadPolicy::for_image(&image::RgbaImage::new(60, 32)), UploadPolicy::ClampToEdge);
}

#[test]
fn test_mip_chain_halves_to_one_pixel() {
    let levels = mip_chain(&checkerboard(16, 4, [255; 4], [0; 4]));
    let sizes: Vec<(u32, u32)> = levels.iter().map(|level| level.dimensions()).collect();
    assert_eq!(sizes, vec![(16, 16), (8, 8), (4, 4), (2, 2), (1, 1)]);

    let wide = mip_chain(&image::RgbaImage::new(8, 2));
    let sizes: Vec<(u32, u32)> = wide.iter().map(|level| level.dimensions()).collect();
    assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
}

#[test]
fn test_checkerboard_pattern() {
    let board = checkerboard(8, 2, [255, 255, 255, 255], [0, 0, 0, 255]);
    assert_eq!(board.dimensions(), (8, 8));
    assert_eq!(board.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(board.get_pixel(4, 0).0, [0, 0, 0, 255]);
    assert_eq!(board.get_pixel(4, 4).0, [255, 255, 255, 255]);
}

#[test]
fn test_load_image_from_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("metal.png");
    checkerboard(8, 2, [10, 20, 30, 255], [40, 50, 60, 255])
        .save(file.path())
        .unwrap();

    let image = load_image(file.path()).unwrap();
    assert_eq!(image.dimensions(), (8, 8));
    assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn test_load_missing_image_reports_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    let missing = temp.child("missing.png");
    let error = load_image(missing.path()).unwrap_err();
    assert!(error.to_string().contains("missing.png"), "{error}");

    let mut recorder = Recorder::new();
    assert!(TextureSet::load(&mut recorder, Some(missing.path()), None).is_err());
}

#[test]
fn test_texture_set_falls_back_to_generated() {
    let mut recorder = Recorder::new();
    let textures = TextureSet::load(&mut recorder, None, None).unwrap();
    let metal = textures.metal.unwrap();
    let tire = textures.tire.unwrap();
    assert_ne!(metal, tire);
    assert_eq!(recorder.texture_size(metal), Some((256, 256)));
}
