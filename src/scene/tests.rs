use super::*;
use crate::config::{ScooterVariant, ViewerConfig};
use crate::graphics::{locations, Command, Primitive, Recorder, ShaderInfo};
use crate::model::{MeshLibrary, TextureSet};
use approx::assert_relative_eq;
use glam::Mat4;
use winit::keyboard::KeyCode;

const VARIANTS: [ScooterVariant; 3] = [
    ScooterVariant::Minimal,
    ScooterVariant::Textured,
    ScooterVariant::Cached,
];

struct TestContext {
    recorder: Recorder,
    renderer: SceneRenderer,
    scene: Scene,
}

impl TestContext {
    fn new(config: ViewerConfig) -> Self {
        let mut recorder = Recorder::new();
        let textures = if config.variant.is_textured() {
            TextureSet::load(&mut recorder, None, None).unwrap()
        } else {
            TextureSet::default()
        };
        let shader = if config.variant.is_lit() {
            ShaderInfo::standard()
        } else {
            ShaderInfo::standard().without_normals()
        };
        let meshes = MeshLibrary::new(&mut recorder, &config, &textures);
        let renderer = SceneRenderer::new(shader, meshes, &config);
        let scene = Scene::new(Camera::new(config.width, config.height), config.animation_steps());
        recorder.clear_commands();

        Self {
            recorder,
            renderer,
            scene,
        }
    }

    fn variant(variant: ScooterVariant) -> Self {
        Self::new(ViewerConfig {
            variant,
            ..ViewerConfig::default()
        })
    }

    fn frame(&mut self, keys: &KeyState) -> FrameStats {
        self.scene.update(keys);
        self.renderer.render(&mut self.recorder, &self.scene).unwrap()
    }
}

#[test]
fn test_steer_right_once_then_saturate() {
    let mut ctx = TestContext::variant(ScooterVariant::Textured);
    assert_eq!(ctx.scene.animation, AnimationState::new());

    let right = KeyState::from_keys([KeyCode::ArrowRight]);
    ctx.frame(&right);
    assert_relative_eq!(ctx.scene.animation.steering_angle, 2.0);
    assert_eq!(ctx.scene.animation.wheel_rotation, 0.0);

    for _ in 0..100 {
        ctx.frame(&right);
        assert!(ctx.scene.animation.steering_angle <= animation::MAX_STEERING_ANGLE);
    }
    assert_eq!(ctx.scene.animation.steering_angle, 45.0);

    ctx.frame(&right);
    assert_eq!(ctx.scene.animation.steering_angle, 45.0);
}

#[test]
fn test_minimal_variant_steers_in_coarse_steps() {
    let mut ctx = TestContext::variant(ScooterVariant::Minimal);
    let left = KeyState::from_keys([KeyCode::ArrowLeft]);
    ctx.frame(&left);
    assert_eq!(ctx.scene.animation.steering_angle, -22.5);
    ctx.frame(&left);
    ctx.frame(&left);
    assert_eq!(ctx.scene.animation.steering_angle, -45.0);
}

#[test_log::test]
fn test_stack_is_empty_after_traversal_for_every_variant() {
    for variant in VARIANTS {
        let mut ctx = TestContext::variant(variant);
        let keys = KeyState::from_keys([KeyCode::ArrowRight, KeyCode::KeyF]);
        for _ in 0..3 {
            let stats = ctx.frame(&keys);
            assert!(ctx.renderer.stack.is_empty(), "{:?}", variant);
            assert_eq!(stats.parts, ctx.renderer.scooter.part_count());
            assert!(stats.max_stack_depth >= 3);
        }
        assert_eq!(ctx.recorder.frame_count(), 3);
    }
}

#[test]
fn test_traversal_agrees_with_world_matrices() {
    for variant in VARIANTS {
        let mut ctx = TestContext::variant(variant);
        ctx.scene.animation = AnimationState {
            wheel_rotation: 0.0,
            steering_angle: 30.0,
        };
        ctx.renderer.render(&mut ctx.recorder, &ctx.scene).unwrap();

        let scooter = &ctx.renderer.scooter;
        let mut expected = Vec::new();
        for (index, model) in scooter.part_matrices(&ctx.scene.animation) {
            expected.push(model);
            if scooter.node(index).mesh == Some(PartMesh::Wheel) {
                // Rims are drawn with the unspun part matrix.
                expected.push(model);
            }
        }

        // The first draw is the ground grid.
        let draws = ctx.recorder.draws();
        assert_eq!(draws.len(), expected.len() + 1);
        for (draw, model) in draws[1..].iter().zip(&expected) {
            let actual = draw.model.unwrap().to_cols_array();
            for (a, b) in actual.iter().zip(model.to_cols_array().iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn test_draw_counts_per_variant() {
    // Grid, then one draw per part plus one extra per wheel for the rims.
    let cases = [
        (ScooterVariant::Minimal, 1 + 3 + 4),
        (ScooterVariant::Textured, 1 + 7 + 4),
        (ScooterVariant::Cached, 1 + 7 + 4),
    ];
    for (variant, draws) in cases {
        let mut ctx = TestContext::variant(variant);
        ctx.frame(&KeyState::new());
        assert_eq!(ctx.recorder.draws().len(), draws, "{:?}", variant);
    }

    let mut ctx = TestContext::new(ViewerConfig {
        show_axes: true,
        ..ViewerConfig::default()
    });
    ctx.frame(&KeyState::new());
    let draws = ctx.recorder.draws();
    assert_eq!(draws.len(), 13);
    assert_eq!(draws[1].primitive, Primitive::Lines);
    assert!(draws[1].has_colors && !draws[1].indexed);
}

#[test]
fn test_frame_uniforms_are_set_once_per_frame() {
    let mut ctx = TestContext::variant(ScooterVariant::Textured);
    ctx.frame(&KeyState::new());
    ctx.frame(&KeyState::from_keys([KeyCode::KeyA]));

    let count = |location| {
        ctx.recorder
            .commands
            .iter()
            .filter(|command| match command {
                Command::Matrix4(l, _) | Command::Vec3(l, _) => *l == location,
                _ => false,
            })
            .count()
    };
    assert_eq!(count(locations::VIEW_MATRIX), 2);
    assert_eq!(count(locations::PROJECTION_MATRIX), 2);
    assert_eq!(count(locations::AMBIENT_LIGHT), 2);
    assert_eq!(count(locations::POINT_LIGHT_POS), 2);

    // Uniforms come before the first draw of the frame.
    let first_draw = ctx
        .recorder
        .commands
        .iter()
        .position(|command| matches!(command, Command::DrawArrays(..) | Command::DrawIndexed(..)))
        .unwrap();
    let view = ctx
        .recorder
        .commands
        .iter()
        .position(|command| matches!(command, Command::Matrix4(l, _) if *l == locations::VIEW_MATRIX))
        .unwrap();
    assert!(view < first_draw);
}

#[test]
fn test_minimal_variant_is_unlit() {
    let mut ctx = TestContext::variant(ScooterVariant::Minimal);
    ctx.frame(&KeyState::new());
    for draw in ctx.recorder.draws() {
        assert_eq!(draw.normal, None);
        assert!(!draw.has_normals);
        assert_eq!(draw.texture, None);
    }
    assert!(!ctx.recorder.commands.iter().any(|command| matches!(
        command,
        Command::Matrix4(l, _) if *l == locations::NORMAL_MATRIX
    )));
}

#[test]
fn test_lit_variants_upload_inverse_transpose() {
    let mut ctx = TestContext::variant(ScooterVariant::Cached);
    ctx.frame(&KeyState::new());
    let draws = ctx.recorder.draws();
    let deck = &draws[1];
    let model = deck.model.unwrap();
    assert_eq!(deck.normal, Some(model.inverse().transpose()));
    assert_ne!(deck.normal, Some(model));
    assert!(deck.has_normals);
    assert_eq!(deck.texture, None);
}

#[test]
fn test_textured_variant_binds_textures() {
    let mut ctx = TestContext::variant(ScooterVariant::Textured);
    ctx.frame(&KeyState::new());
    let draws = ctx.recorder.draws();
    assert_eq!(draws[0].texture, None);
    let textured = draws.iter().filter(|draw| draw.texture.is_some()).count();
    // Deck, column, bar, two handles, two arms and both tires.
    assert_eq!(textured, 9);
}

#[test]
fn test_wheels_spin_about_their_axle() {
    let mut ctx = TestContext::variant(ScooterVariant::Cached);
    ctx.scene.animation.wheel_rotation = 30.0;
    ctx.renderer.render(&mut ctx.recorder, &ctx.scene).unwrap();

    let scooter = &ctx.renderer.scooter;
    let rear = scooter.find("rear wheel").unwrap();
    let (_, unspun) = scooter
        .part_matrices(&ctx.scene.animation)
        .into_iter()
        .find(|(index, _)| *index == rear)
        .unwrap();
    let spun = unspun * Mat4::from_rotation_y(30f32.to_radians());

    let draws = ctx.recorder.draws();
    let tire = &draws[draws.len() - 2];
    let rims = &draws[draws.len() - 1];
    assert_eq!(tire.model, Some(spun));
    assert_eq!(rims.model, Some(unspun));

    // The hub stays put while the wheel spins.
    let hub = spun.transform_point3(glam::Vec3::ZERO);
    let still = unspun.transform_point3(glam::Vec3::ZERO);
    assert_relative_eq!(hub.x, still.x, epsilon = 1e-6);
    assert_relative_eq!(hub.y, still.y, epsilon = 1e-6);
}

#[test]
fn test_unbalanced_stack_fails_the_frame() {
    let mut ctx = TestContext::variant(ScooterVariant::Textured);
    ctx.renderer.stack.push(Mat4::IDENTITY);
    let error = ctx.renderer.render(&mut ctx.recorder, &ctx.scene).unwrap_err();
    assert!(error.to_string().contains("depth 1"));
}

#[test]
fn test_draw_scooter_leaves_caller_frames_alone() {
    let mut recorder = Recorder::new();
    let config = ViewerConfig::default();
    let meshes = MeshLibrary::new(&mut recorder, &config, &TextureSet::default());
    let scooter = ScooterModel::new(ScooterVariant::Cached);
    let mut stack = TransformStack::new();
    let base = Mat4::from_translation(glam::Vec3::X);
    stack.push(base);

    let stats = draw_scooter(
        &mut recorder,
        &ShaderInfo::standard(),
        &meshes,
        &scooter,
        &AnimationState::new(),
        &mut stack,
    )
    .unwrap();
    assert_eq!(stats.parts, 9);
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.peek().unwrap(), base);
}

#[test]
fn test_missing_locations_draw_without_uniforms() {
    let mut recorder = Recorder::new();
    let config = ViewerConfig::default();
    let meshes = MeshLibrary::new(&mut recorder, &config, &TextureSet::default());
    let mut renderer = SceneRenderer::new(ShaderInfo::default(), meshes, &config);
    let scene = Scene::new(Camera::new(10, 10), config.animation_steps());
    recorder.clear_commands();

    renderer.render(&mut recorder, &scene).unwrap();
    assert!(recorder.commands.iter().all(|command| matches!(
        command,
        Command::BeginFrame(_)
            | Command::EndFrame
            | Command::BindIndexBuffer(_)
            | Command::DrawIndexed(..)
            | Command::DrawArrays(..)
    )));
    assert_eq!(recorder.draws().len(), 12);
}

#[test]
fn test_camera_orbit_through_scene_keeps_distance() {
    let mut ctx = TestContext::variant(ScooterVariant::Textured);
    let start = ctx.scene.camera.distance();
    let keys = KeyState::from_keys([KeyCode::KeyA, KeyCode::KeyW]);
    for _ in 0..20 {
        ctx.frame(&keys);
    }
    assert_relative_eq!(ctx.scene.camera.distance(), start, epsilon = 1e-3);

    ctx.frame(&KeyState::from_keys([KeyCode::KeyV]));
    assert_relative_eq!(ctx.scene.camera.distance(), start * 1.05, epsilon = 1e-3);
    assert_eq!(
        ctx.scene.camera.view_matrix(),
        Mat4::look_at_rh(ctx.scene.camera.position, ctx.scene.camera.look_at, ctx.scene.camera.up)
    );
}

#[test]
fn test_resize_updates_projection() {
    let mut ctx = TestContext::variant(ScooterVariant::Cached);
    let before = ctx.scene.camera.projection_matrix();
    ctx.scene.resize(400, 800);
    assert_ne!(ctx.scene.camera.projection_matrix(), before);
    assert_relative_eq!(ctx.scene.camera.aspect(), 0.5);

    ctx.scene.resize(0, 800);
    assert_relative_eq!(ctx.scene.camera.aspect(), 0.5);
}

#[test]
fn test_lighting_setters_clamp() {
    let mut scene = Scene::new(Camera::new(4, 4), AnimationSteps::default());
    scene.set_ambient_light(2.0);
    assert_eq!(scene.lighting.ambient, glam::Vec3::ONE);

    scene.set_directional_light(glam::Vec3::new(0.5, 3.0, -1.0), glam::Vec3::new(0.0, -2.0, 0.0));
    assert_eq!(scene.lighting.directional_color, glam::Vec3::new(0.5, 1.0, 0.0));
    assert_eq!(scene.lighting.directional_direction, glam::Vec3::NEG_Y);

    scene.set_point_light(glam::Vec3::new(1.0, 2.0, 3.0), glam::Vec3::splat(0.5));
    assert_eq!(scene.lighting.point_position, glam::Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_default_lighting() {
    let lighting = Lighting::default();
    assert_eq!(lighting.ambient, glam::Vec3::splat(0.3));
    assert_relative_eq!(lighting.directional_direction.length(), 1.0, epsilon = 1e-6);
    assert_eq!(lighting.point_position, glam::Vec3::new(5.0, 10.0, 5.0));
}

#[test]
fn test_grid_sits_below_the_scooter() {
    let mut ctx = TestContext::variant(ScooterVariant::Textured);
    ctx.frame(&KeyState::new());
    let draws = ctx.recorder.draws();
    let grid = &draws[0];
    assert_eq!(grid.primitive, Primitive::Lines);
    assert_eq!(grid.model, Some(Mat4::from_translation(glam::Vec3::new(0.0, -0.5, 0.0))));
    assert!(!grid.has_normals);
    assert!(ctx.recorder.commands.contains(&Command::BeginFrame([0.9, 0.9, 0.9, 1.0])));
}
