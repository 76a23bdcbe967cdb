use std::collections::BTreeSet;
use std::ops::Range;

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};
use rand::Rng;

use deskscene::gfx::composer::{monitor_local, screen_local, table_local, FrameState, FrameTransforms};
use deskscene::gfx::input::InputSnapshot;
use deskscene::gfx::models::{build_scene, ObjectId, SceneBuildResult};
use deskscene::gfx::rendering::draw::{line_loop_edges, triangle_edges};
use deskscene::gfx::rendering::{submit, DrawCommand, DrawMode, RenderTarget, SoftwareRenderer, Topology};
use deskscene::gfx::scene::{build_desk_graph, draw_list};
use deskscene::gfx::transform::transform_point;
use deskscene::gfx::DeskScene;

fn assert_close(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "{} != {} (eps {})", a, b, eps);
}

fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>, eps: f32) {
    assert!((a - b).magnitude() <= eps, "{:?} != {:?} (eps {})", a, b, eps);
}

/// Table-to-screen chain without the camera
fn screen_world(scene: &SceneBuildResult, snapshot: &InputSnapshot) -> Matrix4<f32> {
    let state = FrameState::at_rest(snapshot);
    table_local(&state, &scene.pivots)
        * monitor_local(&state, &scene.pivots)
        * screen_local(&state, &scene.pivots)
}

fn vertices_of(scene: &SceneBuildResult, object: ObjectId) -> Vec<Vector3<f32>> {
    let range = scene.partitions.get(object).unwrap_or_default();
    let unique: BTreeSet<u32> = scene.geometry.indices[range.start as usize..range.end() as usize]
        .iter()
        .copied()
        .collect();
    unique
        .into_iter()
        .map(|i| Vector3::from(scene.geometry.positions[i as usize]))
        .collect()
}

#[test]
fn doubling_the_table_scales_the_hinge_offset_and_keeps_the_bezel_shape() {
    let scene = build_scene();
    let anchor = scene.pivots.table.scale_anchor;
    let hinge = scene.pivots.monitor.hinge;

    let mut snapshot = InputSnapshot::default();
    snapshot.monitor.position = [0.0, 0.0, 0.0];
    snapshot.monitor.scale = 1.0;
    snapshot.monitor.tilt = 0.0;

    snapshot.table.scale = 1.0;
    let unit = screen_world(&scene, &snapshot);
    snapshot.table.scale = 2.0;
    let doubled = screen_world(&scene, &snapshot);

    let hinge_unit = transform_point(&unit, hinge);
    let hinge_doubled = transform_point(&doubled, hinge);
    assert_vec_close(hinge_doubled - anchor, (hinge_unit - anchor) * 2.0, 1e-5);

    for object in [ObjectId::MonitorScreen, ObjectId::ScreenPanel] {
        for v in vertices_of(&scene, object) {
            let d_unit = (transform_point(&unit, v) - hinge_unit).magnitude();
            let d_doubled = (transform_point(&doubled, v) - hinge_doubled).magnitude();
            assert_close(d_doubled, 2.0 * d_unit, 1e-4);
        }
    }
}

#[test]
fn tilt_leaves_the_hinge_in_place_for_random_poses() {
    let scene = build_scene();
    let hinge = scene.pivots.monitor.hinge;
    let mut rng = rand::rng();

    for _ in 0..50 {
        let mut snapshot = InputSnapshot::default();
        snapshot.table.scale = rng.random_range(0.5..2.0);
        snapshot.monitor.scale = rng.random_range(0.5..2.0);
        snapshot.monitor.rotation = [0.0, rng.random_range(-180.0..180.0), 0.0];
        snapshot.monitor.tilt = 0.0;
        let flat = transform_point(&screen_world(&scene, &snapshot), hinge);

        snapshot.monitor.tilt = rng.random_range(-45.0..45.0);
        let tilted = transform_point(&screen_world(&scene, &snapshot), hinge);
        assert_vec_close(flat, tilted, 1e-4);
    }
}

#[test]
fn traversal_emits_drawables_depth_first() {
    let scene = build_scene();
    let mut graph = build_desk_graph(&scene);
    let list = draw_list(&mut graph, &FrameState::at_rest(&InputSnapshot::default()));
    let order: Vec<ObjectId> = list.iter().map(|c| c.object).collect();
    assert_eq!(
        order,
        vec![
            ObjectId::Table,
            ObjectId::MonitorStand,
            ObjectId::MonitorScreen,
            ObjectId::ScreenPanel,
            ObjectId::MouseBase,
            ObjectId::MouseBody,
            ObjectId::MousePalm,
            ObjectId::MouseLeftButton,
            ObjectId::MouseRightButton,
            ObjectId::MouseWheel,
        ]
    );
}

#[test]
fn graph_and_composer_agree_for_random_inputs() {
    let scene = build_scene();
    let mut graph = build_desk_graph(&scene);
    let mut rng = rand::rng();

    for _ in 0..25 {
        let mut snapshot = InputSnapshot::default();
        snapshot.table.position = [rng.random_range(-1.0..1.0), 0.0, rng.random_range(-1.0..1.0)];
        snapshot.table.scale = rng.random_range(0.5..1.5);
        snapshot.monitor.rotation = [
            rng.random_range(-30.0..30.0),
            rng.random_range(-180.0..180.0),
            rng.random_range(-30.0..30.0),
        ];
        snapshot.monitor.scale = rng.random_range(0.5..1.5);
        snapshot.monitor.tilt = rng.random_range(-30.0..30.0);
        snapshot.mouse.scale = rng.random_range(0.5..1.5);

        let mut state = FrameState::at_rest(&snapshot);
        state.left_press = rng.random_range(0.0..0.004);
        state.right_press = rng.random_range(0.0..0.004);
        state.wheel_angle = rng.random_range(0.0..360.0);

        let expected = FrameTransforms::compose(&state, &scene.pivots);
        for command in draw_list(&mut graph, &state) {
            let got: &[f32; 16] = command.model_view.as_ref();
            let want = expected.model_view(command.object);
            let want: &[f32; 16] = want.as_ref();
            for (g, w) in got.iter().zip(want.iter()) {
                assert_close(*g, *w, 1e-4);
            }
        }
    }
}

#[derive(Default)]
struct EdgeCollector {
    indices: Vec<u32>,
    edges: BTreeSet<(u32, u32)>,
    loops: usize,
}

impl RenderTarget for EdgeCollector {
    fn bind(&mut self, _command: &DrawCommand) {}

    fn draw_elements(&mut self, topology: Topology, range: Range<u32>) {
        assert_eq!(topology, Topology::LineLoop);
        assert_eq!(range.len(), 3);
        let slice = &self.indices[range.start as usize..range.end as usize];
        self.edges.extend(line_loop_edges(slice));
        self.loops += 1;
    }
}

#[test]
fn wireframe_outlines_every_triangle_edge() {
    let scene = build_scene();
    for object in ObjectId::DRAWABLES {
        let range = scene.partitions.get(object).unwrap_or_default();
        let command = DrawCommand {
            object,
            model_view: Matrix4::identity(),
            normal_matrix: cgmath::Matrix3::identity(),
            range,
            mode: DrawMode::Wireframe,
            textured: false,
        };
        let mut collector = EdgeCollector {
            indices: scene.geometry.indices.clone(),
            ..Default::default()
        };
        submit(&[command], &mut collector);

        let expected = triangle_edges(&scene.geometry.indices, range);
        assert!(collector.edges.is_superset(&expected), "{} is missing edges", object);
        assert_eq!(collector.loops as u32, range.count / 3);
    }
}

#[test]
fn partial_json_only_overrides_named_fields() {
    let json = r#"{
        "table": { "scale": 2.0 },
        "monitor": { "tilt": -10 },
        "projection": { "mode": "orthographic", "left": -2, "right": 2, "bottom": -1.5, "top": 1.5, "near": 0.1, "far": 20 },
        "animation": { "enabled": true, "preset": "slide_mouse" },
        "wireframe": true
    }"#;
    let snapshot = match InputSnapshot::from_json_str(json) {
        Ok(snapshot) => snapshot,
        Err(e) => panic!("config should parse: {}", e),
    };
    let defaults = InputSnapshot::default();

    assert_eq!(snapshot.table.scale, 2.0);
    assert_eq!(snapshot.table.position, defaults.table.position);
    assert_eq!(snapshot.monitor.tilt, -10.0);
    assert_eq!(snapshot.monitor.scale, 1.0);
    assert_eq!(snapshot.mouse, defaults.mouse);
    assert!(snapshot.wireframe);
    assert!(snapshot.animation.enabled);
    assert_eq!(snapshot.background, [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = InputSnapshot::from_json_str("{ \"table\": ").err();
    assert!(matches!(err, Some(deskscene::SceneError::Config(_))));
}

#[test]
fn animated_frames_render_without_gaps_in_the_draw_list() {
    let mut scene = DeskScene::new();
    let mut renderer = SoftwareRenderer::new(96, 72);
    let mut input = InputSnapshot::default();
    input.animation.enabled = true;
    input.animation.preset = deskscene::gfx::animation::AnimationPreset::AllCombined;
    input.triggers.press_left = true;
    input.triggers.scroll = true;

    for i in 0..30 {
        let frame = scene.render_frame(&input);
        input.triggers = Default::default();
        assert_eq!(frame.commands.len(), ObjectId::DRAWABLES.len(), "frame {}", i);
        let stats = renderer.render(&frame, scene.geometry(), scene.texture());
        assert!(stats.triangles > 0);
    }
    assert!(scene.animation().time() > 0.0);
}
