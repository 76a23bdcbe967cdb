//! Desk scene topology
//!
//! ```text
//! View
//! └─ Table*
//!    ├─ Monitor
//!    │  ├─ MonitorStand*
//!    │  └─ Screen
//!    │     ├─ MonitorScreen*
//!    │     └─ ScreenPanel*
//!    └─ Mouse
//!       ├─ MouseBase*  MouseBody*  MousePalm*
//!       ├─ MouseLeftButton*  MouseRightButton*
//!       └─ MouseWheel*
//! ```
//!
//! Starred nodes emit a [`DrawCommand`]; the rest only group.

use cgmath::{Matrix4, SquareMatrix};

use super::graph::{NodeId, SceneGraph};
use crate::gfx::composer::{
    button_local, mouse_local, monitor_local, screen_local, table_local, view_local, wheel_local,
    FrameState,
};
use crate::gfx::geometry::IndexRange;
use crate::gfx::models::{ObjectId, Pivots, SceneBuildResult};
use crate::gfx::rendering::draw::{DrawCommand, DrawList, DrawMode};
use crate::gfx::transform::normal_matrix;

pub type DeskGraph = SceneGraph<FrameState, DrawList>;

fn emit(object: ObjectId, range: IndexRange) -> impl Fn(&Matrix4<f32>, &FrameState, &mut DrawList) {
    move |world, state, out| {
        out.push(DrawCommand {
            object,
            model_view: *world,
            normal_matrix: normal_matrix(world),
            range,
            mode: if state.wireframe {
                DrawMode::Wireframe
            } else {
                DrawMode::Triangles
            },
            textured: object.is_textured(),
        })
    }
}

fn identity(_: &FrameState) -> Matrix4<f32> {
    Matrix4::identity()
}

struct Builder<'a> {
    graph: DeskGraph,
    scene: &'a SceneBuildResult,
}

impl Builder<'_> {
    fn drawable(
        &mut self,
        parent: NodeId,
        object: ObjectId,
        transform: impl Fn(&FrameState) -> Matrix4<f32> + 'static,
    ) -> NodeId {
        // Every drawable is recorded by its assembler; a missing one draws
        // nothing rather than failing the frame.
        let range = self.scene.partitions.get(object).unwrap_or_default();
        self.graph
            .add_drawable(Some(parent), object.name(), transform, emit(object, range))
    }

    fn group(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        transform: impl Fn(&FrameState) -> Matrix4<f32> + 'static,
    ) -> NodeId {
        self.graph.add_group(parent, name, transform)
    }
}

/// Builds the static desk topology over the partitions of `scene`
pub fn build_desk_graph(scene: &SceneBuildResult) -> DeskGraph {
    let pivots: Pivots = scene.pivots;
    let mut b = Builder {
        graph: SceneGraph::new(),
        scene,
    };

    let view = b.group(None, "View", view_local);

    let table = b.drawable(view, ObjectId::Table, move |s| table_local(s, &pivots));

    let monitor = b.group(Some(table), ObjectId::Monitor.name(), move |s| {
        monitor_local(s, &pivots)
    });
    b.drawable(monitor, ObjectId::MonitorStand, identity);
    let screen = b.group(Some(monitor), "Screen", move |s| screen_local(s, &pivots));
    b.drawable(screen, ObjectId::MonitorScreen, identity);
    b.drawable(screen, ObjectId::ScreenPanel, identity);

    let mouse = b.group(Some(table), ObjectId::Mouse.name(), move |s| {
        mouse_local(s, &pivots)
    });
    b.drawable(mouse, ObjectId::MouseBase, identity);
    b.drawable(mouse, ObjectId::MouseBody, identity);
    b.drawable(mouse, ObjectId::MousePalm, identity);
    b.drawable(mouse, ObjectId::MouseLeftButton, move |s| {
        button_local(pivots.mouse.left_button, s.left_press)
    });
    b.drawable(mouse, ObjectId::MouseRightButton, move |s| {
        button_local(pivots.mouse.right_button, s.right_press)
    });
    b.drawable(mouse, ObjectId::MouseWheel, move |s| wheel_local(s, &pivots));

    log::debug!("Desk scene graph built with {} nodes", b.graph.len());
    b.graph
}

/// Runs one traversal and returns the frame's draw list
pub fn draw_list(graph: &mut DeskGraph, state: &FrameState) -> DrawList {
    let mut out = DrawList::with_capacity(ObjectId::DRAWABLES.len());
    graph.traverse(state, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::composer::FrameTransforms;
    use crate::gfx::input::InputSnapshot;
    use crate::gfx::models::build_scene;
    use crate::gfx::transform::test_util::assert_mat_close;

    #[test]
    fn test_every_drawable_is_emitted_once() {
        let scene = build_scene();
        let mut graph = build_desk_graph(&scene);
        let state = FrameState::at_rest(&InputSnapshot::default());
        let list = draw_list(&mut graph, &state);

        let mut objects: Vec<_> = list.iter().map(|c| c.object).collect();
        objects.sort();
        let mut expected = ObjectId::DRAWABLES.to_vec();
        expected.sort();
        assert_eq!(objects, expected);

        for command in &list {
            assert_eq!(Some(command.range), scene.partitions.get(command.object));
            assert_eq!(command.textured, command.object == ObjectId::ScreenPanel);
        }
    }

    #[test]
    fn test_graph_matches_hand_chained_composer() {
        let scene = build_scene();
        let mut graph = build_desk_graph(&scene);

        let mut snapshot = InputSnapshot::default();
        snapshot.table.scale = 1.3;
        snapshot.monitor.rotation = [5.0, 30.0, -10.0];
        snapshot.monitor.tilt = -12.0;
        snapshot.mouse.scale = 0.8;
        let mut state = FrameState::at_rest(&snapshot);
        state.left_press = 0.003;
        state.wheel_angle = 200.0;

        let expected = FrameTransforms::compose(&state, &scene.pivots);
        for command in draw_list(&mut graph, &state) {
            assert_mat_close(&command.model_view, &expected.model_view(command.object), 1e-5);
        }
    }

    #[test]
    fn test_wireframe_flag_switches_mode() {
        let scene = build_scene();
        let mut graph = build_desk_graph(&scene);
        let mut snapshot = InputSnapshot::default();
        snapshot.wireframe = true;
        let list = draw_list(&mut graph, &FrameState::at_rest(&snapshot));
        assert!(list.iter().all(|c| c.mode == DrawMode::Wireframe));
    }
}
