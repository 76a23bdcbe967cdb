//! The per-frame step
//!
//! [`DeskScene`] owns everything that outlives a frame: the packed geometry,
//! the scene graph topology, the animation timers and the screen texture.
//! [`DeskScene::render_frame`] turns one [`InputSnapshot`] into a [`Frame`]:
//! sanitize → advance animations → traverse the graph → draw list.

use crate::gfx::animation::{AnimatedOutputs, AnimationState};
use crate::gfx::camera::{Camera, Projection};
use crate::gfx::composer::FrameState;
use crate::gfx::geometry::GeometryData;
use crate::gfx::input::InputSnapshot;
use crate::gfx::lighting::ViewLight;
use crate::gfx::models::{build_scene, PartitionTable, Pivots, SceneBuildResult};
use crate::gfx::rendering::draw::DrawList;
use crate::gfx::scene::{build_desk_graph, draw_list, DeskGraph};
use crate::gfx::texture::TextureSlot;

/// Backend-independent output of one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub commands: DrawList,
    pub background: [f32; 4],
    pub projection: Projection,
    /// Light already moved into view space
    pub light: ViewLight,
    pub animated: AnimatedOutputs,
    pub state: FrameState,
}

pub struct DeskScene {
    build: SceneBuildResult,
    graph: DeskGraph,
    animation: AnimationState,
    texture: TextureSlot,
    frames: u64,
}

impl Default for DeskScene {
    fn default() -> Self {
        Self::new()
    }
}

impl DeskScene {
    pub fn new() -> Self {
        let build = build_scene();
        let graph = build_desk_graph(&build);
        Self {
            build,
            graph,
            animation: AnimationState::new(),
            texture: TextureSlot::new(),
            frames: 0,
        }
    }

    pub fn build(&self) -> &SceneBuildResult {
        &self.build
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.build.geometry
    }

    pub fn partitions(&self) -> &PartitionTable {
        &self.build.partitions
    }

    pub fn pivots(&self) -> &Pivots {
        &self.build.pivots
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn texture(&self) -> &TextureSlot {
        &self.texture
    }

    pub fn texture_mut(&mut self) -> &mut TextureSlot {
        &mut self.texture
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Produces this frame's draw list. Never fails: bad input values fall
    /// back to their defaults.
    pub fn render_frame(&mut self, input: &InputSnapshot) -> Frame {
        let input = input.sanitized();
        let (animated_input, animated) = self.animation.step(&input);
        let state = FrameState::new(&animated_input, &animated);

        let commands = draw_list(&mut self.graph, &state);
        let light = animated_input.light.in_view_space(&state.camera.view_matrix());
        self.frames += 1;

        Frame {
            commands,
            background: animated_input.background,
            projection: animated_input.projection,
            light,
            animated,
            state,
        }
    }
}
