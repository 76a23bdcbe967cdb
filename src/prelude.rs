//! # Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use deskscene::prelude::*;
//!
//! let mut scene = DeskScene::new();
//! let mut input = InputSnapshot::default();
//! input.triggers.press_left = true;
//! let frame = scene.render_frame(&input);
//! assert_eq!(frame.commands.len(), ObjectId::DRAWABLES.len());
//! ```

pub use crate::error::{Result, SceneError};

pub use crate::gfx::animation::{AnimatedOutputs, AnimationPreset, AnimationState};
pub use crate::gfx::camera::{Camera, CameraParams, OrbitCamera, Projection};
pub use crate::gfx::composer::{FrameState, FrameTransforms};
pub use crate::gfx::frame::{DeskScene, Frame};
pub use crate::gfx::geometry::{GeometryData, IndexRange};
pub use crate::gfx::input::InputSnapshot;
pub use crate::gfx::lighting::LightParams;
pub use crate::gfx::models::{build_scene, ObjectId, PartitionTable, Pivots, SceneBuildResult};
pub use crate::gfx::rendering::{
    DrawCommand, DrawList, DrawMode, GpuContext, GpuRenderer, RenderTarget, SoftwareRenderer,
    Topology,
};
pub use crate::gfx::scene::{build_desk_graph, draw_list, DeskGraph, SceneGraph};
pub use crate::gfx::texture::TextureSlot;

pub use cgmath::{Deg, Matrix4, Vector3};
