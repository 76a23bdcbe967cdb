//! # Scene Graph Module
//!
//! The left-child / right-sibling scene graph, the desk topology built on it,
//! and the GPU vertex layout.
//!
//! ## Usage
//!
//! ```no_run
//! use deskscene::gfx::composer::FrameState;
//! use deskscene::gfx::input::InputSnapshot;
//! use deskscene::gfx::models::build_scene;
//! use deskscene::gfx::scene::{build_desk_graph, draw_list};
//!
//! let scene = build_scene();
//! let mut graph = build_desk_graph(&scene);
//! let state = FrameState::at_rest(&InputSnapshot::default());
//! for command in draw_list(&mut graph, &state) {
//!     println!("{} -> {:?}", command.object, command.range);
//! }
//! ```

pub mod desk;
pub mod graph;
pub mod vertex;

// Re-export main types
pub use desk::{build_desk_graph, draw_list, DeskGraph};
pub use graph::{NodeId, NodeStage, SceneGraph, SceneNode};
pub use vertex::Vertex3D;
