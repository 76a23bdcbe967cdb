// src/lib.rs
//! Desk scene renderer
//!
//! A procedurally built table, monitor and mouse, posed through anchored
//! hierarchical transforms and drawn by a CPU rasterizer or headless wgpu.

pub mod error;
pub mod gfx;
pub mod prelude;
pub mod wgpu_utils;

pub use error::{Result, SceneError};
