// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Backend-independent draw commands plus the two backends that consume
//! them: a CPU rasterizer and a headless wgpu renderer.

pub mod draw;
pub mod gpu;
pub mod software;

// Re-export main types
pub use draw::{submit, DrawCommand, DrawList, DrawMode, RenderTarget, Topology};
pub use gpu::{GpuContext, GpuRenderer};
pub use software::{RasterStats, SoftwareRenderer};
