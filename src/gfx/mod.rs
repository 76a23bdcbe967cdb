//! # Graphics Module
//!
//! Everything needed to turn an input snapshot into pixels.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`], [`models`]) - Procedural primitives packed into
//!   one shared vertex/index buffer, partitioned per object, with pivots
//! - **Transforms** ([`transform`], [`composer`]) - Anchored transforms and the
//!   per-object local matrices
//! - **Scene Graph** ([`scene`]) - Left-child / right-sibling hierarchy whose
//!   traversal emits draw commands
//! - **Animation** ([`animation`]) - Button press, wheel scroll and presets
//! - **Rendering** ([`rendering`]) - Software rasterizer and headless wgpu
//!
//! ## Usage
//!
//! ```no_run
//! use deskscene::gfx::{DeskScene, InputSnapshot, SoftwareRenderer};
//!
//! let mut scene = DeskScene::new();
//! let mut renderer = SoftwareRenderer::new(640, 480);
//! let frame = scene.render_frame(&InputSnapshot::default());
//! renderer.render(&frame, scene.geometry(), scene.texture());
//! ```

pub mod animation;
pub mod camera;
pub mod composer;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod models;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use frame::{DeskScene, Frame};
pub use input::InputSnapshot;
pub use rendering::{GpuRenderer, SoftwareRenderer};
