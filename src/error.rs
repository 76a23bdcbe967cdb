//! Error types for the deskscene crate
//!
//! The per-frame path never fails. Errors only surface at the edges: loading a
//! configuration snapshot, encoding an image, or acquiring a GPU device.

use thiserror::Error;

/// Errors raised at the crate boundary
#[derive(Debug, Error)]
pub enum SceneError {
    /// No adapter satisfies the requested capabilities. Fatal at startup.
    #[error("unsupported rendering context: {0}")]
    UnsupportedContext(String),

    #[error("failed to acquire a GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("malformed input snapshot: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("GPU readback failed: {0}")]
    Readback(String),

    /// A recorded partition points past the end of the index buffer.
    #[error("index range {start}..{end} exceeds index buffer of length {len}")]
    InvalidRange { start: u32, end: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, SceneError>;
