//! Look-at camera parameters and projection modes

use cgmath::{perspective, ortho, Deg, Matrix4, Point3, SquareMatrix, Vector3};
use serde::{Deserialize, Serialize};

/// Maps OpenGL clip depth `[-1, 1]` to wgpu's `[0, 1]`: `z' = 0.5·z + 0.5·w`.
/// Arguments are column-major, so the offset lives in the last column.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub trait Camera {
    fn view_matrix(&self) -> Matrix4<f32>;
}

/// Eye / at / up triple, as read from the camera sliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub eye: [f32; 3],
    pub at: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            eye: [0.0, 1.2, 3.2],
            at: [0.0, 0.4, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl Camera for CameraParams {
    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from(self.eye),
            Point3::from(self.at),
            Vector3::from(self.up),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn is_finite(&self) -> bool {
        match *self {
            Projection::Perspective { fov, near, far } => {
                fov.is_finite() && near.is_finite() && far.is_finite()
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => [left, right, bottom, top, near, far]
                .iter()
                .all(|v| v.is_finite()),
        }
    }

    /// OpenGL-convention projection (clip depth in `[-1, 1]`).
    ///
    /// `aspect` only feeds the perspective frustum; the orthographic box is
    /// used exactly as given.
    pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
        match *self {
            Projection::Perspective { fov, near, far } => perspective(Deg(fov), aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => ortho(left, right, bottom, top, near, far),
        }
    }

    /// Same projection with wgpu's depth range
    pub fn wgpu_matrix(&self, aspect: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.matrix(aspect)
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            projection: Matrix4::identity().into(),
        }
    }
}

impl CameraUniform {
    pub fn new(projection: &Projection, aspect: f32) -> Self {
        Self {
            projection: projection.wgpu_matrix(aspect).into(),
        }
    }
}
