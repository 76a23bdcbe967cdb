//! # Transform Composer
//!
//! Per-edge local transforms of the desk hierarchy and the hand-chained
//! composition of them into one model-view matrix per drawable:
//!
//! ```text
//! view
//! └─ table        T(pos) · S@surface
//!    ├─ monitor   T(pos) · S@foot · Rz·Ry·Rx
//!    │  └─ screen Rx(tilt)@hinge
//!    └─ mouse     T(pos) · S@base · Ry(180°) · Ry(15°)
//!       ├─ left / right button  T(0, -press, 0)@button
//!       └─ wheel                Rx(angle)@axle
//! ```
//!
//! The local functions are shared with the scene graph in
//! [`crate::gfx::scene::desk`], so both paths produce the same matrices.

use cgmath::{Deg, Matrix3, Matrix4, Vector3};

use crate::gfx::animation::AnimatedOutputs;
use crate::gfx::camera::{Camera, CameraParams};
use crate::gfx::input::{InputSnapshot, MonitorParams, MouseParams, TableParams};
use crate::gfx::models::{ObjectId, Pivots};
use crate::gfx::transform::{
    anchored_rotation_x, anchored_scale, anchored_translation, euler_rotation, normal_matrix,
};

/// Fixed mouse orientation: turned around, then angled toward the monitor
pub const MOUSE_FLIP_DEG: f32 = 180.0;
pub const MOUSE_YAW_DEG: f32 = 15.0;

/// Everything the composer reads for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub camera: CameraParams,
    pub table: TableParams,
    pub monitor: MonitorParams,
    pub mouse: MouseParams,
    pub left_press: f32,
    pub right_press: f32,
    /// Wheel spin in degrees
    pub wheel_angle: f32,
    pub wireframe: bool,
}

impl FrameState {
    /// Combines the (already animated) snapshot with this frame's timer
    /// values
    pub fn new(snapshot: &InputSnapshot, animated: &AnimatedOutputs) -> Self {
        Self {
            camera: snapshot.camera,
            table: snapshot.table,
            monitor: snapshot.monitor,
            mouse: snapshot.mouse,
            left_press: animated.left_press,
            right_press: animated.right_press,
            wheel_angle: animated.wheel_angle,
            wireframe: snapshot.wireframe,
        }
    }

    pub fn at_rest(snapshot: &InputSnapshot) -> Self {
        Self::new(snapshot, &AnimatedOutputs::default())
    }
}

pub fn view_local(state: &FrameState) -> Matrix4<f32> {
    state.camera.view_matrix()
}

pub fn table_local(state: &FrameState, pivots: &Pivots) -> Matrix4<f32> {
    Matrix4::from_translation(state.table.position.into())
        * anchored_scale(pivots.table.scale_anchor, state.table.scale)
}

pub fn monitor_local(state: &FrameState, pivots: &Pivots) -> Matrix4<f32> {
    Matrix4::from_translation(state.monitor.position.into())
        * anchored_scale(pivots.monitor.foot, state.monitor.scale)
        * euler_rotation(state.monitor.rotation)
}

/// Positive tilt swings the top of the screen toward the viewer
pub fn screen_local(state: &FrameState, pivots: &Pivots) -> Matrix4<f32> {
    anchored_rotation_x(pivots.monitor.hinge, Deg(state.monitor.tilt))
}

pub fn mouse_local(state: &FrameState, pivots: &Pivots) -> Matrix4<f32> {
    Matrix4::from_translation(state.mouse.position.into())
        * anchored_scale(pivots.mouse.base, state.mouse.scale)
        * Matrix4::from_angle_y(Deg(MOUSE_FLIP_DEG))
        * Matrix4::from_angle_y(Deg(MOUSE_YAW_DEG))
}

/// Press offset along -Y, anchored at the button center
pub fn button_local(pivot: Vector3<f32>, press: f32) -> Matrix4<f32> {
    anchored_translation(pivot, Vector3::new(0.0, -press, 0.0))
}

pub fn wheel_local(state: &FrameState, pivots: &Pivots) -> Matrix4<f32> {
    anchored_rotation_x(pivots.mouse.wheel, Deg(state.wheel_angle))
}

/// One model-view matrix per level of the desk hierarchy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub view: Matrix4<f32>,
    pub table: Matrix4<f32>,
    pub monitor: Matrix4<f32>,
    pub screen: Matrix4<f32>,
    pub mouse: Matrix4<f32>,
    pub left_button: Matrix4<f32>,
    pub right_button: Matrix4<f32>,
    pub wheel: Matrix4<f32>,
}

impl FrameTransforms {
    pub fn compose(state: &FrameState, pivots: &Pivots) -> Self {
        let view = view_local(state);
        let table = view * table_local(state, pivots);
        let monitor = table * monitor_local(state, pivots);
        let screen = monitor * screen_local(state, pivots);
        let mouse = table * mouse_local(state, pivots);
        let left_button = mouse * button_local(pivots.mouse.left_button, state.left_press);
        let right_button = mouse * button_local(pivots.mouse.right_button, state.right_press);
        let wheel = mouse * wheel_local(state, pivots);

        Self {
            view,
            table,
            monitor,
            screen,
            mouse,
            left_button,
            right_button,
            wheel,
        }
    }

    /// The matrix a given object is drawn with
    pub fn model_view(&self, id: ObjectId) -> Matrix4<f32> {
        match id {
            ObjectId::Table => self.table,
            ObjectId::Monitor | ObjectId::MonitorStand => self.monitor,
            ObjectId::MonitorScreen | ObjectId::ScreenPanel => self.screen,
            ObjectId::Mouse | ObjectId::MouseBase | ObjectId::MouseBody | ObjectId::MousePalm => {
                self.mouse
            }
            ObjectId::MouseLeftButton => self.left_button,
            ObjectId::MouseRightButton => self.right_button,
            ObjectId::MouseWheel => self.wheel,
        }
    }

    pub fn normal_matrix(&self, id: ObjectId) -> Matrix3<f32> {
        normal_matrix(&self.model_view(id))
    }
}
