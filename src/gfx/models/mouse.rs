//! Mouse assembler
//!
//! Local space: origin at the bottom center of the base, +Y up, buttons
//! toward +Z. Each constituent is recorded as its own sub-range so buttons
//! and wheel can be animated independently of the shell.

use cgmath::Vector3;

use super::partition::{ObjectId, PartitionTable};
use crate::gfx::geometry::{BoredBox, CurvedPanel, MeshBuilder, Placement, Surface};

pub const BASE_HALF: [f32; 3] = [0.055, 0.006, 0.095];
pub const BODY_HALF: [f32; 3] = [0.05, 0.018, 0.065];
pub const BODY_Z: f32 = -0.025;

pub const PALM_HALF_WIDTH: f32 = 0.05;
pub const PALM_HALF_LENGTH: f32 = 0.05;
pub const PALM_DEPTH: f32 = 0.02;
pub const PALM_RIM: f32 = 0.004;
pub const PALM_Z: f32 = -0.04;
pub const PALM_SEGMENTS: u32 = 8;

pub const BUTTON_HALF: [f32; 3] = [0.021, 0.006, 0.035];
pub const BUTTON_X: f32 = 0.029;
pub const BUTTON_Z: f32 = 0.055;

pub const WHEEL_HALF: [f32; 3] = [0.014, 0.014, 0.006];
pub const WHEEL_AXLE_RADIUS: f32 = 0.004;
pub const WHEEL_SEGMENTS: u32 = 16;
pub const WHEEL_Z: f32 = 0.05;

const BASE: Surface = Surface::new([0.2, 0.2, 0.22, 1.0], 40.0);
const SHELL: Surface = Surface::new([0.85, 0.85, 0.88, 1.0], 60.0);
const BUTTON: Surface = Surface::new([0.9, 0.9, 0.92, 1.0], 80.0);
const WHEEL: Surface = Surface::new([0.25, 0.25, 0.25, 1.0], 20.0);

/// Local pivots of the mouse and its moving parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePivots {
    /// Scale anchor at the bottom of the base
    pub base: Vector3<f32>,
    pub left_button: Vector3<f32>,
    pub right_button: Vector3<f32>,
    /// Point on the wheel's spin axis (local X)
    pub wheel: Vector3<f32>,
}

fn body_top() -> f32 {
    2.0 * BASE_HALF[1] + 2.0 * BODY_HALF[1]
}

fn button_center(side: f32) -> Vector3<f32> {
    Vector3::new(side * BUTTON_X, body_top() + BUTTON_HALF[1] - 0.002, BUTTON_Z)
}

fn wheel_center() -> Vector3<f32> {
    Vector3::new(0.0, body_top() + WHEEL_HALF[1], WHEEL_Z)
}

/// Appends base, body, palm rest, both buttons and the wheel
pub fn assemble(builder: &mut MeshBuilder, partitions: &mut PartitionTable) -> MousePivots {
    let mouse = builder.record(|b| {
        let base = b.add_box(Vector3::new(0.0, BASE_HALF[1], 0.0), BASE_HALF.into(), BASE);
        partitions.insert(ObjectId::MouseBase, base.range());

        let body = b.add_box(
            Vector3::new(0.0, 2.0 * BASE_HALF[1] + BODY_HALF[1], BODY_Z),
            BODY_HALF.into(),
            SHELL,
        );
        partitions.insert(ObjectId::MouseBody, body.range());

        // Shell turned so its bulge points up (+Y) and its length runs along Z
        let palm = b.add_curved_panel(
            Placement::rotated(Vector3::new(0.0, body_top(), PALM_Z), [90.0, 0.0, 0.0]),
            &CurvedPanel {
                half_width: PALM_HALF_WIDTH,
                half_height: PALM_HALF_LENGTH,
                max_depth: PALM_DEPTH,
                rim: PALM_RIM,
                segments: PALM_SEGMENTS,
            },
            SHELL,
        );
        partitions.insert(ObjectId::MousePalm, palm.range());

        let left = b.add_box(button_center(-1.0), BUTTON_HALF.into(), BUTTON);
        partitions.insert(ObjectId::MouseLeftButton, left.range());
        let right = b.add_box(button_center(1.0), BUTTON_HALF.into(), BUTTON);
        partitions.insert(ObjectId::MouseRightButton, right.range());

        // Bore along local X after the 90° yaw, so the wheel spins about X
        let wheel = b.add_bored_box(
            Placement::rotated(wheel_center(), [0.0, 90.0, 0.0]),
            &BoredBox {
                half: WHEEL_HALF.into(),
                radius: WHEEL_AXLE_RADIUS,
                segments: WHEEL_SEGMENTS,
            },
            WHEEL,
        );
        partitions.insert(ObjectId::MouseWheel, wheel.range());
    });
    partitions.insert(ObjectId::Mouse, mouse);

    MousePivots {
        base: Vector3::new(0.0, 0.0, 0.0),
        left_button: button_center(-1.0),
        right_button: button_center(1.0),
        wheel: wheel_center(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (MeshBuilder, PartitionTable, MousePivots) {
        let mut builder = MeshBuilder::new();
        let mut partitions = PartitionTable::new();
        let pivots = assemble(&mut builder, &mut partitions);
        (builder, partitions, pivots)
    }

    #[test]
    fn test_sub_parts_are_carved_from_the_mouse_range() {
        let (builder, partitions, _) = build();
        let mouse = partitions.get(ObjectId::Mouse).unwrap();
        let parts = [
            ObjectId::MouseBase,
            ObjectId::MouseBody,
            ObjectId::MousePalm,
            ObjectId::MouseLeftButton,
            ObjectId::MouseRightButton,
            ObjectId::MouseWheel,
        ];
        let mut cursor = mouse.start;
        for id in parts {
            let range = partitions.get(id).unwrap();
            assert!(mouse.contains(&range), "{} escapes the mouse range", id);
            assert_eq!(range.start, cursor, "{} is not contiguous", id);
            cursor = range.end();
        }
        assert_eq!(cursor, mouse.end());
        assert_eq!(mouse.end() as usize, builder.index_len());
    }

    #[test]
    fn test_button_pivots_are_button_centers() {
        let (builder, partitions, pivots) = build();
        let data = builder.geometry();
        for (id, pivot) in [
            (ObjectId::MouseLeftButton, pivots.left_button),
            (ObjectId::MouseRightButton, pivots.right_button),
        ] {
            let range = partitions.get(id).unwrap();
            let used: Vec<[f32; 3]> = data.indices[range.start as usize..range.end() as usize]
                .iter()
                .map(|&i| data.positions[i as usize])
                .collect();
            let centroid = used.iter().fold([0.0f32; 3], |acc, p| {
                [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
            });
            let n = used.len() as f32;
            assert!((centroid[0] / n - pivot.x).abs() < 1e-5);
            assert!((centroid[1] / n - pivot.y).abs() < 1e-5);
            assert!((centroid[2] / n - pivot.z).abs() < 1e-5);
        }
        assert!(pivots.left_button.x < 0.0 && pivots.right_button.x > 0.0);
    }

    #[test]
    fn test_wheel_bore_runs_along_x() {
        let (builder, partitions, pivots) = build();
        let data = builder.geometry();
        let range = partitions.get(ObjectId::MouseWheel).unwrap();
        // Wheel extent along X is its (rotated) thickness.
        let xs = data.indices[range.start as usize..range.end() as usize]
            .iter()
            .map(|&i| data.positions[i as usize][0]);
        let max_x = xs.clone().fold(f32::MIN, f32::max);
        let min_x = xs.fold(f32::MAX, f32::min);
        assert!((max_x - min_x - 2.0 * WHEEL_HALF[2]).abs() < 1e-5);
        assert!(pivots.wheel.x.abs() < 1e-6);
    }
}
