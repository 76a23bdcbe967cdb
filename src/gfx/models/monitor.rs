//! Monitor assembler
//!
//! Local space: origin at the foot of the base plate (bottom center), +Y up,
//! screen facing +Z. The monitor scales about its foot so it stays planted on
//! the table, and the screen tilts about the hinge where the neck meets the
//! back of the housing.

use cgmath::Vector3;

use super::partition::{ObjectId, PartitionTable};
use crate::gfx::geometry::{BoredBox, CurvedPanel, MeshBuilder, Placement, Surface};

pub const BASE_HALF: [f32; 3] = [0.22, 0.012, 0.16];
pub const NECK_HALF: [f32; 3] = [0.045, 0.26, 0.025];
pub const NECK_Z: f32 = -0.07;
pub const NECK_BORE_RADIUS: f32 = 0.022;
pub const CABLE_HOLE_SEGMENTS: u32 = 24;

pub const SCREEN_CENTER_Y: f32 = 0.62;
pub const SCREEN_HALF_WIDTH: f32 = 0.62;
pub const SCREEN_HALF_HEIGHT: f32 = 0.36;
pub const HOUSING_DEPTH: f32 = 0.05;
pub const HOUSING_RIM: f32 = 0.02;
pub const HOUSING_SEGMENTS: u32 = 16;
pub const BEZEL_HALF_THICKNESS: f32 = 0.01;
pub const PANEL_MARGIN: f32 = 0.04;
/// How far below the neck top the hinge sits
pub const HINGE_DROP: f32 = 0.024;

const BASE: Surface = Surface::new([0.15, 0.15, 0.17, 1.0], 64.0);
const NECK: Surface = Surface::new([0.7, 0.7, 0.72, 1.0], 96.0);
const HOUSING: Surface = Surface::new([0.12, 0.12, 0.13, 1.0], 48.0);
const BEZEL: Surface = Surface::new([0.05, 0.05, 0.05, 1.0], 32.0);
const PANEL: Surface = Surface::new([1.0, 1.0, 1.0, 1.0], 120.0);

/// Local pivots of the monitor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorPivots {
    /// Scale anchor at the bottom of the base plate
    pub foot: Vector3<f32>,
    /// Screen tilt axis point at the stand-to-screen junction
    pub hinge: Vector3<f32>,
}

fn neck_center() -> Vector3<f32> {
    Vector3::new(0.0, 2.0 * BASE_HALF[1] + NECK_HALF[1], NECK_Z)
}

/// Hinge point derived from the same constants that place the neck
pub fn hinge_pivot() -> Vector3<f32> {
    let neck_top = 2.0 * BASE_HALF[1] + 2.0 * NECK_HALF[1];
    Vector3::new(0.0, neck_top - HINGE_DROP, NECK_Z + NECK_HALF[2])
}

/// Appends stand, housing + bezel and the textured screen panel
pub fn assemble(builder: &mut MeshBuilder, partitions: &mut PartitionTable) -> MonitorPivots {
    let monitor = builder.record(|b| {
        let stand = b.record(|b| {
            b.add_box(Vector3::new(0.0, BASE_HALF[1], 0.0), BASE_HALF.into(), BASE);
            b.add_bored_box(
                Placement::at(neck_center()),
                &BoredBox {
                    half: NECK_HALF.into(),
                    radius: NECK_BORE_RADIUS,
                    segments: CABLE_HOLE_SEGMENTS,
                },
                NECK,
            );
        });
        partitions.insert(ObjectId::MonitorStand, stand);

        let screen = b.record(|b| {
            b.add_curved_panel(
                Placement::at(Vector3::new(0.0, SCREEN_CENTER_Y, 0.0)),
                &CurvedPanel {
                    half_width: SCREEN_HALF_WIDTH,
                    half_height: SCREEN_HALF_HEIGHT,
                    max_depth: HOUSING_DEPTH,
                    rim: HOUSING_RIM,
                    segments: HOUSING_SEGMENTS,
                },
                HOUSING,
            );
            b.add_box(
                Vector3::new(0.0, SCREEN_CENTER_Y, HOUSING_RIM + BEZEL_HALF_THICKNESS),
                Vector3::new(SCREEN_HALF_WIDTH, SCREEN_HALF_HEIGHT, BEZEL_HALF_THICKNESS),
                BEZEL,
            );
        });
        partitions.insert(ObjectId::MonitorScreen, screen);

        let panel = b.add_quad(
            Vector3::new(0.0, SCREEN_CENTER_Y, HOUSING_RIM + 2.0 * BEZEL_HALF_THICKNESS + 5e-4),
            SCREEN_HALF_WIDTH - PANEL_MARGIN,
            SCREEN_HALF_HEIGHT - PANEL_MARGIN,
            PANEL,
        );
        partitions.insert(ObjectId::ScreenPanel, panel.range());
    });
    partitions.insert(ObjectId::Monitor, monitor);

    MonitorPivots {
        foot: Vector3::new(0.0, 0.0, 0.0),
        hinge: hinge_pivot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_sub_ranges_tile_the_aggregate() {
        let mut builder = MeshBuilder::new();
        let mut partitions = PartitionTable::new();
        assemble(&mut builder, &mut partitions);

        let all = partitions.get(ObjectId::Monitor).unwrap();
        let stand = partitions.get(ObjectId::MonitorStand).unwrap();
        let screen = partitions.get(ObjectId::MonitorScreen).unwrap();
        let panel = partitions.get(ObjectId::ScreenPanel).unwrap();

        assert_eq!(stand.start, all.start);
        assert_eq!(screen.start, stand.end());
        assert_eq!(panel.start, screen.end());
        assert_eq!(panel.end(), all.end());
        assert_eq!(panel.count, 6);
        assert_eq!(all.end() as usize, builder.index_len());
    }

    #[test]
    fn test_hinge_sits_inside_the_neck_top() {
        let hinge = hinge_pivot();
        let neck_top = 2.0 * BASE_HALF[1] + 2.0 * NECK_HALF[1];
        assert!(hinge.y < neck_top && hinge.y > neck_top - NECK_HALF[1]);
        assert!((hinge.z - (NECK_Z + NECK_HALF[2])).abs() < 1e-6);
        // The screen's vertical extent covers the hinge height.
        assert!(hinge.y > SCREEN_CENTER_Y - SCREEN_HALF_HEIGHT);
    }

    #[test]
    fn test_foot_is_lowest_point() {
        let mut builder = MeshBuilder::new();
        let mut partitions = PartitionTable::new();
        let pivots = assemble(&mut builder, &mut partitions);
        let lowest = builder
            .geometry()
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::MAX, f32::min);
        assert!((lowest - pivots.foot.y).abs() < 1e-6);
    }
}
