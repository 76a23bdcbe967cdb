//! Table assembler
//!
//! Local space: origin at the center of the tabletop's upper surface, +Y up.
//! The table scales about that point, so scaling never moves the surface
//! height at the anchor.

use cgmath::Vector3;

use super::partition::{ObjectId, PartitionTable};
use crate::gfx::geometry::{MeshBuilder, Surface};

pub const TABLE_HALF_WIDTH: f32 = 1.4;
pub const TABLE_HALF_DEPTH: f32 = 0.7;
pub const TOP_HALF_THICKNESS: f32 = 0.03;
pub const PANEL_HALF_THICKNESS: f32 = 0.03;
pub const PANEL_HALF_HEIGHT: f32 = 0.36;
pub const BACK_PANEL_HALF_HEIGHT: f32 = 0.24;
pub const BACK_PANEL_HALF_THICKNESS: f32 = 0.015;
pub const BACK_PANEL_INSET: f32 = 0.05;

const WOOD: Surface = Surface::new([0.55, 0.36, 0.2, 1.0], 12.0);
const WOOD_DARK: Surface = Surface::new([0.42, 0.27, 0.15, 1.0], 8.0);

/// Local pivots of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TablePivots {
    pub scale_anchor: Vector3<f32>,
}

/// Inner face of a side panel, measured from the table center along X
pub fn panel_inner_edge() -> f32 {
    TABLE_HALF_WIDTH - 2.0 * PANEL_HALF_THICKNESS
}

/// Appends the tabletop, the two side panels and the back panel
pub fn assemble(builder: &mut MeshBuilder, partitions: &mut PartitionTable) -> TablePivots {
    let range = builder.record(|b| {
        b.add_box(
            Vector3::new(0.0, -TOP_HALF_THICKNESS, 0.0),
            Vector3::new(TABLE_HALF_WIDTH, TOP_HALF_THICKNESS, TABLE_HALF_DEPTH),
            WOOD,
        );

        let panel_y = -2.0 * TOP_HALF_THICKNESS - PANEL_HALF_HEIGHT;
        let panel_half = Vector3::new(PANEL_HALF_THICKNESS, PANEL_HALF_HEIGHT, TABLE_HALF_DEPTH);
        for side in [-1.0, 1.0] {
            b.add_box(
                Vector3::new(side * (TABLE_HALF_WIDTH - PANEL_HALF_THICKNESS), panel_y, 0.0),
                panel_half,
                WOOD_DARK,
            );
        }

        b.add_box(
            Vector3::new(
                0.0,
                -2.0 * TOP_HALF_THICKNESS - BACK_PANEL_HALF_HEIGHT,
                -(TABLE_HALF_DEPTH - BACK_PANEL_INSET),
            ),
            Vector3::new(panel_inner_edge(), BACK_PANEL_HALF_HEIGHT, BACK_PANEL_HALF_THICKNESS),
            WOOD_DARK,
        );
    });
    partitions.insert(ObjectId::Table, range);

    TablePivots {
        scale_anchor: Vector3::new(0.0, 0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_four_boxes_below_the_surface() {
        let mut builder = MeshBuilder::new();
        let mut partitions = PartitionTable::new();
        let pivots = assemble(&mut builder, &mut partitions);

        let range = partitions.get(ObjectId::Table).unwrap();
        assert_eq!(range.count, 4 * 36);
        assert_eq!(pivots.scale_anchor, Vector3::new(0.0, 0.0, 0.0));

        let data = builder.finish();
        let top = data.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        assert!(top.abs() < 1e-6);
    }

    #[test]
    fn test_back_panel_fits_between_side_panels() {
        assert!(panel_inner_edge() < TABLE_HALF_WIDTH - PANEL_HALF_THICKNESS);
        assert!((panel_inner_edge() - 1.34).abs() < 1e-6);
    }
}
