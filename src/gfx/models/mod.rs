//! # Model Assemblers
//!
//! Compose primitives into the named desk objects and record where each one
//! lives in the shared index buffer. [`build_scene`] is the single entry
//! point: it runs every assembler once, in a fixed order, and returns an
//! immutable [`SceneBuildResult`].

pub mod monitor;
pub mod mouse;
pub mod partition;
pub mod table;

pub use monitor::MonitorPivots;
pub use mouse::MousePivots;
pub use partition::{ObjectId, PartitionTable};
pub use table::TablePivots;

use crate::gfx::geometry::{GeometryData, MeshBuilder};

/// Every local-space pivot the transform composer anchors on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivots {
    pub table: TablePivots,
    pub monitor: MonitorPivots,
    pub mouse: MousePivots,
}

/// Packed geometry plus the bookkeeping needed to draw it piecewise
#[derive(Debug, Clone)]
pub struct SceneBuildResult {
    pub geometry: GeometryData,
    pub partitions: PartitionTable,
    pub pivots: Pivots,
}

/// Builds the table, monitor and mouse into one set of shared buffers
pub fn build_scene() -> SceneBuildResult {
    let mut builder = MeshBuilder::new();
    let mut partitions = PartitionTable::new();

    let table = table::assemble(&mut builder, &mut partitions);
    let monitor = monitor::assemble(&mut builder, &mut partitions);
    let mouse = mouse::assemble(&mut builder, &mut partitions);

    let geometry = builder.finish();

    for (id, range) in partitions.iter() {
        log::debug!(
            "{:<20} indices {:>6}..{:<6} ({} triangles)",
            id.name(),
            range.start,
            range.end(),
            range.count / 3
        );
    }
    log::info!(
        "Scene built: {} vertices, {} triangles, {} partitions",
        geometry.vertex_count(),
        geometry.triangle_count(),
        partitions.len()
    );

    SceneBuildResult {
        geometry,
        partitions,
        pivots: Pivots {
            table,
            monitor,
            mouse,
        },
    }
}
