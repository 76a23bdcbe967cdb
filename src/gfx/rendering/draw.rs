//! Draw commands and the backend seam
//!
//! The scene produces a list of [`DrawCommand`]s per frame. A backend
//! implements [`RenderTarget`]; [`submit`] walks the list, binds each
//! command's transforms and issues the indexed draws.

use std::collections::BTreeSet;
use std::ops::Range;

use cgmath::{Matrix3, Matrix4};

use crate::gfx::geometry::IndexRange;
use crate::gfx::models::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    /// Every triangle outlined as its own closed line loop
    Wireframe,
}

/// Primitive interpretation of an index range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    LineLoop,
}

/// Everything needed to draw one object for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub object: ObjectId,
    pub model_view: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,
    pub range: IndexRange,
    pub mode: DrawMode,
    /// Sample the screen texture instead of the vertex colour
    pub textured: bool,
}

pub type DrawList = Vec<DrawCommand>;

pub trait RenderTarget {
    /// Binds the command's model-view and normal matrices for the draws that
    /// follow
    fn bind(&mut self, command: &DrawCommand);

    fn draw_elements(&mut self, topology: Topology, indices: Range<u32>);

    /// One 3-index line loop per triangle over the same index data.
    /// Backends without line loops override this.
    fn draw_wireframe(&mut self, range: IndexRange) {
        for triangle in range.triangles() {
            self.draw_elements(Topology::LineLoop, triangle);
        }
    }
}

pub fn submit<T: RenderTarget + ?Sized>(commands: &[DrawCommand], target: &mut T) {
    for command in commands {
        target.bind(command);
        match command.mode {
            DrawMode::Triangles => target.draw_elements(Topology::TriangleList, command.range.as_range()),
            DrawMode::Wireframe => target.draw_wireframe(command.range),
        }
    }
}

fn edge(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected vertex pairs a triangle-list draw rasterizes edges between
pub fn triangle_edges(indices: &[u32], range: IndexRange) -> BTreeSet<(u32, u32)> {
    let mut edges = BTreeSet::new();
    for tri in range.triangles() {
        let t = &indices[tri.start as usize..tri.end as usize];
        edges.insert(edge(t[0], t[1]));
        edges.insert(edge(t[1], t[2]));
        edges.insert(edge(t[2], t[0]));
    }
    edges
}

/// Undirected vertex pairs connected by a closed line loop over `indices`
pub fn line_loop_edges(indices: &[u32]) -> Vec<(u32, u32)> {
    let n = indices.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n).map(|i| edge(indices[i], indices[(i + 1) % n])).collect()
}

/// Line-list expansion of a triangle index buffer: each triangle becomes its
/// three edges, 6 indices, so triangle range `r` maps to `2·r`.
pub fn line_list_indices(indices: &[u32]) -> Vec<u32> {
    let mut lines = Vec::with_capacity(indices.len() * 2);
    for t in indices.chunks_exact(3) {
        lines.extend_from_slice(&[t[0], t[1], t[1], t[2], t[2], t[0]]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[derive(Default)]
    struct Recorder {
        bound: Vec<ObjectId>,
        draws: Vec<(Topology, Range<u32>)>,
    }

    impl RenderTarget for Recorder {
        fn bind(&mut self, command: &DrawCommand) {
            self.bound.push(command.object);
        }

        fn draw_elements(&mut self, topology: Topology, indices: Range<u32>) {
            self.draws.push((topology, indices));
        }
    }

    fn command(object: ObjectId, range: IndexRange, mode: DrawMode) -> DrawCommand {
        DrawCommand {
            object,
            model_view: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            range,
            mode,
            textured: false,
        }
    }

    #[test]
    fn test_triangles_draw_in_one_call() {
        let mut target = Recorder::default();
        submit(
            &[command(ObjectId::Table, IndexRange::new(6, 36), DrawMode::Triangles)],
            &mut target,
        );
        assert_eq!(target.draws, vec![(Topology::TriangleList, 6..42)]);
    }

    #[test]
    fn test_wireframe_draws_one_loop_per_triangle() {
        let mut target = Recorder::default();
        submit(
            &[command(ObjectId::MouseWheel, IndexRange::new(3, 9), DrawMode::Wireframe)],
            &mut target,
        );
        assert_eq!(
            target.draws,
            vec![
                (Topology::LineLoop, 3..6),
                (Topology::LineLoop, 6..9),
                (Topology::LineLoop, 9..12),
            ]
        );
        assert_eq!(target.bound, vec![ObjectId::MouseWheel]);
    }

    #[test]
    fn test_line_list_matches_line_loops() {
        let indices = [0, 1, 2, 2, 3, 0];
        let lines = line_list_indices(&indices);
        assert_eq!(lines.len(), 12);
        let from_list: BTreeSet<_> = lines.chunks_exact(2).map(|p| edge(p[0], p[1])).collect();
        let from_loops: BTreeSet<_> = indices.chunks_exact(3).flat_map(line_loop_edges).collect();
        assert_eq!(from_list, from_loops);
    }
}
