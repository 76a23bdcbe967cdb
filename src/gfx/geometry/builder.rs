//! Append-only packing of primitives into the shared scene buffers

use cgmath::{Deg, InnerSpace, Matrix4, Vector3, Vector4, Zero};

use super::{primitives, CurvedPanel, BoredBox, GeometryData, IndexRange, Surface};

/// Where a primitive lands in its object's local space.
///
/// The primitive is rotated about its own origin by the Euler triple
/// (degrees, applied X then Y then Z) and then moved to `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Vector3<f32>,
    pub rotation: [f32; 3],
}

impl Placement {
    pub fn at(center: Vector3<f32>) -> Self {
        Self {
            center,
            rotation: [0.0; 3],
        }
    }

    pub fn rotated(center: Vector3<f32>, rotation: [f32; 3]) -> Self {
        Self { center, rotation }
    }

    /// Rotation-only part, `Rz · Ry · Rx`
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_z(Deg(self.rotation[2]))
            * Matrix4::from_angle_y(Deg(self.rotation[1]))
            * Matrix4::from_angle_x(Deg(self.rotation[0]))
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.center) * self.rotation_matrix()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Vector3::zero())
    }
}

/// What a single build step appended to the shared buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRecord {
    /// Index-buffer length before the step
    pub start_offset: u32,
    pub indices_added: u32,
    /// Vertex count before the step
    pub first_vertex: u32,
    pub vertices_added: u32,
}

impl BuildRecord {
    pub fn range(&self) -> IndexRange {
        IndexRange::new(self.start_offset, self.indices_added)
    }
}

/// Owns the shared attribute/index buffers while the scene is being built.
///
/// Every method only appends, and each returns a [`BuildRecord`] describing
/// the region it wrote, so callers never need to inspect buffer lengths.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    data: GeometryData,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.data
    }

    pub fn index_len(&self) -> usize {
        self.data.indices.len()
    }

    /// Hands the packed buffers over; the builder is consumed
    pub fn finish(self) -> GeometryData {
        self.data
    }

    /// Copies object-local geometry into the shared buffers.
    ///
    /// Positions go through the full placement matrix; normals go through the
    /// rotation only (as directions, w = 0) and are renormalized.
    pub fn append(&mut self, local: &GeometryData, placement: &Placement) -> BuildRecord {
        let start_offset = self.data.indices.len() as u32;
        let first_vertex = self.data.positions.len() as u32;

        let model = placement.matrix();
        let rotation = placement.rotation_matrix();

        for p in &local.positions {
            let moved = model * Vector4::new(p[0], p[1], p[2], 1.0);
            self.data.positions.push([moved.x, moved.y, moved.z]);
        }
        for n in &local.normals {
            let turned = (rotation * Vector4::new(n[0], n[1], n[2], 0.0)).truncate();
            let turned = if turned.magnitude2() > 0.0 {
                turned.normalize()
            } else {
                turned
            };
            self.data.normals.push([turned.x, turned.y, turned.z]);
        }
        self.data.colors.extend_from_slice(&local.colors);
        self.data.shininess.extend_from_slice(&local.shininess);
        self.data.tex_coords.extend_from_slice(&local.tex_coords);
        self.data
            .indices
            .extend(local.indices.iter().map(|i| i + first_vertex));

        BuildRecord {
            start_offset,
            indices_added: local.indices.len() as u32,
            first_vertex,
            vertices_added: local.positions.len() as u32,
        }
    }

    /// Runs several build steps and returns the index range they produced together
    pub fn record<F>(&mut self, steps: F) -> IndexRange
    where
        F: FnOnce(&mut Self),
    {
        let before = self.data.indices.len();
        steps(self);
        IndexRange::between(before, self.data.indices.len())
    }

    /// Axis-aligned box centered at `center` with half-extents `half`
    pub fn add_box(
        &mut self,
        center: Vector3<f32>,
        half: Vector3<f32>,
        surface: Surface,
    ) -> BuildRecord {
        self.append(&primitives::cuboid(half, &surface), &Placement::at(center))
    }

    /// Single +Z facing quad centered at `center`
    pub fn add_quad(
        &mut self,
        center: Vector3<f32>,
        half_width: f32,
        half_height: f32,
        surface: Surface,
    ) -> BuildRecord {
        self.append(
            &primitives::quad(half_width, half_height, &surface),
            &Placement::at(center),
        )
    }

    pub fn add_curved_panel(
        &mut self,
        placement: Placement,
        panel: &CurvedPanel,
        surface: Surface,
    ) -> BuildRecord {
        self.append(&primitives::curved_panel(panel, &surface), &placement)
    }

    pub fn add_bored_box(
        &mut self,
        placement: Placement,
        bored: &BoredBox,
        surface: Surface,
    ) -> BuildRecord {
        self.append(&primitives::bored_box(bored, &surface), &placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Surface = Surface::new([0.5, 0.5, 0.5, 1.0], 32.0);

    #[test]
    fn test_records_are_contiguous() {
        let mut builder = MeshBuilder::new();
        let first = builder.add_box(Vector3::zero(), Vector3::new(1.0, 1.0, 1.0), GREY);
        let second = builder.add_quad(Vector3::new(0.0, 0.0, 2.0), 0.5, 0.5, GREY);

        assert_eq!(first.range(), IndexRange::new(0, 36));
        assert_eq!(second.start_offset, 36);
        assert_eq!(second.first_vertex, 24);
        assert_eq!(second.vertices_added, 4);
        assert_eq!(builder.index_len(), 42);

        let data = builder.finish();
        assert!(data.is_consistent());
        // Quad indices are rebased onto the vertices that follow the box.
        assert!(data.indices[36..].iter().all(|&i| i >= 24));
    }

    #[test]
    fn test_record_spans_multiple_steps() {
        let mut builder = MeshBuilder::new();
        builder.add_box(Vector3::zero(), Vector3::new(1.0, 1.0, 1.0), GREY);
        let span = builder.record(|b| {
            b.add_quad(Vector3::zero(), 1.0, 1.0, GREY);
            b.add_quad(Vector3::zero(), 1.0, 1.0, GREY);
        });
        assert_eq!(span, IndexRange::new(36, 12));
    }

    #[test]
    fn test_placement_rotates_normals_without_translating_them() {
        let mut builder = MeshBuilder::new();
        let placement = Placement::rotated(Vector3::new(5.0, 0.0, 0.0), [0.0, 90.0, 0.0]);
        builder.append(&primitives::quad(1.0, 1.0, &GREY), &placement);
        let data = builder.finish();

        // +Z turned 90° about Y becomes +X.
        for n in &data.normals {
            assert!((n[0] - 1.0).abs() < 1e-5);
            assert!(n[1].abs() < 1e-5 && n[2].abs() < 1e-5);
        }
        for p in &data.positions {
            assert!((p[0] - 5.0).abs() < 1e-5);
        }
    }
}
