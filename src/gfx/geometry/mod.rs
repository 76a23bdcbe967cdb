//! # Procedural Geometry Generation
//!
//! All scene geometry is generated procedurally and packed into one shared
//! vertex attribute set and one shared index buffer. Primitive generators in
//! [`primitives`] emit object-local geometry; the [`MeshBuilder`] places that
//! geometry into the shared buffers and reports exactly what it appended.
//!
//! ## Supported Primitives
//!
//! - **Cuboid**: 6 flat-shaded faces, 24 vertices
//! - **Quad**: single face with a +Z normal (texturable screen panel)
//! - **Curved panel**: cosine-profiled concave shell closed by walls
//! - **Bored box**: box with a cylindrical through-hole along local Z
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use deskscene::gfx::geometry::{MeshBuilder, Surface};
//!
//! let mut builder = MeshBuilder::new();
//! let record = builder.add_box(
//!     Vector3::new(0.0, 0.5, 0.0),
//!     Vector3::new(1.0, 0.5, 1.0),
//!     Surface::new([0.6, 0.4, 0.2, 1.0], 16.0),
//! );
//! assert_eq!(record.vertices_added, 24);
//! assert_eq!(record.indices_added, 36);
//! ```

pub mod builder;
pub mod primitives;

pub use builder::{BuildRecord, MeshBuilder, Placement};
pub use primitives::*;

use std::ops::Range;

use crate::gfx::scene::vertex::Vertex3D;

/// Flat material attributes applied to every vertex a builder emits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub color: [f32; 4],
    pub shininess: f32,
}

impl Surface {
    pub const fn new(color: [f32; 4], shininess: f32) -> Self {
        Self { color, shininess }
    }
}

/// Parallel vertex attribute arrays plus a triangle index list.
///
/// Every array always has the same length, and an index addresses the same
/// logical vertex in all of them. Triangles are wound counter-clockwise when
/// seen from the side their normal points to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Vertex colors (r, g, b, a)
    pub colors: Vec<[f32; 4]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Phong specular exponent
    pub shininess: Vec<f32>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one vertex to every attribute array and returns its index
    pub fn push_vertex(
        &mut self,
        position: [f32; 3],
        normal: [f32; 3],
        tex_coord: [f32; 2],
        surface: &Surface,
    ) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
        self.colors.push(surface.color);
        self.shininess.push(surface.shininess);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Emits a flat quad from four corners given counter-clockwise as seen
    /// from the side `normal` points to. UVs run (0,0) → (1,1) from `p0` to `p2`.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], surface: &Surface) {
        const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let base = self.push_vertex(corners[0], normal, UVS[0], surface);
        for i in 1..4 {
            self.push_vertex(corners[i], normal, UVS[i], surface);
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when every attribute array has the same length
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        self.colors.len() == n
            && self.normals.len() == n
            && self.shininess.len() == n
            && self.tex_coords.len() == n
            && self.indices.iter().all(|&i| (i as usize) < n)
    }

    /// Interleaves the parallel arrays into the GPU vertex format
    pub fn to_gpu_vertices(&self) -> Vec<Vertex3D> {
        (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i],
                color: self.colors[i],
                normal: self.normals[i],
                shininess: self.shininess[i],
                tex_coords: self.tex_coords[i],
            })
            .collect()
    }
}

/// A contiguous slice of the shared index buffer owned by one drawable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexRange {
    pub start: u32,
    pub count: u32,
}

impl IndexRange {
    pub const fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    /// Builds a range from index-buffer lengths captured before and after a build step
    pub fn between(before: usize, after: usize) -> Self {
        Self {
            start: before as u32,
            count: after.saturating_sub(before) as u32,
        }
    }

    pub fn end(&self) -> u32 {
        self.start + self.count
    }

    pub fn as_range(&self) -> Range<u32> {
        self.start..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when the range fits inside an index buffer of `len` entries
    pub fn fits(&self, len: usize) -> bool {
        self.end() as usize <= len
    }

    /// True when `other` lies entirely within this range
    pub fn contains(&self, other: &IndexRange) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// One 3-index sub-range per triangle in this range
    pub fn triangles(&self) -> impl Iterator<Item = Range<u32>> {
        let end = self.end();
        (self.start..end)
            .step_by(3)
            .filter(move |first| first + 3 <= end)
            .map(|first| first..first + 3)
    }
}
