//! # Vertex Data Structures
//!
//! GPU-compatible interleaved vertex format for the desk scene. The builders
//! keep attributes in parallel arrays; [`GeometryData::to_gpu_vertices`]
//! interleaves them into this layout for upload.
//!
//! [`GeometryData::to_gpu_vertices`]: crate::gfx::geometry::GeometryData::to_gpu_vertices

/// A 3D vertex with every attribute the Phong shader reads.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout, which is required for GPU buffer operations.
///
/// # Examples
///
/// ```no_run
/// use deskscene::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 1.0, 0.0],
///     color: [1.0, 1.0, 1.0, 1.0],
///     normal: [0.0, 1.0, 0.0],
///     shininess: 32.0,
///     tex_coords: [0.5, 0.5],
/// };
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Phong specular exponent
    pub shininess: f32,
    /// Texture coordinates [u, v]
    pub tex_coords: [f32; 2],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x4,
        2 => Float32x3,
        3 => Float32,
        4 => Float32x2
    ];

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Color (Float32x4)
    /// - Attribute 2: Normal (Float32x3)
    /// - Attribute 3: Shininess (Float32)
    /// - Attribute 4: Texture coordinates (Float32x2)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex3D>(), 4 * (3 + 4 + 3 + 1 + 2));
        let layout = Vertex3D::desc();
        assert_eq!(layout.array_stride, 52);
        assert_eq!(layout.attributes.len(), 5);
        assert_eq!(layout.attributes[4].offset, 44);
    }
}
