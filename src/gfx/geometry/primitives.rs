//! # Primitive Shape Generation
//!
//! Each generator returns object-local geometry centered on the origin.
//! All shapes carry outward normals, a flat color, a shininess value and
//! texture coordinates. [`super::MeshBuilder`] places them into the scene.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use super::{GeometryData, Surface};

/// Parameters for a cosine-profiled shell
///
/// The back surface bulges to `max_depth` behind the local origin at the
/// horizontal center and meets the origin plane at the left/right edges.
/// Side, top and bottom walls close the volume against the front plane at
/// `z = rim`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvedPanel {
    pub half_width: f32,
    pub half_height: f32,
    pub max_depth: f32,
    pub rim: f32,
    pub segments: u32,
}

/// Parameters for a box pierced by a cylinder along local Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoredBox {
    pub half: Vector3<f32>,
    pub radius: f32,
    pub segments: u32,
}

/// Generate a box centered at the origin with the given half-extents
///
/// Each of the six faces owns four vertices with its own flat normal and a
/// full 0–1 UV quad.
pub fn cuboid(half: Vector3<f32>, surface: &Surface) -> GeometryData {
    let mut data = GeometryData::new();
    let (w, h, d) = (half.x, half.y, half.z);

    // Front (+Z)
    data.push_quad(
        [[-w, -h, d], [w, -h, d], [w, h, d], [-w, h, d]],
        [0.0, 0.0, 1.0],
        surface,
    );
    // Back (-Z)
    data.push_quad(
        [[w, -h, -d], [-w, -h, -d], [-w, h, -d], [w, h, -d]],
        [0.0, 0.0, -1.0],
        surface,
    );
    // Right (+X)
    data.push_quad(
        [[w, -h, d], [w, -h, -d], [w, h, -d], [w, h, d]],
        [1.0, 0.0, 0.0],
        surface,
    );
    // Left (-X)
    data.push_quad(
        [[-w, -h, -d], [-w, -h, d], [-w, h, d], [-w, h, -d]],
        [-1.0, 0.0, 0.0],
        surface,
    );
    // Top (+Y)
    data.push_quad(
        [[-w, h, d], [w, h, d], [w, h, -d], [-w, h, -d]],
        [0.0, 1.0, 0.0],
        surface,
    );
    // Bottom (-Y)
    data.push_quad(
        [[-w, -h, -d], [w, -h, -d], [w, -h, d], [-w, -h, d]],
        [0.0, -1.0, 0.0],
        surface,
    );

    data
}

/// Generate a single quad in the XY plane facing +Z
pub fn quad(half_width: f32, half_height: f32, surface: &Surface) -> GeometryData {
    let mut data = GeometryData::new();
    let (w, h) = (half_width, half_height);
    data.push_quad(
        [[-w, -h, 0.0], [w, -h, 0.0], [w, h, 0.0], [-w, h, 0.0]],
        [0.0, 0.0, 1.0],
        surface,
    );
    data
}

/// Depth of the curved back surface at horizontal parameter `u` in `[0, 1]`
pub fn curve_depth(u: f32, max_depth: f32) -> f32 {
    -max_depth * ((u - 0.5) * PI).cos()
}

/// Generate a curved back shell
///
/// The back surface is a `(segments + 1) × (segments + 1)` grid with
/// `z = -max_depth · cos((u - 0.5) · π)`. Its per-vertex normal is the
/// analytic cross product of the V tangent with the U tangent (whose Z slope
/// is `dz/du`), which points backwards and away from the bulge.
pub fn curved_panel(panel: &CurvedPanel, surface: &Surface) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = panel.segments.max(1);
    let (w, h) = (panel.half_width, panel.half_height);
    let width = 2.0 * w;
    let height = 2.0 * h;

    // Back surface grid
    let v_tangent = Vector3::new(0.0, height, 0.0);
    for j in 0..=segs {
        let v = j as f32 / segs as f32;
        let y = -h + v * height;
        for i in 0..=segs {
            let u = i as f32 / segs as f32;
            let x = -w + u * width;
            let z = curve_depth(u, panel.max_depth);

            let dz_du = panel.max_depth * PI * ((u - 0.5) * PI).sin();
            let u_tangent = Vector3::new(width, 0.0, dz_du);
            let normal = v_tangent.cross(u_tangent).normalize();

            data.push_vertex([x, y, z], normal.into(), [u, v], surface);
        }
    }
    let row = segs + 1;
    for j in 0..segs {
        for i in 0..segs {
            let a = j * row + i;
            let b = a + row;
            let c = a + 1;
            let d = b + 1;
            data.push_triangle(a, b, c);
            data.push_triangle(c, b, d);
        }
    }

    // Top and bottom walls follow the curve back to the front plane
    let rim = panel.rim;
    for (y, normal) in [(h, [0.0, 1.0, 0.0]), (-h, [0.0, -1.0, 0.0])] {
        let base = data.positions.len() as u32;
        for i in 0..=segs {
            let u = i as f32 / segs as f32;
            let x = -w + u * width;
            let z = curve_depth(u, panel.max_depth);
            data.push_vertex([x, y, rim], normal, [u, 1.0], surface);
            data.push_vertex([x, y, z], normal, [u, 0.0], surface);
        }
        for i in 0..segs {
            let front0 = base + 2 * i;
            let back0 = front0 + 1;
            let front1 = front0 + 2;
            let back1 = front0 + 3;
            if normal[1] > 0.0 {
                data.push_triangle(front0, front1, back1);
                data.push_triangle(front0, back1, back0);
            } else {
                data.push_triangle(front0, back1, front1);
                data.push_triangle(front0, back0, back1);
            }
        }
    }

    // Left and right walls are flat: the curve meets the origin plane there
    let edge = curve_depth(0.0, panel.max_depth);
    data.push_quad(
        [[-w, -h, edge], [-w, -h, rim], [-w, h, rim], [-w, h, edge]],
        [-1.0, 0.0, 0.0],
        surface,
    );
    let edge = curve_depth(1.0, panel.max_depth);
    data.push_quad(
        [[w, -h, rim], [w, -h, edge], [w, h, edge], [w, h, rim]],
        [1.0, 0.0, 0.0],
        surface,
    );

    data
}

/// Distance along the unit direction `(dx, dy)` at which a ray from the
/// origin reaches the rectangle `[-w, w] × [-h, h]`.
///
/// A zero direction component yields an infinite candidate for that axis so
/// the other axis decides.
pub fn ray_to_rect(dx: f32, dy: f32, w: f32, h: f32) -> f32 {
    let sx = if dx.abs() > f32::EPSILON {
        w / dx.abs()
    } else {
        f32::INFINITY
    };
    let sy = if dy.abs() > f32::EPSILON {
        h / dy.abs()
    } else {
        f32::INFINITY
    };
    sx.min(sy)
}

/// Angles at which the bore rings are sampled: `segments` uniform steps plus
/// the four rectangle-corner directions so the annulus reaches every corner.
fn ring_angles(segments: u32, w: f32, h: f32) -> Vec<f32> {
    let segs = segments.max(3);
    let mut angles: Vec<f32> = (0..segs)
        .map(|k| k as f32 * 2.0 * PI / segs as f32)
        .collect();

    let corner = h.atan2(w);
    angles.extend_from_slice(&[corner, PI - corner, PI + corner, 2.0 * PI - corner]);
    angles.sort_by(|a, b| a.total_cmp(b));
    angles.dedup_by(|a, b| (*a - *b).abs() < 1e-4);
    angles
}

/// Generate a box with a cylindrical bore along local Z
///
/// The front and back faces are annuli between the bore circle and the
/// rectangle boundary, built by projecting each circle sample outward along
/// its ray. The bore wall is a ruled surface between the front and back
/// circles with inward normals.
pub fn bored_box(bored: &BoredBox, surface: &Surface) -> GeometryData {
    let mut data = GeometryData::new();
    let (w, h, d) = (bored.half.x, bored.half.y, bored.half.z);
    let r = bored.radius;
    let angles = ring_angles(bored.segments, w, h);
    let n = angles.len() as u32;

    let uv = |x: f32, y: f32| [x / (2.0 * w) + 0.5, y / (2.0 * h) + 0.5];

    // Front and back annuli: vertex pairs (circle, rectangle) per angle
    for (z, normal) in [(d, [0.0, 0.0, 1.0]), (-d, [0.0, 0.0, -1.0])] {
        let base = data.positions.len() as u32;
        for &theta in &angles {
            let (s, c) = theta.sin_cos();
            let t = ray_to_rect(c, s, w, h);
            data.push_vertex([r * c, r * s, z], normal, uv(r * c, r * s), surface);
            data.push_vertex([t * c, t * s, z], normal, uv(t * c, t * s), surface);
        }
        for k in 0..n {
            let inner0 = base + 2 * k;
            let outer0 = inner0 + 1;
            let inner1 = base + 2 * ((k + 1) % n);
            let outer1 = inner1 + 1;
            if z > 0.0 {
                data.push_triangle(inner0, outer0, outer1);
                data.push_triangle(inner0, outer1, inner1);
            } else {
                data.push_triangle(inner0, outer1, outer0);
                data.push_triangle(inner0, inner1, outer1);
            }
        }
    }

    // Bore wall
    let base = data.positions.len() as u32;
    for (k, &theta) in angles.iter().enumerate() {
        let (s, c) = theta.sin_cos();
        let normal = [-c, -s, 0.0];
        let u = k as f32 / n as f32;
        data.push_vertex([r * c, r * s, d], normal, [u, 1.0], surface);
        data.push_vertex([r * c, r * s, -d], normal, [u, 0.0], surface);
    }
    for k in 0..n {
        let front0 = base + 2 * k;
        let back0 = front0 + 1;
        let front1 = base + 2 * ((k + 1) % n);
        let back1 = front1 + 1;
        data.push_triangle(front0, front1, back0);
        data.push_triangle(back0, front1, back1);
    }

    // Outer side walls
    data.push_quad(
        [[w, -h, d], [w, -h, -d], [w, h, -d], [w, h, d]],
        [1.0, 0.0, 0.0],
        surface,
    );
    data.push_quad(
        [[-w, -h, -d], [-w, -h, d], [-w, h, d], [-w, h, -d]],
        [-1.0, 0.0, 0.0],
        surface,
    );
    data.push_quad(
        [[-w, h, d], [w, h, d], [w, h, -d], [-w, h, -d]],
        [0.0, 1.0, 0.0],
        surface,
    );
    data.push_quad(
        [[-w, -h, -d], [w, -h, -d], [w, -h, d], [-w, -h, d]],
        [0.0, -1.0, 0.0],
        surface,
    );

    data
}
