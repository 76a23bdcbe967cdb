//! CPU rasterizer backend
//!
//! Edge-function triangle fill with a depth buffer and Bresenham lines for
//! the wireframe loops. Lighting is evaluated per vertex and interpolated
//! perspective-correctly; the textured panel modulates the sampled texel by
//! the interpolated light.

use std::ops::Range;
use std::path::Path;

use cgmath::{Matrix3, Matrix4, Vector3, Vector4};
use image::{Rgba, RgbaImage};

use super::draw::{submit, DrawCommand, RenderTarget, Topology};
use crate::error::Result;
use crate::gfx::frame::Frame;
use crate::gfx::geometry::GeometryData;
use crate::gfx::lighting::ViewLight;
use crate::gfx::texture::TextureSlot;

/// Vertices closer than this to the eye plane drop their whole primitive
const MIN_W: f32 = 1e-4;
/// Lines win depth ties against the faces they outline
const LINE_DEPTH_BIAS: f32 = 1e-4;

pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    color: Vec<[f32; 4]>,
    depth: Vec<f32>,
}

/// Counters from the last [`SoftwareRenderer::render`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub draw_calls: usize,
    pub triangles: usize,
    pub lines: usize,
    pub clipped: usize,
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let len = pixel_count(width, height);
        Self {
            width,
            height,
            color: vec![[0.0; 4]; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn clear(&mut self, background: [f32; 4]) {
        self.color.fill(background);
        self.depth.fill(f32::INFINITY);
    }

    /// Clears to the frame's background and draws every command
    pub fn render(
        &mut self,
        frame: &Frame,
        geometry: &GeometryData,
        texture: &TextureSlot,
    ) -> RasterStats {
        self.clear(frame.background);
        let projection = frame.projection.matrix(self.aspect());
        let mut pass = SoftwarePass {
            fb: self,
            geometry,
            texture,
            light: &frame.light,
            projection,
            bound: None,
            stats: RasterStats::default(),
        };
        submit(&frame.commands, &mut pass);
        let stats = pass.stats;
        log::debug!(
            "Software pass: {} draws, {} triangles, {} lines, {} clipped",
            stats.draw_calls,
            stats.triangles,
            stats.lines,
            stats.clipped
        );
        stats
    }

    /// NDC depth at a pixel, `INFINITY` where nothing was drawn
    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depth[(y * self.width + x) as usize]
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        to_rgba8(self.color[(y * self.width + x) as usize])
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(self.pixel(x, y)))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image().save(path.as_ref())?;
        Ok(())
    }

    fn plot(&mut self, x: usize, y: usize, z: f32, color: [f32; 4]) {
        let offset = y * self.width as usize + x;
        if z < self.depth[offset] {
            self.depth[offset] = z;
            self.color[offset] = color;
        }
    }
}

fn to_rgba8(c: [f32; 4]) -> [u8; 4] {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(c[0]), q(c[1]), q(c[2]), q(c[3])]
}

/// A vertex after projection to pixel space
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
    color: [f32; 4],
    uv: [f32; 2],
}

struct SoftwarePass<'a> {
    fb: &'a mut SoftwareRenderer,
    geometry: &'a GeometryData,
    texture: &'a TextureSlot,
    light: &'a ViewLight,
    projection: Matrix4<f32>,
    bound: Option<Bound>,
    stats: RasterStats,
}

#[derive(Clone, Copy)]
struct Bound {
    model_view: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    textured: bool,
}

impl RenderTarget for SoftwarePass<'_> {
    fn bind(&mut self, command: &DrawCommand) {
        self.bound = Some(Bound {
            model_view: command.model_view,
            normal_matrix: command.normal_matrix,
            textured: command.textured,
        });
    }

    fn draw_elements(&mut self, topology: Topology, indices: Range<u32>) {
        let Some(bound) = self.bound else {
            return;
        };
        self.stats.draw_calls += 1;
        let geometry = self.geometry;
        let end = (indices.end as usize).min(geometry.indices.len());
        let start = (indices.start as usize).min(end);
        let slice = &geometry.indices[start..end];

        match topology {
            Topology::TriangleList => {
                for tri in slice.chunks_exact(3) {
                    let v = [
                        self.project(&bound, tri[0]),
                        self.project(&bound, tri[1]),
                        self.project(&bound, tri[2]),
                    ];
                    match v {
                        [Some(a), Some(b), Some(c)] => {
                            self.fill_triangle(&a, &b, &c, bound.textured);
                            self.stats.triangles += 1;
                        }
                        _ => self.stats.clipped += 1,
                    }
                }
            }
            Topology::LineLoop => {
                let projected: Option<Vec<_>> =
                    slice.iter().map(|&i| self.project(&bound, i)).collect();
                let Some(points) = projected else {
                    self.stats.clipped += 1;
                    return;
                };
                let n = points.len();
                if n < 2 {
                    return;
                }
                for i in 0..n {
                    self.draw_line(&points[i], &points[(i + 1) % n]);
                    self.stats.lines += 1;
                }
            }
        }
    }
}

impl SoftwarePass<'_> {
    fn project(&self, bound: &Bound, index: u32) -> Option<ScreenVertex> {
        let g = self.geometry;
        let i = index as usize;
        let p = g.positions.get(i)?;
        let view = bound.model_view * Vector4::new(p[0], p[1], p[2], 1.0);
        let clip = self.projection * view;
        if clip.w < MIN_W {
            return None;
        }

        let n = bound.normal_matrix * Vector3::from(g.normals[i]);
        let base = if bound.textured {
            [1.0, 1.0, 1.0, 1.0]
        } else {
            g.colors[i]
        };
        let color = self.light.shade(view.truncate(), n, base, g.shininess[i]);

        let inv_w = 1.0 / clip.w;
        let (w, h) = (self.fb.width as f32, self.fb.height as f32);
        Some(ScreenVertex {
            x: (clip.x * inv_w + 1.0) * 0.5 * w,
            y: (1.0 - clip.y * inv_w) * 0.5 * h,
            z: clip.z * inv_w,
            inv_w,
            color,
            uv: g.tex_coords[i],
        })
    }

    fn fill_triangle(&mut self, v0: &ScreenVertex, v1: &ScreenVertex, v2: &ScreenVertex, textured: bool) {
        let (w, h) = (self.fb.width as f32, self.fb.height as f32);
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0);
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(w - 1.0);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0);
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(h - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let area = edge_function(v0, v1, v2.x, v2.y);
        if area.abs() < f32::EPSILON {
            return;
        }

        // No culling: both windings fill, so normalize by the signed area.
        for y in min_y as usize..=max_y as usize {
            for x in min_x as usize..=max_x as usize {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let b0 = edge_function(v1, v2, px, py) / area;
                let b1 = edge_function(v2, v0, px, py) / area;
                let b2 = edge_function(v0, v1, px, py) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let z = b0 * v0.z + b1 * v1.z + b2 * v2.z;
                if !(-1.0..=1.0).contains(&z) {
                    continue;
                }

                // Perspective-correct weights
                let q0 = b0 * v0.inv_w;
                let q1 = b1 * v1.inv_w;
                let q2 = b2 * v2.inv_w;
                let qs = q0 + q1 + q2;
                let (q0, q1, q2) = (q0 / qs, q1 / qs, q2 / qs);

                let mut color = [0.0; 4];
                for (c, out) in color.iter_mut().enumerate() {
                    *out = q0 * v0.color[c] + q1 * v1.color[c] + q2 * v2.color[c];
                }
                if textured {
                    let uv = [
                        q0 * v0.uv[0] + q1 * v1.uv[0] + q2 * v2.uv[0],
                        q0 * v0.uv[1] + q1 * v1.uv[1] + q2 * v2.uv[1],
                    ];
                    let texel = self.texture.sample(uv);
                    for c in 0..4 {
                        color[c] *= texel[c];
                    }
                }
                self.fb.plot(x, y, z, color);
            }
        }
    }

    /// Bresenham between two projected points, depth interpolated along the
    /// major axis
    fn draw_line(&mut self, a: &ScreenVertex, b: &ScreenVertex) {
        let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
        let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let steps = dx.max(-dy).max(1) as f32;
        let mut step = 0.0;
        let (w, h) = (self.fb.width as i64, self.fb.height as i64);

        loop {
            if x0 >= 0 && x0 < w && y0 >= 0 && y0 < h {
                let t = step / steps;
                let z = a.z + (b.z - a.z) * t - LINE_DEPTH_BIAS;
                if (-1.0..=1.0).contains(&z) {
                    let mut color = [0.0; 4];
                    for (c, out) in color.iter_mut().enumerate() {
                        *out = a.color[c] + (b.color[c] - a.color[c]) * t;
                    }
                    self.fb.plot(x0 as usize, y0 as usize, z, color);
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1.0;
        }
    }
}

fn edge_function(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::frame::DeskScene;
    use crate::gfx::input::InputSnapshot;

    fn covered(fb: &SoftwareRenderer) -> usize {
        let mut n = 0;
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.depth_at(x, y).is_finite() {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_buffers_hold_one_entry_per_pixel() {
        let fb = SoftwareRenderer::new(7, 5);
        assert_eq!(fb.color.len(), 35);
        assert_eq!(fb.depth.len(), 35);
        // Zero dimensions are clamped to one pixel
        assert_eq!(SoftwareRenderer::new(0, 3).color.len(), 3);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_pixel_count_does_not_wrap_at_u32() {
        assert_eq!(pixel_count(70_000, 70_000), 4_900_000_000);
        assert_eq!(pixel_count(u32::MAX, 2), 2 * u32::MAX as usize);
    }

    #[test]
    fn test_default_scene_covers_part_of_the_image() {
        let mut scene = DeskScene::new();
        let frame = scene.render_frame(&InputSnapshot::default());
        let mut fb = SoftwareRenderer::new(96, 72);
        let stats = fb.render(&frame, scene.geometry(), scene.texture());

        assert!(stats.triangles > 0);
        assert_eq!(stats.lines, 0);
        let n = covered(&fb);
        assert!(n > 0 && n < 96 * 72, "covered {} pixels", n);
    }

    #[test]
    fn test_background_shows_where_nothing_is_drawn() {
        let mut scene = DeskScene::new();
        let mut input = InputSnapshot::default();
        input.background = [1.0, 0.0, 0.0, 1.0];
        // Look away from the desk
        input.camera.at = [0.0, 1.2, 50.0];
        let frame = scene.render_frame(&input);
        let mut fb = SoftwareRenderer::new(32, 24);
        fb.render(&frame, scene.geometry(), scene.texture());
        assert_eq!(fb.pixel(16, 2), [255, 0, 0, 255]);
    }

    #[test]
    fn test_wireframe_draws_lines_only() {
        let mut scene = DeskScene::new();
        let mut input = InputSnapshot::default();
        input.wireframe = true;
        let frame = scene.render_frame(&input);
        let mut fb = SoftwareRenderer::new(64, 48);
        let stats = fb.render(&frame, scene.geometry(), scene.texture());

        assert_eq!(stats.triangles, 0);
        assert!(stats.lines > 0);
        // One loop of three lines per triangle
        assert_eq!(stats.lines % 3, 0);
    }
}
