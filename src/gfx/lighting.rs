//! Phong lighting
//!
//! Lighting runs in view space: every draw's model-view matrix already
//! includes the camera, so the eye sits at the origin and the light position
//! is moved into view space once per frame.

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    /// World-space position
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse_strength: f32,
    pub specular_strength: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: [2.0, 3.0, 2.0],
            color: [1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2],
            diffuse_strength: 0.8,
            specular_strength: 0.5,
        }
    }
}

impl LightParams {
    pub fn in_view_space(&self, view: &Matrix4<f32>) -> ViewLight {
        let p = view * Vector4::new(self.position[0], self.position[1], self.position[2], 1.0);
        ViewLight {
            position: p.truncate(),
            params: *self,
        }
    }
}

/// A light whose position has been moved into view space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLight {
    pub position: Vector3<f32>,
    pub params: LightParams,
}

impl ViewLight {
    /// Per-vertex Phong: ambient + diffuse tint the surface colour, the
    /// specular highlight takes the light colour.
    pub fn shade(
        &self,
        position: Vector3<f32>,
        normal: Vector3<f32>,
        base: [f32; 4],
        shininess: f32,
    ) -> [f32; 4] {
        let n = safe_normalize(normal);
        let l = safe_normalize(self.position - position);
        let v = safe_normalize(-position);

        let lambert = n.dot(l).max(0.0);
        let specular = if lambert > 0.0 {
            let r = reflect(-l, n);
            r.dot(v).max(0.0).powf(shininess.max(1.0))
        } else {
            0.0
        };

        let p = &self.params;
        let mut out = [0.0; 4];
        for i in 0..3 {
            let lit = base[i] * (p.ambient[i] + p.diffuse_strength * lambert * p.color[i])
                + p.specular_strength * specular * p.color[i];
            out[i] = lit.clamp(0.0, 1.0);
        }
        out[3] = base[3];
        out
    }
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.magnitude();
    if len > f32::EPSILON {
        v / len
    } else {
        v
    }
}

/// GPU light block. Must match `Light` in `desk.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub ambient: [f32; 4],
    /// x = diffuse, y = specular
    pub strengths: [f32; 4],
}

impl From<&ViewLight> for LightUniform {
    fn from(light: &ViewLight) -> Self {
        let p = &light.params;
        Self {
            position: [light.position.x, light.position.y, light.position.z, 1.0],
            color: [p.color[0], p.color[1], p.color[2], 1.0],
            ambient: [p.ambient[0], p.ambient[1], p.ambient[2], 1.0],
            strengths: [p.diffuse_strength, p.specular_strength, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    fn light_above() -> ViewLight {
        LightParams {
            position: [0.0, 5.0, 0.0],
            ..Default::default()
        }
        .in_view_space(&Matrix4::identity())
    }

    #[test]
    fn test_facing_surface_is_brighter_than_ambient() {
        let light = light_above();
        let base = [0.5, 0.5, 0.5, 1.0];
        let lit = light.shade(Vector3::new(0.0, 0.0, -3.0), Vector3::unit_y(), base, 32.0);
        let unlit = light.shade(Vector3::new(0.0, 0.0, -3.0), -Vector3::unit_y(), base, 32.0);
        assert!(lit[0] > unlit[0]);
        // Facing away: ambient only
        assert!((unlit[0] - base[0] * 0.2).abs() < 1e-5);
        assert_eq!(lit[3], 1.0);
    }

    #[test]
    fn test_output_is_clamped() {
        let light = LightParams {
            position: [0.0, 0.0, 1.0],
            diffuse_strength: 10.0,
            specular_strength: 10.0,
            ..Default::default()
        }
        .in_view_space(&Matrix4::identity());
        let c = light.shade(Vector3::new(0.0, 0.0, -1.0), Vector3::unit_z(), [1.0; 4], 8.0);
        assert!(c.iter().all(|v| *v <= 1.0));
    }

    #[test]
    fn test_light_moves_with_the_view() {
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -4.0));
        let light = LightParams::default().in_view_space(&view);
        assert!((light.position.z - (2.0 - 4.0)).abs() < 1e-6);
        let uniform = LightUniform::from(&light);
        assert_eq!(uniform.position[3], 1.0);
        assert_eq!(uniform.strengths[0], 0.8);
    }
}
