use cgmath::{InnerSpace, Matrix4, Vector3};

use super::camera_utils::{Camera, CameraParams};

/// Spherical camera around a target point, Y up.
///
/// Produces the eye/at/up triple the rest of the scene consumes, so an
/// interactive front end can drive it while the core only ever sees
/// [`CameraParams`].
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    /// Elevation in radians
    pub pitch: f32,
    /// Azimuth in radians, 0 looks down -Z from +Z
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
}

impl Camera for OrbitCamera {
    fn view_matrix(&self) -> Matrix4<f32> {
        self.params().view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: target, // recomputed below
            target,
            bounds: OrbitCameraBounds::default(),
        };
        camera.update();
        camera
    }

    /// Orbit that reproduces a look-at pair
    pub fn from_params(params: &CameraParams) -> Self {
        let target = Vector3::from(params.at);
        let offset = Vector3::from(params.eye) - target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return Self::new(1.0, 0.0, 0.0, target);
        }
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target)
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    pub fn params(&self) -> CameraParams {
        CameraParams {
            eye: self.eye.into(),
            at: self.target.into(),
            up: [0.0, 1.0, 0.0],
        }
    }

    /// Updates the eye after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(16.0),
            // Stay off the poles where `up` would be parallel to the view
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.01,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.01,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::transform::test_util::assert_vec_close;

    #[test]
    fn test_eye_stays_at_distance_from_target() {
        let target = Vector3::new(0.0, 0.4, 0.0);
        let mut camera = OrbitCamera::new(3.0, 0.3, 0.0, target);
        for _ in 0..12 {
            camera.add_yaw(0.5);
            assert!(((camera.eye - target).magnitude() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_round_trips_default_look_at() {
        let params = CameraParams::default();
        let camera = OrbitCamera::from_params(&params);
        assert_vec_close(camera.eye, Vector3::from(params.eye), 1e-4);
        assert_vec_close(camera.target, Vector3::from(params.at), 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped_off_the_pole() {
        let mut camera = OrbitCamera::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.set_distance(100.0);
        assert_eq!(camera.distance, 16.0);
    }
}
