//! Pivot-anchored transforms and normal matrices
//!
//! "Anchored X at P" is `T(P) · X · T(-P)`: the operation happens about `P`,
//! so `P` itself does not move.

use cgmath::{Deg, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

/// Wraps `op` so it acts about `pivot`
pub fn anchored(pivot: Vector3<f32>, op: Matrix4<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(pivot) * op * Matrix4::from_translation(-pivot)
}

pub fn anchored_scale(pivot: Vector3<f32>, factor: f32) -> Matrix4<f32> {
    anchored(pivot, Matrix4::from_scale(factor))
}

pub fn anchored_rotation_x(pivot: Vector3<f32>, angle: Deg<f32>) -> Matrix4<f32> {
    anchored(pivot, Matrix4::from_angle_x(angle))
}

pub fn anchored_translation(pivot: Vector3<f32>, offset: Vector3<f32>) -> Matrix4<f32> {
    anchored(pivot, Matrix4::from_translation(offset))
}

/// `Rz · Ry · Rx` from an Euler triple in degrees
pub fn euler_rotation(degrees: [f32; 3]) -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(degrees[2]))
        * Matrix4::from_angle_y(Deg(degrees[1]))
        * Matrix4::from_angle_x(Deg(degrees[0]))
}

/// Inverse-transpose of the upper 3×3 block.
///
/// A singular block (zero scale) falls back to identity; the object is
/// collapsed anyway so its lighting is irrelevant.
pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        model_view.x.truncate(),
        model_view.y.truncate(),
        model_view.z.truncate(),
    );
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::identity)
}

pub fn transform_point(m: &Matrix4<f32>, p: Vector3<f32>) -> Vector3<f32> {
    let out = m * Vector4::new(p.x, p.y, p.z, 1.0);
    Vector3::new(out.x, out.y, out.z)
}

#[cfg(test)]
pub(crate) mod test_util {
    use cgmath::{InnerSpace, Matrix4, Vector3};

    pub fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>, eps: f32) {
        assert!((a - b).magnitude() < eps, "{:?} != {:?}", a, b);
    }

    pub fn assert_mat_close(a: &Matrix4<f32>, b: &Matrix4<f32>, eps: f32) {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < eps, "{:?} != {:?}", a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;
    use cgmath::InnerSpace;
    use rand::Rng;

    #[test]
    fn test_anchored_ops_leave_pivot_in_place() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let pivot = Vector3::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
            );
            let factor = rng.random_range(0.05..10.0);
            let angle = Deg(rng.random_range(-720.0..720.0));

            assert_vec_close(transform_point(&anchored_scale(pivot, factor), pivot), pivot, 1e-4);
            assert_vec_close(
                transform_point(&anchored_rotation_x(pivot, angle), pivot),
                pivot,
                1e-4,
            );
            let arbitrary = anchored(pivot, euler_rotation([angle.0, 2.0 * angle.0, -angle.0]));
            assert_vec_close(transform_point(&arbitrary, pivot), pivot, 1e-4);
        }
    }

    #[test]
    fn test_anchored_scale_moves_other_points_relative_to_pivot() {
        let pivot = Vector3::new(1.0, 0.0, 0.0);
        let m = anchored_scale(pivot, 2.0);
        assert_vec_close(
            transform_point(&m, Vector3::new(2.0, 1.0, 0.0)),
            Vector3::new(3.0, 2.0, 0.0),
            1e-6,
        );
    }

    #[test]
    fn test_euler_rotation_order() {
        // X first, then Y: +Y -> (X 90°) +Z -> (Y 90°) +X
        let m = euler_rotation([90.0, 90.0, 0.0]);
        assert_vec_close(
            transform_point(&m, Vector3::new(0.0, 1.0, 0.0)),
            Vector3::new(1.0, 0.0, 0.0),
            1e-5,
        );
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let m = Matrix4::from_nonuniform_scale(3.0, 1.0, 0.5) * euler_rotation([20.0, 35.0, 0.0]);
        let n = normal_matrix(&m);

        // Tangent on a plane with normal +Y, transformed as a direction.
        let tangent = Vector3::new(1.0, 0.0, 1.0);
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let t = (m * tangent.extend(0.0)).truncate();
        let nn = n * normal;
        assert!(t.dot(nn).abs() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let m = euler_rotation([10.0, 20.0, 30.0]);
        let n = normal_matrix(&m);
        let v = Vector3::new(0.3, -0.2, 0.9);
        let expected = (m * v.extend(0.0)).truncate();
        assert_vec_close(n * v, expected, 1e-5);
    }

    #[test]
    fn test_singular_normal_matrix_falls_back_to_identity() {
        let n = normal_matrix(&Matrix4::from_scale(0.0));
        assert_eq!(n, Matrix3::identity());
    }
}
