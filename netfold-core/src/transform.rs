/// Face poses and the matrices renderers build from them
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Rigid placement of a face: a position and an XYZ Euler rotation (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Vector3<f32>) -> Self {
        Self { position, rotation }
    }

    pub fn from_arrays(position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self {
            position: Vector3::from(position),
            rotation: Vector3::from(rotation),
        }
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }

    /// Translated copy with the same rotation.
    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self {
            position: self.position + offset,
            rotation: self.rotation,
        }
    }

    /// Componentwise linear interpolation towards `other`.
    ///
    /// Written as `a·(1−t) + b·t` so that `t = 0` returns `self` and `t = 1`
    /// returns `other` bit for bit.
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        let s = 1.0 - t;
        Pose {
            position: self.position * s + other.position * t,
            rotation: self.rotation * s + other.rotation * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.rotation.iter()).all(|c| c.is_finite())
    }

    /// Largest absolute difference over all six components.
    pub fn max_deviation(&self, other: &Pose) -> f32 {
        (self.position - other.position)
            .abs()
            .max()
            .max((self.rotation - other.rotation).abs().max())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix for XYZ Euler angles: `Rx · Ry · Rz`.
    pub fn rotation_matrix(rotation: &Vector3<f32>) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Model matrix placing a face at `pose`.
    pub fn model_matrix(pose: &Pose) -> Matrix4<f32> {
        Self::translation_matrix(&pose.position) * Self::rotation_matrix(&pose.rotation)
    }

    /// Model matrix of a face inside a parent group, as in a scene graph.
    pub fn nested_model_matrix(parent: &Matrix4<f32>, pose: &Pose) -> Matrix4<f32> {
        parent * Self::model_matrix(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let folded = Pose::from_arrays([0.1, 0.5, 0.3], [-FRAC_PI_2, 0.0, 0.0]);
        let unfolded = Pose::from_arrays([-1.5, 0.7, 0.0], [0.0, 0.0, 0.0]);

        assert_eq!(folded.lerp(&unfolded, 0.0), folded);
        assert_eq!(folded.lerp(&unfolded, 1.0), unfolded);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Pose::from_arrays([0.0, 0.0, 0.5], [0.0, FRAC_PI_2, 0.0]);
        let b = Pose::from_arrays([2.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.position, Vector3::new(1.0, 0.0, 0.25));
        assert_relative_eq!(mid.rotation, Vector3::new(0.0, FRAC_PI_2 / 2.0, 0.0));
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&Vector3::zeros());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_top_rotation_turns_panel_normal_up() {
        let matrix = Transform::rotation_matrix(&Vector3::new(-FRAC_PI_2, 0.0, 0.0));
        let normal = matrix.transform_vector(&Vector3::z());
        assert_relative_eq!(normal, Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_model_matrix_translates_after_rotating() {
        let pose = Pose::from_arrays([0.5, 0.0, 0.0], [0.0, FRAC_PI_2, 0.0]);
        let model = Transform::model_matrix(&pose);
        let origin = model.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.coords, Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        let normal = model.transform_vector(&Vector3::z());
        assert_relative_eq!(normal, Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_max_deviation() {
        let a = Pose::from_arrays([0.0, 1.0, 0.0], [0.0, 0.0, 0.0]);
        let b = Pose::from_arrays([0.0, 1.25, 0.0], [0.0, 0.0, -0.5]);
        assert_relative_eq!(a.max_deviation(&b), 0.5);
    }
}
