/// Orbit camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Keeps the camera off the poles, where the up vector degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;

/// Camera orbiting a target point at a clamped distance
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Point3<f32>,
    /// Rotation around the vertical axis, radians; 0 looks down −z.
    pub yaw: f32,
    /// Elevation above the horizontal plane, radians.
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Point3::origin(),
            yaw: 0.6,
            pitch: 0.45,
            distance: 8.0,
            min_distance: 2.0,
            max_distance: 40.0,
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vector3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn orbit(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw = (self.yaw + dyaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + dpitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Multiplies the distance by `factor`, within the distance limits.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        }
    }

    /// Moves back far enough for a sphere of `radius` around the target to fit.
    pub fn frame_radius(&mut self, radius: f32) {
        let fit = radius / (self.fov / 2.0).sin();
        self.distance = fit.clamp(self.min_distance, self.max_distance);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &Vector3::y())
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = 2.0 * self.distance * (self.fov / 2.0).tan();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space, returning `(x, y, depth)` with
    /// depth in normalized device coordinates (smaller is closer).
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let eye = (self.view_matrix() * model_matrix).transform_point(point);
        if eye.z > -self.near {
            return None;
        }

        let ndc = self.projection_matrix().transform_point(&eye);
        if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_relative_eq!((camera.position() - camera.target).norm(), camera.distance, epsilon = 1e-5);
    }

    #[test]
    fn test_target_projects_to_centre() {
        let camera = Camera::new(80, 40);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert_relative_eq!(x, 40.0, epsilon = 1e-3);
        assert_relative_eq!(y, 20.0, epsilon = 1e-3);
        assert!((-1.0..=1.0).contains(&depth));
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::default();
        let towards = (camera.position() - camera.target).normalize();
        let near = camera
            .project_to_screen(&(Point3::origin() + towards), &Matrix4::identity(), 800, 600)
            .unwrap();
        let far = camera
            .project_to_screen(&(Point3::origin() - towards), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!(near.2 < far.2);
    }

    #[test]
    fn test_points_behind_camera_are_clipped() {
        let camera = Camera::default();
        let behind = camera.position() + (camera.position() - camera.target);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_zoom_and_orbit_limits() {
        let mut camera = Camera::default();
        camera.zoom(0.001);
        assert_eq!(camera.distance, camera.min_distance);
        camera.zoom(1e6);
        assert_eq!(camera.distance, camera.max_distance);
        camera.zoom(f32::NAN);
        assert_eq!(camera.distance, camera.max_distance);

        camera.orbit(0.0, 10.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
    }

    #[test]
    fn test_frame_radius_fits_sphere() {
        let mut camera = Camera::default();
        camera.frame_radius(3.0);
        assert!(camera.distance * (camera.fov / 2.0).sin() >= 3.0 - 1e-4);
    }
}
