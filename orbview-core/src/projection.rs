/// Camera, projection and pointer unprojection
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::error::{Error, Result};
use crate::ray::Ray;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera looking at the scene
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in radians
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 75f64.to_radians(),
            aspect: width as f64 / height.max(1) as f64,
            near: 0.1,
            far: 1000.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f64 / height.max(1) as f64;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
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

    /// Project a scene point to screen space; `None` if it falls outside the
    /// view volume. Returns (x, y, ndc depth).
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let view_proj = self.projection_matrix() * self.view_matrix();
        let ndc = view_proj.transform_point(point);

        if !(-1.0..=1.0).contains(&ndc.x)
            || !(-1.0..=1.0).contains(&ndc.y)
            || !(-1.0..=1.0).contains(&ndc.z)
        {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f64;

        Some((screen_x, screen_y, ndc.z))
    }

    /// Ray through a pointer position given in normalized device
    /// coordinates (`[-1, 1]` on both axes, +y up).
    pub fn ray_from_ndc(&self, ndc: Point2<f64>) -> Result<Ray> {
        let inverse = (self.projection_matrix() * self.view_matrix())
            .try_inverse()
            .ok_or(Error::SingularProjection)?;

        match self.mode {
            ProjectionMode::Perspective => {
                let through = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 0.5));
                Ray::new(self.position, through - self.position)
            }
            ProjectionMode::Orthographic => {
                let origin = inverse.transform_point(&Point3::new(ndc.x, ndc.y, -1.0));
                Ray::new(origin, self.target - self.position)
            }
        }
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

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let camera = Camera::new(800, 600);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
        assert!(depth > -1.0 && depth < 1.0);

        // Behind the camera
        assert!(camera
            .project_to_screen(&Point3::new(0.0, 0.0, 10.0), 800, 600)
            .is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(800, 600);
        let ray = camera.ray_from_ndc(Point2::new(0.0, 0.0)).unwrap();
        assert!((ray.origin - camera.position).norm() < 1e-12);
        assert!((ray.direction.into_inner() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-9);
    }

    #[test]
    fn test_ray_round_trips_projection() {
        let camera = Camera::new(800, 600);
        let point = Point3::new(0.8, -0.4, 0.5);
        let (sx, sy, _) = camera.project_to_screen(&point, 800, 600).unwrap();
        let ndc = Point2::new(sx / 800.0 * 2.0 - 1.0, 1.0 - sy / 600.0 * 2.0);

        let ray = camera.ray_from_ndc(ndc).unwrap();
        let hit = ray.sphere_distance(&point, 1e-3);
        assert!(hit.is_some());
    }

    #[test]
    fn test_orthographic_ray_is_parallel() {
        let mut camera = Camera::new(800, 600);
        camera.mode = ProjectionMode::Orthographic;
        let a = camera.ray_from_ndc(Point2::new(-0.5, 0.5)).unwrap();
        let b = camera.ray_from_ndc(Point2::new(0.5, -0.5)).unwrap();
        assert!((a.direction.into_inner() - b.direction.into_inner()).norm() < 1e-12);
        assert!((a.origin - b.origin).norm() > 0.1);
    }
}
