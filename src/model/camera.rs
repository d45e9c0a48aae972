use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::model::EulerAngles;

/// Perspective camera over the game world basis (+X forward, +Y left, +Z up).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: EulerAngles,
    pub aspect: f32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: EulerAngles::ZERO,
            aspect: 2.0,
            fov_y_degrees: 60.0,
            z_near: 0.1,
            z_far: 300.0,
        }
    }

    pub fn set_position_and_orientation(&mut self, position: Vec3, orientation: EulerAngles) {
        self.position = position;
        self.orientation = orientation;
    }

    pub fn set_perspective(&mut self, aspect: f32, fov_y_degrees: f32, z_near: f32, z_far: f32) {
        self.aspect = aspect;
        self.fov_y_degrees = fov_y_degrees;
        self.z_near = z_near;
        self.z_far = z_far;
    }

    /// Fixed change of basis from the game world into the renderer's view
    /// conventions: forward maps to -Z, left to -X, up to +Y.
    fn render_from_game() -> Mat4 {
        Mat4::from_cols(
            Vec4::new(0.0, 0.0, -1.0, 0.0),
            Vec4::new(-1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::W,
        )
    }

    pub fn view(&self) -> Mat4 {
        let world_from_camera = Mat4::from_translation(self.position) * self.orientation.to_mat4();
        Self::render_from_game() * world_from_camera.inverse()
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.z_near,
            self.z_far,
        );
        proj * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen-space orthographic bounds for overlay placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCamera {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenCamera {
    pub fn new() -> Self {
        Self { min: Vec2::ZERO, max: Vec2::ZERO }
    }

    pub fn set_ortho_view(&mut self, min: Vec2, max: Vec2) {
        self.min = min;
        self.max = max;
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

impl Default for ScreenCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_maps_world_forward_in_front_of_camera() {
        let camera = Camera::new();
        // A point straight ahead of the camera lands on the view -Z axis.
        let ahead = camera.view().transform_point3(Vec3::new(5.0, 0.0, 0.0));
        assert!((ahead - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
        // A point to the camera's left lands on the view -X axis.
        let left = camera.view().transform_point3(Vec3::new(0.0, 3.0, 0.0));
        assert!((left - Vec3::new(-3.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn view_follows_position() {
        let mut camera = Camera::new();
        camera.set_position_and_orientation(Vec3::new(2.0, 0.0, 0.0), EulerAngles::ZERO);
        let origin = camera.view().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn screen_camera_reports_size() {
        let mut screen = ScreenCamera::new();
        screen.set_ortho_view(Vec2::ZERO, Vec2::new(1600.0, 800.0));
        assert_eq!(screen.size(), Vec2::new(1600.0, 800.0));
    }
}
