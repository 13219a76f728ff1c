use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// First-person perspective camera. Yaw 0 looks down -Z; positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// World-space eye position, w = 1.
    pub position: [f32; 4],
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 70f32.to_radians(),
            aspect,
            near: 0.05,
            far: 100.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Resize the viewport.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_height > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_follows_yaw_and_pitch() {
        let mut cam = Camera::new(16.0 / 9.0);
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
        cam.pitch = std::f32::consts::FRAC_PI_2;
        assert!((cam.forward() - Vec3::Y).length() < 1e-6);
        cam.pitch = 0.0;
        cam.yaw = std::f32::consts::FRAC_PI_2;
        assert!((cam.forward() - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn right_is_perpendicular_to_forward() {
        let mut cam = Camera::new(1.0);
        cam.yaw = 0.7;
        cam.pitch = 0.3;
        assert!(cam.right().dot(cam.forward()).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let mut cam = Camera::new(1.0);
        cam.position = Vec3::new(3.0, 1.7, -2.0);
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(eye.length() < 1e-5);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = Camera::new(1.0);
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(100.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
