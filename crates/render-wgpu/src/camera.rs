use gimbal_common::CameraConfig;
use glam::{Mat4, Vec3};

/// Half the height of the virtual sensor the focal length is measured against.
const HALF_SENSOR: f32 = 0.25;
const PHI_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Free-look perspective camera driven by spherical angles.
///
/// `theta` turns about world Y, `phi` tilts above or below the horizon.
/// Camera motion lives outside the demo kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeCamera {
    pub position: Vec3,
    pub theta: f32,
    pub phi: f32,
    pub focal_length: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl FreeCamera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            theta: config.theta,
            phi: config.phi.clamp(-PHI_LIMIT, PHI_LIMIT),
            focal_length: config.focal_length,
            aspect,
            near: config.near,
            far: config.far,
            speed: config.speed,
            sensitivity: config.sensitivity,
        }
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        2.0 * (HALF_SENSOR / self.focal_length).atan()
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.theta.cos() * self.phi.cos(),
            self.phi.sin(),
            self.theta.sin() * self.phi.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Move along the camera axes; `local` is (right, up, forward) in units of `speed`.
    pub fn translate(&mut self, local: Vec3, dt: f32) {
        let delta = self.right() * local.x + Vec3::Y * local.y + self.forward() * local.z;
        self.position += delta * self.speed * dt;
    }

    /// Apply a mouse delta in pixels.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.theta += dx * self.sensitivity;
        self.phi = (self.phi - dy * self.sensitivity).clamp(-PHI_LIMIT, PHI_LIMIT);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_at_the_ship() {
        let cam = FreeCamera::default();
        assert_eq!(cam.position, Vec3::new(15.25, 7.3, -11.85));
        let to_ship = (Vec3::new(0.0, 6.0, 0.0) - cam.position).normalize();
        assert!(cam.forward().dot(to_ship) > 0.9);

        let clip = cam.view_projection() * Vec3::new(0.0, 6.0, 0.0).extend(1.0);
        assert!(clip.w > 0.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn fov_from_focal_length() {
        let cam = FreeCamera::default();
        assert!((cam.fov_y() - 2.0 * 0.625_f32.atan()).abs() < 1e-6);
        let long = FreeCamera {
            focal_length: 2.0,
            ..cam.clone()
        };
        assert!(long.fov_y() < cam.fov_y());
    }

    #[test]
    fn translate_moves_along_forward() {
        let mut cam = FreeCamera::default();
        let start = cam.position;
        cam.translate(Vec3::Z, 0.5);
        let moved = cam.position - start;
        assert!((moved.length() - cam.speed * 0.5).abs() < 1e-4);
        assert!(moved.normalize().abs_diff_eq(cam.forward(), 1e-5));
    }

    #[test]
    fn look_clamps_phi() {
        let mut cam = FreeCamera::default();
        cam.look(0.0, -1.0e6);
        assert!((cam.phi - PHI_LIMIT).abs() < 1e-6);
        cam.look(0.0, 1.0e6);
        assert!((cam.phi + PHI_LIMIT).abs() < 1e-6);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = FreeCamera::default();
        cam.set_viewport(800, 0);
        assert_eq!(cam.aspect, 800.0);
        cam.set_viewport(1920, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}
