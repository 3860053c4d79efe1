use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::splat(scale))
    }

    /// Identity-positioned transform carrying the rotation of `rotation`.
    pub fn from_rotation_matrix(rotation: Mat4) -> Self {
        let mut t = Self::default();
        t.set_rotation_matrix(rotation);
        t
    }

    /// Replace the rotation with the one encoded in a pure rotation matrix.
    pub fn set_rotation_matrix(&mut self, rotation: Mat4) {
        self.rotation = Quat::from_mat4(&rotation).normalize();
    }

    /// Model matrix, applied scale first, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const RED: Rgb = Rgb(Vec3::new(1.0, 0.0, 0.0));
    pub const GREEN: Rgb = Rgb(Vec3::new(0.0, 1.0, 0.0));
    pub const BLUE: Rgb = Rgb(Vec3::new(0.0, 0.0, 1.0));

    pub const fn grey(level: f32) -> Self {
        Rgb(Vec3::splat(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_scales_before_translating() {
        let t = Transform::from_position(Vec3::new(0.0, 6.0, 0.0)).with_uniform_scale(0.2);
        let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(0.2, 6.0, 0.0), 1e-6));
    }

    #[test]
    fn rotation_matrix_round_trips_through_quat() {
        let m = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(-1.1);
        assert!(Transform::from_rotation_matrix(m).matrix().abs_diff_eq(m, 1e-5));
    }

    #[test]
    fn grey_is_uniform() {
        assert_eq!(Rgb::grey(0.5).0, Vec3::splat(0.5));
    }
}
