use gimbal_common::LightConfig;
use glam::{Mat4, Vec3};
use std::ops::RangeInclusive;

pub const VIEW_SIZE_RANGE: RangeInclusive<f32> = 1.0..=200.0;
pub const NEAR_RANGE: RangeInclusive<f32> = 1.0..=300.0;
pub const FAR_RANGE: RangeInclusive<f32> = 1.0..=600.0;

/// Smallest near-to-far gap the light projection accepts.
const MIN_DEPTH_SPAN: f32 = 0.01;

/// Directional light and the orthographic camera that renders its shadow map.
///
/// The camera sits at `-direction * 10` looking along `direction`. Its extent
/// and clip planes are edited from the settings window every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub direction: Vec3,
    /// Half-width and half-height of the orthographic view volume.
    pub view_size: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::from_config(&LightConfig::default())
    }
}

impl LightRig {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            direction: config.direction,
            view_size: config.view_size,
            near: config.near,
            far: config.far,
        }
    }

    pub fn position(&self) -> Vec3 {
        -self.direction * 10.0
    }

    /// Where the small emissive sphere marking the light is drawn.
    pub fn sphere_position(&self) -> Vec3 {
        -self.direction * 2.0
    }

    /// Far plane actually used, never closer than the near plane.
    pub fn effective_far(&self) -> f32 {
        self.far.max(self.near + MIN_DEPTH_SPAN)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let dir = self.direction.try_normalize().unwrap_or(Vec3::NEG_Y);
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_to_rh(self.position(), dir, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let s = self.view_size.max(MIN_DEPTH_SPAN);
        Mat4::orthographic_rh(-s, s, -s, s, self.near, self.effective_far())
    }

    /// World to light clip space, used both to render and to sample the shadow map.
    pub fn light_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rig_positions() {
        let rig = LightRig::default();
        assert_eq!(rig.position(), Vec3::new(-40.0, 120.0, -40.0));
        assert_eq!(rig.sphere_position(), Vec3::new(-8.0, 24.0, -8.0));
    }

    #[test]
    fn origin_lands_inside_default_light_volume() {
        let rig = LightRig::default();
        let clip = rig.light_matrix().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        // |position| is about 132.7, between near 115 and far 150.
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn view_size_scales_clip_extent() {
        let mut rig = LightRig::default();
        let p = Vec3::new(10.0, 0.0, 0.0);
        let wide = rig.light_matrix().project_point3(p);
        rig.view_size = 10.0;
        let narrow = rig.light_matrix().project_point3(p);
        assert!((narrow.x.abs() - 2.0 * wide.x.abs()).abs() < 1e-4);
    }

    #[test]
    fn inverted_planes_stay_finite() {
        let rig = LightRig {
            near: 300.0,
            far: 1.0,
            ..LightRig::default()
        };
        assert!(rig.effective_far() > rig.near);
        assert!(rig.light_matrix().is_finite());
    }

    #[test]
    fn vertical_light_uses_fallback_up() {
        let rig = LightRig {
            direction: Vec3::new(0.0, -1.0, 0.0),
            ..LightRig::default()
        };
        assert!(rig.view_matrix().is_finite());
    }

    #[test]
    fn every_slider_extreme_is_finite() {
        for &size in &[*VIEW_SIZE_RANGE.start(), *VIEW_SIZE_RANGE.end()] {
            for &near in &[*NEAR_RANGE.start(), *NEAR_RANGE.end()] {
                for &far in &[*FAR_RANGE.start(), *FAR_RANGE.end()] {
                    let rig = LightRig {
                        view_size: size,
                        near,
                        far,
                        ..LightRig::default()
                    };
                    assert!(rig.light_matrix().is_finite(), "{size} {near} {far}");
                }
            }
        }
    }
}
