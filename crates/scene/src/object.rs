use bitflags::bitflags;
use gimbal_assets::{LineHandle, MeshHandle};
use gimbal_common::{Rgb, Transform};
use glam::Vec3;
use std::fmt;

/// Weight the diffuse shader applies to the ambient term.
pub const AMBIENT_SCALE: f32 = 0.75;

/// Per-object lighting coefficients, one RGB weight per term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.4),
            diffuse: Vec3::splat(0.8),
        }
    }
}

impl Material {
    /// Default material with both terms multiplied by `color`.
    pub fn tinted(color: Rgb) -> Self {
        let base = Self::default();
        Self {
            ambient: base.ambient * color.0,
            diffuse: base.diffuse * color.0,
        }
    }

    /// Full-bright, unlit material: ambient cancels [`AMBIENT_SCALE`], no diffuse.
    pub fn emissive() -> Self {
        Self {
            ambient: Vec3::splat(1.0 / AMBIENT_SCALE),
            diffuse: Vec3::ZERO,
        }
    }
}

/// What an object draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Mesh(MeshHandle),
    Lines(LineHandle),
}

bitflags! {
    /// Set of render passes an object takes part in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Passes: u8 {
        /// Depth-only pass from the light camera.
        const SHADOW = 1 << 0;
        /// Lit pass into the back buffer.
        const COLOR = 1 << 1;
        /// Screen-space overlay after the color pass.
        const POST_PROCESS = 1 << 2;
    }
}

impl fmt::Display for Passes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(&name.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// One drawable in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub geometry: Geometry,
    pub transform: Transform,
    pub material: Material,
    pub visible: bool,
    pub passes: Passes,
}

impl SceneObject {
    /// Visible object in the shadow and color passes with the default material.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
            transform: Transform::default(),
            material: Material::default(),
            visible: true,
            passes: Passes::SHADOW | Passes::COLOR,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_passes(mut self, passes: Passes) -> Self {
        self.passes = passes;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_bitset() {
        let p = Passes::SHADOW | Passes::COLOR;
        assert!(p.contains(Passes::SHADOW));
        assert!(p.contains(Passes::COLOR));
        assert!(!p.contains(Passes::POST_PROCESS));
        assert!(Passes::empty().is_empty());
        assert_eq!(p.to_string(), "shadow|color");
        assert_eq!(Passes::POST_PROCESS.to_string(), "post_process");
        assert_eq!(Passes::empty().to_string(), "none");
    }

    #[test]
    fn tinted_material_scales_both_terms() {
        let m = Material::tinted(Rgb::RED);
        assert_eq!(m.ambient, Vec3::new(0.4, 0.0, 0.0));
        assert_eq!(m.diffuse, Vec3::new(0.8, 0.0, 0.0));
    }

    #[test]
    fn emissive_cancels_ambient_scale() {
        let m = Material::emissive();
        assert!((m.ambient.x * AMBIENT_SCALE - 1.0).abs() < 1e-6);
        assert_eq!(m.diffuse, Vec3::ZERO);
    }

    #[test]
    fn builder_defaults() {
        let obj = SceneObject::new("quad", Geometry::Mesh(MeshHandle(7)))
            .with_passes(Passes::POST_PROCESS)
            .hidden();
        assert!(!obj.visible);
        assert_eq!(obj.passes, Passes::POST_PROCESS);
        assert_eq!(obj.material, Material::default());
    }
}
