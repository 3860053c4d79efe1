use crate::object::Geometry;
use crate::scene::Scene;
use glam::Vec3;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(15.25, 7.3, -11.85),
            target: Vec3::new(0.0, 6.0, 0.0),
            fov_degrees: (2.0 * (0.25_f32 / 0.4).atan()).to_degrees(),
        }
    }
}

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable description of the scene.
///
/// Used for CLI output and for testing scene setup without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let d = scene.light.direction;
        let _ = writeln!(
            out,
            "=== Scene (objects={}, light=({:.1}, {:.1}, {:.1})) ===",
            scene.len(),
            d.x,
            d.y,
            d.z
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.1}, {:.1}, {:.1}) fov={:.1}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        for (id, object) in scene.objects() {
            let t = &object.transform;
            let kind = match object.geometry {
                Geometry::Mesh(_) => "mesh",
                Geometry::Lines(_) => "lines",
            };
            let (axis, angle) = t.rotation.to_axis_angle();
            let _ = writeln!(
                out,
                "  [{:>2}] {:<14} {:<5} pos=({:.2}, {:.2}, {:.2}) scale={:.2} rot={:.1}deg@({:.2}, {:.2}, {:.2}) passes={}{}",
                id.0,
                object.name,
                kind,
                t.position.x,
                t.position.y,
                t.position.z,
                t.scale.max_element(),
                angle.to_degrees(),
                axis.x,
                axis.y,
                axis.z,
                object.passes,
                if object.visible { "" } else { " (hidden)" }
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Passes, SceneObject};
    use crate::scene::DirectionalLight;
    use gimbal_assets::{LineHandle, MeshHandle};

    #[test]
    fn empty_scene() {
        let scene = Scene::new(DirectionalLight {
            direction: Vec3::new(4.0, -12.0, 4.0),
        });
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("objects=0"));
        assert!(output.contains("light=(4.0, -12.0, 4.0)"));
        assert!(output.contains("eye=(15.25, 7.30, -11.85)"));
    }

    #[test]
    fn lists_objects_with_passes() {
        let mut scene = Scene::new(DirectionalLight {
            direction: Vec3::NEG_Y,
        });
        scene.add(SceneObject::new("ship", Geometry::Mesh(MeshHandle(1))));
        scene.add(
            SceneObject::new("frame", Geometry::Lines(LineHandle(1)))
                .with_passes(Passes::COLOR)
                .hidden(),
        );
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("ship"));
        assert!(output.contains("passes=shadow|color"));
        assert!(output.contains("lines"));
        assert!(output.contains("(hidden)"));
    }

    #[test]
    fn default_view_fov_from_focal_length() {
        let view = RenderView::default();
        assert!((view.fov_degrees - 64.01).abs() < 0.01);
    }
}
