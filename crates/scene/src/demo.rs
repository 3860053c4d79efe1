use crate::object::{Geometry, Material, Passes, SceneObject};
use crate::scene::{DirectionalLight, ObjectId, Scene};
use gimbal_assets::{AssetManager, MeshStore, shapes};
use gimbal_common::{DemoConfig, Rgb, Transform};
use gimbal_kernel::DemoState;
use glam::{Vec2, Vec3};

/// Center of the shuttle and its gimbal rings.
pub const SHIP_POSITION: Vec3 = Vec3::new(0.0, 6.0, 0.0);
pub const SHIP_SCALE: f32 = 0.2;
pub const SHIP_FRAME_SCALE: f32 = 3.0;
pub const RING_SCALE: f32 = 1.35;
/// Relative size of the outer (X), middle (Y) and inner (Z) rings.
pub const RING_SIZES: [f32; 3] = [1.0, 0.8, 0.6];
pub const RING_COLORS: [Rgb; 3] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];
pub const LIGHT_SPHERE_SCALE: f32 = 0.4;

/// The gimbal demo scene and the ids of the objects the frame loop drives.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub scene: Scene,
    pub ship: ObjectId,
    pub ship_frame: ObjectId,
    /// Outer, middle, inner.
    pub rings: [ObjectId; 3],
    pub light_sphere: ObjectId,
    pub shadow_preview: ObjectId,
}

impl DemoScene {
    /// Load or synthesize every mesh into `store` and lay out the scene.
    pub fn build(config: &DemoConfig, assets: &AssetManager, store: &mut MeshStore) -> Self {
        let plane = store.add_mesh(shapes::plane(Vec2::splat(100.0)));
        let sphere = store.add_mesh(shapes::sphere(32, 16));
        let quad = store.add_mesh(shapes::screen_quad());
        let frame = store.add_lines(shapes::coordinate_frame());

        let ship_mesh = store.add_mesh(assets.load_mesh_or(&config.assets.ship_mesh, shapes::shuttle));
        let mut ring_mesh = assets.load_mesh_or(&config.assets.ring_mesh, || {
            shapes::torus(5.0, 0.35, 64, 12)
        });
        ring_mesh.calculate_normals_per_face();
        let ring_mesh = store.add_mesh(ring_mesh);

        let mut scene = Scene::new(DirectionalLight {
            direction: config.light.direction,
        });

        scene.add(
            SceneObject::new("plane", Geometry::Mesh(plane))
                .with_transform(Transform::from_position(Vec3::new(0.0, -4.0, 0.0)))
                .with_material(Material::tinted(Rgb::grey(0.5))),
        );

        let ship = scene.add(
            SceneObject::new("ship", Geometry::Mesh(ship_mesh))
                .with_transform(Transform::from_position(SHIP_POSITION).with_uniform_scale(SHIP_SCALE)),
        );

        scene.add(
            SceneObject::new("world_frame", Geometry::Lines(frame))
                .with_transform(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))),
        );
        let ship_frame = scene.add(
            SceneObject::new("ship_frame", Geometry::Lines(frame)).with_transform(
                Transform::from_position(SHIP_POSITION).with_uniform_scale(SHIP_FRAME_SCALE),
            ),
        );

        let names = ["ring_x", "ring_y", "ring_z"];
        let rings = [0, 1, 2].map(|i| {
            scene.add(
                SceneObject::new(names[i], Geometry::Mesh(ring_mesh))
                    .with_transform(
                        Transform::from_position(SHIP_POSITION)
                            .with_uniform_scale(RING_SCALE * RING_SIZES[i]),
                    )
                    .with_material(Material::tinted(RING_COLORS[i])),
            )
        });

        let light_sphere = scene.add(
            SceneObject::new("light_sphere", Geometry::Mesh(sphere))
                .with_transform(
                    Transform::from_position(-config.light.direction * 2.0)
                        .with_uniform_scale(LIGHT_SPHERE_SCALE),
                )
                .with_material(Material::emissive())
                .with_passes(Passes::COLOR),
        );

        let shadow_preview = scene.add(
            SceneObject::new("shadow_preview", Geometry::Mesh(quad))
                .with_passes(Passes::POST_PROCESS)
                .hidden(),
        );

        tracing::info!(
            "scene built: {} objects, {} meshes in store",
            scene.len(),
            store.len()
        );

        Self {
            scene,
            ship,
            ship_frame,
            rings,
            light_sphere,
            shadow_preview,
        }
    }

    /// Push this frame's rotation, visibility and light placement into the scene.
    pub fn sync(&mut self, state: &DemoState) {
        let rotation = &state.rotation;

        let rings_visible = rotation.rings_visible();
        let pose = rotation.gimbal_pose();
        for (id, matrix) in self.rings.into_iter().zip([pose.outer, pose.middle, pose.inner]) {
            if let Some(ring) = self.scene.get_mut(id) {
                ring.visible = rings_visible;
                if rings_visible {
                    ring.transform.set_rotation_matrix(matrix);
                }
            }
        }

        let ship_rotation = rotation.ship_rotation();
        let mut ship_position = SHIP_POSITION;
        if let Some(ship) = self.scene.get_mut(self.ship) {
            ship.transform.set_rotation_matrix(ship_rotation);
            ship_position = ship.transform.position;
        }
        if let Some(frame) = self.scene.get_mut(self.ship_frame) {
            frame.transform.position = ship_position;
            frame.transform.set_rotation_matrix(ship_rotation);
            frame.transform.scale = Vec3::splat(SHIP_FRAME_SCALE);
        }

        if let Some(preview) = self.scene.get_mut(self.shadow_preview) {
            preview.visible = state.show_shadow_map;
        }

        self.scene.light.direction = state.light.direction;
        if let Some(sphere) = self.scene.get_mut(self.light_sphere) {
            sphere.transform.position = state.light.sphere_position();
        }
    }
}
