use crate::object::{Passes, SceneObject};
use glam::Vec3;

/// Index of an object in its [`Scene`]; stable because objects are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in, not necessarily normalized.
    pub direction: Vec3,
}

/// Ordered list of scene objects plus the single directional light.
///
/// Objects draw in insertion order within each pass.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    pub light: DirectionalLight,
}

impl Scene {
    pub fn new(light: DirectionalLight) -> Self {
        Self {
            objects: Vec::new(),
            light,
        }
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        tracing::debug!("scene object {} = {:?}", object.name, id);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects.iter().position(|o| o.name == name).map(ObjectId)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    /// Visible objects taking part in `pass`, in draw order.
    pub fn objects_in(&self, pass: Passes) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects()
            .filter(move |(_, o)| o.visible && o.passes.contains(pass))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gimbal_assets::{LineHandle, MeshHandle};
    use crate::object::Geometry;

    fn scene() -> Scene {
        let mut scene = Scene::new(DirectionalLight {
            direction: Vec3::NEG_Y,
        });
        scene.add(SceneObject::new("plane", Geometry::Mesh(MeshHandle(1))));
        scene.add(
            SceneObject::new("frame", Geometry::Lines(LineHandle(2))).with_passes(Passes::COLOR),
        );
        scene.add(
            SceneObject::new("quad", Geometry::Mesh(MeshHandle(3)))
                .with_passes(Passes::POST_PROCESS)
                .hidden(),
        );
        scene
    }

    #[test]
    fn ids_follow_insertion_order() {
        let scene = scene();
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.find("frame"), Some(ObjectId(1)));
        assert_eq!(scene.get(ObjectId(2)).map(|o| o.name.as_str()), Some("quad"));
        assert!(scene.get(ObjectId(3)).is_none());
    }

    #[test]
    fn pass_filter_respects_membership_and_visibility() {
        let mut scene = scene();
        let shadow: Vec<_> = scene.objects_in(Passes::SHADOW).map(|(id, _)| id).collect();
        assert_eq!(shadow, vec![ObjectId(0)]);
        let color: Vec<_> = scene.objects_in(Passes::COLOR).map(|(id, _)| id).collect();
        assert_eq!(color, vec![ObjectId(0), ObjectId(1)]);
        assert_eq!(scene.objects_in(Passes::POST_PROCESS).count(), 0);

        if let Some(quad) = scene.get_mut(ObjectId(2)) {
            quad.visible = true;
        }
        assert_eq!(scene.objects_in(Passes::POST_PROCESS).count(), 1);
    }
}
