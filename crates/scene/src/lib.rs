//! Scene description for the gimbal demo: objects, materials, pass
//! membership, and the demo's own layout.
//!
//! # Invariants
//! - Renderers read the scene, they never mutate it.
//! - Scene state is derived from [`gimbal_kernel::DemoState`] once per frame via
//!   [`DemoScene::sync`].
//! - Geometry is referenced by [`gimbal_assets::MeshStore`] handle.

mod demo;
mod object;
mod renderer;
mod scene;

pub use demo::{
    DemoScene, LIGHT_SPHERE_SCALE, RING_COLORS, RING_SCALE, RING_SIZES, SHIP_FRAME_SCALE,
    SHIP_POSITION, SHIP_SCALE,
};
pub use object::{AMBIENT_SCALE, Geometry, Material, Passes, SceneObject};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{DirectionalLight, ObjectId, Scene};
