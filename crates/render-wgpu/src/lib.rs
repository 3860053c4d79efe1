//! wgpu render backend for the gimbal demo.
//!
//! Draws the scene from the light camera into a shadow map, then lit into the
//! back buffer, then any post-process overlay such as the shadow map preview.
//! Camera uses a free-look model with WASD + mouse look.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Camera motion is NOT part of the demo kernel.
//! - A failed shadow target is logged, never fatal.

mod camera;
mod context;
mod gpu;
mod shaders;

pub use camera::FreeCamera;
pub use context::{GpuContext, RenderError};
pub use gpu::SceneRenderer;
