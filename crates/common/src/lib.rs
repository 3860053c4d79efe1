//! Shared types for the gimbal lock demo: transforms, colors and the
//! YAML configuration every binary starts from.

pub mod config;
pub mod types;

pub use config::{
    AssetConfig, CameraConfig, ConfigError, DemoConfig, LightConfig, RenderConfig, ShadowConfig,
    WindowConfig,
};
pub use types::{Rgb, Transform};
