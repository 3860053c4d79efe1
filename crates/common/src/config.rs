use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors from loading or saving a demo configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Top-level demo configuration.
///
/// Every section falls back to its defaults, so an empty file is valid.
/// The defaults reproduce the classic shadow-mapped gimbal scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub shadow: ShadowConfig,
    pub assets: AssetConfig,
    pub render: RenderConfig,
    /// Key name (e.g. `KeyU`) to action name (e.g. `IncreaseX`) overrides.
    pub bindings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            title: "Gimbal Lock".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Heading around the vertical axis, radians.
    pub theta: f32,
    /// Elevation, radians.
    pub phi: f32,
    pub focal_length: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(15.25, 7.3, -11.85),
            theta: 2.347,
            phi: -0.326,
            focal_length: 0.4,
            near: 0.1,
            far: 200.0,
            speed: 10.0,
            sensitivity: 0.003,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub direction: Vec3,
    pub view_size: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::new(4.0, -12.0, 4.0),
            view_size: 20.0,
            near: 115.0,
            far: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Edge length of the square shadow map, in texels.
    pub map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self { map_size: 4096 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub meshes: PathBuf,
    pub ship_mesh: String,
    pub ring_mesh: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Assets/"),
            meshes: PathBuf::from("Meshes/"),
            ship_mesh: "SpaceShuttle.obj".into(),
            ring_mesh: "ring.obj".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Grey level the back buffer is cleared to.
    pub clear_color: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { clear_color: 0.3 }
    }
}

impl DemoConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_default() {
        let config = DemoConfig::from_yaml("{}").unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = DemoConfig::from_yaml("light:\n  view_size: 42.0\n").unwrap();
        assert_eq!(config.light.view_size, 42.0);
        assert_eq!(config.light.near, 115.0);
        assert_eq!(config.light.direction, Vec3::new(4.0, -12.0, 4.0));
        assert_eq!(config.window.width, 1920);
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = DemoConfig::default();
        config.bindings.insert("KeyP".into(), "LockRotation".into());
        let text = config.to_yaml().unwrap();
        assert_eq!(DemoConfig::from_yaml(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "window:\n  width: 800\n  height: 600").unwrap();
        let config = DemoConfig::load(tmp.path()).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.title, "Gimbal Lock");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DemoConfig::load("/nonexistent/gimbal.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        let err = DemoConfig::from_yaml("window: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
