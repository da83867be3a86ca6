use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::SceneError;

fn zero() -> [f32; 3] {
    [0.0; 3]
}

fn one() -> [f32; 3] {
    [1.0; 3]
}

fn fovy() -> f32 {
    45.0
}

fn intensity() -> f32 {
    1.0
}

fn enabled() -> bool {
    true
}

/// Toml description of a scene: one camera, any number of objects and lights.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub objects: Vec<ObjectDescription>,
    pub lights: Vec<LightDescription>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDescription {
    #[serde(default = "zero")]
    pub position: [f32; 3],
    /// Euler angles in degrees.
    #[serde(default = "zero")]
    pub rotation: [f32; 3],
    #[serde(default = "fovy")]
    pub fov: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: zero(),
            rotation: zero(),
            fov: fovy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDescription {
    pub name: String,
    /// Model file, relative to the description.
    pub path: PathBuf,
    #[serde(default = "zero")]
    pub position: [f32; 3],
    #[serde(default = "zero")]
    pub rotation: [f32; 3],
    #[serde(default = "one")]
    pub scale: [f32; 3],
    #[serde(default = "enabled")]
    pub lighting: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightDescription {
    pub position: [f32; 3],
    #[serde(default = "one")]
    pub color: [f32; 3],
    #[serde(default = "intensity")]
    pub intensity: f32,
}

impl SceneDescription {
    pub fn parse(path: &Path) -> Result<Self, SceneError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(data)?)
    }
}
