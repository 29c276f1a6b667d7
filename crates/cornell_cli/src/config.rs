//! Command-line configuration file.
//!
//! ```json
//! {
//!     "render": { "width": 256, "height": 256, "samples_per_pixel": 64 },
//!     "scene": "scenes/boxes.json",
//!     "output": "output/boxes.png"
//! }
//! ```
//!
//! Every key is optional. `scene` is either a path to a scene file or an
//! inline scene description; without it the built-in Cornell box is used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cornell_core::SceneDescription;
use cornell_renderer::RenderConfig;
use serde::{Deserialize, Serialize};

/// Where the scene comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneSource {
    File(PathBuf),
    Inline(SceneDescription),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub scene: Option<SceneSource>,
    pub output: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            scene: None,
            output: PathBuf::from("output/render.png"),
        }
    }
}

impl AppConfig {
    /// Parse a configuration from JSON text. Relative scene and mesh paths
    /// are resolved against `base`.
    pub fn from_json_str(json: &str, base: &Path) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json).context("Malformed config JSON")?;

        match &mut config.scene {
            Some(SceneSource::File(path)) if path.is_relative() => *path = base.join(&*path),
            Some(SceneSource::Inline(desc)) => desc.resolve_paths(base),
            _ => {}
        }

        config.render.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        Self::from_json_str(&text, base)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Resolve the scene to render.
    pub fn scene_description(&self) -> Result<SceneDescription> {
        match &self.scene {
            None => {
                log::info!("No scene configured, using the built-in Cornell box");
                Ok(SceneDescription::cornell_box())
            }
            Some(SceneSource::File(path)) => SceneDescription::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display())),
            Some(SceneSource::Inline(desc)) => {
                desc.validate().context("Invalid inline scene")?;
                Ok(desc.clone())
            }
        }
    }
}
