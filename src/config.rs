//! Static game configuration.
//!
//! [`GameConfig`] collects the settings that used to be hard-coded paths and
//! window parameters. Every field has a default so a config file only needs to
//! list what it overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Name of the optional config file looked up by the binary.
pub const CONFIG_FILE: &str = "hidden-city.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Directory every asset path is resolved against.
    pub asset_root: PathBuf,
    /// Directory holding the WGSL stage files, relative to `asset_root`.
    pub shader_dir: PathBuf,
    /// Scene description document, relative to `asset_root`.
    pub scene_description: PathBuf,
    /// 16x16 glyph atlas used by the start and map scenes.
    pub font: PathBuf,
    pub map_image: PathBuf,
    pub clear_colour: [f64; 3],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Hidden City".to_string(),
            width: 800,
            height: 600,
            asset_root: PathBuf::from("assets"),
            shader_dir: PathBuf::from("shaders"),
            scene_description: PathBuf::from("game.toml"),
            font: PathBuf::from("fonts/font.png"),
            map_image: PathBuf::from("city_map/map.png"),
            clear_colour: [0.1, 0.1, 0.1],
        }
    }
}

impl GameConfig {
    /// Read the config at `path`, falling back to [`GameConfig::default`] if
    /// there is no such file. A file that exists but does not parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve an asset path. Absolute paths are kept as they are.
    pub fn asset(&self, path: impl AsRef<Path>) -> PathBuf {
        self.asset_root.join(path)
    }

    pub fn shader(&self, file: &str) -> PathBuf {
        self.asset_root.join(&self.shader_dir).join(file)
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b] = self.clear_colour;
        wgpu::Color { r, g, b, a: 1.0 }
    }
}
