//! The scene description document.
//!
//! ```toml
//! [Game]
//! Font = "fonts/font.png"
//! PlayerStatsFile = "player_stats.toml"
//!
//! [Game.StaticModels]
//! OpaqueModels = ["city/city.obj"]
//! DiscardModels = []
//! TransparentModels = ["city/trees.obj"]
//!
//! [Game.StaticModels.Skybox]
//! Face = ["right.jpg", "left.jpg", "top.jpg", "bottom.jpg", "front.jpg", "back.jpg"]
//!
//! [[Game.HiddenObjects.HiddenObject]]
//! Model = "objects/teapot.obj"
//! Icon = "icons/teapot.png"
//!
//! [[Game.SpawnPoints.Point]]
//! X = 1.0
//! Y = 0.5
//! Z = -4.0
//!
//! [Game.Light.SpotLight]
//! CutOff = 12.5
//! Diffuse = { R = 1.0, G = 1.0, B = 1.0 }
//! ```
//!
//! Every section is optional. Spawn points need all three coordinates and
//! hidden objects need both `Model` and `Icon`.

use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;

#[derive(Debug, Deserialize)]
struct DescriptionDocument {
    #[serde(rename = "Game")]
    game: SceneDescription,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct SceneDescription {
    pub static_models: StaticModels,
    pub hidden_objects: HiddenObjects,
    pub font: Option<String>,
    pub spawn_points: SpawnPoints,
    pub light: LightSection,
    pub player_stats_file: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct StaticModels {
    pub opaque_models: Vec<String>,
    /// Alpha-tested geometry, drawn in the opaque pass with the discard
    /// program.
    pub discard_models: Vec<String>,
    pub transparent_models: Vec<String>,
    pub skybox: Option<Skybox>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Skybox {
    pub face: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct HiddenObjects {
    pub hidden_object: Vec<HiddenObjectEntry>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct HiddenObjectEntry {
    pub model: String,
    pub icon: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct SpawnPoints {
    pub point: Vec<Xyz>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct LightSection {
    pub directional_light: DirectionalLightRecord,
    pub spot_light: SpotLightRecord,
    pub point_light: PointLightRecord,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DirectionalLightRecord {
    pub direction: Xyz,
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
}

/// Cut-off angles are in degrees.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct SpotLightRecord {
    pub position: Xyz,
    pub direction: Xyz,
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub cut_off: f32,
    pub outer_cut_off: f32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct PointLightRecord {
    pub position: Xyz,
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl SceneDescription {
    /// Parse a description document. `source` only labels errors.
    pub fn from_document(text: &str, source: &Path) -> Result<Self, LoadError> {
        let value: toml::Table = text.parse().map_err(|e| LoadError::Syntax {
            path: source.to_path_buf(),
            source: e,
        })?;
        let document: DescriptionDocument =
            toml::Value::Table(value)
                .try_into()
                .map_err(|e| LoadError::Schema {
                    path: source.to_path_buf(),
                    source: e,
                })?;
        Ok(document.game)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_document(&text, path)
    }
}
