use std::path::Path;

use cgmath::{Point3, Vector3};
use hidden_city::{
    error::LoadError,
    scenes::game::{description::SceneDescription, light::Lights},
};

use crate::common::test_utils::temp_path;

mod common;

const FULL: &str = r#"
[Game]
Font = "fonts/font.png"
PlayerStatsFile = "stats.toml"

[Game.StaticModels]
OpaqueModels = ["city/city.obj", "city/station.gltf"]
TransparentModels = ["city/trees.obj"]

[Game.StaticModels.Skybox]
Face = ["r.jpg", "l.jpg", "t.jpg", "b.jpg", "f.jpg", "k.jpg"]

[[Game.HiddenObjects.HiddenObject]]
Model = "objects/teapot.obj"
Icon = "icons/teapot.png"

[[Game.HiddenObjects.HiddenObject]]
Model = "objects/lamp.obj"
Icon = "icons/lamp.png"

[[Game.SpawnPoints.Point]]
X = 1.0
Y = 0.5
Z = -4.0

[[Game.SpawnPoints.Point]]
X = -2.0
Y = 0.0
Z = 3.5

[Game.Light.DirectionalLight]
Direction = { X = -0.2, Y = -1.0, Z = -0.3 }
Ambient = { R = 0.1, G = 0.2, B = 0.3 }

[Game.Light.SpotLight]
CutOff = 90.0
OuterCutOff = 180.0
Constant = 1.0
Linear = 0.09

[Game.Light.PointLight]
Position = { X = 0.0, Y = 5.0, Z = 0.0 }
Quadratic = 0.032
"#;

fn parse(text: &str) -> Result<SceneDescription, LoadError> {
    SceneDescription::from_document(text, Path::new("game.toml"))
}

#[test]
fn should_read_every_section() {
    let description = parse(FULL).expect("valid description");

    assert_eq!(description.font.as_deref(), Some("fonts/font.png"));
    assert_eq!(description.player_stats_file.as_deref(), Some("stats.toml"));
    assert_eq!(description.static_models.opaque_models.len(), 2);
    assert!(description.static_models.discard_models.is_empty());
    assert_eq!(description.static_models.transparent_models, ["city/trees.obj"]);
    let skybox = description.static_models.skybox.as_ref().expect("skybox");
    assert_eq!(skybox.face.len(), 6);

    let hidden = &description.hidden_objects.hidden_object;
    assert_eq!(hidden.len(), 2);
    assert_eq!(hidden[1].model, "objects/lamp.obj");
    assert_eq!(hidden[1].icon, "icons/lamp.png");

    let points: Vec<Point3<f32>> = description
        .spawn_points
        .point
        .iter()
        .map(|&p| p.into())
        .collect();
    assert_eq!(
        points,
        [Point3::new(1.0, 0.5, -4.0), Point3::new(-2.0, 0.0, 3.5)]
    );
}

#[test]
fn should_convert_light_angles_to_radians() {
    let description = parse(FULL).expect("valid description");
    let lights = Lights::from(&description.light);

    assert!((lights.spot.cut_off - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    assert!((lights.spot.outer_cut_off - std::f32::consts::PI).abs() < 1e-6);
    assert_eq!(lights.spot.constant, 1.0);
    assert_eq!(lights.spot.quadratic, 0.0);
    assert_eq!(lights.directional.direction, Vector3::new(-0.2, -1.0, -0.3));
    assert_eq!(lights.directional.ambient, Vector3::new(0.1, 0.2, 0.3));
    assert_eq!(lights.directional.specular, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(lights.point.position, Point3::new(0.0, 5.0, 0.0));
    assert_eq!(lights.point.quadratic, 0.032);
}

#[test]
fn should_skip_missing_sections() {
    let description = parse("[Game]\n").expect("an empty game is valid");
    assert_eq!(description, SceneDescription::default());
    assert!(description.static_models.skybox.is_none());
    assert!(description.font.is_none());
}

#[test]
fn should_fail_without_the_game_root() {
    let result = parse("[StaticModels]\nOpaqueModels = []\n");
    assert!(matches!(result, Err(LoadError::Schema { .. })), "{:?}", result);
}

#[test]
fn should_fail_on_a_spawn_point_without_coordinates() {
    let result = parse("[[Game.SpawnPoints.Point]]\nX = 1.0\nY = 2.0\n");
    assert!(matches!(result, Err(LoadError::Schema { .. })), "{:?}", result);
}

#[test]
fn should_fail_on_a_hidden_object_without_icon() {
    let result = parse("[[Game.HiddenObjects.HiddenObject]]\nModel = \"a.obj\"\n");
    assert!(matches!(result, Err(LoadError::Schema { .. })), "{:?}", result);
}

#[test]
fn should_report_syntax_errors() {
    let result = parse("[Game\nFont = ");
    assert!(matches!(result, Err(LoadError::Syntax { .. })), "{:?}", result);
}

#[test]
fn should_fail_when_the_document_is_missing() {
    let result = SceneDescription::load(&temp_path("no_game.toml"));
    assert!(matches!(result, Err(LoadError::Io { .. })), "{:?}", result);
}
