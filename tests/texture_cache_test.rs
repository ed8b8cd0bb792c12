use std::{path::Path, rc::Rc};

use hidden_city::{
    data_structures::{
        model::{TextureKind, resolve_textures, texture_unit_names, unit_uniforms},
        texture::TextureCache,
    },
    resources::{decode_model, mesh::DecodedMaterial},
};

use crate::common::test_utils::{CountingLoader, FakeTexture, temp_path, write_file};

mod common;

fn material(diffuse: &[&str], specular: &[&str]) -> DecodedMaterial {
    DecodedMaterial {
        name: "wood".to_string(),
        diffuse_textures: diffuse.iter().map(|s| s.to_string()).collect(),
        specular_textures: specular.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn should_upload_a_repeated_texture_once() {
    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();

    let textures = resolve_textures(
        &material(&["wood.png", "wood.png"], &[]),
        Path::new("models/hut"),
        &mut cache,
        |p| loader.load(p),
    );

    assert_eq!(loader.loads(), 1);
    assert_eq!(textures.len(), 2);
    assert!(Rc::ptr_eq(&textures[0].texture, &textures[1].texture));
    assert_eq!(cache.len(), 1);
}

#[test]
fn should_share_textures_between_materials_of_one_model() {
    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();

    let walls = resolve_textures(
        &material(&["brick.png"], &["brick_spec.png"]),
        Path::new("city"),
        &mut cache,
        |p| loader.load(p),
    );
    let chimney = resolve_textures(
        &material(&["brick.png"], &[]),
        Path::new("city"),
        &mut cache,
        |p| loader.load(p),
    );

    assert_eq!(loader.loads(), 2);
    assert!(Rc::ptr_eq(&walls[0].texture, &chimney[0].texture));
}

#[test]
fn should_load_again_for_another_model() {
    let loader = CountingLoader::default();
    let wood = material(&["wood.png"], &[]);

    let mut first = TextureCache::new();
    let mut second = TextureCache::new();
    resolve_textures(&wood, Path::new("a"), &mut first, |p| loader.load(p));
    resolve_textures(&wood, Path::new("a"), &mut second, |p| loader.load(p));

    assert_eq!(loader.loads(), 2);
}

#[test]
fn should_load_relative_to_the_model_directory() {
    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();

    let textures = resolve_textures(
        &material(&["textures/wood.png"], &[]),
        Path::new("models/hut"),
        &mut cache,
        |p| loader.load(p),
    );

    assert_eq!(textures[0].path, "textures/wood.png");
    assert_eq!(
        *textures[0].texture,
        FakeTexture(Path::new("models/hut/textures/wood.png").to_path_buf())
    );
    assert!(cache.get("textures/wood.png").is_some());
}

#[test]
fn should_compare_paths_as_written() {
    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();

    resolve_textures(
        &material(&["a/b.png", "./a/b.png"], &[]),
        Path::new(""),
        &mut cache,
        |p| loader.load(p),
    );

    assert_eq!(loader.loads(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn should_skip_textures_that_fail_to_load() {
    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();
    let broken = material(&["missing.png", "ok.png"], &[]);

    let textures = resolve_textures(&broken, Path::new(""), &mut cache, |p| loader.load(p));
    assert_eq!(textures.len(), 1);
    assert_eq!(textures[0].path, "ok.png");

    // Failures are not cached, successes are.
    resolve_textures(&broken, Path::new(""), &mut cache, |p| loader.load(p));
    assert_eq!(loader.loads(), 3);
}

#[test]
fn should_order_diffuse_before_specular() {
    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();

    let textures = resolve_textures(
        &material(&["d1.png", "d2.png"], &["s1.png"]),
        Path::new(""),
        &mut cache,
        |p| loader.load(p),
    );

    let kinds: Vec<TextureKind> = textures.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [TextureKind::Diffuse, TextureKind::Diffuse, TextureKind::Specular]
    );
}

#[test]
fn should_number_texture_units_per_kind() {
    let names = texture_unit_names([
        TextureKind::Diffuse,
        TextureKind::Specular,
        TextureKind::Diffuse,
        TextureKind::Specular,
    ]);
    assert_eq!(
        names,
        [
            "material.texture_diffuse1",
            "material.texture_specular1",
            "material.texture_diffuse2",
            "material.texture_specular2",
        ]
    );
}

#[test]
fn should_dedup_textures_of_a_decoded_obj_material() {
    let obj = temp_path("dedup_quad.obj");
    write_file(
        &obj,
        "mtllib dedup_quad.mtl\no quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nusemtl wood\nf 1/1 2/2 3/3 4/4\n",
    );
    write_file(
        &obj.with_file_name("dedup_quad.mtl"),
        "newmtl wood\nKd 0.8 0.7 0.6\nNs 0\nmap_Kd wood.png\nmap_Ks wood.png\n",
    );

    let scene = decode_model(&obj).expect("obj decodes");
    assert_eq!(scene.materials.len(), 1);
    let wood = &scene.materials[0];
    assert_eq!(wood.clamped_shininess(), 1.0);

    let loader = CountingLoader::default();
    let mut cache = TextureCache::new();
    let directory = obj.parent().expect("temp file has a parent");
    let textures = resolve_textures(wood, directory, &mut cache, |p| loader.load(p));

    assert_eq!(loader.loads(), 1);
    assert_eq!(textures.len(), 2);
    assert_eq!(textures[0].kind, TextureKind::Diffuse);
    assert_eq!(textures[1].kind, TextureKind::Specular);
    assert!(Rc::ptr_eq(&textures[0].texture, &textures[1].texture));
}

fn unit_of(units: &[(String, i32)], name: &str) -> Option<i32> {
    units.iter().find(|(n, _)| n == name).map(|(_, unit)| *unit)
}

#[test]
fn should_keep_a_blank_unit_when_a_material_has_too_many_textures() {
    let units = unit_uniforms(&[TextureKind::Diffuse; 4]);

    assert_eq!(unit_of(&units, "material.texture_diffuse1"), Some(0));
    assert_eq!(unit_of(&units, "material.texture_diffuse3"), Some(2));
    assert_eq!(unit_of(&units, "material.texture_diffuse4"), None);
    assert_eq!(unit_of(&units, "material.texture_specular1"), Some(3));
}

#[test]
fn should_point_untextured_kinds_at_the_first_unit() {
    let units = unit_uniforms(&[]);
    assert_eq!(unit_of(&units, "material.texture_diffuse1"), Some(0));
    assert_eq!(unit_of(&units, "material.texture_specular1"), Some(0));

    let units = unit_uniforms(&[TextureKind::Diffuse]);
    assert_eq!(unit_of(&units, "material.texture_diffuse1"), Some(0));
    assert_eq!(unit_of(&units, "material.texture_specular1"), Some(1));
}
