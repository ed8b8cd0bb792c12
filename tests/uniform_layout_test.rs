use cgmath::{Matrix4, Vector3};
use hidden_city::{
    pipelines::uniform::{UniformBlock, UniformKind, UniformLayout, UniformMiss},
    scenes::game::LIT_UNIFORMS,
};

fn offset(layout: &UniformLayout, name: &str) -> usize {
    layout
        .find(name)
        .unwrap_or_else(|| panic!("no uniform {}", name))
        .offset
}

fn f32_at(block: &UniformBlock, offset: usize) -> f32 {
    let bytes: [u8; 4] = block.bytes()[offset..offset + 4].try_into().unwrap();
    f32::from_ne_bytes(bytes)
}

#[test]
fn should_lay_out_lit_uniforms_like_wgsl() {
    let layout = UniformLayout::new(LIT_UNIFORMS);

    assert_eq!(offset(&layout, "projection"), 0);
    assert_eq!(offset(&layout, "inverseModel"), 192);
    assert_eq!(offset(&layout, "viewPos"), 256);
    assert_eq!(offset(&layout, "dirLight.direction"), 272);
    assert_eq!(offset(&layout, "spotLight.direction"), 352);
    assert_eq!(offset(&layout, "spotLight.cutOff"), 364);
    assert_eq!(offset(&layout, "spotLight.outerCutOff"), 368);
    assert_eq!(offset(&layout, "spotLight.ambient"), 384);
    assert_eq!(offset(&layout, "spotLight.constant"), 428);
    assert_eq!(offset(&layout, "pointLight.position"), 448);
    assert_eq!(offset(&layout, "pointLight.ambient"), 480);
    assert_eq!(offset(&layout, "material.shininess"), 572);
    assert_eq!(offset(&layout, "material.texture_specular1"), 580);
    assert_eq!(layout.size(), 592);
}

#[test]
fn should_pack_scalars_behind_vec3() {
    let layout = UniformLayout::new(&[
        ("a", UniformKind::Vec3),
        ("b", UniformKind::Float),
        ("c", UniformKind::Vec3),
        ("d", UniformKind::Vec2),
    ]);
    let offsets: Vec<usize> = layout.fields().iter().map(|f| f.offset).collect();
    assert_eq!(offsets, [0, 12, 16, 32]);
    assert_eq!(layout.size(), 48);
}

#[test]
fn should_round_small_blocks_up_to_16_bytes() {
    let layout = UniformLayout::new(&[("halfScreenSize", UniformKind::Vec2)]);
    assert_eq!(layout.size(), 16);
}

#[test]
fn should_write_values_at_their_offsets() {
    let mut block = UniformBlock::new(UniformLayout::new(&[
        ("a", UniformKind::Vec3),
        ("b", UniformKind::Float),
        ("m", UniformKind::Mat4),
    ]));

    block.set("b", 2.5f32.into()).unwrap();
    block
        .set("a", Vector3::new(1.0f32, 2.0, 3.0).into())
        .unwrap();
    block
        .set("m", Matrix4::from_translation(Vector3::new(4.0f32, 5.0, 6.0)).into())
        .unwrap();

    assert_eq!(f32_at(&block, 0), 1.0);
    assert_eq!(f32_at(&block, 8), 3.0);
    assert_eq!(f32_at(&block, 12), 2.5);
    // Column-major: the translation is the fourth column.
    assert_eq!(f32_at(&block, 16 + 48), 4.0);
    assert_eq!(f32_at(&block, 16 + 56), 6.0);
    assert_eq!(f32_at(&block, 16 + 60), 1.0);
}

#[test]
fn should_keep_values_until_overwritten() {
    let mut block = UniformBlock::new(UniformLayout::new(&[
        ("x", UniformKind::Float),
        ("y", UniformKind::Float),
    ]));
    block.set("x", 1.0f32.into()).unwrap();
    block.set("y", 2.0f32.into()).unwrap();
    block.set("y", 3.0f32.into()).unwrap();

    assert_eq!(f32_at(&block, 0), 1.0);
    assert_eq!(f32_at(&block, 4), 3.0);
}

#[test]
fn should_ignore_unknown_and_mistyped_uniforms() {
    let mut block = UniformBlock::new(UniformLayout::new(&[("shininess", UniformKind::Float)]));
    let before = block.bytes().to_vec();

    assert_eq!(
        block.set("roughness", 1.0f32.into()),
        Err(UniformMiss::UnknownName)
    );
    assert_eq!(
        block.set("shininess", 7i32.into()),
        Err(UniformMiss::KindMismatch {
            expected: UniformKind::Float,
            found: UniformKind::Int,
        })
    );
    assert_eq!(block.bytes(), &before[..]);
}
