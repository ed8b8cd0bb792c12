//! The three scenes of the game, played in order: name entry, city map, hunt.

use cgmath::Vector2;
use winit::keyboard::KeyCode;

use crate::{
    context::Context,
    data_structures::billboard::OverlayVertex,
    pipelines::{
        RenderState,
        shader::{Shader, ShaderDesc},
        uniform::UniformKind,
    },
    resources::texture::TextureSlots,
};

pub mod game;
pub mod map;
pub mod start;

pub use game::GameScene;
pub use map::MapScene;
pub use start::StartScene;

const OVERLAY_UNIFORMS: &[(&str, UniformKind)] = &[("halfScreenSize", UniformKind::Vec2)];

/// The program used for text and billboards.
pub(crate) fn overlay_shader(ctx: &Context) -> Shader {
    Shader::compile(
        ctx,
        &ShaderDesc {
            label: "Text Shader",
            vertex: ctx.settings.shader("text.vert.wgsl"),
            fragment: ctx.settings.shader("text.frag.wgsl"),
            geometry: None,
            tess_control: None,
            tess_eval: None,
            uniforms: OVERLAY_UNIFORMS,
            vertex_layout: OverlayVertex::desc(),
            textures: TextureSlots::Sprite,
            cull_mode: None,
            states: &[RenderState::OVERLAY, RenderState::OVERLAY_BLEND],
        },
    )
}

/// Bind the overlay program for drawing in window pixels.
pub(crate) fn bind_overlay(shader: &mut Shader, ctx: &Context, pass: &mut wgpu::RenderPass<'_>) {
    shader.bind(pass, RenderState::OVERLAY);
    shader.bind_uniform(
        "halfScreenSize",
        Vector2::new(ctx.width() as f32 / 2.0, ctx.height() as f32 / 2.0),
    );
}

pub(crate) fn is_enter(key: KeyCode) -> bool {
    matches!(key, KeyCode::Enter | KeyCode::NumpadEnter)
}
