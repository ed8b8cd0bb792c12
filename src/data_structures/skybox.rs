use std::path::Path;

use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::texture::Texture,
    pipelines::{RenderState, shader::Shader},
    render::Render,
    resources::texture::{TextureSlots, load_cubemap},
};

#[rustfmt::skip]
const CUBE: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

pub fn skybox_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

/// A unit cube textured with a cubemap, drawn behind everything else.
#[derive(Debug)]
pub struct SkyBox {
    #[allow(unused)]
    cubemap: Texture,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
}

impl SkyBox {
    /// Load the six faces, ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn load(ctx: &Context, faces: &[impl AsRef<Path>]) -> anyhow::Result<Self> {
        let cubemap = load_cubemap(faces, &ctx.device, &ctx.queue)?;
        let bind_group = ctx.layouts.bind_group(
            &ctx.device,
            TextureSlots::Cubemap,
            &[&cubemap.view],
            &cubemap.sampler,
            "skybox",
        );
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Skybox Vertex Buffer"),
                contents: bytemuck::cast_slice(&CUBE),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Ok(Self {
            cubemap,
            bind_group,
            vertex_buffer,
        })
    }
}

impl Render for SkyBox {
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        // The cube sits on the far plane, which only passes with LessEqual.
        shader.with_state(pass, RenderState::SKYBOX, |shader, pass| {
            shader.bind_textures(pass, &self.bind_group);
            shader.draw(pass, &self.vertex_buffer, CUBE.len() as u32);
        });
    }
}
