//! Screen-space billboards: single images and text.
//!
//! Coordinates are pixels with the origin at the bottom-left corner of the
//! window. The overlay vertex stage turns them into clip space with the
//! `halfScreenSize` uniform.

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::{
    context::Context, data_structures::texture::Texture, pipelines::{RenderState, shader::Shader},
    render::Render, resources::texture::load_texture,
};

/// Glyphs per row and column of a font atlas.
pub const ATLAS_CELLS: u32 = 16;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl OverlayVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Two triangles covering a `size` square whose bottom-left corner is at
/// (`x`, `y`), with UVs spanning `uv_min` to `uv_max` (top-left to
/// bottom-right).
fn quad(x: f32, y: f32, size: f32, uv_min: [f32; 2], uv_max: [f32; 2]) -> [OverlayVertex; 6] {
    let up_left = OverlayVertex {
        position: [x, y + size],
        tex_coords: uv_min,
    };
    let down_left = OverlayVertex {
        position: [x, y],
        tex_coords: [uv_min[0], uv_max[1]],
    };
    let up_right = OverlayVertex {
        position: [x + size, y + size],
        tex_coords: [uv_max[0], uv_min[1]],
    };
    let down_right = OverlayVertex {
        position: [x + size, y],
        tex_coords: uv_max,
    };
    [up_left, down_left, up_right, down_right, up_right, down_left]
}

/// The quad of a billboard showing the whole texture.
pub fn billboard_quad(x: f32, y: f32, size: f32) -> [OverlayVertex; 6] {
    quad(x, y, size, [0.0, 0.0], [1.0, 1.0])
}

/// One quad per byte of `text`, laid out left to right in `size` cells.
///
/// Byte `c` samples atlas cell (`c % 16`, `c / 16`), counted from the top-left
/// of the atlas.
pub fn glyph_quads(text: &str, x: f32, y: f32, size: f32) -> Vec<OverlayVertex> {
    let cell = 1.0 / ATLAS_CELLS as f32;
    text.bytes()
        .enumerate()
        .flat_map(|(i, c)| {
            let uv_x = (c as u32 % ATLAS_CELLS) as f32 * cell;
            let uv_y = (c as u32 / ATLAS_CELLS) as f32 * cell;
            quad(
                x + i as f32 * size,
                y,
                size,
                [uv_x, uv_y],
                [uv_x + cell, uv_y + cell],
            )
        })
        .collect()
}

/// Load `path` for a billboard, using the blank texture if it cannot be read.
fn load_or_blank(ctx: &Context, path: &Path) -> Option<Texture> {
    match load_texture(path, &ctx.device, &ctx.queue) {
        Ok(texture) => Some(texture),
        Err(e) => {
            log::warn!("Using a blank billboard for {}: {:#}", path.display(), e);
            None
        }
    }
}

/// A textured square on screen.
#[derive(Debug)]
pub struct Model2D {
    #[allow(unused)]
    texture: Option<Texture>,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
}

impl Model2D {
    pub fn new(ctx: &Context, path: &Path, x: f32, y: f32, size: f32) -> Self {
        let texture = load_or_blank(ctx, path);
        let label = path.to_string_lossy();
        let bind_group = ctx.sprite_bind_group(texture.as_ref().unwrap_or(&ctx.blank), &label);
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Billboard Buffer", label)),
                contents: bytemuck::cast_slice(&billboard_quad(x, y, size)),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Self {
            texture,
            bind_group,
            vertex_buffer,
        }
    }
}

impl Render for Model2D {
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        shader.with_state(pass, RenderState::OVERLAY_BLEND, |shader, pass| {
            shader.bind_textures(pass, &self.bind_group);
            shader.draw(pass, &self.vertex_buffer, 6);
        });
    }
}

/// A line of text drawn from a 16x16 glyph atlas.
#[derive(Debug)]
pub struct TextModel {
    #[allow(unused)]
    font: Option<Texture>,
    bind_group: wgpu::BindGroup,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl TextModel {
    pub fn new(ctx: &Context, font: &Path) -> Self {
        let font_texture = load_or_blank(ctx, font);
        let bind_group = ctx.sprite_bind_group(
            font_texture.as_ref().unwrap_or(&ctx.blank),
            &font.to_string_lossy(),
        );
        Self {
            font: font_texture,
            bind_group,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    /// Replace the text and rebuild the vertex buffer.
    pub fn set_text_to_render(&mut self, ctx: &Context, text: &str, x: f32, y: f32, size: f32) {
        let vertices = glyph_quads(text, x, y, size);
        self.vertex_count = vertices.len() as u32;
        self.vertex_buffer = (!vertices.is_empty()).then(|| {
            ctx.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Text Vertex Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
    }
}

impl Render for TextModel {
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };
        shader.with_state(pass, RenderState::OVERLAY_BLEND, |shader, pass| {
            shader.bind_textures(pass, &self.bind_group);
            shader.draw(pass, vertex_buffer, self.vertex_count);
        });
    }
}
