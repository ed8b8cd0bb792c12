//! Shader programs and their named uniforms.
//!
//! A [`Shader`] is built from one WGSL file per stage. Compilation problems
//! are collected as [`Diagnostic`]s and logged; they never make
//! [`Shader::compile`] fail. A program with errors is marked unusable, and
//! binding or drawing with it does nothing.
//!
//! Uniforms are written by name into a CPU-side block that keeps its values
//! between draws. Every draw copies the block into the next slot of a
//! per-frame ring buffer and binds that slot through a dynamic offset, so each
//! draw sees the values that were current when it was issued. The ring is
//! uploaded once per frame by [`Shader::flush`].

use std::{num::NonZeroU64, path::PathBuf};

use crate::{
    context::Context,
    pipelines::{
        PipelineDesc, RenderState, mk_render_pipeline,
        uniform::{UniformBlock, UniformKind, UniformLayout, UniformMiss, UniformValue},
    },
    resources::{
        load_string,
        texture::{TextureLayouts, TextureSlots},
    },
};

const INITIAL_DRAW_SLOTS: usize = 16;

pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    pub geometry: Option<PathBuf>,
    pub tess_control: Option<PathBuf>,
    pub tess_eval: Option<PathBuf>,
    /// Uniform struct fields in declaration order.
    pub uniforms: &'a [(&'a str, UniformKind)],
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub textures: TextureSlots,
    pub cull_mode: Option<wgpu::Face>,
    /// Every state the program will be bound with.
    pub states: &'a [RenderState],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEval,
    Link,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub is_error: bool,
    pub message: String,
}

#[derive(Debug)]
pub struct Shader {
    label: String,
    pipelines: Vec<(RenderState, wgpu::RenderPipeline)>,
    diagnostics: Vec<Diagnostic>,
    usable: bool,
    reported_unusable: bool,
    current: Option<RenderState>,
    uniforms: UniformBlock,
    uniform_layout: wgpu::BindGroupLayout,
    ring: UniformRing,
}

impl Shader {
    pub fn compile(ctx: &Context, desc: &ShaderDesc) -> Self {
        Self::compile_with(&ctx.device, &ctx.layouts, ctx.config.format, desc)
    }

    /// Compile against `device` without a window. `color_format` is the
    /// format of the targets the program draws into.
    pub fn compile_with(
        device: &wgpu::Device,
        layouts: &TextureLayouts,
        color_format: wgpu::TextureFormat,
        desc: &ShaderDesc,
    ) -> Self {
        let mut diagnostics = Vec::new();

        for (stage, path) in [
            (Stage::Geometry, &desc.geometry),
            (Stage::TessControl, &desc.tess_control),
            (Stage::TessEval, &desc.tess_eval),
        ] {
            if let Some(path) = path {
                diagnostics.push(Diagnostic {
                    stage,
                    is_error: false,
                    message: format!(
                        "{} is ignored, only vertex and fragment stages are supported",
                        path.display()
                    ),
                });
            }
        }

        let vertex = compile_stage(device, desc.label, Stage::Vertex, &desc.vertex, &mut diagnostics);
        let fragment =
            compile_stage(device, desc.label, Stage::Fragment, &desc.fragment, &mut diagnostics);

        let layout = UniformLayout::new(desc.uniforms);
        let uniform_layout = uniform_bind_group_layout(device, desc.label, layout.size());
        let ring = UniformRing::new(
            device,
            &uniform_layout,
            desc.label,
            layout.size(),
            INITIAL_DRAW_SLOTS,
        );

        let mut pipelines = Vec::new();
        if let (Some(vertex), Some(fragment)) = (&vertex, &fragment) {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} Pipeline Layout", desc.label)),
                bind_group_layouts: &[&uniform_layout, layouts.get(desc.textures)],
                push_constant_ranges: &[],
            });
            for state in desc.states {
                device.push_error_scope(wgpu::ErrorFilter::Validation);
                let pipeline = mk_render_pipeline(
                    device,
                    &PipelineDesc {
                        label: desc.label,
                        layout: &pipeline_layout,
                        color_format,
                        vertex_layouts: std::slice::from_ref(&desc.vertex_layout),
                        vertex,
                        fragment,
                        cull_mode: desc.cull_mode,
                        state: *state,
                    },
                );
                match futures::executor::block_on(device.pop_error_scope()) {
                    Some(error) => diagnostics.push(Diagnostic {
                        stage: Stage::Link,
                        is_error: true,
                        message: error.to_string(),
                    }),
                    None => pipelines.push((*state, pipeline)),
                }
            }
        }

        let usable = diagnostics.iter().all(|d| !d.is_error) && !pipelines.is_empty();
        for d in &diagnostics {
            if d.is_error {
                log::error!("{} {:?}: {}", desc.label, d.stage, d.message);
            } else {
                log::warn!("{} {:?}: {}", desc.label, d.stage, d.message);
            }
        }
        log::info!(
            "Compiled {} with {} pipelines{}",
            desc.label,
            pipelines.len(),
            if usable { "" } else { ", unusable" }
        );

        Self {
            label: desc.label.to_string(),
            pipelines,
            diagnostics,
            usable,
            reported_unusable: false,
            current: None,
            uniforms: UniformBlock::new(layout),
            uniform_layout,
            ring,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.usable
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Start recording a new frame. Must be called before the first draw of
    /// every frame.
    pub fn begin_frame(&mut self) {
        self.ring.used = 0;
        self.current = None;
    }

    /// Make room for `draws` draws per frame.
    pub fn reserve(&mut self, ctx: &Context, draws: usize) {
        if draws > self.ring.capacity {
            self.ring = UniformRing::new(
                &ctx.device,
                &self.uniform_layout,
                &self.label,
                self.ring.block_size,
                draws,
            );
        }
    }

    /// Activate the program in `state` for subsequent draws.
    pub fn bind(&mut self, pass: &mut wgpu::RenderPass<'_>, state: RenderState) {
        if !self.usable {
            if !self.reported_unusable {
                log::warn!("{} is unusable, its draws are skipped", self.label);
                self.reported_unusable = true;
            }
            self.current = None;
            return;
        }
        match self.pipelines.iter().find(|(s, _)| *s == state) {
            Some((_, pipeline)) => {
                pass.set_pipeline(pipeline);
                self.current = Some(state);
            }
            None => {
                log::warn!("{} was not compiled for {:?}", self.label, state);
                self.current = None;
            }
        }
    }

    /// Run `f` with the program switched to `state`, then switch back.
    pub fn with_state<R>(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        state: RenderState,
        f: impl FnOnce(&mut Self, &mut wgpu::RenderPass<'_>) -> R,
    ) -> R {
        let previous = self.current;
        self.bind(pass, state);
        let result = f(self, pass);
        if let Some(previous) = previous {
            self.bind(pass, previous);
        }
        result
    }

    /// Write a uniform by name. Unknown names and mismatched types are
    /// ignored.
    pub fn bind_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        match self.uniforms.set(name, value.into()) {
            Ok(()) => {}
            Err(UniformMiss::UnknownName) => {
                log::trace!("{} has no uniform {}", self.label, name)
            }
            Err(UniformMiss::KindMismatch { expected, found }) => log::debug!(
                "{} uniform {} is {:?}, not {:?}",
                self.label,
                name,
                expected,
                found
            ),
        }
    }

    pub fn bind_textures(&self, pass: &mut wgpu::RenderPass<'_>, textures: &wgpu::BindGroup) {
        if self.current.is_some() {
            pass.set_bind_group(1, textures, &[]);
        }
    }

    pub fn draw(&mut self, pass: &mut wgpu::RenderPass<'_>, vertices: &wgpu::Buffer, count: u32) {
        if self.commit(pass) {
            pass.set_vertex_buffer(0, vertices.slice(..));
            pass.draw(0..count, 0..1);
        }
    }

    pub fn draw_indexed(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        vertices: &wgpu::Buffer,
        indices: &wgpu::Buffer,
        count: u32,
    ) {
        if self.commit(pass) {
            pass.set_vertex_buffer(0, vertices.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..count, 0, 0..1);
        }
    }

    /// Upload this frame's uniforms. Call once after the last draw and before
    /// the frame is submitted.
    pub fn flush(&mut self, ctx: &Context) {
        self.ring.upload(&ctx.queue);
        if self.ring.overflow > 0 {
            let wanted = (self.ring.capacity + self.ring.overflow).next_power_of_two();
            log::debug!(
                "{} skipped {} draws, growing to {} slots",
                self.label,
                self.ring.overflow,
                wanted
            );
            self.ring = UniformRing::new(
                &ctx.device,
                &self.uniform_layout,
                &self.label,
                self.ring.block_size,
                wanted,
            );
        }
    }

    fn commit(&mut self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        if self.current.is_none() {
            return false;
        }
        match self.ring.push(self.uniforms.bytes()) {
            Some(offset) => {
                pass.set_bind_group(0, &self.ring.bind_group, &[offset]);
                true
            }
            None => false,
        }
    }
}

fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    stage: Stage,
    path: &std::path::Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<wgpu::ShaderModule> {
    let source = match load_string(path) {
        Ok(source) => source,
        Err(e) => {
            diagnostics.push(Diagnostic {
                stage,
                is_error: true,
                message: format!("{:#}", e),
            });
            return None;
        }
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} {:?}", label, stage)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let info = futures::executor::block_on(module.get_compilation_info());
    let scope_error = futures::executor::block_on(device.pop_error_scope());

    let before = diagnostics.len();
    diagnostics.extend(info.messages.iter().map(|m| {
        let location = m
            .location
            .as_ref()
            .map(|l| format!("{}:{}:{}: ", path.display(), l.line_number, l.line_position))
            .unwrap_or_default();
        Diagnostic {
            stage,
            is_error: matches!(m.message_type, wgpu::CompilationMessageType::Error),
            message: format!("{}{}", location, m.message),
        }
    }));
    let reported = diagnostics[before..].iter().any(|d| d.is_error);
    match scope_error {
        Some(error) => {
            if !reported {
                diagnostics.push(Diagnostic {
                    stage,
                    is_error: true,
                    message: error.to_string(),
                });
            }
            None
        }
        None if reported => None,
        None => Some(module),
    }
}

fn uniform_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    block_size: usize,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(block_size as u64),
            },
            count: None,
        }],
        label: Some(&format!("{} uniform_bind_group_layout", label)),
    })
}

/// Per-draw copies of a uniform block, bound by dynamic offset.
#[derive(Debug)]
struct UniformRing {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    block_size: usize,
    stride: usize,
    capacity: usize,
    staged: Vec<u8>,
    used: usize,
    overflow: usize,
}

impl UniformRing {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        block_size: usize,
        capacity: usize,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as usize;
        let stride = block_size.next_multiple_of(alignment);
        let capacity = capacity.max(1);
        let binding_size = NonZeroU64::new(block_size as u64);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            size: (stride * capacity) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: binding_size,
                }),
            }],
            label: Some(&format!("{} uniform_bind_group", label)),
        });

        Self {
            buffer,
            bind_group,
            block_size,
            stride,
            capacity,
            staged: vec![0; stride * capacity],
            used: 0,
            overflow: 0,
        }
    }

    fn push(&mut self, block: &[u8]) -> Option<u32> {
        if self.used == self.capacity {
            self.overflow += 1;
            return None;
        }
        let offset = self.used * self.stride;
        self.staged[offset..offset + block.len()].copy_from_slice(block);
        self.used += 1;
        Some(offset as u32)
    }

    fn upload(&mut self, queue: &wgpu::Queue) {
        if self.used > 0 {
            queue.write_buffer(&self.buffer, 0, &self.staged[..self.used * self.stride]);
        }
    }
}
