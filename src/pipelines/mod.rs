//! Pipeline construction.
//!
//! GL-style depth and blend toggles become [`RenderState`]s. A shader builds
//! one pipeline per state it is used with, and switching state means binding
//! a different pipeline of the same shader.

use crate::data_structures::texture::Texture;

pub mod shader;
pub mod uniform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthTest {
    Less,
    /// Lets geometry at the far plane pass against a cleared depth buffer.
    LessEqual,
    /// Always passes and leaves the depth buffer untouched.
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub depth: DepthTest,
    /// Standard "source over" alpha blending.
    pub blend: bool,
}

impl RenderState {
    pub const OPAQUE: Self = Self {
        depth: DepthTest::Less,
        blend: false,
    };
    pub const BLEND: Self = Self {
        depth: DepthTest::Less,
        blend: true,
    };
    pub const SKYBOX: Self = Self {
        depth: DepthTest::LessEqual,
        blend: false,
    };
    pub const OVERLAY: Self = Self {
        depth: DepthTest::Disabled,
        blend: false,
    };
    pub const OVERLAY_BLEND: Self = Self {
        depth: DepthTest::Disabled,
        blend: true,
    };

    fn depth_stencil(self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self.depth {
            DepthTest::Less => (true, wgpu::CompareFunction::Less),
            DepthTest::LessEqual => (true, wgpu::CompareFunction::LessEqual),
            DepthTest::Disabled => (false, wgpu::CompareFunction::Always),
        };
        wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    fn blend_state(self) -> wgpu::BlendState {
        if self.blend {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        }
    }
}

pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub layout: &'a wgpu::PipelineLayout,
    pub color_format: wgpu::TextureFormat,
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    pub vertex: &'a wgpu::ShaderModule,
    pub fragment: &'a wgpu::ShaderModule,
    pub cull_mode: Option<wgpu::Face>,
    pub state: RenderState,
}

pub fn mk_render_pipeline(device: &wgpu::Device, desc: &PipelineDesc) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.vertex,
            entry_point: Some("vs_main"),
            buffers: desc.vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.fragment,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: Some(desc.state.blend_state()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(desc.state.depth_stencil()),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
