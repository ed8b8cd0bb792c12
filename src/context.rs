use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    config::GameConfig,
    data_structures::texture::Texture,
    resources::texture::{TextureLayouts, TextureSlots},
};

/// GPU and window state shared by every scene.
///
/// Owns the surface, device and queue, the depth buffer that follows the
/// window size, the bind-group layouts textures are bound with and a blank
/// texture used wherever an image is missing.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub layouts: TextureLayouts,
    pub blank: Texture,
    pub clear_colour: wgpu::Color,
    pub settings: GameConfig,
}

impl Context {
    pub fn new(window: Arc<Window>, settings: GameConfig) -> anyhow::Result<Self> {
        futures::executor::block_on(Self::new_async(window, settings))
    }

    async fn new_async(window: Arc<Window>, settings: GameConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting a graphics device")?;

        // Validation errors outside an error scope would panic otherwise.
        device.on_uncaptured_error(Box::new(|error| {
            log::error!("GPU error: {}", error);
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders write linear colour and expect an Srgb surface to encode it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );
        let layouts = TextureLayouts::new(&device);
        let blank = Texture::create_blank(&device, &queue);
        let clear_colour = settings.clear_colour();

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            layouts,
            blank,
            clear_colour,
            settings,
        })
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture =
                Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        }
    }

    /// Bind group for a single 2D texture, as used by billboards and text.
    pub fn sprite_bind_group(&self, texture: &Texture, label: &str) -> wgpu::BindGroup {
        self.layouts
            .bind_group(&self.device, TextureSlots::Sprite, &[&texture.view], &texture.sampler, label)
    }
}
