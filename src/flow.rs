//! Scene flow and the application event loop.
//!
//! The host owns the window, the GPU [`Context`] and a [`SceneStack`]. Only
//! the scene on top of the stack is initialized and receives input and frame
//! ticks. A scene asks to be replaced by returning `true` from
//! [`Scene::process_key_event`]; the host then drops it and initializes the
//! next one.
//!
//! # Lifecycle
//!
//! 1. `run` creates the event loop; the window and context are created on the
//!    first `resumed` call
//! 2. the first scene is initialized
//! 3. window events are routed to the current scene as they arrive
//! 4. every redraw renders the current scene with the time since the last frame
//! 5. a scene that requests advance is dropped and the next one initialized
//!
//! Initialization errors close the window and are returned from [`run`].

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{config::GameConfig, context::Context};

/// Lines scrolled per pixel for touchpads that report pixel deltas.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// State that outlives individual scenes.
#[derive(Clone, Debug, Default)]
pub struct SharedState {
    pub player_name: String,
}

/// One stage of the game.
///
/// Scenes are constructed up front but only initialized when they reach the
/// top of the stack, so GPU resources exist only for the active scene.
pub trait Scene {
    /// Load assets and compile shaders. Errors are fatal.
    fn initialize(&mut self, ctx: &Context, shared: &SharedState) -> anyhow::Result<()>;

    /// Draw one frame. `dt` is the time since the previous frame in seconds.
    fn render(&mut self, ctx: &Context, pass: &mut wgpu::RenderPass<'_>, dt: f32);

    /// Handle a key. Returning `true` requests the next scene.
    fn process_key_event(
        &mut self,
        key: KeyCode,
        action: KeyAction,
        shared: &mut SharedState,
    ) -> bool;

    fn process_mouse_scroll(&mut self, delta: f32);

    /// Cursor position in window pixels, origin top-left.
    fn process_mouse_movement(&mut self, x: f32, y: f32);
}

/// Scenes waiting to be played. The current scene is the last element.
pub struct SceneStack<S: ?Sized = dyn Scene> {
    scenes: Vec<Box<S>>,
}

impl<S: ?Sized> SceneStack<S> {
    /// Build the stack from scenes in the order they are played.
    pub fn new(mut play_order: Vec<Box<S>>) -> Self {
        play_order.reverse();
        Self { scenes: play_order }
    }

    pub fn current(&mut self) -> Option<&mut S> {
        self.scenes.last_mut().map(|s| s.as_mut())
    }

    /// Drop the current scene and return the next one, which the caller
    /// must initialize.
    pub fn advance(&mut self) -> Option<&mut S> {
        self.scenes.pop();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

struct AppState {
    ctx: Context,
    scenes: SceneStack,
    shared: SharedState,
}

impl AppState {
    fn new(window: Arc<Window>, settings: GameConfig, scenes: Vec<Box<dyn Scene>>) -> anyhow::Result<Self> {
        let ctx = Context::new(window, settings)?;
        let mut scenes = SceneStack::new(scenes);
        let shared = SharedState::default();
        if let Some(scene) = scenes.current() {
            scene.initialize(&ctx, &shared)?;
        }
        Ok(Self {
            ctx,
            scenes,
            shared,
        })
    }

    /// Returns `false` once there is nothing left to play.
    fn advance(&mut self) -> anyhow::Result<bool> {
        match self.scenes.advance() {
            Some(scene) => {
                scene.initialize(&self.ctx, &self.shared)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn render(&mut self, dt: f32) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(scene) = self.scenes.current() {
                scene.render(&self.ctx, &mut render_pass, dt);
            }
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

struct App {
    settings: GameConfig,
    scenes: Option<Vec<Box<dyn Scene>>>,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(scenes) = self.scenes.take() else {
            return;
        };
        let window_attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.settings.width,
                self.settings.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        window.set_cursor_visible(false);

        match AppState::new(window, self.settings.clone(), scenes) {
            Ok(state) => {
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                let action = match (event.state, event.repeat) {
                    (ElementState::Pressed, true) => KeyAction::Repeat,
                    (ElementState::Pressed, false) => KeyAction::Press,
                    (ElementState::Released, _) => KeyAction::Release,
                };
                if key == KeyCode::Escape && action == KeyAction::Press {
                    event_loop.exit();
                    return;
                }
                let advance = match state.scenes.current() {
                    Some(scene) => scene.process_key_event(key, action, &mut state.shared),
                    None => false,
                };
                if advance {
                    match state.advance() {
                        Ok(true) => log::info!("Advanced to the next scene"),
                        Ok(false) => event_loop.exit(),
                        Err(e) => self.fail(event_loop, e),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(scene) = state.scenes.current() {
                    scene.process_mouse_movement(position.x as f32, position.y as f32);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                if let Some(scene) = state.scenes.current() {
                    scene.process_mouse_scroll(lines);
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed().as_secs_f32();
                self.last_time = Instant::now();
                match state.render(dt) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.ctx.resize(size.width, size.height);
                    }
                    Err(e) => log::error!("Unable to render {}", e),
                }
            }
            _ => {}
        }
    }
}

/// Open the window and play `scenes` in order until the window closes.
pub fn run(settings: GameConfig, scenes: Vec<Box<dyn Scene>>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App {
        settings,
        scenes: Some(scenes),
        state: None,
        error: None,
        last_time: Instant::now(),
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
