use winit::keyboard::KeyCode;

use crate::{
    context::Context,
    data_structures::billboard::{Model2D, TextModel},
    flow::{KeyAction, Scene, SharedState},
    pipelines::shader::Shader,
    render::Render,
    scenes::{bind_overlay, is_enter, overlay_shader},
};

const MAP_SIZE: f32 = 500.0;
const FONT_SIZE: f32 = 30.0;

/// Shows the city map until Enter is pressed.
#[derive(Default)]
pub struct MapScene {
    assets: Option<MapAssets>,
}

struct MapAssets {
    shader: Shader,
    map: Model2D,
    text: TextModel,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for MapScene {
    fn initialize(&mut self, ctx: &Context, _shared: &SharedState) -> anyhow::Result<()> {
        log::info!("Initializing map scene");
        let settings = &ctx.settings;
        let x = ctx.width() as f32 / 2.0 - MAP_SIZE / 2.0;
        let y = ctx.height() as f32 / 2.0 - MAP_SIZE / 2.0;

        let map = Model2D::new(ctx, &settings.asset(&settings.map_image), x, y, MAP_SIZE);
        let mut text = TextModel::new(ctx, &settings.asset(&settings.font));
        text.set_text_to_render(ctx, "Press Enter to start game", x - 150.0, y - 40.0, FONT_SIZE);

        self.assets = Some(MapAssets {
            shader: overlay_shader(ctx),
            map,
            text,
        });
        Ok(())
    }

    fn render(&mut self, ctx: &Context, pass: &mut wgpu::RenderPass<'_>, _dt: f32) {
        let Some(MapAssets { shader, map, text }) = &mut self.assets else {
            return;
        };
        shader.begin_frame();
        bind_overlay(shader, ctx, pass);
        text.render(shader, pass);
        map.render(shader, pass);
        shader.flush(ctx);
    }

    fn process_key_event(
        &mut self,
        key: KeyCode,
        action: KeyAction,
        _shared: &mut SharedState,
    ) -> bool {
        is_enter(key) && action == KeyAction::Press
    }

    fn process_mouse_scroll(&mut self, _delta: f32) {}

    fn process_mouse_movement(&mut self, _x: f32, _y: f32) {}
}
