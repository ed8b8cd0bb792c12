use winit::keyboard::KeyCode;

use crate::{
    context::Context,
    data_structures::billboard::TextModel,
    flow::{KeyAction, Scene, SharedState},
    pipelines::shader::Shader,
    render::Render,
    scenes::{bind_overlay, is_enter, overlay_shader},
};

const PROMPT: &str = "Enter your name and press Enter to start game";
const FONT_SIZE: f32 = 26.0;

/// The name typed so far, followed by a cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameInput {
    text: String,
}

impl Default for NameInput {
    fn default() -> Self {
        Self::new()
    }
}

impl NameInput {
    pub const CURSOR: char = '_';

    pub fn new() -> Self {
        Self {
            text: Self::CURSOR.to_string(),
        }
    }

    pub fn push(&mut self, c: char) {
        self.text.pop();
        self.text.push(c);
        self.text.push(Self::CURSOR);
    }

    /// Remove the last letter. The cursor stays.
    pub fn backspace(&mut self) {
        if self.text.len() > 1 {
            self.text.pop();
            self.text.pop();
            self.text.push(Self::CURSOR);
        }
    }

    /// The name with its cursor, as shown on screen.
    pub fn display(&self) -> &str {
        &self.text
    }

    /// The name without the cursor.
    pub fn name(&self) -> &str {
        self.text.strip_suffix(Self::CURSOR).unwrap_or(&self.text)
    }

    /// Apply a key press. Returns `true` when Enter commits the name.
    pub fn process_key(&mut self, key: KeyCode) -> bool {
        if is_enter(key) {
            return true;
        }
        if key == KeyCode::Backspace {
            self.backspace();
        } else if let Some(c) = letter(key) {
            self.push(c);
        }
        false
    }
}

/// The upper-case letter printed on `key`, for A to Z.
pub fn letter(key: KeyCode) -> Option<char> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    LETTERS
        .iter()
        .position(|k| *k == key)
        .map(|i| (b'A' + i as u8) as char)
}

/// Asks for the player's name.
#[derive(Default)]
pub struct StartScene {
    input: NameInput,
    assets: Option<StartAssets>,
}

struct StartAssets {
    shader: Shader,
    text: TextModel,
}

impl StartScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for StartScene {
    fn initialize(&mut self, ctx: &Context, _shared: &SharedState) -> anyhow::Result<()> {
        log::info!("Initializing start scene");
        self.input = NameInput::new();
        let font = ctx.settings.asset(&ctx.settings.font);
        self.assets = Some(StartAssets {
            shader: overlay_shader(ctx),
            text: TextModel::new(ctx, &font),
        });
        Ok(())
    }

    fn render(&mut self, ctx: &Context, pass: &mut wgpu::RenderPass<'_>, _dt: f32) {
        let Some(StartAssets { shader, text }) = &mut self.assets else {
            return;
        };
        let (width, height) = (ctx.width() as f32, ctx.height() as f32);

        shader.begin_frame();
        bind_overlay(shader, ctx, pass);

        let x = width / 2.0 - FONT_SIZE * 22.0;
        let y = height - FONT_SIZE * 7.0;
        text.set_text_to_render(ctx, PROMPT, x, y, FONT_SIZE);
        text.render(shader, pass);

        let input = self.input.display();
        let x = width / 2.0 - FONT_SIZE * input.len() as f32 / 2.0;
        let y = height - FONT_SIZE * 10.0;
        text.set_text_to_render(ctx, input, x, y, FONT_SIZE);
        text.render(shader, pass);

        shader.flush(ctx);
    }

    fn process_key_event(
        &mut self,
        key: KeyCode,
        action: KeyAction,
        shared: &mut SharedState,
    ) -> bool {
        if action != KeyAction::Press || !self.input.process_key(key) {
            return false;
        }
        shared.player_name = self.input.name().to_string();
        log::info!("Player {:?} starts", shared.player_name);
        true
    }

    fn process_mouse_scroll(&mut self, _delta: f32) {}

    fn process_mouse_movement(&mut self, _x: f32, _y: f32) {}
}
