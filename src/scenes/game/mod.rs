//! The hunt: explore the city and find the hidden objects.
//!
//! Each frame draws, in order:
//!
//! 1. opaque city models, alpha-tested models and the hidden objects
//! 2. the skybox
//! 3. alpha-blended models (these have to come after the skybox)
//! 4. the overlay: timer, icons of found objects and the optional leaderboard

use cgmath::{Matrix4, Point3, SquareMatrix};
use winit::keyboard::KeyCode;

use crate::{
    camera::Projection,
    context::Context,
    data_structures::{
        billboard::{Model2D, TextModel},
        instance::Instance,
        model::{Model3D, ModelVertex},
        skybox::{SkyBox, skybox_vertex_layout},
    },
    flow::{KeyAction, Scene, SharedState},
    pipelines::{
        RenderState,
        shader::{Shader, ShaderDesc},
        uniform::UniformKind,
    },
    records::RecordStore,
    render::Render,
    resources::texture::TextureSlots,
    scenes::{bind_overlay, overlay_shader},
};

use self::{
    description::SceneDescription,
    hidden::HiddenObject,
    light::Lights,
    state::{GameState, place_spawn_points},
};

pub mod description;
pub mod hidden;
pub mod light;
pub mod state;

const DEFAULT_RECORDS_FILE: &str = "player_stats.toml";
const TIMER_SIZE: f32 = 20.0;
const ICON_SIZE: f32 = 40.0;
const LEADERBOARD_SIZE: f32 = 20.0;

/// Uniforms of the lit programs, in the field order of their WGSL struct.
pub const LIT_UNIFORMS: &[(&str, UniformKind)] = &[
    ("projection", UniformKind::Mat4),
    ("view", UniformKind::Mat4),
    ("model", UniformKind::Mat4),
    ("inverseModel", UniformKind::Mat4),
    ("viewPos", UniformKind::Vec3),
    ("dirLight.direction", UniformKind::Vec3),
    ("dirLight.ambient", UniformKind::Vec3),
    ("dirLight.diffuse", UniformKind::Vec3),
    ("dirLight.specular", UniformKind::Vec3),
    ("spotLight.position", UniformKind::Vec3),
    ("spotLight.direction", UniformKind::Vec3),
    ("spotLight.cutOff", UniformKind::Float),
    ("spotLight.outerCutOff", UniformKind::Float),
    ("spotLight.ambient", UniformKind::Vec3),
    ("spotLight.diffuse", UniformKind::Vec3),
    ("spotLight.specular", UniformKind::Vec3),
    ("spotLight.constant", UniformKind::Float),
    ("spotLight.linear", UniformKind::Float),
    ("spotLight.quadratic", UniformKind::Float),
    ("pointLight.position", UniformKind::Vec3),
    ("pointLight.constant", UniformKind::Float),
    ("pointLight.linear", UniformKind::Float),
    ("pointLight.quadratic", UniformKind::Float),
    ("pointLight.ambient", UniformKind::Vec3),
    ("pointLight.diffuse", UniformKind::Vec3),
    ("pointLight.specular", UniformKind::Vec3),
    ("material.ambient", UniformKind::Vec3),
    ("material.diffuse", UniformKind::Vec3),
    ("material.specular", UniformKind::Vec3),
    ("material.shininess", UniformKind::Float),
    ("material.texture_diffuse1", UniformKind::Int),
    ("material.texture_specular1", UniformKind::Int),
];

const SKYBOX_UNIFORMS: &[(&str, UniformKind)] = &[
    ("projection", UniformKind::Mat4),
    ("view", UniformKind::Mat4),
];

fn lit_shader(ctx: &Context, label: &str, fragment: &str, states: &[RenderState]) -> Shader {
    Shader::compile(
        ctx,
        &ShaderDesc {
            label,
            vertex: ctx.settings.shader("model.vert.wgsl"),
            fragment: ctx.settings.shader(fragment),
            geometry: None,
            tess_control: None,
            tess_eval: None,
            uniforms: LIT_UNIFORMS,
            vertex_layout: ModelVertex::desc(),
            textures: TextureSlots::Material,
            // Foliage and fences are single-sided quads.
            cull_mode: None,
            states,
        },
    )
}

fn skybox_shader(ctx: &Context) -> Shader {
    Shader::compile(
        ctx,
        &ShaderDesc {
            label: "Skybox Shader",
            vertex: ctx.settings.shader("skybox.vert.wgsl"),
            fragment: ctx.settings.shader("skybox.frag.wgsl"),
            geometry: None,
            tess_control: None,
            tess_eval: None,
            uniforms: SKYBOX_UNIFORMS,
            vertex_layout: skybox_vertex_layout(),
            textures: TextureSlots::Cubemap,
            cull_mode: None,
            states: &[RenderState::SKYBOX],
        },
    )
}

/// Camera matrices and lights shared by every lit draw of a frame.
struct FrameUniforms {
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    view_pos: Point3<f32>,
    lights: Lights,
}

impl FrameUniforms {
    fn bind(&self, shader: &mut Shader) {
        shader.bind_uniform("projection", self.projection);
        shader.bind_uniform("view", self.view);
        shader.bind_uniform("model", Matrix4::<f32>::identity());
        shader.bind_uniform("inverseModel", Matrix4::<f32>::identity());
        shader.bind_uniform("viewPos", self.view_pos);
        self.lights.bind(shader);
    }
}

struct GameAssets {
    shader: Shader,
    discard_shader: Shader,
    skybox_shader: Shader,
    text_shader: Shader,
    opaque_models: Vec<Model3D>,
    discard_models: Vec<Model3D>,
    transparent_models: Vec<Model3D>,
    skybox: Option<SkyBox>,
    hidden_objects: Vec<HiddenObject>,
    spawn_points: Vec<Point3<f32>>,
    lights: Lights,
    text: TextModel,
    icons: Vec<Model2D>,
    records: RecordStore,
}

#[derive(Default)]
pub struct GameScene {
    player_name: String,
    state: GameState,
    assets: Option<GameAssets>,
}

impl GameScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn load_assets(ctx: &Context, description: &SceneDescription) -> anyhow::Result<GameAssets> {
        let settings = &ctx.settings;
        let load_models = |paths: &[String]| -> Vec<Model3D> {
            paths
                .iter()
                .map(|p| Model3D::load(ctx, &settings.asset(p)))
                .collect()
        };

        let statics = &description.static_models;
        let opaque_models = load_models(&statics.opaque_models);
        let discard_models = load_models(&statics.discard_models);
        let transparent_models = load_models(&statics.transparent_models);

        let skybox = statics.skybox.as_ref().and_then(|skybox| {
            let faces: Vec<_> = skybox.face.iter().map(|f| settings.asset(f)).collect();
            SkyBox::load(ctx, &faces)
                .inspect_err(|e| log::error!("No skybox: {:#}", e))
                .ok()
        });

        let hidden_objects: Vec<HiddenObject> = description
            .hidden_objects
            .hidden_object
            .iter()
            .map(|entry| {
                HiddenObject::new(
                    Model3D::load(ctx, &settings.asset(&entry.model)),
                    settings.asset(&entry.icon),
                )
            })
            .collect();

        let mut spawn_points: Vec<Point3<f32>> = description
            .spawn_points
            .point
            .iter()
            .map(|&p| p.into())
            .collect();
        place_spawn_points(&mut spawn_points, hidden_objects.len(), &mut rand::rng())?;

        let font = match &description.font {
            Some(font) => settings.asset(font),
            None => settings.asset(&settings.font),
        };
        let records = RecordStore::new(settings.asset(
            description
                .player_stats_file
                .as_deref()
                .unwrap_or(DEFAULT_RECORDS_FILE),
        ));

        let mut shader = lit_shader(
            ctx,
            "Blend Shader",
            "blend.frag.wgsl",
            &[RenderState::OPAQUE, RenderState::BLEND],
        );
        let lit_draws: usize = opaque_models
            .iter()
            .map(Render::draws)
            .chain(transparent_models.iter().map(Render::draws))
            .chain(hidden_objects.iter().map(Render::draws))
            .sum();
        shader.reserve(ctx, lit_draws);

        let mut discard_shader = lit_shader(
            ctx,
            "Discard Shader",
            "discard.frag.wgsl",
            &[RenderState::OPAQUE],
        );
        discard_shader.reserve(ctx, discard_models.iter().map(Render::draws).sum());

        Ok(GameAssets {
            shader,
            discard_shader,
            skybox_shader: skybox_shader(ctx),
            text_shader: overlay_shader(ctx),
            opaque_models,
            discard_models,
            transparent_models,
            skybox,
            hidden_objects,
            spawn_points,
            lights: Lights::from(&description.light),
            text: TextModel::new(ctx, &font),
            icons: Vec::new(),
            records,
        })
    }
}

impl Scene for GameScene {
    fn initialize(&mut self, ctx: &Context, shared: &SharedState) -> anyhow::Result<()> {
        log::info!("Initializing game scene");
        let path = ctx.settings.asset(&ctx.settings.scene_description);
        let description = SceneDescription::load(&path)?;
        let assets = Self::load_assets(ctx, &description)?;

        self.state = GameState::new();
        self.state.players = assets.records.load()?;
        self.player_name = shared.player_name.clone();
        log::info!(
            "{} hidden objects in {} spawn points",
            assets.hidden_objects.len(),
            assets.spawn_points.len()
        );
        self.assets = Some(assets);
        Ok(())
    }

    fn render(&mut self, ctx: &Context, pass: &mut wgpu::RenderPass<'_>, dt: f32) {
        let Some(assets) = &mut self.assets else {
            log::warn!("Game scene is not initialized");
            return;
        };
        let state = &mut self.state;
        let (width, height) = (ctx.width() as f32, ctx.height() as f32);

        state.tick(dt);
        assets
            .text
            .set_text_to_render(ctx, &state.timer_text(), 10.0, height - TIMER_SIZE, TIMER_SIZE);

        let camera = &state.camera;
        let mut lights = assets.lights;
        lights.follow(camera);
        let frame = FrameUniforms {
            projection: Projection::new(ctx.width(), ctx.height()).calc_matrix(camera.zoom),
            view: camera.view_matrix(),
            view_pos: camera.position,
            lights,
        };

        assets
            .text_shader
            .reserve(ctx, state.overlay_draws(assets.hidden_objects.len()));
        for shader in [
            &mut assets.shader,
            &mut assets.discard_shader,
            &mut assets.skybox_shader,
            &mut assets.text_shader,
        ] {
            shader.begin_frame();
        }

        // Opaque pass
        let shader = &mut assets.shader;
        shader.bind(pass, RenderState::OPAQUE);
        frame.bind(shader);
        for model in &assets.opaque_models {
            model.render(shader, pass);
        }

        if !assets.discard_models.is_empty() {
            let discard = &mut assets.discard_shader;
            discard.bind(pass, RenderState::OPAQUE);
            frame.bind(discard);
            for model in &assets.discard_models {
                model.render(discard, pass);
            }
            shader.bind(pass, RenderState::OPAQUE);
        }

        for (object, spawn) in assets.hidden_objects.iter().zip(&assets.spawn_points) {
            let placement = Instance::at(*spawn);
            shader.bind_uniform("model", placement.to_matrix());
            shader.bind_uniform("inverseModel", placement.normal_matrix());
            object.render(shader, pass);
        }

        let detection = state.hunt.detect(
            state.camera.position,
            &mut assets.hidden_objects,
            &assets.spawn_points,
        );
        for i in detection.found {
            let x = ICON_SIZE * assets.icons.len() as f32;
            let icon = &assets.hidden_objects[i].icon;
            log::info!("Found hidden object {} ({})", i, icon.display());
            assets.icons.push(Model2D::new(ctx, icon, x, 10.0, ICON_SIZE));
        }
        if detection.completed {
            let player = state.record_finish(&self.player_name);
            log::info!("{} found every object in {:.1}s", player.name, player.game_time);
            if let Err(e) = assets.records.save(&state.players) {
                log::error!("Unable to save player records: {:#}", e);
            }
        }

        // Skybox
        if let Some(skybox) = &assets.skybox {
            let sky = &mut assets.skybox_shader;
            sky.bind(pass, RenderState::SKYBOX);
            sky.bind_uniform("projection", frame.projection);
            sky.bind_uniform("view", state.camera.rotation_matrix());
            skybox.render(sky, pass);
        }

        // Blend pass
        let shader = &mut assets.shader;
        shader.bind(pass, RenderState::BLEND);
        frame.bind(shader);
        for model in &assets.transparent_models {
            model.render(shader, pass);
        }

        // Overlay
        let text_shader = &mut assets.text_shader;
        bind_overlay(text_shader, ctx, pass);
        assets.text.render(text_shader, pass);
        for icon in &assets.icons {
            icon.render(text_shader, pass);
        }
        if state.show_leaderboard {
            let x = width / 2.0 - 10.0 * LEADERBOARD_SIZE;
            for (i, line) in state.leaderboard_lines().iter().enumerate() {
                let y = height - LEADERBOARD_SIZE * (i + 3) as f32;
                assets
                    .text
                    .set_text_to_render(ctx, line, x, y, LEADERBOARD_SIZE);
                assets.text.render(text_shader, pass);
            }
        }

        for shader in [
            &mut assets.shader,
            &mut assets.discard_shader,
            &mut assets.skybox_shader,
            &mut assets.text_shader,
        ] {
            shader.flush(ctx);
        }
    }

    fn process_key_event(
        &mut self,
        key: KeyCode,
        action: KeyAction,
        _shared: &mut SharedState,
    ) -> bool {
        self.state.process_key(key, action);
        false
    }

    fn process_mouse_scroll(&mut self, delta: f32) {
        self.state.process_mouse_scroll(delta);
    }

    fn process_mouse_movement(&mut self, x: f32, y: f32) {
        self.state.process_mouse_movement(x, y);
    }
}
