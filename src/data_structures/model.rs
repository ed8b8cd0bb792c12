//! 3D models loaded from files.
//!
//! A [`Model3D`] owns one [`Mesh`] per decoded mesh node and a private
//! [`TextureCache`], so every texture path is uploaded at most once per model.
//! Two models that use the same image each upload their own copy.

use std::{path::Path, rc::Rc};

use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::texture::{Texture, TextureCache},
    pipelines::shader::Shader,
    render::Render,
    resources::{
        self,
        mesh::{DecodedMaterial, DecodedMesh},
        texture::{MATERIAL_TEXTURE_UNITS, TextureSlots, load_texture},
    },
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ModelVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// What a material texture is sampled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
        }
    }
}

/// A texture used by a material, shared with the owning model's cache.
#[derive(Debug)]
pub struct MaterialTexture<T = Texture> {
    pub kind: TextureKind,
    /// The path as written in the model file.
    pub path: String,
    pub texture: Rc<T>,
}

impl<T> Clone for MaterialTexture<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            path: self.path.clone(),
            texture: self.texture.clone(),
        }
    }
}

/// Uniform names that select the texture unit of each texture, in unit order.
///
/// Numbering is 1-based and counted separately per kind, so
/// `[Diffuse, Specular, Diffuse]` gives `material.texture_diffuse1`,
/// `material.texture_specular1` and `material.texture_diffuse2`.
pub fn texture_unit_names(kinds: impl IntoIterator<Item = TextureKind>) -> Vec<String> {
    let mut diffuse = 0;
    let mut specular = 0;
    kinds
        .into_iter()
        .map(|kind| {
            let counter = match kind {
                TextureKind::Diffuse => &mut diffuse,
                TextureKind::Specular => &mut specular,
            };
            *counter += 1;
            format!("material.{}{}", kind.uniform_prefix(), counter)
        })
        .collect()
}

/// Unit uniform assignments for a material whose textures have `kinds`.
///
/// Only the first `MATERIAL_TEXTURE_UNITS - 1` textures get a unit. The unit
/// after them holds the blank texture, and a kind with no texture samples it.
pub fn unit_uniforms(kinds: &[TextureKind]) -> Vec<(String, i32)> {
    let kinds = &kinds[..kinds.len().min(MATERIAL_TEXTURE_UNITS - 1)];
    let blank_unit = kinds.len() as i32;
    [TextureKind::Diffuse, TextureKind::Specular]
        .into_iter()
        .filter(|kind| !kinds.contains(kind))
        .map(|kind| (format!("material.{}1", kind.uniform_prefix()), blank_unit))
        .chain(texture_unit_names(kinds.iter().copied()).into_iter().zip(0..))
        .collect()
}

/// Resolve the textures of `material`, diffuse ones first.
///
/// Paths are looked up in `cache` by their exact string before `load` is
/// called with the path joined onto `directory`. Textures that fail to load
/// are logged and left out.
pub fn resolve_textures<T>(
    material: &DecodedMaterial,
    directory: &Path,
    cache: &mut TextureCache<T>,
    mut load: impl FnMut(&Path) -> anyhow::Result<T>,
) -> Vec<MaterialTexture<T>> {
    let diffuse = material
        .diffuse_textures
        .iter()
        .map(|path| (TextureKind::Diffuse, path));
    let specular = material
        .specular_textures
        .iter()
        .map(|path| (TextureKind::Specular, path));

    diffuse
        .chain(specular)
        .filter_map(|(kind, path)| {
            match cache.get_or_load(path, |p| load(&directory.join(p))) {
                Ok(texture) => Some(MaterialTexture {
                    kind,
                    path: path.clone(),
                    texture,
                }),
                Err(e) => {
                    log::warn!(
                        "Skipping {} texture {} of material {:?}: {:#}",
                        kind.uniform_prefix(),
                        path,
                        material.name,
                        e
                    );
                    None
                }
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
    pub textures: Vec<MaterialTexture>,
    units: Vec<(String, i32)>,
    bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(ctx: &Context, decoded: &DecodedMaterial, mut textures: Vec<MaterialTexture>) -> Self {
        let bound = MATERIAL_TEXTURE_UNITS - 1;
        if textures.len() > bound {
            log::warn!(
                "Material {:?} uses {} textures, only the first {} are bound",
                decoded.name,
                textures.len(),
                bound
            );
            textures.truncate(bound);
        }
        let kinds: Vec<TextureKind> = textures.iter().map(|t| t.kind).collect();
        let units = unit_uniforms(&kinds);

        let views: Vec<&wgpu::TextureView> = (0..MATERIAL_TEXTURE_UNITS)
            .map(|unit| match textures.get(unit) {
                Some(t) => &t.texture.view,
                None => &ctx.blank.view,
            })
            .collect();
        let sampler = textures
            .first()
            .map_or(&ctx.blank.sampler, |t| &t.texture.sampler);
        let bind_group = ctx.layouts.bind_group(
            &ctx.device,
            TextureSlots::Material,
            &views,
            sampler,
            &decoded.name,
        );

        Self {
            name: decoded.name.clone(),
            ambient: decoded.ambient.into(),
            diffuse: decoded.diffuse.into(),
            specular: decoded.specular.into(),
            shininess: decoded.clamped_shininess(),
            textures,
            units,
            bind_group,
        }
    }

    /// Write the colour uniforms, bind the texture units and point each
    /// texture's unit uniform at its unit.
    pub fn bind(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        shader.bind_uniform("material.ambient", self.ambient);
        shader.bind_uniform("material.diffuse", self.diffuse);
        shader.bind_uniform("material.specular", self.specular);
        shader.bind_uniform("material.shininess", self.shininess);

        for (name, unit) in &self.units {
            shader.bind_uniform(name, *unit);
        }
        shader.bind_textures(pass, &self.bind_group);
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: Material,
}

impl Mesh {
    pub fn new(ctx: &Context, decoded: &DecodedMesh, material: Material) -> Result<Self, crate::error::MeshError> {
        let vertices = decoded.build_vertices()?;
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", decoded.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", decoded.name)),
                contents: bytemuck::cast_slice(&decoded.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Ok(Self {
            name: decoded.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: decoded.indices.len() as u32,
            material,
        })
    }
}

impl Render for Mesh {
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        if self.num_elements == 0 {
            return;
        }
        self.material.bind(shader, pass);
        shader.draw_indexed(pass, &self.vertex_buffer, &self.index_buffer, self.num_elements);
    }
}

#[derive(Debug, Default)]
pub struct Model3D {
    pub meshes: Vec<Mesh>,
    textures: TextureCache,
}

impl Model3D {
    /// Load a model file.
    ///
    /// A file that cannot be decoded is logged and yields an empty model, as
    /// do individual meshes with broken index data.
    pub fn load(ctx: &Context, path: &Path) -> Self {
        let scene = match resources::decode_model(path) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("Unable to load model {}: {:#}", path.display(), e);
                return Self::default();
            }
        };
        let directory = path.parent().unwrap_or(Path::new(""));

        let mut textures = TextureCache::new();
        let materials: Vec<Material> = scene
            .materials
            .iter()
            .map(|decoded| {
                let resolved = resolve_textures(decoded, directory, &mut textures, |p| {
                    load_texture(p, &ctx.device, &ctx.queue)
                });
                Material::new(ctx, decoded, resolved)
            })
            .collect();
        let default_material = Material::new(ctx, &DecodedMaterial::default(), Vec::new());

        let mut meshes = Vec::new();
        scene.root.walk(&mut |decoded| {
            let material = decoded
                .material
                .and_then(|i| materials.get(i))
                .unwrap_or(&default_material)
                .clone();
            match Mesh::new(ctx, decoded, material) {
                Ok(mesh) => meshes.push(mesh),
                Err(e) => log::warn!(
                    "Mesh {:?} in {} could not be loaded: {}",
                    decoded.name,
                    path.display(),
                    e
                ),
            }
        });

        log::info!(
            "Loaded {} with {} meshes and {} textures",
            path.display(),
            meshes.len(),
            textures.len()
        );
        Self { meshes, textures }
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Render for Model3D {
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        for mesh in &self.meshes {
            mesh.render(shader, pass);
        }
    }

    fn draws(&self) -> usize {
        self.meshes.len()
    }
}
