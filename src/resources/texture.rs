use std::path::Path;

use anyhow::Context as _;

use crate::{data_structures::texture::Texture, resources::load_binary};

/// Number of texture units a material can fill.
pub const MATERIAL_TEXTURE_UNITS: usize = 4;

/// The texture binding shapes a shader can declare at bind group 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSlots {
    /// [`MATERIAL_TEXTURE_UNITS`] 2D textures followed by one sampler.
    Material,
    /// One 2D texture and its sampler.
    Sprite,
    /// One cube texture and its sampler.
    Cubemap,
}

impl TextureSlots {
    fn texture_count(self) -> usize {
        match self {
            TextureSlots::Material => MATERIAL_TEXTURE_UNITS,
            TextureSlots::Sprite | TextureSlots::Cubemap => 1,
        }
    }

    fn view_dimension(self) -> wgpu::TextureViewDimension {
        match self {
            TextureSlots::Cubemap => wgpu::TextureViewDimension::Cube,
            _ => wgpu::TextureViewDimension::D2,
        }
    }
}

/// Bind-group layouts shared by shaders and the assets drawn with them.
#[derive(Debug)]
pub struct TextureLayouts {
    pub material: wgpu::BindGroupLayout,
    pub sprite: wgpu::BindGroupLayout,
    pub cubemap: wgpu::BindGroupLayout,
}

impl TextureLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            material: texture_layout(device, TextureSlots::Material),
            sprite: texture_layout(device, TextureSlots::Sprite),
            cubemap: texture_layout(device, TextureSlots::Cubemap),
        }
    }

    pub fn get(&self, slots: TextureSlots) -> &wgpu::BindGroupLayout {
        match slots {
            TextureSlots::Material => &self.material,
            TextureSlots::Sprite => &self.sprite,
            TextureSlots::Cubemap => &self.cubemap,
        }
    }

    /// Create a bind group for `slots` from the given views, in unit order.
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        slots: TextureSlots,
        views: &[&wgpu::TextureView],
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> wgpu::BindGroup {
        debug_assert_eq!(views.len(), slots.texture_count());
        let mut entries: Vec<wgpu::BindGroupEntry> = views
            .iter()
            .enumerate()
            .map(|(unit, view)| wgpu::BindGroupEntry {
                binding: unit as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: views.len() as u32,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: self.get(slots),
            entries: &entries,
            label: Some(label),
        })
    }
}

fn texture_layout(device: &wgpu::Device, slots: TextureSlots) -> wgpu::BindGroupLayout {
    let count = slots.texture_count();
    let mut entries: Vec<wgpu::BindGroupLayoutEntry> = (0..count)
        .map(|unit| wgpu::BindGroupLayoutEntry {
            binding: unit as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: slots.view_dimension(),
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        })
        .collect();
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: count as u32,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &entries,
        label: Some(match slots {
            TextureSlots::Material => "material texture_bind_group_layout",
            TextureSlots::Sprite => "sprite texture_bind_group_layout",
            TextureSlots::Cubemap => "cubemap texture_bind_group_layout",
        }),
    })
}

pub fn load_image(path: &Path) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(path)?;
    image::load_from_memory(&data).with_context(|| format!("decoding {}", path.display()))
}

pub fn load_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(path)?;
    Texture::from_bytes(device, queue, &data, &path.to_string_lossy())
        .with_context(|| format!("decoding {}", path.display()))
}

/// Load six face images into a cubemap.
pub fn load_cubemap(
    faces: &[impl AsRef<Path>],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let images = faces
        .iter()
        .map(|face| load_image(face.as_ref()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Texture::cubemap_from_images(device, queue, &images, "skybox cubemap")
}
