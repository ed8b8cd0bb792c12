use std::path::Path;

use anyhow::Context as _;

use crate::resources::mesh::{DecodedMaterial, DecodedMesh, DecodedNode, DecodedScene};

/// Decode a glTF or GLB file.
///
/// Node transforms are not applied; the hierarchy only decides the order in
/// which meshes are visited. Base-colour images are used when they are
/// referenced by URI. Images embedded in buffer views are skipped.
pub fn decode(path: &Path) -> anyhow::Result<DecodedScene> {
    let (document, buffers, _) =
        gltf::import(path).with_context(|| format!("decoding {}", path.display()))?;

    let materials = document
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            let [r, g, b, _] = pbr.base_color_factor();
            let diffuse_textures = pbr
                .base_color_texture()
                .and_then(|info| match info.texture().source().source() {
                    gltf::image::Source::Uri { uri, .. } => Some(uri.to_string()),
                    gltf::image::Source::View { .. } => {
                        log::warn!(
                            "Embedded image of material {:?} in {} is not supported",
                            material.name(),
                            path.display()
                        );
                        None
                    }
                })
                .into_iter()
                .collect();
            DecodedMaterial {
                name: material.name().unwrap_or_default().to_string(),
                ambient: [r, g, b],
                diffuse: [r, g, b],
                specular: [0.0; 3],
                shininess: 1.0,
                diffuse_textures,
                specular_textures: Vec::new(),
            }
        })
        .collect();

    let roots = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene
            .nodes()
            .map(|node| decode_node(&node, &buffers))
            .collect(),
        None => Vec::new(),
    };

    Ok(DecodedScene {
        root: DecodedNode {
            meshes: Vec::new(),
            children: roots,
        },
        materials,
    })
}

fn decode_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> DecodedNode {
    let meshes = node
        .mesh()
        .map(|mesh| {
            mesh.primitives()
                .filter(|p| p.mode() == gltf::mesh::Mode::Triangles)
                .filter_map(|primitive| {
                    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
                    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
                    let indices = match reader.read_indices() {
                        Some(indices) => indices.into_u32().collect(),
                        None => (0..positions.len() as u32).collect(),
                    };
                    Some(DecodedMesh {
                        name: mesh.name().unwrap_or_default().to_string(),
                        normals: reader.read_normals().map(|n| n.collect()),
                        tex_coords: reader.read_tex_coords(0).map(|t| t.into_f32().collect()),
                        positions,
                        indices,
                        material: primitive.material().index(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    DecodedNode {
        meshes,
        children: node
            .children()
            .map(|child| decode_node(&child, buffers))
            .collect(),
    }
}
