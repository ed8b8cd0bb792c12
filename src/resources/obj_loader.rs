use std::path::Path;

use anyhow::Context as _;

use crate::resources::mesh::{DecodedMaterial, DecodedMesh, DecodedNode, DecodedScene};

/// Decode a Wavefront OBJ file and its material library.
///
/// OBJ has no hierarchy, so every object becomes a mesh of the root node. A
/// material library that fails to load is logged and the meshes keep no
/// material.
pub fn decode(path: &Path) -> anyhow::Result<DecodedScene> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("decoding {}", path.display()))?;

    let materials = match materials {
        Ok(materials) => materials.into_iter().map(decode_material).collect(),
        Err(e) => {
            log::warn!("No materials for {}: {}", path.display(), e);
            Vec::new()
        }
    };

    let meshes = models
        .into_iter()
        .map(|m| {
            let mesh = m.mesh;
            let positions = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect::<Vec<_>>();
            let normals = (!mesh.normals.is_empty()).then(|| {
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect()
            });
            // Image rows start at the top, OBJ v starts at the bottom.
            let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
                mesh.texcoords
                    .chunks_exact(2)
                    .map(|t| [t[0], 1.0 - t[1]])
                    .collect()
            });
            DecodedMesh {
                name: m.name,
                positions,
                normals,
                tex_coords,
                indices: mesh.indices,
                material: mesh.material_id,
            }
        })
        .collect();

    Ok(DecodedScene {
        root: DecodedNode {
            meshes,
            children: Vec::new(),
        },
        materials,
    })
}

fn decode_material(m: tobj::Material) -> DecodedMaterial {
    DecodedMaterial {
        name: m.name,
        ambient: m.ambient.unwrap_or([0.0; 3]),
        diffuse: m.diffuse.unwrap_or([0.0; 3]),
        specular: m.specular.unwrap_or([0.0; 3]),
        shininess: m.shininess.unwrap_or(1.0),
        diffuse_textures: m.diffuse_texture.into_iter().collect(),
        specular_textures: m.specular_texture.into_iter().collect(),
    }
}
