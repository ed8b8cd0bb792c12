use cgmath::{InnerSpace, Vector3, Zero};

use crate::{data_structures::model::ModelVertex, error::MeshError};

/// A decoded model file: a node hierarchy plus the materials its meshes index.
#[derive(Clone, Debug, Default)]
pub struct DecodedScene {
    pub root: DecodedNode,
    pub materials: Vec<DecodedMaterial>,
}

#[derive(Clone, Debug, Default)]
pub struct DecodedNode {
    pub meshes: Vec<DecodedMesh>,
    pub children: Vec<DecodedNode>,
}

impl DecodedNode {
    /// Visit every mesh, depth first, a node's own meshes before its children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DecodedMesh)) {
        for mesh in &self.meshes {
            visit(mesh);
        }
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Triangulated mesh data as the decoder produced it.
#[derive(Clone, Debug, Default)]
pub struct DecodedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// One normal per position, when the file has them.
    pub normals: Option<Vec<[f32; 3]>>,
    /// First UV channel, one per position, when the file has one.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

/// Colours and texture paths of one material slot.
///
/// Texture paths are kept as written in the model file, relative to the
/// model's directory.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMaterial {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub diffuse_textures: Vec<String>,
    pub specular_textures: Vec<String>,
}

impl Default for DecodedMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            shininess: 1.0,
            diffuse_textures: Vec::new(),
            specular_textures: Vec::new(),
        }
    }
}

impl DecodedMaterial {
    /// Shininess as the lighting model uses it; never below 1.
    pub fn clamped_shininess(&self) -> f32 {
        self.shininess.max(1.0)
    }
}

impl DecodedMesh {
    /// Interleave the decoded attributes into vertices.
    ///
    /// Missing texture coordinates become (0, 0); missing normals are
    /// generated by averaging adjacent face normals. Fails if the index list
    /// is not a triangle list over the available vertices.
    pub fn build_vertices(&self) -> Result<Vec<ModelVertex>, MeshError> {
        self.validate_indices()?;

        let generated;
        let normals = match &self.normals {
            Some(normals) if normals.len() == self.positions.len() => normals,
            _ => {
                generated = smooth_normals(&self.positions, &self.indices);
                &generated
            }
        };

        Ok(self
            .positions
            .iter()
            .enumerate()
            .map(|(i, position)| ModelVertex {
                position: *position,
                normal: normals[i],
                tex_coords: self
                    .tex_coords
                    .as_ref()
                    .and_then(|uvs| uvs.get(i))
                    .copied()
                    .unwrap_or([0.0, 0.0]),
            })
            .collect())
    }

    pub fn validate_indices(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangulated(self.indices.len()));
        }
        let vertex_count = self.positions.len();
        match self.indices.iter().find(|i| **i as usize >= vertex_count) {
            Some(index) => Err(MeshError::IndexOutOfRange {
                index: *index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }
}

/// Area-weighted vertex normals. Indices must already be validated.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::zero(); positions.len()];
    for c in indices.chunks(3) {
        let p0: Vector3<f32> = positions[c[0] as usize].into();
        let p1: Vector3<f32> = positions[c[1] as usize].into();
        let p2: Vector3<f32> = positions[c[2] as usize].into();
        // Unnormalised, so larger faces weigh more.
        let face = (p1 - p0).cross(p2 - p0);
        for i in c {
            sums[*i as usize] += face;
        }
    }
    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}
