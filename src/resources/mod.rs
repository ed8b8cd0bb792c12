//! Loading of external files.
//!
//! Everything here is synchronous: files are read whole, decoded and, where a
//! device is involved, uploaded before the call returns. Model files are first
//! decoded into the GPU-free graph in [`mesh`] and only then turned into
//! buffers.

use std::path::Path;

use anyhow::Context as _;

use crate::resources::mesh::DecodedScene;

pub mod gltf_loader;
pub mod mesh;
pub mod obj_loader;
pub mod texture;

pub fn load_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Decode a model file, picking the decoder by extension.
pub fn decode_model(path: &Path) -> anyhow::Result<DecodedScene> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("obj") => obj_loader::decode(path),
        Some("gltf") | Some("glb") => gltf_loader::decode(path),
        _ => anyhow::bail!("unsupported model format: {}", path.display()),
    }
}
