//! Typed errors for document and mesh loading.
//!
//! Application boundaries work with [`anyhow::Result`]; the types here exist for
//! failures that callers (and tests) need to tell apart.

use std::path::PathBuf;

/// A failure while reading one of the game's documents.
///
/// `Io` and `Syntax` cover files that cannot be read or parsed at all. `Schema`
/// covers documents that parse but lack a required element (root table,
/// player name, spawn coordinate, ...).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid document {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{spawn_points} spawn points cannot hold {hidden_objects} hidden objects")]
    NotEnoughSpawnPoints {
        spawn_points: usize,
        hidden_objects: usize,
    },
}

/// Decoded mesh data that cannot be turned into GPU buffers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("{0} indices do not form a triangle list")]
    NotTriangulated(usize),
}
