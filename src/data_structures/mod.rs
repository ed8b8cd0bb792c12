//! Core data structures for rendering.
//!
//! This module defines the assets scenes are built from: GPU textures and the
//! per-model texture cache, meshes with their materials, 3D models,
//! screen-space billboards and text, the skybox, and world placements.

pub mod billboard;
pub mod instance;
pub mod model;
pub mod skybox;
pub mod texture;
