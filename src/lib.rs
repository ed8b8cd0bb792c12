//! hidden-city
//!
//! A first-person hidden-object game. The player types a name, looks at the
//! city map and then searches a textured city for objects hidden at random
//! spawn points. Finding all of them records the player's time in a
//! best-time table that persists between sessions.
//!
//! High-level modules
//! - `camera`: first-person camera, discrete movement states and projection
//! - `config`: window and asset settings read from `hidden-city.toml`
//! - `context`: GPU and window context that owns device, queue and layouts
//! - `data_structures`: drawable assets (models, billboards, text, skybox)
//! - `error`: typed errors for document and mesh loading
//! - `flow`: scene stack and the event loop that drives it
//! - `pipelines`: render states, pipelines and the shader program
//! - `records`: player records and their persistence
//! - `render`: the capability every drawable asset implements
//! - `resources`: file loading and model decoders
//! - `scenes`: start, map and game scenes
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod records;
pub mod render;
pub mod resources;
pub mod scenes;

pub use config::GameConfig;
pub use flow::{Scene, run};
