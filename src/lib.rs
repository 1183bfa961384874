pub mod animation;
pub mod assets;
pub mod audio;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod tilemap;

pub use error::GameError;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.json";
