use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tile layer '{0}' uses unsupported encoding '{1}' (save the map with CSV layer format)")]
    UnsupportedEncoding(String, String),
    #[error("infinite tilemaps are not supported")]
    InfiniteMap,
    #[error("tileset '{0}' is external; embed it in the map")]
    ExternalTileset(String),
    #[error("tile layer '{layer}' has {found} cells, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        found: usize,
    },
    #[error("tile layer '{layer}' is too large ({width}x{height} cells)")]
    LayerTooLarge {
        layer: String,
        width: u32,
        height: u32,
    },
    #[error("tilemap has no tile layer named '{0}'")]
    MissingLayer(String),
    #[error("no tilemap loaded for {0}")]
    MissingMap(String),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
    #[error("failed to create render surface: {0}")]
    Surface(String),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}
