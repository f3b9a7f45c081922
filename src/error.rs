//! Error types for map evolution and rendering.

use thiserror::Error;

/// Everything that can go wrong in this crate
///
/// The evolutionary core only fails up front, while validating its
/// configuration. The other variants come from the renderer and config loading.
#[derive(Debug, Error)]
pub enum Error {
    /// Run options that would make the search undefined.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Tile images that cannot be composited into one map.
    #[error("tile asset mismatch: {0}")]
    AssetMismatch(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
