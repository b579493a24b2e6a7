//! Asset management
//!
//! The core never decodes files itself. Textures come through a
//! reference-counted [`TextureCache`] backed by a [`TextureLoader`], and
//! tilemaps arrive already resolved as [`TileMapData`].

pub mod texture_cache;
pub mod tilemap;

pub use texture_cache::{TextureCache, TextureHandle, TextureInfo, TextureLoader};
pub use tilemap::{TileMapData, TileSet};

use std::path::PathBuf;
use thiserror::Error;

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// The loader could not produce the asset
    #[error("Failed to load {path}: {reason}")]
    Load {
        /// Requested path
        path: PathBuf,
        /// Loader-specific description
        reason: String,
    },

    /// The asset is not resident in the cache
    #[error("Asset not loaded: {0}")]
    NotLoaded(String),

    /// Tilemap data is inconsistent
    #[error("Invalid tilemap: {0}")]
    InvalidTileMap(String),
}
