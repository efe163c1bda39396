//! Error types for Graff

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraffError>;

/// Main error type for Graff
///
/// Asset and raster failures are fatal for a generation request: the
/// whole layout is abandoned and no partial result is returned.
#[derive(Debug, Error)]
pub enum GraffError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Asset resolution and retrieval errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("No asset found for character '{ch}'")]
    AssetNotFound { ch: char },

    #[error("Failed to fetch asset {path}: {source}")]
    AssetFetch {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Rasterization and silhouette extraction errors
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("No visible pixels found for character '{ch}'")]
    EmptyGlyph { ch: char },

    #[error("Invalid asset markup for character '{ch}': {reason}")]
    InvalidAsset { ch: char, reason: String },

    #[error("Could not allocate a {size}x{size} pixmap")]
    PixmapAllocation { size: u32 },

    #[error("Invalid raster parameters: {0}")]
    InvalidParams(String),
}

/// Compositing errors
///
/// These never abort a generation request and so never become a
/// [`GraffError`]: the layer that failed degrades on its own and the rest
/// of the stack is still produced.
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("Malformed vector content: {0}")]
    MalformedVectorContent(String),
}

impl GraffError {
    /// Whether this error came from resolving or fetching an asset
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Self::Asset(_))
    }
}
