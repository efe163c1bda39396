//! The seams between the engine and the outside world
//!
//! Fetching asset bytes is the only place a generation request touches
//! anything outside its own memory. Everything behind [`AssetSource`] can
//! be swapped: a directory on disk, an in-memory bundle, or a network
//! fetcher provided by the host application.

use crate::error::AssetError;

/// Where glyph asset bytes come from
///
/// ```ignore
/// struct Bundled;
///
/// impl AssetSource for Bundled {
///     fn name(&self) -> &'static str {
///         "bundled"
///     }
///
///     fn fetch(&self, file: &str) -> Result<Vec<u8>, AssetError> {
///         lookup(file).ok_or_else(|| AssetError::AssetFetch {
///             path: file.to_string(),
///             source: std::io::ErrorKind::NotFound.into(),
///         })
///     }
/// }
/// ```
pub trait AssetSource: Send + Sync {
    /// Used in logs and error messages
    fn name(&self) -> &'static str;

    /// Read the raw bytes of the named asset file
    ///
    /// Transport failures are reported as [`AssetError::AssetFetch`] and
    /// are not retried.
    fn fetch(&self, file: &str) -> Result<Vec<u8>, AssetError>;
}
