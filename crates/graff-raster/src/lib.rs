//! Glyph rasterizer and silhouette extractor for Graff
//!
//! Turns one glyph asset into a [`ProcessedGlyph`]: the markup itself plus
//! everything kerning needs to know about its shape.
//!
//! # Quick Start
//!
//! ```no_run
//! use graff_core::RasterParams;
//! use graff_raster::Rasterizer;
//!
//! let markup = std::fs::read_to_string("assets/letters/a1.svg").unwrap();
//! let rasterizer = Rasterizer::new(RasterParams::default()).unwrap();
//! let glyph = rasterizer.rasterize(&markup, 'a').unwrap();
//! println!("ink spans columns {}..={}", glyph.bounds.left, glyph.bounds.right);
//! ```
//!
//! # Architecture
//!
//! 1. [`normalize`] rewrites the document root to span the square raster box
//! 2. [`render`] renders that document with resvg
//! 3. [`silhouette`] samples the alpha channel into mask, bounds and column profile
//! 4. [`Rasterizer`] ties them together, handles spaces, and consults the glyph cache

pub mod normalize;
pub mod render;
pub mod silhouette;

use std::sync::Arc;

use graff_core::error::{AssetError, GraffError, RasterError};
use graff_core::types::{AssetKey, Bounds, OpacityMask, ProcessedGlyph};
use graff_core::{GlyphCache, RasterParams, SPACE_WIDTH};

pub use normalize::normalize_markup;
pub use render::{render_alpha, AlphaBuffer};
pub use silhouette::{extract, interpolate_gaps, Silhouette, MAX_INTERPOLATED_GAP};

/// Rasterizes glyph markup at a fixed resolution and sampling stride
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    params: RasterParams,
}

impl Rasterizer {
    /// Create a rasterizer, rejecting a zero resolution or a stride larger
    /// than the box
    pub fn new(params: RasterParams) -> Result<Self, RasterError> {
        if params.resolution == 0 {
            return Err(RasterError::InvalidParams("resolution must be positive".into()));
        }
        if params.stride == 0 || params.stride > params.resolution {
            return Err(RasterError::InvalidParams(format!(
                "stride {} must be in 1..={}",
                params.stride, params.resolution
            )));
        }
        Ok(Self { params })
    }

    /// The parameters this rasterizer samples with
    pub fn params(&self) -> RasterParams {
        self.params
    }

    /// Rasterize one glyph
    ///
    /// A literal space never touches the renderer and yields the blank
    /// [`Rasterizer::space_glyph`]. Any other character must produce at
    /// least one opaque sample, otherwise the asset is considered corrupt.
    ///
    /// The stored markup is the normalized document, so derived layers are
    /// drawn in the same box the silhouette was measured in.
    pub fn rasterize(&self, markup: &str, ch: char) -> Result<ProcessedGlyph, RasterError> {
        if ch == ' ' {
            return Ok(self.space_glyph());
        }

        let resolution = self.params.resolution;
        let markup = normalize_markup(markup, ch, resolution)?;
        let alpha = render_alpha(&markup, ch, resolution)?;
        let silhouette = extract(&alpha, self.params.stride, self.params.alpha_threshold)
            .ok_or(RasterError::EmptyGlyph { ch })?;

        log::debug!(
            "Rasterized '{}': bounds {:?}, {} opaque samples",
            ch,
            silhouette.bounds,
            silhouette.opaque_samples
        );

        Ok(ProcessedGlyph {
            markup,
            width: resolution,
            height: resolution,
            bounds: silhouette.bounds,
            mask: silhouette.mask,
            profile: silhouette.profile,
            scale: 1.0,
            ch,
            is_blank: false,
        })
    }

    /// The fixed-width blank glyph used for spaces
    pub fn space_glyph(&self) -> ProcessedGlyph {
        let height = self.params.resolution;
        ProcessedGlyph {
            markup: blank_markup(height),
            width: SPACE_WIDTH,
            height,
            bounds: Bounds {
                left: 0,
                right: SPACE_WIDTH,
                top: 0,
                bottom: height,
            },
            mask: OpacityMask::new(SPACE_WIDTH, height),
            profile: vec![None; SPACE_WIDTH as usize],
            scale: 1.0,
            ch: ' ',
            is_blank: true,
        }
    }

    /// Rasterize through the glyph cache
    ///
    /// `fetch` is only called on a cache miss; its bytes must be UTF-8
    /// markup. The fresh glyph replaces whatever the cache held for `key`.
    pub fn rasterize_cached<F>(
        &self,
        key: AssetKey,
        cache: &GlyphCache,
        fetch: F,
    ) -> Result<Arc<ProcessedGlyph>, GraffError>
    where
        F: FnOnce() -> Result<Vec<u8>, AssetError>,
    {
        if let Some(glyph) = cache.get(&key) {
            return Ok(glyph);
        }

        let bytes = fetch()?;
        let markup = String::from_utf8(bytes).map_err(|e| RasterError::InvalidAsset {
            ch: key.ch,
            reason: e.to_string(),
        })?;
        let glyph = Arc::new(self.rasterize(&markup, key.ch)?);
        cache.insert(key, Arc::clone(&glyph));
        Ok(glyph)
    }
}

fn blank_markup(size: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}"></svg>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const DISC: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200">
        <circle cx="100" cy="100" r="60" fill="black"/>
    </svg>"#;

    const BLANK: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200">
        <rect x="0" y="0" width="200" height="200" fill="none"/>
    </svg>"#;

    fn rasterizer() -> Rasterizer {
        Rasterizer::new(RasterParams::default()).unwrap()
    }

    #[test]
    fn disc_bounds_and_profile() {
        let glyph = rasterizer().rasterize(DISC, 'o').unwrap();
        assert!(glyph.bounds.fits_within(glyph.width, glyph.height));
        assert!(glyph.bounds.left >= 38 && glyph.bounds.left <= 42);
        assert!(glyph.bounds.right >= 158 && glyph.bounds.right <= 160);
        assert!(glyph.mask.count() > 0);
        let centre = glyph.span(100).unwrap();
        assert!(centre.top <= 42 && centre.bottom >= 158);
        assert!(glyph.span(10).is_none());
        assert!(!glyph.is_blank);
    }

    #[test]
    fn stored_markup_spans_the_raster_box() {
        let big = r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="400" viewBox="0 0 400 400">
            <rect x="100" y="100" width="200" height="200" fill="black"/>
        </svg>"#;
        let params = RasterParams {
            resolution: 100,
            ..RasterParams::default()
        };
        let glyph = Rasterizer::new(params).unwrap().rasterize(big, 'b').unwrap();

        assert_eq!((glyph.width, glyph.height), (100, 100));
        assert!(glyph.markup.contains(r#"width="100" height="100""#));
        assert!(!glyph.markup.contains(r#"width="400""#));
        // the square covers the middle half of the box
        assert!(glyph.bounds.left >= 24 && glyph.bounds.left <= 26);
        assert!(glyph.bounds.right >= 72 && glyph.bounds.right <= 75);

        // rasterizing the stored markup again measures the same silhouette
        let again = Rasterizer::new(params)
            .unwrap()
            .rasterize(&glyph.markup, 'b')
            .unwrap();
        assert_eq!(again.bounds, glyph.bounds);
    }

    #[test]
    fn space_bypasses_rendering() {
        let glyph = rasterizer().rasterize("this is not svg", ' ').unwrap();
        assert!(glyph.is_blank);
        assert_eq!(glyph.width, SPACE_WIDTH);
        assert_eq!(glyph.bounds.right, SPACE_WIDTH);
        assert_eq!(glyph.mask.count(), 0);
        assert_eq!(glyph.profile.len(), SPACE_WIDTH as usize);
    }

    #[test]
    fn invisible_glyph_is_an_error() {
        let err = rasterizer().rasterize(BLANK, 'k').unwrap_err();
        assert!(matches!(err, RasterError::EmptyGlyph { ch: 'k' }));
    }

    #[test]
    fn rejects_bad_params() {
        let bad = RasterParams {
            stride: 0,
            ..RasterParams::default()
        };
        assert!(Rasterizer::new(bad).is_err());
        let bad = RasterParams {
            resolution: 0,
            ..RasterParams::default()
        };
        assert!(Rasterizer::new(bad).is_err());
    }

    #[test]
    fn cached_rasterization_fetches_once() {
        let cache = GlyphCache::new();
        let key = AssetKey::standard('o');
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Ok(DISC.as_bytes().to_vec())
        };

        let first = rasterizer().rasterize_cached(key, &cache, fetch).unwrap();
        let second = rasterizer()
            .rasterize_cached(key, &cache, || {
                fetches.set(fetches.get() + 1);
                Ok(DISC.as_bytes().to_vec())
            })
            .unwrap();
        assert_eq!(fetches.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn fetch_failure_propagates() {
        let cache = GlyphCache::new();
        let err = rasterizer()
            .rasterize_cached(AssetKey::standard('z'), &cache, || {
                Err(AssetError::AssetFetch {
                    path: "z1.svg".into(),
                    source: std::io::ErrorKind::ConnectionReset.into(),
                })
            })
            .unwrap_err();
        assert!(err.is_asset_error());
        assert!(cache.is_empty());
    }
}
