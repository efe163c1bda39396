//! Graff Core: the shared vocabulary of the glyph layout engine
//!
//! Text enters as characters and leaves as an ordered stack of vector layer
//! fragments. This crate holds the types every stage agrees on, the rule
//! tables that drive glyph substitution and kerning, and the glyph cache.
//!
//! ## The Stages
//!
//! 1. **Resolve** - each character picks a source asset (`graff-assets`)
//! 2. **Rasterize** - the asset becomes a silhouette and column profile (`graff-raster`)
//! 3. **Kern** - adjacent silhouettes slide together, left to right (`graff-layout`)
//! 4. **Composite** - each glyph yields fill, outline, halo, shadow and shine layers (`graff-composite`)
//!
//! Data moves between stages through the types in [`types`]. A
//! [`types::ProcessedGlyph`] is immutable once built and is shared through
//! `Arc` between the cache, the layout and every derived layer.

pub mod cache;
pub mod error;
pub mod rules;
pub mod style;
pub mod traits;

pub use cache::{CacheConfig, Clock, GlyphCache, ManualClock, SystemClock};
pub use error::{AssetError, CompositeError, GraffError, RasterError, Result};
pub use style::{StyleConfiguration, StyleMode};
pub use traits::AssetSource;

/// The data structures that flow between stages
pub mod types {
    use std::fmt;
    use std::sync::Arc;

    /// Inked region of a glyph inside its raster box, in pixels
    ///
    /// `right` and `bottom` are the last sampled opaque coordinates, not
    /// one-past-the-end.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Bounds {
        pub left: u32,
        pub right: u32,
        pub top: u32,
        pub bottom: u32,
    }

    impl Bounds {
        /// Horizontal extent of the ink
        pub fn width(&self) -> u32 {
            self.right.saturating_sub(self.left)
        }

        /// Vertical extent of the ink
        pub fn height(&self) -> u32 {
            self.bottom.saturating_sub(self.top)
        }

        /// Whether these bounds sit inside a `width` x `height` box
        pub fn fits_within(&self, width: u32, height: u32) -> bool {
            self.left <= self.right
                && self.top <= self.bottom
                && self.right <= width
                && self.bottom <= height
        }
    }

    /// Vertical ink extent and fill density of one column
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ColumnSpan {
        pub top: u32,
        pub bottom: u32,
        pub density: f32,
    }

    /// Boolean silhouette of a rasterized glyph, row-major
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct OpacityMask {
        width: u32,
        height: u32,
        bits: Vec<bool>,
    }

    impl OpacityMask {
        /// A fully transparent mask
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                bits: vec![false; width as usize * height as usize],
            }
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Opacity at `(x, y)`; out-of-range coordinates read as transparent
        pub fn get(&self, x: u32, y: u32) -> bool {
            if x >= self.width || y >= self.height {
                return false;
            }
            self.bits[(y * self.width + x) as usize]
        }

        /// Mark `(x, y)` opaque; out-of-range coordinates are ignored
        pub fn set(&mut self, x: u32, y: u32) {
            if x < self.width && y < self.height {
                self.bits[(y * self.width + x) as usize] = true;
            }
        }

        /// Number of opaque pixels
        pub fn count(&self) -> usize {
            self.bits.iter().filter(|b| **b).count()
        }
    }

    /// Which drawing of a character an asset holds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Variant {
        Standard,
        Alternate,
        First,
        Last,
    }

    /// Identity of one source asset, also used as the glyph cache key
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AssetKey {
        pub ch: char,
        pub variant: Variant,
    }

    impl AssetKey {
        pub const fn new(ch: char, variant: Variant) -> Self {
            Self { ch, variant }
        }

        pub const fn standard(ch: char) -> Self {
            Self::new(ch, Variant::Standard)
        }
    }

    impl fmt::Display for AssetKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.variant {
                Variant::Standard => write!(f, "{}", self.ch),
                Variant::Alternate => write!(f, "{}2", self.ch),
                Variant::First => write!(f, "{}-first", self.ch),
                Variant::Last => write!(f, "{}-last", self.ch),
            }
        }
    }

    /// A rasterized glyph: markup, silhouette and kerning profile
    ///
    /// Invariant: `bounds` fits within `width` x `height`, and both `mask`
    /// and `profile` are sized to `width`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ProcessedGlyph {
        /// Source vector markup the layers are derived from
        pub markup: String,
        pub width: u32,
        pub height: u32,
        pub bounds: Bounds,
        pub mask: OpacityMask,
        /// Per-column ink extent; `None` where no ink was sampled
        pub profile: Vec<Option<ColumnSpan>>,
        pub scale: f32,
        pub ch: char,
        pub is_blank: bool,
    }

    impl ProcessedGlyph {
        /// Width of the inked silhouette
        pub fn silhouette_width(&self) -> f32 {
            self.bounds.width() as f32
        }

        /// Profile entry for column `x`, if any ink was found there
        pub fn span(&self, x: u32) -> Option<&ColumnSpan> {
            self.profile.get(x as usize).and_then(Option::as_ref)
        }
    }

    /// The result of one generation request
    ///
    /// `glyphs`, `positions`, `rotations` and `overlaps` are parallel;
    /// `overlaps[i]` is the kerning fraction used to place glyph `i`
    /// against glyph `i - 1` (0 for the first glyph).
    #[derive(Debug, Clone, Default)]
    pub struct LayoutResult {
        pub glyphs: Vec<Arc<ProcessedGlyph>>,
        pub positions: Vec<f32>,
        pub rotations: Vec<f32>,
        pub overlaps: Vec<f32>,
        pub content_width: f32,
        pub content_height: f32,
        pub suggested_scale: f32,
    }

    impl LayoutResult {
        pub fn len(&self) -> usize {
            self.glyphs.len()
        }

        pub fn is_empty(&self) -> bool {
            self.glyphs.is_empty()
        }

        /// The characters this layout was built from, in order
        pub fn text(&self) -> String {
            self.glyphs.iter().map(|g| g.ch).collect()
        }
    }
}

/// How glyphs are sampled into silhouettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterParams {
    /// Side length of the square raster box
    pub resolution: u32,
    /// Sample every `stride`-th pixel on both axes
    pub stride: u32,
    /// Alpha above which a sample counts as ink
    pub alpha_threshold: u8,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            resolution: 200,
            stride: 2,
            alpha_threshold: 20,
        }
    }
}

/// How a layout is fitted for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Fraction of the viewport the content may fill, leaving room for effects
    pub fit_margin: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 300.0,
            fit_margin: 0.8,
        }
    }
}

/// Width in pixels of the blank glyph used for spaces
pub const SPACE_WIDTH: u32 = 70;
