//! Graff - graffiti lettering from hand-drawn glyph artwork
//!
//! Graff turns a line of text into stacked vector layers:
//! 1. Each character picks a drawing (standard, alternate, first or last)
//! 2. The drawing is rasterized into a silhouette and column profile
//! 3. Neighbouring silhouettes are kerned together, left to right
//! 4. Fill, outline, halo, shadow and shine layers are derived per glyph
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use graff::prelude::*;
//!
//! let generator = Generator::builder()
//!     .source(Arc::new(DirectorySource::new("assets/letters")))
//!     .build()?;
//!
//! let layout = generator.generate("cool", &"curved".parse()?)?;
//! for layer in generator.compose(&layout, &StyleConfiguration::default()) {
//!     println!("{} #{} z={}", layer.kind, layer.glyph_index, layer.z_index);
//! }
//! # Ok::<(), GraffError>(())
//! ```

pub mod generator;
pub mod sequence;

pub use generator::{Generator, GeneratorBuilder};
pub use sequence::{RequestSequence, RequestTicket};

pub use graff_assets as assets;
pub use graff_composite as composite;
pub use graff_core::{error, rules, types, LayoutParams, RasterParams, StyleConfiguration, StyleMode};
pub use graff_layout as layout;
pub use graff_raster as raster;

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{Generator, RequestSequence, RequestTicket};
    pub use graff_assets::{AssetCatalog, DirectorySource, MemorySource};
    pub use graff_composite::{ComposedLayer, Fragment, LayerKind};
    pub use graff_core::{
        error::{GraffError, Result},
        types::{LayoutResult, ProcessedGlyph},
        AssetSource, CacheConfig, GlyphCache, LayoutParams, RasterParams, StyleConfiguration,
        StyleMode,
    };
}
