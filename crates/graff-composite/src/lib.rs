//! Compositing for Graff: from glyph artwork to stacked effect layers
//!
//! A glyph's markup is parsed once into [`GlyphGeometry`], a flat list of
//! shape records tagged by role (letter body, shadow, shine). Each effect
//! layer is a pure function of that geometry and a [`LayerStyle`], and
//! yields an independent [`Fragment`].
//!
//! ```text
//! markup --parse--> GlyphGeometry --derive(LayerStyle)--> Fragment --> markup
//! ```
//!
//! [`compose`] does this for a whole layout under a
//! [`graff_core::StyleConfiguration`], assigns z-order and transforms, and
//! [`assemble_document`] stacks the result into a single SVG document.
//!
//! Layer failures never propagate: content falls back to the source markup
//! and effect layers to an empty `<svg></svg>`.

pub mod geometry;
pub mod layers;
pub mod stack;

pub use geometry::{
    DisplayMode, Fragment, FragmentNode, GlyphGeometry, ShapeRecord, ShapeRole, SvgFragment,
    EMPTY_MARKUP, SHADOW_CLASS, SHINE_CLASS,
};
pub use layers::{
    derive_layer, halo_ring_width, ContentStyle, LayerStyle, ShadowStyle, Shine, StampStyle,
    Stroke,
};
pub use stack::{assemble_document, compose, layer_plan, ComposedLayer, LayerKind, LayerTransform};
