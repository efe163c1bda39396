//! Kerning and layout for Graff
//!
//! [`kerning`] decides how far two neighbouring silhouettes slide together;
//! [`layout`] folds that decision over a whole glyph sequence to produce a
//! [`graff_core::types::LayoutResult`].

pub mod kerning;
pub mod layout;

pub use kerning::{find_optimal_overlap, kern, window_start};
pub use layout::{FoldState, GlyphPlacement, LayoutEngine};
