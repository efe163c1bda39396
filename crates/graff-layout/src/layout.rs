//! The left-to-right layout fold
//!
//! Each glyph is placed against the one before it, so the whole layout is a
//! fold over the glyph sequence with `(previous glyph, running x)` as the
//! state. [`LayoutEngine::step`] is one turn of that fold and can be driven
//! by hand; [`LayoutEngine::layout`] runs it over a full sequence.

use std::sync::Arc;

use graff_core::rules::{self, OverlapRules};
use graff_core::types::{LayoutResult, ProcessedGlyph};
use graff_core::LayoutParams;

use crate::kerning::{kern, window_start};

/// What the fold carries from one glyph to the next
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldState<'a> {
    pub prev: Option<&'a ProcessedGlyph>,
    pub x: f32,
}

/// Where one glyph ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub x: f32,
    /// Kerning fraction used against the previous glyph
    pub overlap: f32,
    /// Rotation in degrees
    pub rotation: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    rules: OverlapRules,
    params: LayoutParams,
}

impl LayoutEngine {
    pub fn new(rules: OverlapRules, params: LayoutParams) -> Self {
        Self { rules, params }
    }

    pub fn rules(&self) -> &OverlapRules {
        &self.rules
    }

    pub fn params(&self) -> LayoutParams {
        self.params
    }

    /// Place `glyph` after whatever `state` holds
    ///
    /// The first glyph sits at 0. Every later glyph is shifted so that its
    /// left ink edge lines up with the column window the kerning search
    /// settled on, but never to the left of its predecessor.
    pub fn step<'a>(
        &self,
        state: FoldState<'a>,
        glyph: &'a ProcessedGlyph,
    ) -> (FoldState<'a>, GlyphPlacement) {
        let placement = match state.prev {
            None => GlyphPlacement {
                x: 0.0,
                overlap: 0.0,
                rotation: rules::get_rotation(glyph.ch, None),
            },
            Some(prev) => {
                let overlap = kern(prev, glyph, &self.rules);
                let start = window_start(prev, prev.silhouette_width() * overlap);
                let shift = start as f32 - glyph.bounds.left as f32;
                GlyphPlacement {
                    x: state.x.max(state.x + shift),
                    overlap,
                    rotation: rules::get_rotation(glyph.ch, Some(prev.ch)),
                }
            }
        };

        let next = FoldState {
            prev: Some(glyph),
            x: placement.x,
        };
        (next, placement)
    }

    /// Lay out a glyph sequence
    pub fn layout(&self, glyphs: Vec<Arc<ProcessedGlyph>>) -> LayoutResult {
        let mut positions = Vec::with_capacity(glyphs.len());
        let mut rotations = Vec::with_capacity(glyphs.len());
        let mut overlaps = Vec::with_capacity(glyphs.len());

        let mut state = FoldState::default();
        for glyph in &glyphs {
            let (next, placement) = self.step(state, glyph);
            log::trace!(
                "Placed '{}' at x={:.1} (overlap {:.3}, rotation {:.1})",
                glyph.ch,
                placement.x,
                placement.overlap,
                placement.rotation
            );
            positions.push(placement.x);
            rotations.push(placement.rotation);
            overlaps.push(placement.overlap);
            state = next;
        }

        let content_width = glyphs
            .iter()
            .zip(&positions)
            .map(|(g, x)| x + g.width as f32)
            .fold(0.0f32, f32::max);
        let content_height = glyphs
            .iter()
            .map(|g| g.height as f32)
            .fold(0.0f32, f32::max);
        let suggested_scale = self.fit_scale(content_width, content_height);

        log::debug!(
            "Laid out {} glyphs: {:.1}x{:.1}, scale {:.3}",
            glyphs.len(),
            content_width,
            content_height,
            suggested_scale
        );

        LayoutResult {
            glyphs,
            positions,
            rotations,
            overlaps,
            content_width,
            content_height,
            suggested_scale,
        }
    }

    /// Display scale that fits the content into the viewport with margin
    pub fn fit_scale(&self, content_width: f32, content_height: f32) -> f32 {
        if content_width <= 0.0 || content_height <= 0.0 {
            return 1.0;
        }
        let p = &self.params;
        (p.viewport_width / content_width)
            .min(p.viewport_height / content_height)
            .min(1.0)
            * p.fit_margin
    }
}
