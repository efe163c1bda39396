//! From alpha to silhouette: opacity mask, ink bounds and column profile
//!
//! Sampling is deliberately coarse. Only every `stride`-th pixel on each
//! axis is inspected, and an opaque sample paints its whole
//! `stride` x `stride` block into the mask. Kerning only needs the vertical
//! extent of ink per column, so block fill is plenty.

use graff_core::types::{Bounds, ColumnSpan, OpacityMask};

use crate::render::AlphaBuffer;

/// Columns apart two populated profile entries may be and still have the
/// gap between them filled in
pub const MAX_INTERPOLATED_GAP: u32 = 10;

/// Everything extracted from one rendered glyph
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    pub bounds: Bounds,
    pub mask: OpacityMask,
    pub profile: Vec<Option<ColumnSpan>>,
    /// Number of sampled pixels found opaque
    pub opaque_samples: usize,
}

/// Sample the alpha buffer into a silhouette
///
/// Returns `None` when no sample is above `threshold`.
pub fn extract(alpha: &AlphaBuffer, stride: u32, threshold: u8) -> Option<Silhouette> {
    let (width, height) = (alpha.width(), alpha.height());
    let stride = stride.max(1);
    let step = stride as usize;

    let mut mask = OpacityMask::new(width, height);
    let mut profile: Vec<Option<ColumnSpan>> = vec![None; width as usize];
    let mut bounds: Option<Bounds> = None;
    let mut opaque_samples = 0;

    for x in (0..width).step_by(step) {
        let mut column: Option<(u32, u32)> = None;
        let mut count = 0u32;

        for y in (0..height).step_by(step) {
            if alpha.alpha(x, y) <= threshold {
                continue;
            }

            for dx in 0..stride {
                for dy in 0..stride {
                    mask.set(x + dx, y + dy);
                }
            }

            column = Some(match column {
                Some((top, bottom)) => (top.min(y), bottom.max(y)),
                None => (y, y),
            });
            count += 1;

            bounds = Some(match bounds {
                Some(b) => Bounds {
                    left: b.left.min(x),
                    right: b.right.max(x),
                    top: b.top.min(y),
                    bottom: b.bottom.max(y),
                },
                None => Bounds {
                    left: x,
                    right: x,
                    top: y,
                    bottom: y,
                },
            });
        }

        if let Some((top, bottom)) = column {
            opaque_samples += count as usize;
            let column_height = (bottom - top + 1) as f32;
            let span = ColumnSpan {
                top,
                bottom,
                density: count as f32 / (column_height / stride as f32),
            };
            for dx in 0..stride {
                if let Some(slot) = profile.get_mut((x + dx) as usize) {
                    *slot = Some(span);
                }
            }
        }
    }

    let bounds = bounds?;
    interpolate_gaps(&mut profile, &bounds);

    Some(Silhouette {
        bounds,
        mask,
        profile,
        opaque_samples,
    })
}

/// Fill short profile gaps strictly inside the bounds
///
/// A missing column between populated neighbours `l` and `r` (both within
/// the bounds, `r - l < MAX_INTERPOLATED_GAP`) gets `top`, `bottom` and
/// `density` interpolated linearly between them. Wider gaps, and gaps that
/// touch the bounds edges, stay empty. Neighbours are taken from the
/// profile as sampled, never from interpolated entries.
pub fn interpolate_gaps(profile: &mut [Option<ColumnSpan>], bounds: &Bounds) {
    let sampled: Vec<Option<ColumnSpan>> = profile.to_vec();
    let left = bounds.left as usize;
    let right = (bounds.right as usize).min(sampled.len().saturating_sub(1));

    for x in (left + 1)..right {
        if sampled[x].is_some() {
            continue;
        }

        let prev = (left..x).rev().find_map(|i| sampled[i].map(|s| (i, s)));
        let next = ((x + 1)..=right).find_map(|i| sampled[i].map(|s| (i, s)));

        let (Some((l, ls)), Some((r, rs))) = (prev, next) else {
            continue;
        };
        if (r - l) as u32 >= MAX_INTERPOLATED_GAP {
            continue;
        }

        let t = (x - l) as f32 / (r - l) as f32;
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        profile[x] = Some(ColumnSpan {
            top: lerp(ls.top as f32, rs.top as f32).round() as u32,
            bottom: lerp(ls.bottom as f32, rs.bottom as f32).round() as u32,
            density: lerp(ls.density, rs.density),
        });
    }
}
