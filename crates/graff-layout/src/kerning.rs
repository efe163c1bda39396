//! Silhouette kerning: how far two neighbouring glyphs slide together
//!
//! The search slides the current glyph over the right edge of the previous
//! one, from the largest allowed overlap down to the smallest in steps of
//! half a percent. At each candidate it walks the shared columns (every
//! second column) and compares vertical ink extents. The first candidate
//! where the inks meet in a column that is dense on both sides wins.
//!
//! Note the direction: the scan stops at the first *colliding* overlap,
//! which is the largest overlap that still touches, not the largest one
//! that stays clear. The letter art is calibrated against exactly this.

use graff_core::rules::{OverlapRange, OverlapRules};
use graff_core::types::ProcessedGlyph;

/// Decrement between candidate overlap fractions
pub const OVERLAP_STEP: f32 = 0.005;

/// Column stride used when comparing profiles
pub const COLLISION_STRIDE: usize = 2;

/// Columns thinner than this do not count as ink for kerning
pub const MIN_DENSITY: f32 = 0.1;

/// Overlap fraction for `current` following `prev`, under the pair rules
pub fn kern(prev: &ProcessedGlyph, current: &ProcessedGlyph, rules: &OverlapRules) -> f32 {
    if prev.is_blank || current.is_blank {
        return 0.0;
    }
    let range = rules.pair(prev.ch, current.ch);
    find_optimal_overlap(prev, current, range)
}

/// Search the overlap window for the first colliding fraction
///
/// Returns 0 when either glyph is blank and `range.min` when no candidate
/// collides.
pub fn find_optimal_overlap(
    prev: &ProcessedGlyph,
    current: &ProcessedGlyph,
    range: OverlapRange,
) -> f32 {
    if prev.is_blank || current.is_blank {
        return 0.0;
    }

    let prev_width = prev.silhouette_width();
    let mut overlap = range.max;
    while overlap >= range.min {
        let start = window_start(prev, prev_width * overlap);
        if inks_meet(prev, current, start) {
            log::trace!(
                "'{}' -> '{}': collision at overlap {:.3}",
                prev.ch,
                current.ch,
                overlap
            );
            return overlap;
        }
        overlap -= OVERLAP_STEP;
    }

    range.min
}

/// Column of `prev` that lines up with the left ink edge of the next glyph
/// when `offset` pixels of `prev` are overlapped
pub fn window_start(prev: &ProcessedGlyph, offset: f32) -> i64 {
    (prev.bounds.right as f32 - offset).floor() as i64
}

fn inks_meet(prev: &ProcessedGlyph, current: &ProcessedGlyph, start: i64) -> bool {
    let right = i64::from(prev.bounds.right);
    let current_left = i64::from(current.bounds.left);

    (start.max(0)..right)
        .step_by(COLLISION_STRIDE)
        .any(|x| {
            let cx = x - start + current_left;
            if cx < 0 || cx >= i64::from(current.width) {
                return false;
            }
            let (Some(p), Some(c)) = (prev.span(x as u32), current.span(cx as u32)) else {
                return false;
            };
            let shared = i64::from(p.bottom.min(c.bottom)) - i64::from(p.top.max(c.top));
            shared > 0 && p.density > MIN_DENSITY && c.density > MIN_DENSITY
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graff_core::rules::OverlapRule;
    use graff_core::types::{Bounds, ColumnSpan, OpacityMask};
    use proptest::prelude::*;

    fn block(ch: char, left: u32, right: u32, top: u32, bottom: u32, density: f32) -> ProcessedGlyph {
        let mut profile = vec![None; 200];
        for slot in &mut profile[left as usize..=right as usize] {
            *slot = Some(ColumnSpan {
                top,
                bottom,
                density,
            });
        }
        ProcessedGlyph {
            markup: String::new(),
            width: 200,
            height: 200,
            bounds: Bounds {
                left,
                right,
                top,
                bottom,
            },
            mask: OpacityMask::new(200, 200),
            profile,
            scale: 1.0,
            ch,
            is_blank: false,
        }
    }

    fn space() -> ProcessedGlyph {
        ProcessedGlyph {
            is_blank: true,
            ch: ' ',
            ..block(' ', 0, 69, 0, 199, 0.0)
        }
    }

    const RANGE: OverlapRange = OverlapRange { min: 0.08, max: 0.22 };

    #[test]
    fn blank_neighbours_never_overlap() {
        let a = block('a', 20, 180, 20, 180, 1.0);
        assert_eq!(find_optimal_overlap(&space(), &a, RANGE), 0.0);
        assert_eq!(find_optimal_overlap(&a, &space(), RANGE), 0.0);
        assert_eq!(kern(&a, &space(), &OverlapRules::builtin()), 0.0);
    }

    #[test]
    fn touching_blocks_stop_at_first_candidate() {
        let a = block('a', 20, 180, 20, 180, 1.0);
        let b = block('b', 20, 180, 20, 180, 1.0);
        assert_eq!(find_optimal_overlap(&a, &b, RANGE), RANGE.max);
    }

    #[test]
    fn vertically_disjoint_blocks_fall_back_to_min() {
        let high = block('h', 20, 180, 0, 50, 1.0);
        let low = block('l', 20, 180, 100, 150, 1.0);
        assert_eq!(find_optimal_overlap(&high, &low, RANGE), RANGE.min);
    }

    #[test]
    fn sparse_columns_do_not_collide() {
        let a = block('a', 20, 180, 20, 180, 0.1);
        let b = block('b', 20, 180, 20, 180, 1.0);
        assert_eq!(find_optimal_overlap(&a, &b, RANGE), RANGE.min);
    }

    #[test]
    fn ranges_that_only_touch_at_one_row_do_not_collide() {
        // bottoms and tops meet exactly: intersection is zero
        let a = block('a', 20, 180, 0, 100, 1.0);
        let b = block('b', 20, 180, 100, 199, 1.0);
        assert_eq!(find_optimal_overlap(&a, &b, RANGE), RANGE.min);
    }

    #[test]
    fn window_start_aligns_with_overlap() {
        let a = block('a', 20, 180, 20, 180, 1.0);
        assert_eq!(window_start(&a, 160.0 * 0.22), 144);
        assert_eq!(window_start(&a, 0.0), 180);
    }

    #[test]
    fn kern_uses_pair_rules() {
        let a = block('a', 20, 180, 20, 180, 1.0);
        let b = block('b', 20, 180, 20, 180, 1.0);
        let rules = OverlapRules::uniform(OverlapRule::new(0.05, 0.3).with_special_case('b', 0.12));
        assert_eq!(kern(&a, &b, &rules), 0.12);
    }

    proptest! {
        #[test]
        fn prop_overlap_within_range(
            l1 in 0u32..90, w1 in 1u32..100, t1 in 0u32..100, h1 in 1u32..99,
            l2 in 0u32..90, w2 in 1u32..100, t2 in 0u32..100, h2 in 1u32..99,
            d1 in 0.0f32..2.0, d2 in 0.0f32..2.0,
        ) {
            let a = block('a', l1, l1 + w1, t1, t1 + h1, d1);
            let b = block('b', l2, l2 + w2, t2, t2 + h2, d2);
            let r = find_optimal_overlap(&a, &b, RANGE);
            prop_assert!(r >= RANGE.min - 1e-6 && r <= RANGE.max);
        }
    }
}
