//! Rule tables for glyph substitution, rotation and kerning
//!
//! Everything here is a pure lookup: no state, no I/O. The tables encode
//! how the hand-drawn letter set was calibrated, so the values are data,
//! not derived quantities.

use std::collections::HashMap;

/// Whether the letter at `index` should use its alternate drawing
///
/// Only `o`, `m` and `e` ever alternate, and only when an alternate asset
/// exists:
/// - an `o` directly following another `o`;
/// - an `m` or `e` at an even position (2nd, 4th, ...) of a run of
///   identical letters.
pub fn should_use_alternate(ch: char, index: usize, sequence: &[char], has_alternate: bool) -> bool {
    if !has_alternate || index == 0 || index >= sequence.len() {
        return false;
    }

    let prev = sequence[index - 1];
    match ch {
        'o' => prev == 'o',
        'm' | 'e' if prev == ch => {
            let run = sequence[..=index]
                .iter()
                .rev()
                .take_while(|c| **c == ch)
                .count();
            run % 2 == 0
        }
        _ => false,
    }
}

/// Degrees of rotation keyed by (previous letter, letter)
const LETTER_ROTATION_RULES: &[(char, char, f32)] = &[
    ('a', 'r', -3.0),
    ('b', 'o', 2.0),
    ('e', 'l', -2.0),
    ('l', 'l', 3.0),
    ('l', 'o', -4.0),
    ('o', 'k', 2.5),
    ('r', 'e', 4.0),
    ('s', 't', -2.5),
    ('t', 'a', 3.0),
    ('w', 'o', -3.0),
    ('y', 'o', 2.0),
];

/// Rotation for `ch` given the letter before it; 0 when there is none
pub fn get_rotation(ch: char, prev: Option<char>) -> f32 {
    let Some(prev) = prev else {
        return 0.0;
    };
    let prev = prev.to_ascii_lowercase();
    let ch = ch.to_ascii_lowercase();

    LETTER_ROTATION_RULES
        .iter()
        .find(|(p, c, _)| *p == prev && *c == ch)
        .map(|(_, _, deg)| *deg)
        .unwrap_or(0.0)
}

/// Overlap calibration for one leading letter
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRule {
    pub min_overlap: f32,
    pub max_overlap: f32,
    /// Per-next-letter replacement for `max_overlap`
    pub special_cases: HashMap<char, f32>,
}

impl OverlapRule {
    pub fn new(min_overlap: f32, max_overlap: f32) -> Self {
        Self {
            min_overlap,
            max_overlap,
            special_cases: HashMap::new(),
        }
    }

    pub fn with_special_case(mut self, next: char, max_overlap: f32) -> Self {
        self.special_cases.insert(next, max_overlap);
        self
    }
}

/// The overlap window a kerning search scans, as fractions of the
/// leading glyph's silhouette width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapRange {
    pub min: f32,
    pub max: f32,
}

/// Letter-pair overlap rules
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRules {
    pub default: OverlapRule,
    pub letters: HashMap<char, OverlapRule>,
    /// Pairs whose maximum overlap is scaled down by `exception_factor`
    pub exceptions: HashMap<char, Vec<char>>,
    pub exception_factor: f32,
}

/// Scale applied to the maximum overlap of exception pairs
pub const EXCEPTION_FACTOR: f32 = 0.7;

impl OverlapRules {
    /// The same rule for every pair, no exceptions
    pub fn uniform(rule: OverlapRule) -> Self {
        Self {
            default: rule,
            letters: HashMap::new(),
            exceptions: HashMap::new(),
            exception_factor: EXCEPTION_FACTOR,
        }
    }

    /// The calibrated table for the bundled letter set
    pub fn builtin() -> Self {
        let mut rules = Self::uniform(OverlapRule::new(0.08, 0.22));

        let letters = [
            ('a', OverlapRule::new(0.10, 0.25).with_special_case('b', 0.18)),
            ('c', OverlapRule::new(0.06, 0.18)),
            ('f', OverlapRule::new(0.12, 0.30).with_special_case('f', 0.20)),
            ('l', OverlapRule::new(0.04, 0.15)),
            ('o', OverlapRule::new(0.10, 0.26).with_special_case('o', 0.30)),
            ('r', OverlapRule::new(0.12, 0.28)),
            ('t', OverlapRule::new(0.10, 0.30).with_special_case('t', 0.22)),
            ('w', OverlapRule::new(0.05, 0.16)),
        ];
        rules.letters.extend(letters);

        rules.exceptions.insert('k', vec!['a', 'o']);
        rules.exceptions.insert('r', vec!['i', 'j']);
        rules.exceptions.insert('v', vec!['v', 'w']);
        rules
    }

    /// Resolve the scan window for the pair `prev` followed by `next`
    pub fn pair(&self, prev: char, next: char) -> OverlapRange {
        let prev = prev.to_ascii_lowercase();
        let next = next.to_ascii_lowercase();
        let rule = self.letters.get(&prev).unwrap_or(&self.default);

        let min = rule.min_overlap;
        let mut max = rule
            .special_cases
            .get(&next)
            .copied()
            .unwrap_or(rule.max_overlap);

        let is_exception = self
            .exceptions
            .get(&prev)
            .is_some_and(|list| list.contains(&next));
        if is_exception {
            max = min.max(max * self.exception_factor);
        }

        OverlapRange { min, max }
    }
}

impl Default for OverlapRules {
    fn default() -> Self {
        Self::builtin()
    }
}
