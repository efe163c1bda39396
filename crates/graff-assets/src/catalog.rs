//! Which drawings exist for which letters, and which one a character gets.

use std::collections::BTreeMap;

use graff_core::error::AssetError;
use graff_core::rules;
use graff_core::types::{AssetKey, Variant};
use graff_core::StyleMode;

const FIRST_VARIANTS: &[char] = &['a', 'b', 'c', 'd', 'j', 'o', 'p', 'y'];
const LAST_VARIANTS: &[char] = &['c', 'i', 'k', 'l', 'o', 't', 'x', 'y'];
const ALTERNATES: &[char] = &['e', 'l', 'm', 'o'];

/// Where a character sits in the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub is_first: bool,
    pub is_last: bool,
    pub is_alternate: bool,
}

/// One character of a request after asset resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedChar {
    /// A space: no asset, fixed-width blank glyph
    Space,
    Asset(AssetKey),
}

/// Mapping from asset identity to asset file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCatalog {
    files: BTreeMap<AssetKey, String>,
}

impl AssetCatalog {
    /// A catalog with no assets
    pub fn empty() -> Self {
        Self::default()
    }

    /// The bundled letter set: `a`-`z` plus alternates and positional variants
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for ch in 'a'..='z' {
            catalog.insert(AssetKey::standard(ch), format!("{ch}1.svg"));
        }
        for &ch in ALTERNATES {
            catalog.insert(AssetKey::new(ch, Variant::Alternate), format!("{ch}2.svg"));
        }
        for &ch in FIRST_VARIANTS {
            catalog.insert(AssetKey::new(ch, Variant::First), format!("{ch}1-first.svg"));
        }
        for &ch in LAST_VARIANTS {
            catalog.insert(AssetKey::new(ch, Variant::Last), format!("{ch}1-last.svg"));
        }
        catalog
    }

    /// Register (or replace) the file for an asset
    pub fn insert(&mut self, key: AssetKey, file: impl Into<String>) {
        self.files.insert(key, file.into());
    }

    pub fn file(&self, key: &AssetKey) -> Option<&str> {
        self.files.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.files.contains_key(key)
    }

    pub fn has_alternate(&self, ch: char) -> bool {
        self.contains(&AssetKey::new(ch, Variant::Alternate))
    }

    /// Every registered asset, in key order
    pub fn entries(&self) -> impl Iterator<Item = (&AssetKey, &str)> {
        self.files.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Characters that have a standard drawing
    pub fn standard_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.files
            .keys()
            .filter(|k| k.variant == Variant::Standard)
            .map(|k| k.ch)
    }

    /// Pick the asset for one character
    ///
    /// Precedence: first-position variant, then last-position variant (both
    /// only outside `straight` mode), then the alternate drawing, then the
    /// standard drawing.
    pub fn resolve(
        &self,
        ch: char,
        placement: Placement,
        mode: &StyleMode,
    ) -> Result<AssetKey, AssetError> {
        let positional = mode.allows_positional_variants();
        let candidates = [
            (positional && placement.is_first, Variant::First),
            (positional && placement.is_last, Variant::Last),
            (placement.is_alternate, Variant::Alternate),
            (true, Variant::Standard),
        ];

        candidates
            .into_iter()
            .filter(|(wanted, _)| *wanted)
            .map(|(_, variant)| AssetKey::new(ch, variant))
            .find(|key| self.contains(key))
            .ok_or(AssetError::AssetNotFound { ch })
    }

    /// Resolve a whole character sequence
    ///
    /// Letters are matched case-insensitively. The first character that has
    /// no asset at all aborts the request.
    pub fn resolve_text(
        &self,
        chars: &[char],
        mode: &StyleMode,
    ) -> Result<Vec<ResolvedChar>, AssetError> {
        let lowered: Vec<char> = chars.iter().map(char::to_ascii_lowercase).collect();
        let last = lowered.len().saturating_sub(1);

        lowered
            .iter()
            .enumerate()
            .map(|(index, &ch)| {
                if ch == ' ' {
                    return Ok(ResolvedChar::Space);
                }
                let placement = Placement {
                    is_first: index == 0,
                    is_last: index == last,
                    is_alternate: rules::should_use_alternate(
                        ch,
                        index,
                        &lowered,
                        self.has_alternate(ch),
                    ),
                };
                let key = self.resolve(ch, placement, mode)?;
                log::trace!("Resolved '{}' at {} to asset {}", ch, index, key);
                Ok(ResolvedChar::Asset(key))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled() -> StyleMode {
        StyleMode::Styled("curved".into())
    }

    #[test]
    fn builtin_covers_lowercase_alphabet() {
        let catalog = AssetCatalog::builtin();
        assert_eq!(catalog.standard_chars().count(), 26);
        assert_eq!(catalog.file(&AssetKey::new('o', Variant::Alternate)), Some("o2.svg"));
        assert_eq!(catalog.file(&AssetKey::new('y', Variant::First)), Some("y1-first.svg"));
        assert_eq!(catalog.file(&AssetKey::new('t', Variant::Last)), Some("t1-last.svg"));
        assert!(!catalog.has_alternate('a'));
    }

    #[test]
    fn first_beats_last_and_alternate() {
        let catalog = AssetCatalog::builtin();
        let placement = Placement {
            is_first: true,
            is_last: true,
            is_alternate: true,
        };
        let key = catalog.resolve('o', placement, &styled()).unwrap();
        assert_eq!(key.variant, Variant::First);
    }

    #[test]
    fn straight_mode_skips_positional_variants() {
        let catalog = AssetCatalog::builtin();
        let placement = Placement {
            is_first: true,
            is_last: true,
            is_alternate: true,
        };
        let key = catalog.resolve('o', placement, &StyleMode::Straight).unwrap();
        assert_eq!(key.variant, Variant::Alternate);
    }

    #[test]
    fn falls_back_to_standard_when_variant_missing() {
        let catalog = AssetCatalog::builtin();
        let placement = Placement {
            is_first: true,
            ..Placement::default()
        };
        // no first-position h
        let key = catalog.resolve('h', placement, &styled()).unwrap();
        assert_eq!(key, AssetKey::standard('h'));
    }

    #[test]
    fn missing_character_names_it() {
        let catalog = AssetCatalog::builtin();
        let err = catalog
            .resolve('7', Placement::default(), &styled())
            .unwrap_err();
        assert!(matches!(err, AssetError::AssetNotFound { ch: '7' }));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn resolve_text_positions_and_alternates() {
        let catalog = AssetCatalog::builtin();
        let chars: Vec<char> = "cool".chars().collect();
        let resolved = catalog.resolve_text(&chars, &styled()).unwrap();
        assert_eq!(
            resolved,
            vec![
                ResolvedChar::Asset(AssetKey::new('c', Variant::First)),
                ResolvedChar::Asset(AssetKey::standard('o')),
                ResolvedChar::Asset(AssetKey::new('o', Variant::Alternate)),
                ResolvedChar::Asset(AssetKey::new('l', Variant::Last)),
            ]
        );
    }

    #[test]
    fn resolve_text_keeps_spaces_and_lowercases() {
        let catalog = AssetCatalog::builtin();
        let chars: Vec<char> = "Hi yo".chars().collect();
        let resolved = catalog.resolve_text(&chars, &StyleMode::Straight).unwrap();
        assert_eq!(resolved[0], ResolvedChar::Asset(AssetKey::standard('h')));
        assert_eq!(resolved[2], ResolvedChar::Space);
    }

    #[test]
    fn resolve_text_aborts_on_unknown() {
        let catalog = AssetCatalog::builtin();
        let chars: Vec<char> = "ab!".chars().collect();
        assert!(catalog.resolve_text(&chars, &styled()).is_err());
    }
}
