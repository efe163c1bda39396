//! Root normalization: every glyph document is redrawn into the raster box
//!
//! Bounds, profiles and layout positions are all measured in the
//! `resolution` x `resolution` box, so the stored markup must span exactly
//! that box too. The root element gets `width` and `height` set to the
//! resolution and `preserveAspectRatio="xMidYMid meet"`; a root without a
//! `viewBox` gets one from its original size so the drawing scales instead
//! of being cropped. The rest of the document is left byte for byte.

use graff_core::error::RasterError;
use roxmltree::{Document, ParsingOptions};

const REPLACED_ATTRS: &[&str] = &["width", "height", "preserveAspectRatio"];

/// Rewrite the root of `markup` to span a `resolution`-sided square
pub fn normalize_markup(markup: &str, ch: char, resolution: u32) -> Result<String, RasterError> {
    let invalid = |reason: String| RasterError::InvalidAsset { ch, reason };

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(markup, options).map_err(|e| invalid(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(invalid(format!(
            "root element is <{}>, expected <svg>",
            root.tag_name().name()
        )));
    }

    let own = |name: &str| {
        root.attributes()
            .find(|a| a.namespace().is_none() && a.name() == name)
    };
    let view_box = match own("viewBox") {
        Some(_) => None,
        None => match (
            own("width").and_then(|a| parse_length(a.value())),
            own("height").and_then(|a| parse_length(a.value())),
        ) {
            (Some(w), Some(h)) => Some(format!("0 0 {w} {h}")),
            _ => None,
        },
    };

    let mut removed: Vec<_> = root
        .attributes()
        .filter(|a| a.namespace().is_none() && REPLACED_ATTRS.contains(&a.name()))
        .map(|a| a.range())
        .collect();
    removed.sort_by_key(|r| r.start);

    // attributes go right after the tag name
    let tag_start = root.range().start + 1;
    let insert_at = markup[tag_start..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .map(|n| tag_start + n)
        .ok_or_else(|| invalid("unterminated root tag".into()))?;

    let mut inserted = format!(
        r#" width="{resolution}" height="{resolution}" preserveAspectRatio="xMidYMid meet""#
    );
    if let Some(view_box) = view_box {
        inserted.push_str(&format!(r#" viewBox="{view_box}""#));
    }

    let mut out = String::with_capacity(markup.len() + inserted.len());
    out.push_str(&markup[..insert_at]);
    out.push_str(&inserted);
    let mut cursor = insert_at;
    for range in removed {
        out.push_str(&markup[cursor..range.start]);
        cursor = range.end;
    }
    out.push_str(&markup[cursor..]);
    Ok(out)
}

fn parse_length(value: &str) -> Option<f32> {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| *v > 0.0 && v.is_finite())
}
