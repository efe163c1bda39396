//! Layer planning, z-order, transforms and document assembly

use std::fmt;

use graff_core::types::{LayoutResult, ProcessedGlyph};
use graff_core::StyleConfiguration;

use crate::geometry::{Fragment, GlyphGeometry};
use crate::layers::LayerStyle;

/// The layers a glyph can contribute, in back-to-front order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Halo,
    ShadowHalo,
    Shadow,
    Outline,
    Content,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Halo,
        LayerKind::ShadowHalo,
        LayerKind::Shadow,
        LayerKind::Outline,
        LayerKind::Content,
    ];

    /// Base stacking index; content adds the reversed glyph index on top
    pub fn z_base(self) -> u32 {
        match self {
            Self::Halo => 1,
            Self::ShadowHalo => 2,
            Self::Shadow => 3,
            Self::Outline => 4,
            Self::Content => 5,
        }
    }

    /// Shadow layers are pushed by the shadow offset
    pub fn is_shadow(self) -> bool {
        matches!(self, Self::Shadow | Self::ShadowHalo)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Halo => "halo",
            Self::ShadowHalo => "shadow-halo",
            Self::Shadow => "shadow",
            Self::Outline => "outline",
            Self::Content => "content",
        }
    }

    pub fn style(self, config: &StyleConfiguration) -> LayerStyle {
        match self {
            Self::Halo => LayerStyle::halo(config),
            Self::ShadowHalo => LayerStyle::shadow_halo(config),
            Self::Shadow => LayerStyle::shadow(config),
            Self::Outline => LayerStyle::outline(config),
            Self::Content => LayerStyle::content(config),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which layers the configuration asks for, back to front
pub fn layer_plan(config: &StyleConfiguration) -> Vec<LayerKind> {
    LayerKind::ALL
        .into_iter()
        .filter(|kind| match kind {
            LayerKind::Halo => config.halo_enabled,
            LayerKind::ShadowHalo => config.shadow_enabled && config.halo_enabled,
            LayerKind::Shadow => config.shadow_enabled,
            LayerKind::Outline => config.outline_enabled,
            LayerKind::Content => true,
        })
        .collect()
}

/// Placement of one layer fragment in content coordinates
///
/// Applied as `translate(x, 0)`, then about the centre of the glyph box:
/// scale, rotate and, for shadow layers, the shadow offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub x: f32,
    pub origin: (f32, f32),
    pub scale: f32,
    pub rotation: f32,
    pub offset: Option<(f32, f32)>,
}

impl fmt::Display for LayerTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cx, cy) = self.origin;
        write!(
            f,
            "translate({} 0) translate({} {}) scale({}) rotate({})",
            self.x, cx, cy, self.scale, self.rotation
        )?;
        if let Some((dx, dy)) = self.offset {
            write!(f, " translate({dx} {dy})")?;
        }
        write!(f, " translate({} {})", -cx, -cy)
    }
}

/// One positioned layer fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLayer {
    pub kind: LayerKind,
    pub glyph_index: usize,
    pub z_index: u32,
    pub transform: LayerTransform,
    pub fragment: Fragment,
}

/// Derive every layer of every glyph, sorted back to front
///
/// Each glyph's markup is parsed once. A glyph whose markup cannot be
/// parsed keeps its content layer as the raw markup and loses its effect
/// layers; the rest of the text is unaffected. Spaces contribute nothing.
pub fn compose(layout: &LayoutResult, config: &StyleConfiguration) -> Vec<ComposedLayer> {
    let plan = layer_plan(config);
    let count = layout.len() as u32;
    let mut layers = Vec::with_capacity(layout.len() * plan.len());

    for (index, glyph) in layout.glyphs.iter().enumerate() {
        if glyph.is_blank {
            continue;
        }
        let geometry = GlyphGeometry::parse(&glyph.markup);
        if let Err(e) = &geometry {
            log::warn!("Glyph '{}' at {} degraded: {}", glyph.ch, index, e);
        }

        let x = layout.positions.get(index).copied().unwrap_or_default();
        let rotation = layout.rotations.get(index).copied().unwrap_or_default();

        for &kind in &plan {
            let style = kind.style(config);
            let fragment = match &geometry {
                Ok(geometry) if !style.draws_nothing() => geometry.derive(&style),
                _ => style.fallback(&glyph.markup),
            };
            let z_index = match kind {
                LayerKind::Content => kind.z_base() + (count - index as u32),
                _ => kind.z_base(),
            };
            layers.push(ComposedLayer {
                kind,
                glyph_index: index,
                z_index,
                transform: transform_for(glyph, kind, x, rotation, config),
                fragment,
            });
        }
    }

    // stable: equal z keeps glyph order
    layers.sort_by_key(|layer| layer.z_index);
    log::debug!("Composed {} layers for {} glyphs", layers.len(), layout.len());
    layers
}

fn transform_for(
    glyph: &ProcessedGlyph,
    kind: LayerKind,
    x: f32,
    rotation: f32,
    config: &StyleConfiguration,
) -> LayerTransform {
    LayerTransform {
        x,
        origin: (glyph.width as f32 / 2.0, glyph.height as f32 / 2.0),
        scale: glyph.scale,
        rotation,
        offset: kind
            .is_shadow()
            .then_some((config.shadow_offset_x, config.shadow_offset_y)),
    }
}

/// Stack composed layers into one standalone SVG document
///
/// The document spans the layout's content box. Layers whose source could
/// not be parsed are left out, since raw markup cannot be nested safely.
pub fn assemble_document(
    layout: &LayoutResult,
    config: &StyleConfiguration,
    layers: &[ComposedLayer],
) -> String {
    let (width, height) = (layout.content_width, layout.content_height);
    let mut doc = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}" overflow="visible">"#
    );

    if config.background_enabled {
        doc.push_str(&format!(
            r#"<rect x="0" y="0" width="100%" height="100%" fill="{}"/>"#,
            config.background_color.replace('"', "&quot;")
        ));
    }

    for layer in layers {
        let Fragment::Svg(fragment) = &layer.fragment else {
            if let Fragment::Raw(_) = layer.fragment {
                log::warn!(
                    "Skipping unparsed {} layer of glyph {}",
                    layer.kind,
                    layer.glyph_index
                );
            }
            continue;
        };
        doc.push_str(&format!(
            r#"<g class="layer-{}" transform="{}">{}</g>"#,
            layer.kind, layer.transform, fragment
        ));
    }

    doc.push_str("</svg>");
    doc
}
