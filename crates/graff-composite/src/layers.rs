//! Per-layer render modes and the pure derivations behind them
//!
//! Every layer gets its own closed style variant carrying only what that
//! layer paints with. Derivation never touches the source geometry; each
//! call clones the records it needs and returns a fresh [`Fragment`].

use graff_core::StyleConfiguration;

use crate::geometry::{DisplayMode, Fragment, FragmentNode, GlyphGeometry, ShapeRecord, ShapeRole};

/// Fill used for the letter body when the fill effect is off
pub const DEFAULT_FILL: &str = "#000000";

/// Group holding the halo ring when outline and halo are drawn together
pub const HALO_GROUP_ID: &str = "stamp-shield-group";
/// Group holding the outline ring drawn over the halo
pub const OUTLINE_GROUP_ID: &str = "stamp-group";

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f32) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shine {
    pub color: String,
    pub opacity: f32,
}

/// The letter body: fill, optional stroke behind it, optional shine
#[derive(Debug, Clone, PartialEq)]
pub struct ContentStyle {
    pub fill: String,
    pub stroke: Option<Stroke>,
    pub shine: Option<Shine>,
}

/// Stroke-only rings around the letter body
///
/// With both rings present the halo is widened to sit outside the
/// outline: its stroke width becomes `outline + 2 * halo`.
#[derive(Debug, Clone, PartialEq)]
pub struct StampStyle {
    pub outline: Option<Stroke>,
    pub halo: Option<Stroke>,
}

/// The pre-authored shadow shapes, tinted
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowStyle {
    pub fill: String,
    pub stroke: Option<Stroke>,
}

/// How one layer is painted
#[derive(Debug, Clone, PartialEq)]
pub enum LayerStyle {
    Content(ContentStyle),
    Stamp(StampStyle),
    Shadow(ShadowStyle),
    /// Halo-coloured ring around the shadow shapes
    ShadowHalo(Stroke),
}

impl LayerStyle {
    pub fn content(config: &StyleConfiguration) -> Self {
        Self::Content(ContentStyle {
            fill: if config.fill_enabled {
                config.fill_color.clone()
            } else {
                DEFAULT_FILL.to_string()
            },
            stroke: config
                .stroke_enabled
                .then(|| Stroke::new(&config.stroke_color, config.stroke_width)),
            shine: config.shine_enabled.then(|| Shine {
                color: config.shine_color.clone(),
                opacity: config.shine_opacity,
            }),
        })
    }

    /// The halo layer: halo ring, plus the outline ring when that is on too
    pub fn halo(config: &StyleConfiguration) -> Self {
        Self::Stamp(StampStyle {
            outline: outline_stroke(config),
            halo: config
                .halo_enabled
                .then(|| Stroke::new(&config.halo_color, config.halo_width)),
        })
    }

    /// The outline layer on its own
    pub fn outline(config: &StyleConfiguration) -> Self {
        Self::Stamp(StampStyle {
            outline: outline_stroke(config),
            halo: None,
        })
    }

    pub fn shadow(config: &StyleConfiguration) -> Self {
        Self::Shadow(ShadowStyle {
            fill: config.outline_color.clone(),
            stroke: config
                .outline_enabled
                .then(|| Stroke::new(&config.outline_color, config.outline_width * 0.5)),
        })
    }

    pub fn shadow_halo(config: &StyleConfiguration) -> Self {
        Self::ShadowHalo(Stroke::new(
            &config.halo_color,
            config.outline_width * 0.5 + config.halo_width * 2.0,
        ))
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    /// Whether this style is known to draw nothing without looking at geometry
    pub fn draws_nothing(&self) -> bool {
        matches!(
            self,
            Self::Stamp(StampStyle {
                outline: None,
                halo: None
            })
        )
    }

    /// What a layer shows when its source cannot be parsed
    pub fn fallback(&self, markup: &str) -> Fragment {
        if self.is_content() {
            Fragment::Raw(markup.to_string())
        } else {
            Fragment::Empty
        }
    }
}

fn outline_stroke(config: &StyleConfiguration) -> Option<Stroke> {
    config
        .outline_enabled
        .then(|| Stroke::new(&config.outline_color, config.outline_width))
}

/// Width of the halo ring drawn outside an outline
pub fn halo_ring_width(outline_width: f32, halo_width: f32) -> f32 {
    outline_width + halo_width * 2.0
}

impl GlyphGeometry {
    /// Derive one layer from this geometry
    pub fn derive(&self, style: &LayerStyle) -> Fragment {
        match style {
            LayerStyle::Content(content) => self.derive_content(content),
            LayerStyle::Stamp(stamp) => self.derive_stamp(stamp),
            LayerStyle::Shadow(shadow) => self.derive_shadow(shadow),
            LayerStyle::ShadowHalo(stroke) => self.derive_shadow_halo(stroke),
        }
    }

    fn derive_content(&self, style: &ContentStyle) -> Fragment {
        let nodes = self
            .shapes()
            .iter()
            .map(|shape| {
                let mut shape = shape.clone();
                match shape.role {
                    ShapeRole::Regular => {
                        shape.set_attr("fill", style.fill.as_str());
                        match &style.stroke {
                            Some(stroke) => {
                                apply_stroke(&mut shape, stroke);
                                shape.set_attr("paint-order", "stroke fill");
                            }
                            None => {
                                for name in [
                                    "stroke",
                                    "stroke-width",
                                    "stroke-linejoin",
                                    "stroke-linecap",
                                    "paint-order",
                                ] {
                                    shape.remove_attr(name);
                                }
                            }
                        }
                    }
                    ShapeRole::Shine => match &style.shine {
                        Some(shine) => {
                            shape.set_display(DisplayMode::Inline);
                            shape.set_attr("fill", shine.color.as_str());
                            shape.set_attr("fill-opacity", shine.opacity.to_string());
                        }
                        None => shape.set_display(DisplayMode::None),
                    },
                    ShapeRole::Shadow => shape.set_display(DisplayMode::None),
                }
                FragmentNode::Shape(shape)
            })
            .collect();
        self.fragment(nodes)
    }

    fn derive_stamp(&self, style: &StampStyle) -> Fragment {
        let ring = |shape: &ShapeRecord, stroke: &Stroke| {
            let mut shape = shape.clone();
            shape.set_attr("fill", "none");
            apply_stroke(&mut shape, stroke);
            shape
        };
        let body = self.shapes_with_role(ShapeRole::Regular);

        let nodes = match (&style.outline, &style.halo) {
            (None, None) => return Fragment::Empty,
            (Some(only), None) | (None, Some(only)) => body
                .map(|shape| FragmentNode::Shape(ring(shape, only)))
                .collect(),
            (Some(outline), Some(halo)) => {
                let widened = Stroke::new(
                    halo.color.as_str(),
                    halo_ring_width(outline.width, halo.width),
                );
                let (halos, outlines): (Vec<_>, Vec<_>) = body
                    .map(|shape| (ring(shape, &widened), ring(shape, outline)))
                    .unzip();
                vec![
                    FragmentNode::Group {
                        id: HALO_GROUP_ID.to_string(),
                        children: halos,
                    },
                    FragmentNode::Group {
                        id: OUTLINE_GROUP_ID.to_string(),
                        children: outlines,
                    },
                ]
            }
        };
        self.fragment(nodes)
    }

    fn derive_shadow(&self, style: &ShadowStyle) -> Fragment {
        self.shadow_only(|shape| {
            shape.set_attr("fill", style.fill.as_str());
            match &style.stroke {
                Some(stroke) => apply_stroke(shape, stroke),
                None => {
                    shape.remove_attr("stroke");
                    shape.remove_attr("stroke-width");
                }
            }
        })
    }

    fn derive_shadow_halo(&self, stroke: &Stroke) -> Fragment {
        self.shadow_only(|shape| {
            shape.set_attr("fill", "none");
            apply_stroke(shape, stroke);
        })
    }

    /// Reveal and paint the shadow shapes, hide everything else
    fn shadow_only(&self, paint: impl Fn(&mut ShapeRecord)) -> Fragment {
        let nodes = self
            .shapes()
            .iter()
            .map(|shape| {
                let mut shape = shape.clone();
                if shape.role == ShapeRole::Shadow {
                    shape.set_display(DisplayMode::Inline);
                    paint(&mut shape);
                } else {
                    shape.set_display(DisplayMode::None);
                }
                FragmentNode::Shape(shape)
            })
            .collect();
        self.fragment(nodes)
    }
}

fn apply_stroke(shape: &mut ShapeRecord, stroke: &Stroke) {
    shape.set_attr("stroke", stroke.color.as_str());
    shape.set_attr("stroke-width", stroke.width.to_string());
    shape.set_attr("stroke-linejoin", "round");
    shape.set_attr("stroke-linecap", "round");
}

/// Derive one layer straight from markup
///
/// Spaces and unparseable markup never fail: the content layer passes the
/// markup through unchanged and effect layers come back empty.
pub fn derive_layer(markup: &str, is_space: bool, style: &LayerStyle) -> Fragment {
    if is_space || style.draws_nothing() {
        return style.fallback(markup);
    }
    match GlyphGeometry::parse(markup) {
        Ok(geometry) => geometry.derive(style),
        Err(e) => {
            log::warn!("Layer degraded: {}", e);
            style.fallback(markup)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPH: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200">
        <path d="M20 20H180V180H20Z" fill="#abcdef" stroke="#111111" stroke-width="3"/>
        <path d="M40 40H60V60Z"/>
        <path class="shadow-effect" d="M30 30H190V190H30Z" style="display:none"/>
        <path class="shine-effect" d="M25 25H50V30Z" style="display:none"/>
    </svg>"##;

    fn geometry() -> GlyphGeometry {
        GlyphGeometry::parse(GLYPH).unwrap()
    }

    fn config() -> StyleConfiguration {
        StyleConfiguration::default()
    }

    fn svg(fragment: &Fragment) -> &crate::geometry::SvgFragment {
        fragment.as_svg().unwrap()
    }

    #[test]
    fn content_fills_body_and_hides_effects() {
        let fragment = geometry().derive(&LayerStyle::content(&config()));
        let shapes: Vec<_> = svg(&fragment).shapes().collect();
        assert_eq!(shapes[0].attr("fill"), Some("#ffffff"));
        assert_eq!(shapes[0].attr("stroke"), None);
        assert_eq!(shapes[0].attr("stroke-width"), None);
        assert_eq!(shapes[2].display(), Some(DisplayMode::None));
        assert_eq!(shapes[3].display(), Some(DisplayMode::None));
        assert_eq!(svg(&fragment).root_attr("overflow"), Some("visible"));
    }

    #[test]
    fn content_without_fill_is_black() {
        let mut config = config();
        config.fill_enabled = false;
        let fragment = geometry().derive(&LayerStyle::content(&config));
        assert!(svg(&fragment)
            .shapes()
            .filter(|s| s.role == ShapeRole::Regular)
            .all(|s| s.attr("fill") == Some(DEFAULT_FILL)));
    }

    #[test]
    fn content_stroke_paints_behind_fill() {
        let mut config = config();
        config.stroke_enabled = true;
        let fragment = geometry().derive(&LayerStyle::content(&config));
        let body = svg(&fragment).shapes().next().unwrap();
        assert_eq!(body.attr("stroke"), Some("#ff0000"));
        assert_eq!(body.attr("stroke-width"), Some("45"));
        assert_eq!(body.attr("paint-order"), Some("stroke fill"));
    }

    #[test]
    fn shine_is_revealed_with_its_own_colour() {
        let mut config = config();
        config.shine_enabled = true;
        config.shine_color = "#ffee00".into();
        config.shine_opacity = 0.5;
        let fragment = geometry().derive(&LayerStyle::content(&config));
        let shine = svg(&fragment)
            .shapes()
            .find(|s| s.role == ShapeRole::Shine)
            .unwrap();
        assert_eq!(shine.display(), Some(DisplayMode::Inline));
        assert_eq!(shine.attr("fill"), Some("#ffee00"));
        assert_eq!(shine.attr("fill-opacity"), Some("0.5"));
    }

    #[test]
    fn stamp_with_nothing_enabled_is_empty() {
        let mut config = config();
        config.outline_enabled = false;
        config.halo_enabled = false;
        let style = LayerStyle::halo(&config);
        assert!(geometry().derive(&style).is_empty());
        assert_eq!(derive_layer(GLYPH, false, &style).to_markup(), "<svg></svg>");
    }

    #[test]
    fn outline_strokes_only_the_body() {
        let fragment = geometry().derive(&LayerStyle::outline(&config()));
        let shapes: Vec<_> = svg(&fragment).shapes().collect();
        assert_eq!(shapes.len(), 2);
        for shape in shapes {
            assert_eq!(shape.role, ShapeRole::Regular);
            assert_eq!(shape.attr("fill"), Some("none"));
            assert_eq!(shape.attr("stroke"), Some("#000000"));
            assert_eq!(shape.attr("stroke-width"), Some("75"));
            assert_eq!(shape.attr("stroke-linejoin"), Some("round"));
        }
    }

    #[test]
    fn halo_alone_uses_its_own_width() {
        let mut config = config();
        config.outline_enabled = false;
        config.halo_enabled = true;
        let fragment = geometry().derive(&LayerStyle::halo(&config));
        assert!(svg(&fragment)
            .shapes()
            .all(|s| s.attr("stroke-width") == Some("15") && s.attr("stroke") == Some("#3f51b5")));
    }

    #[test]
    fn halo_ring_sits_outside_outline() {
        let mut config = config();
        config.halo_enabled = true;
        config.outline_width = 40.0;
        config.halo_width = 12.5;
        let fragment = geometry().derive(&LayerStyle::halo(&config));
        let nodes = svg(&fragment).nodes();
        assert_eq!(nodes.len(), 2);

        let FragmentNode::Group { id, children } = &nodes[0] else {
            panic!("expected halo group first");
        };
        assert_eq!(id, HALO_GROUP_ID);
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|s| s.attr("stroke-width") == Some("65")));

        let FragmentNode::Group { id, children } = &nodes[1] else {
            panic!("expected outline group second");
        };
        assert_eq!(id, OUTLINE_GROUP_ID);
        assert!(children.iter().all(|s| s.attr("stroke-width") == Some("40")));
    }

    #[test]
    fn shadow_reveals_only_shadow_shapes() {
        let fragment = geometry().derive(&LayerStyle::shadow(&config()));
        for shape in svg(&fragment).shapes() {
            if shape.role == ShapeRole::Shadow {
                assert_eq!(shape.display(), Some(DisplayMode::Inline));
                assert_eq!(shape.attr("fill"), Some("#000000"));
                assert_eq!(shape.attr("stroke-width"), Some("37.5"));
            } else {
                assert_eq!(shape.display(), Some(DisplayMode::None));
            }
        }
    }

    #[test]
    fn shadow_without_outline_is_unstroked() {
        let mut config = config();
        config.outline_enabled = false;
        let fragment = geometry().derive(&LayerStyle::shadow(&config));
        let shadow = svg(&fragment)
            .shapes()
            .find(|s| s.role == ShapeRole::Shadow)
            .unwrap();
        assert_eq!(shadow.attr("stroke"), None);
        assert_eq!(shadow.attr("fill"), Some("#000000"));
    }

    #[test]
    fn shadow_halo_width_formula() {
        let mut config = config();
        config.halo_enabled = true;
        config.shadow_enabled = true;
        let fragment = geometry().derive(&LayerStyle::shadow_halo(&config));
        let shadow = svg(&fragment)
            .shapes()
            .find(|s| s.role == ShapeRole::Shadow)
            .unwrap();
        // 75 * 0.5 + 15 * 2
        assert_eq!(shadow.attr("stroke-width"), Some("67.5"));
        assert_eq!(shadow.attr("stroke"), Some("#3f51b5"));
        assert_eq!(shadow.attr("fill"), Some("none"));
    }

    #[test]
    fn derivations_do_not_share_state() {
        let geometry = geometry();
        let before = geometry.clone();
        let mut config = config();
        config.halo_enabled = true;
        let content = geometry.derive(&LayerStyle::content(&config));
        let _ = geometry.derive(&LayerStyle::halo(&config));
        let _ = geometry.derive(&LayerStyle::shadow(&config));
        assert_eq!(geometry, before);
        // the source fill survives in the canonical geometry only
        assert_eq!(geometry.shapes()[0].attr("fill"), Some("#abcdef"));
        assert_eq!(svg(&content).shapes().next().unwrap().attr("fill"), Some("#ffffff"));
    }

    #[test]
    fn malformed_markup_degrades_per_layer() {
        let broken = "<svg><path d='M0 0'></svg>";
        let content = derive_layer(broken, false, &LayerStyle::content(&config()));
        assert_eq!(content, Fragment::Raw(broken.to_string()));
        let outline = derive_layer(broken, false, &LayerStyle::outline(&config()));
        assert!(outline.is_empty());
    }

    #[test]
    fn spaces_are_left_alone() {
        let blank = "<svg></svg>";
        assert_eq!(
            derive_layer(blank, true, &LayerStyle::content(&config())).to_markup(),
            blank
        );
        assert!(derive_layer(blank, true, &LayerStyle::shadow(&config())).is_empty());
    }
}
