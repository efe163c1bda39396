//! User-controllable style: effect toggles, colors and sizes
//!
//! A [`StyleConfiguration`] is the complete set of knobs the host UI
//! exposes. It deserializes from the camelCase keys the UI speaks
//! (`fillEnabled`, `haloWidth`, ...), and any key left out keeps its
//! default, so a partial JSON document is a valid configuration.
//!
//! Disabling an effect only hides the layer derived for it; the glyph's
//! own geometry is always drawn.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GraffError;

/// Every user-facing effect setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfiguration {
    pub background_enabled: bool,
    pub background_color: String,

    pub fill_enabled: bool,
    pub fill_color: String,

    /// Stroke painted behind the fill of the content layer itself
    pub stroke_enabled: bool,
    pub stroke_color: String,
    pub stroke_width: f32,

    /// The thick "stamp" ring around every glyph
    pub outline_enabled: bool,
    pub outline_color: String,
    pub outline_width: f32,

    /// The "shield" ring drawn behind the outline
    pub halo_enabled: bool,
    pub halo_color: String,
    pub halo_width: f32,

    pub shine_enabled: bool,
    pub shine_color: String,
    pub shine_opacity: f32,

    pub shadow_enabled: bool,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
}

impl Default for StyleConfiguration {
    fn default() -> Self {
        Self {
            background_enabled: false,
            background_color: "#ffffff".into(),
            fill_enabled: true,
            fill_color: "#ffffff".into(),
            stroke_enabled: false,
            stroke_color: "#ff0000".into(),
            stroke_width: 45.0,
            outline_enabled: true,
            outline_color: "#000000".into(),
            outline_width: 75.0,
            halo_enabled: false,
            halo_color: "#3f51b5".into(),
            halo_width: 15.0,
            shine_enabled: false,
            shine_color: "#ffffff".into(),
            shine_opacity: 1.0,
            shadow_enabled: false,
            shadow_offset_x: -15.0,
            shadow_offset_y: 8.0,
        }
    }
}

/// Which letter style the text is set in
///
/// `straight` keeps every letter in its standard drawing. Any other style
/// lets the first and last letters pick their positional variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleMode {
    Straight,
    Styled(String),
}

impl StyleMode {
    /// Whether first/last positional variants may be used
    pub fn allows_positional_variants(&self) -> bool {
        !matches!(self, Self::Straight)
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Straight => "straight",
            Self::Styled(id) => id,
        }
    }
}

impl Default for StyleMode {
    fn default() -> Self {
        Self::Styled("curved".into())
    }
}

impl FromStr for StyleMode {
    type Err = GraffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        match id.as_str() {
            "" => Err(GraffError::Config("style mode id must not be empty".into())),
            "straight" => Ok(Self::Straight),
            _ => Ok(Self::Styled(id)),
        }
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let style: StyleConfiguration =
            serde_json::from_str(r##"{"haloEnabled": true, "haloWidth": 20, "fillColor": "#ff00ff"}"##)
                .unwrap();
        assert!(style.halo_enabled);
        assert_eq!(style.halo_width, 20.0);
        assert_eq!(style.fill_color, "#ff00ff");
        assert!(style.outline_enabled);
        assert_eq!(style.outline_width, 75.0);
        assert_eq!(style.shadow_offset_x, -15.0);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let json = serde_json::to_string(&StyleConfiguration::default()).unwrap();
        assert!(json.contains("\"shadowOffsetY\":8.0"));
        assert!(json.contains("\"backgroundEnabled\":false"));
    }

    #[test]
    fn style_mode_parsing() {
        assert_eq!("straight".parse::<StyleMode>().unwrap(), StyleMode::Straight);
        assert_eq!(" Straight ".parse::<StyleMode>().unwrap(), StyleMode::Straight);
        let wild: StyleMode = "wild".parse().unwrap();
        assert!(wild.allows_positional_variants());
        assert_eq!(wild.to_string(), "wild");
        assert!("".parse::<StyleMode>().is_err());
    }
}
