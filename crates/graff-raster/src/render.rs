//! SVG glyph rendering via resvg/usvg
//!
//! The glyph document is scaled to fit a square box of the requested
//! resolution, centred on both axes, and rendered into a tiny-skia pixmap.
//! Only the alpha channel is kept.

use graff_core::error::RasterError;
use tiny_skia::{Pixmap, Transform};

/// Alpha channel of a rendered glyph, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaBuffer {
    /// Wrap raw alpha values; `None` if the length does not match the size
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at `(x, y)`, 0 outside the buffer
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }
}

/// Render glyph markup into a `resolution` x `resolution` alpha buffer
pub fn render_alpha(markup: &str, ch: char, resolution: u32) -> Result<AlphaBuffer, RasterError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(markup, &options).map_err(|e| RasterError::InvalidAsset {
        ch,
        reason: e.to_string(),
    })?;

    let mut pixmap = Pixmap::new(resolution, resolution)
        .ok_or(RasterError::PixmapAllocation { size: resolution })?;

    // Fit the document into the box, keeping its aspect ratio
    let tree_size = tree.size();
    let side = resolution as f32;
    let scale = (side / tree_size.width()).min(side / tree_size.height());
    let dx = (side - tree_size.width() * scale) / 2.0;
    let dy = (side - tree_size.height() * scale) / 2.0;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, dx, dy);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let alpha = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();
    AlphaBuffer::from_raw(resolution, resolution, alpha)
        .ok_or(RasterError::PixmapAllocation { size: resolution })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_square_into_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
            <rect x="25" y="25" width="50" height="50" fill="black"/>
        </svg>"#;
        let alpha = render_alpha(svg, 'x', 200).unwrap();
        assert_eq!(alpha.width(), 200);
        assert_eq!(alpha.alpha(100, 100), 255);
        assert_eq!(alpha.alpha(10, 10), 0);
        assert_eq!(alpha.alpha(500, 10), 0);
    }

    #[test]
    fn wide_document_is_centred_vertically() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100">
            <rect x="0" y="0" width="200" height="100" fill="black"/>
        </svg>"#;
        let alpha = render_alpha(svg, 'w', 100).unwrap();
        // 200x100 scaled to 100x50, centred: rows 25..75 are inked
        assert_eq!(alpha.alpha(50, 10), 0);
        assert_eq!(alpha.alpha(50, 50), 255);
        assert_eq!(alpha.alpha(50, 90), 0);
    }

    #[test]
    fn rejects_garbage() {
        let err = render_alpha("not svg at all", 'q', 50).unwrap_err();
        assert!(matches!(err, RasterError::InvalidAsset { ch: 'q', .. }));
    }
}
