//! Render command: text in, stacked SVG and/or JSON report out

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use graff::prelude::*;
use serde::Serialize;

use crate::cli::RenderArgs;

/// Machine-readable summary of one layout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub text: String,
    pub style: String,
    pub content_width: f32,
    pub content_height: f32,
    pub suggested_scale: f32,
    pub glyphs: Vec<GlyphReport>,
    pub layers: Vec<LayerReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphReport {
    pub ch: char,
    pub x: f32,
    pub rotation: f32,
    pub overlap: f32,
    pub width: u32,
    pub height: u32,
    /// Ink bounds as `[left, top, right, bottom]`
    pub bounds: [u32; 4],
    pub is_blank: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerReport {
    pub kind: String,
    pub glyph: usize,
    pub z_index: u32,
    pub transform: String,
    pub empty: bool,
}

impl LayoutReport {
    pub fn new(layout: &LayoutResult, style: &StyleMode, layers: &[ComposedLayer]) -> Self {
        let glyphs = layout
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| GlyphReport {
                ch: g.ch,
                x: layout.positions[i],
                rotation: layout.rotations[i],
                overlap: layout.overlaps[i],
                width: g.width,
                height: g.height,
                bounds: [g.bounds.left, g.bounds.top, g.bounds.right, g.bounds.bottom],
                is_blank: g.is_blank,
            })
            .collect();
        let layers = layers
            .iter()
            .map(|l| LayerReport {
                kind: l.kind.to_string(),
                glyph: l.glyph_index,
                z_index: l.z_index,
                transform: l.transform.to_string(),
                empty: l.fragment.is_empty(),
            })
            .collect();

        Self {
            text: layout.text(),
            style: style.to_string(),
            content_width: layout.content_width,
            content_height: layout.content_height,
            suggested_scale: layout.suggested_scale,
            glyphs,
            layers,
        }
    }
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let mode: StyleMode = args.style.parse()?;
    let style = load_style(args.config.as_deref())?;

    let generator = Generator::builder()
        .source(Arc::new(DirectorySource::new(&args.assets)))
        .raster_params(RasterParams {
            resolution: args.resolution,
            stride: args.stride,
            ..RasterParams::default()
        })
        .layout_params(LayoutParams {
            viewport_width: args.viewport.0,
            viewport_height: args.viewport.1,
            ..LayoutParams::default()
        })
        .build()?;

    if !args.quiet {
        eprintln!("Graff v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Lettering {:?} in style '{}'", args.text, mode);
    }

    let layout = generator
        .generate(&args.text, &mode)
        .with_context(|| format!("could not lay out {:?}", args.text))?;
    let layers = generator.compose(&layout, &style);
    log::debug!("{} layers composed", layers.len());

    if let Some(json) = &args.json {
        let report = LayoutReport::new(&layout, &mode, &layers);
        let body = serde_json::to_string_pretty(&report)?;
        write_output(Some(json), body.as_bytes())?;
    }

    if args.output.is_some() || args.json.is_none() {
        let document = graff::composite::assemble_document(&layout, &style, &layers);
        write_output(args.output.as_deref(), document.as_bytes())?;
    }

    if !args.quiet {
        eprintln!(
            "✓ {} glyphs, {:.0}x{:.0}, suggested scale {:.3}",
            layout.len(),
            layout.content_width,
            layout.content_height,
            layout.suggested_scale
        );
    }
    Ok(())
}

fn load_style(path: Option<&Path>) -> Result<StyleConfiguration> {
    let Some(path) = path else {
        return Ok(StyleConfiguration::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read style config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid style config {}", path.display()))
}

/// Write to a file, or stdout for `None` and `-`
fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) if path != Path::new("-") => fs::write(path, bytes)
            .with_context(|| format!("could not write {}", path.display())),
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
