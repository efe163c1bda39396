//! The generator: text in, layout and effect layers out

use std::sync::Arc;

use graff_assets::{AssetCatalog, ResolvedChar};
use graff_composite::{assemble_document, compose, ComposedLayer};
use graff_core::cache::SharedGlyphCache;
use graff_core::error::{AssetError, GraffError, Result};
use graff_core::rules::OverlapRules;
use graff_core::types::{LayoutResult, ProcessedGlyph};
use graff_core::{
    AssetSource, CacheConfig, GlyphCache, LayoutParams, RasterParams, StyleConfiguration,
    StyleMode,
};
use graff_layout::LayoutEngine;
use graff_raster::Rasterizer;

/// Runs the resolve, rasterize and layout stages for one request at a time
///
/// ```no_run
/// use std::sync::Arc;
/// use graff::prelude::*;
///
/// let generator = Generator::builder()
///     .source(Arc::new(DirectorySource::new("assets/letters")))
///     .build()?;
/// let layout = generator.generate("hello", &StyleMode::Straight)?;
/// let svg = generator.render_document(&layout, &StyleConfiguration::default());
/// # Ok::<(), GraffError>(())
/// ```
pub struct Generator {
    catalog: AssetCatalog,
    source: Arc<dyn AssetSource>,
    rasterizer: Rasterizer,
    cache: SharedGlyphCache,
    engine: LayoutEngine,
    space: Arc<ProcessedGlyph>,
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// Lay out `text` in the given style mode
    ///
    /// Any character without an asset, any failed fetch and any glyph that
    /// rasterizes to nothing aborts the request; there are no partial
    /// layouts.
    pub fn generate(&self, text: &str, mode: &StyleMode) -> Result<LayoutResult> {
        let chars: Vec<char> = text.chars().collect();
        let resolved = self.catalog.resolve_text(&chars, mode)?;
        log::debug!(
            "Generating {:?} in mode '{}' from {} source",
            text,
            mode,
            self.source.name()
        );

        let glyphs = resolved
            .into_iter()
            .map(|item| self.glyph(item))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.engine.layout(glyphs))
    }

    fn glyph(&self, item: ResolvedChar) -> Result<Arc<ProcessedGlyph>> {
        let key = match item {
            ResolvedChar::Space => return Ok(Arc::clone(&self.space)),
            ResolvedChar::Asset(key) => key,
        };
        let file = self
            .catalog
            .file(&key)
            .ok_or(GraffError::Asset(AssetError::AssetNotFound { ch: key.ch }))?;
        self.rasterizer
            .rasterize_cached(key, &self.cache, || self.source.fetch(file))
    }

    /// Derive the effect layers of a layout, back to front
    pub fn compose(&self, layout: &LayoutResult, style: &StyleConfiguration) -> Vec<ComposedLayer> {
        compose(layout, style)
    }

    /// Compose a layout and stack it into one SVG document
    pub fn render_document(&self, layout: &LayoutResult, style: &StyleConfiguration) -> String {
        let layers = compose(layout, style);
        assemble_document(layout, style, &layers)
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &SharedGlyphCache {
        &self.cache
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }
}

/// Assemble a [`Generator`] piece by piece
///
/// Only the asset source is required. Everything else defaults to the
/// bundled catalog, the built-in overlap rules and a private cache.
pub struct GeneratorBuilder {
    catalog: AssetCatalog,
    source: Option<Arc<dyn AssetSource>>,
    raster: RasterParams,
    cache: Option<SharedGlyphCache>,
    cache_config: CacheConfig,
    rules: OverlapRules,
    layout: LayoutParams,
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self {
            catalog: AssetCatalog::builtin(),
            source: None,
            raster: RasterParams::default(),
            cache: None,
            cache_config: CacheConfig::default(),
            rules: OverlapRules::builtin(),
            layout: LayoutParams::default(),
        }
    }

    /// Where asset bytes come from
    pub fn source(mut self, source: Arc<dyn AssetSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn catalog(mut self, catalog: AssetCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn raster_params(mut self, params: RasterParams) -> Self {
        self.raster = params;
        self
    }

    pub fn layout_params(mut self, params: LayoutParams) -> Self {
        self.layout = params;
        self
    }

    pub fn overlap_rules(mut self, rules: OverlapRules) -> Self {
        self.rules = rules;
        self
    }

    /// Share a glyph cache with other generators
    pub fn with_glyph_cache(mut self, cache: SharedGlyphCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// TTL for the private cache; ignored when a shared cache is supplied
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn build(self) -> Result<Generator> {
        let source = self
            .source
            .ok_or_else(|| GraffError::Config("No asset source configured".into()))?;
        let rasterizer = Rasterizer::new(self.raster)?;
        let cache = self.cache.unwrap_or_else(|| {
            Arc::new(GlyphCache::with_clock(
                self.cache_config,
                Arc::new(graff_core::SystemClock),
            ))
        });

        Ok(Generator {
            catalog: self.catalog,
            source,
            space: Arc::new(rasterizer.space_glyph()),
            rasterizer,
            cache,
            engine: LayoutEngine::new(self.rules, self.layout),
        })
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graff_assets::MemorySource;
    use graff_core::types::AssetKey;

    const BAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200"><rect x="40" y="30" width="120" height="140"/></svg>"#;

    fn generator(source: MemorySource) -> Generator {
        let mut catalog = AssetCatalog::empty();
        catalog.insert(AssetKey::standard('i'), "i1.svg");
        Generator::builder()
            .catalog(catalog)
            .source(Arc::new(source))
            .build()
            .unwrap()
    }

    #[test]
    fn builder_requires_a_source() {
        assert!(matches!(
            Generator::builder().build(),
            Err(GraffError::Config(_))
        ));
    }

    #[test]
    fn empty_text_is_an_empty_layout() {
        let generator = generator(MemorySource::new());
        let layout = generator.generate("", &StyleMode::Straight).unwrap();
        assert!(layout.is_empty());
    }

    #[test]
    fn glyphs_come_from_the_cache_after_first_use() {
        let generator = generator(MemorySource::new().with_file("i1.svg", BAR));
        let layout = generator.generate("i i", &StyleMode::Straight).unwrap();
        assert_eq!(layout.len(), 3);
        assert!(layout.glyphs[1].is_blank);
        assert!(Arc::ptr_eq(&layout.glyphs[0], &layout.glyphs[2]));
        assert_eq!(generator.cache().len(), 1);
    }

    #[test]
    fn layers_are_drawn_in_the_raster_box() {
        const BIG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="400" viewBox="0 0 400 400"><rect x="80" y="60" width="240" height="280"/></svg>"#;
        let mut catalog = AssetCatalog::empty();
        catalog.insert(AssetKey::standard('i'), "i1.svg");
        let generator = Generator::builder()
            .catalog(catalog)
            .source(Arc::new(MemorySource::new().with_file("i1.svg", BIG)))
            .raster_params(RasterParams {
                resolution: 100,
                ..RasterParams::default()
            })
            .build()
            .unwrap();

        let layout = generator.generate("ii", &StyleMode::Straight).unwrap();
        let glyph = &layout.glyphs[0];
        assert_eq!(glyph.width, 100);
        assert!(layout.content_width <= 200.0);

        let layers = generator.compose(&layout, &StyleConfiguration::default());
        for layer in &layers {
            let svg = layer.fragment.as_svg().unwrap();
            assert_eq!(svg.root_attr("width"), Some("100"));
            assert_eq!(svg.root_attr("height"), Some("100"));
            assert_eq!(svg.root_attr("viewBox"), Some("0 0 400 400"));
            assert_eq!(layer.transform.origin, (50.0, 50.0));
        }
    }

    #[test]
    fn missing_character_aborts() {
        let generator = generator(MemorySource::new().with_file("i1.svg", BAR));
        let err = generator.generate("ix", &StyleMode::Straight).unwrap_err();
        assert!(err.is_asset_error());
        assert!(err.to_string().contains('x'));
    }

    #[test]
    fn fetch_failure_aborts() {
        let generator = generator(MemorySource::new());
        let err = generator.generate("i", &StyleMode::Straight).unwrap_err();
        assert!(matches!(
            err,
            GraffError::Asset(AssetError::AssetFetch { .. })
        ));
    }
}
