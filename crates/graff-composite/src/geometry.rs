//! Structured glyph geometry and layer fragments
//!
//! Glyph markup is parsed once into a flat, ordered list of shape records.
//! Groups are flattened on the way in: ancestor transforms are concatenated
//! onto each shape, and inheritable presentation attributes are copied down
//! unless the shape sets its own. Inline `style` declarations are split into
//! presentation attributes so that a layer can override any of them.
//!
//! Group opacity, clipping, masking and filters cannot be pushed down onto
//! individual shapes. A group carrying any of them becomes a wrapper: its
//! effects and the transforms accumulated so far are kept on a `<g>` that is
//! written back around its shapes, and only transforms inside it are
//! concatenated onto the shapes.
//!
//! Layer derivations take copies of these records and produce a
//! [`Fragment`], which is serialized once when the caller asks for markup.

use std::fmt;

use graff_core::error::CompositeError;
use roxmltree::{Attribute, Document, Node, ParsingOptions};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Class marking pre-authored drop-shadow geometry
pub const SHADOW_CLASS: &str = "shadow-effect";
/// Class marking the highlight geometry painted over the fill
pub const SHINE_CLASS: &str = "shine-effect";

/// Markup of a fragment that draws nothing
pub const EMPTY_MARKUP: &str = "<svg></svg>";

const SHAPE_TAGS: &[&str] = &[
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon", "use",
];
const CONTAINER_TAGS: &[&str] = &["g", "a", "switch"];
const VERBATIM_TAGS: &[&str] = &[
    "defs",
    "style",
    "symbol",
    "linearGradient",
    "radialGradient",
    "pattern",
    "clipPath",
    "mask",
    "filter",
    "marker",
];
const GROUP_EFFECT_ATTRS: &[&str] = &["opacity", "clip-path", "mask", "filter"];
const INHERITED_ATTRS: &[&str] = &[
    "fill",
    "fill-opacity",
    "fill-rule",
    "clip-rule",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-linejoin",
    "stroke-linecap",
    "stroke-miterlimit",
];

/// What part of the artwork a shape belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRole {
    /// The letter body
    Regular,
    /// Pre-authored drop shadow, hidden unless a shadow layer reveals it
    Shadow,
    /// Highlight drawn over the fill
    Shine,
}

/// Explicit CSS display state of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Inline,
    None,
}

impl DisplayMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "none" => Some(Self::None),
            "" => None,
            _ => Some(Self::Inline),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::None => "none",
        }
    }
}

/// One drawable element with its attributes, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub tag: String,
    pub role: ShapeRole,
    attrs: Vec<(String, String)>,
    display: Option<DisplayMode>,
    /// Enclosing wrapper groups, outermost first
    wrappers: Vec<usize>,
}

impl ShapeRecord {
    pub fn new(tag: impl Into<String>, role: ShapeRole) -> Self {
        Self {
            tag: tag.into(),
            role,
            attrs: Vec::new(),
            display: None,
            wrappers: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing it in place if it already exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn display(&self) -> Option<DisplayMode> {
        self.display
    }

    pub fn set_display(&mut self, display: DisplayMode) {
        self.display = Some(display);
    }

    /// Indices of the wrapper groups around this shape, outermost first
    pub fn wrappers(&self) -> &[usize] {
        &self.wrappers
    }
}

impl fmt::Display for ShapeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, Escaped(value))?;
        }
        // written as inline style so it wins over stylesheet rules
        if let Some(display) = self.display {
            write!(f, " style=\"display:{}\"", display.as_str())?;
        }
        f.write_str("/>")
    }
}

/// Parsed glyph artwork: root attributes, verbatim definitions and shapes
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphGeometry {
    root: Vec<(String, String)>,
    defs: Vec<String>,
    wrappers: Vec<Wrapper>,
    shapes: Vec<ShapeRecord>,
}

/// Attributes of a group that stays a `<g>` around its shapes
type Wrapper = Vec<(String, String)>;

#[derive(Debug, Clone)]
struct Inherited {
    transforms: Vec<String>,
    attrs: Vec<(String, String)>,
    role: ShapeRole,
    display: Option<DisplayMode>,
    wrappers: Vec<usize>,
}

impl GlyphGeometry {
    /// Parse glyph markup
    ///
    /// Fails with [`CompositeError::MalformedVectorContent`] when the markup
    /// is not well-formed XML or its root is not an `<svg>` element.
    pub fn parse(markup: &str) -> Result<Self, CompositeError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(markup, options)
            .map_err(|e| CompositeError::MalformedVectorContent(e.to_string()))?;

        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(CompositeError::MalformedVectorContent(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }

        let mut geometry = Self {
            root: root
                .attributes()
                .filter_map(|a| attr_name(&a).map(|n| (n, a.value().to_string())))
                .collect(),
            defs: Vec::new(),
            wrappers: Vec::new(),
            shapes: Vec::new(),
        };
        let inherited = Inherited {
            transforms: Vec::new(),
            attrs: Vec::new(),
            role: ShapeRole::Regular,
            display: None,
            wrappers: Vec::new(),
        };
        geometry.collect(markup, root, &inherited);
        Ok(geometry)
    }

    fn collect(&mut self, markup: &str, parent: Node<'_, '_>, inherited: &Inherited) {
        for node in parent.children().filter(Node::is_element) {
            let tag = node.tag_name().name();
            if VERBATIM_TAGS.contains(&tag) {
                self.defs.push(markup[node.range()].to_string());
            } else if SHAPE_TAGS.contains(&tag) {
                self.shapes.push(shape_record(node, inherited));
            } else if CONTAINER_TAGS.contains(&tag) {
                let mut scope = inherited.clone();
                scope.role = role_of(node, inherited.role);
                let mut effects = Wrapper::new();
                for (name, value) in own_attrs(node) {
                    match name.as_str() {
                        "transform" => scope.transforms.push(value),
                        "display" => scope.display = DisplayMode::parse(&value).or(scope.display),
                        n if INHERITED_ATTRS.contains(&n) => set(&mut scope.attrs, n, value),
                        n if GROUP_EFFECT_ATTRS.contains(&n) => set(&mut effects, n, value),
                        _ => {}
                    }
                }
                if !effects.is_empty() {
                    let mut wrapper = Wrapper::new();
                    if !scope.transforms.is_empty() {
                        wrapper.push(("transform".to_string(), scope.transforms.join(" ")));
                        scope.transforms.clear();
                    }
                    wrapper.extend(effects);
                    scope.wrappers.push(self.wrappers.len());
                    self.wrappers.push(wrapper);
                }
                self.collect(markup, node, &scope);
            }
        }
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    /// Root attribute as written in the source
    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Shapes with the given role, in document order
    pub fn shapes_with_role(&self, role: ShapeRole) -> impl Iterator<Item = &ShapeRecord> {
        self.shapes.iter().filter(move |s| s.role == role)
    }

    /// Start a fragment sharing this geometry's root and definitions
    pub fn fragment(&self, nodes: Vec<FragmentNode>) -> Fragment {
        let mut root = self.root.clone();
        set(&mut root, "overflow", "visible".to_string());
        Fragment::Svg(SvgFragment {
            root,
            defs: self.defs.clone(),
            wrappers: self.wrappers.clone(),
            nodes,
        })
    }
}

fn shape_record(node: Node<'_, '_>, inherited: &Inherited) -> ShapeRecord {
    let mut record = ShapeRecord::new(node.tag_name().name(), role_of(node, inherited.role));
    record.attrs = inherited.attrs.clone();
    record.display = inherited.display;
    record.wrappers = inherited.wrappers.clone();

    let mut transforms = inherited.transforms.clone();
    for (name, value) in own_attrs(node) {
        match name.as_str() {
            "transform" => transforms.push(value),
            "display" => record.display = DisplayMode::parse(&value).or(record.display),
            _ => record.set_attr(&name, value),
        }
    }
    if !transforms.is_empty() {
        record.set_attr("transform", transforms.join(" "));
    }
    record
}

/// Attributes of an element with inline `style` split into declarations
fn own_attrs(node: Node<'_, '_>) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut style = None;
    for attr in node.attributes() {
        match attr_name(&attr) {
            Some(name) if name == "style" => style = Some(attr.value()),
            Some(name) => set(&mut attrs, &name, attr.value().to_string()),
            None => {}
        }
    }
    // style declarations beat presentation attributes
    for declaration in style.unwrap_or_default().split(';') {
        if let Some((name, value)) = declaration.split_once(':') {
            let name = name.trim();
            if !name.is_empty() {
                set(&mut attrs, name, value.trim().to_string());
            }
        }
    }
    attrs
}

fn role_of(node: Node<'_, '_>, inherited: ShapeRole) -> ShapeRole {
    let classes = node.attribute("class").unwrap_or_default();
    if classes.split_whitespace().any(|c| c == SHADOW_CLASS) {
        ShapeRole::Shadow
    } else if classes.split_whitespace().any(|c| c == SHINE_CLASS) {
        ShapeRole::Shine
    } else {
        inherited
    }
}

/// Serializable name of an attribute; editor-specific namespaces are dropped
fn attr_name(attr: &Attribute<'_, '_>) -> Option<String> {
    match attr.namespace() {
        None => Some(attr.name().to_string()),
        Some(XLINK_NS) => Some(format!("xlink:{}", attr.name())),
        Some(_) => None,
    }
}

fn set(attrs: &mut Vec<(String, String)>, name: &str, value: String) {
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => attrs.push((name.to_string(), value)),
    }
}

/// A node of a derived fragment
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentNode {
    Shape(ShapeRecord),
    Group {
        id: String,
        children: Vec<ShapeRecord>,
    },
}

/// A derived layer fragment with its own root and definitions
#[derive(Debug, Clone, PartialEq)]
pub struct SvgFragment {
    root: Vec<(String, String)>,
    defs: Vec<String>,
    wrappers: Vec<Wrapper>,
    nodes: Vec<FragmentNode>,
}

impl SvgFragment {
    pub fn nodes(&self) -> &[FragmentNode] {
        &self.nodes
    }

    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every shape in paint order, groups included
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.nodes.iter().flat_map(|node| match node {
            FragmentNode::Shape(shape) => std::slice::from_ref(shape).iter(),
            FragmentNode::Group { children, .. } => children.iter(),
        })
    }
}

impl fmt::Display for SvgFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<svg xmlns=\"{SVG_NS}\" xmlns:xlink=\"{XLINK_NS}\"")?;
        for (name, value) in &self.root {
            write!(f, " {}=\"{}\"", name, Escaped(value))?;
        }
        f.write_str(">")?;
        for def in &self.defs {
            f.write_str(def)?;
        }
        let mut rest = self.nodes.as_slice();
        while let Some((node, tail)) = rest.split_first() {
            match node {
                FragmentNode::Shape(_) => {
                    let run: Vec<&ShapeRecord> = rest
                        .iter()
                        .map_while(|n| match n {
                            FragmentNode::Shape(shape) => Some(shape),
                            FragmentNode::Group { .. } => None,
                        })
                        .collect();
                    rest = &rest[run.len()..];
                    write_wrapped(f, &self.wrappers, run)?;
                }
                FragmentNode::Group { id, children } => {
                    write!(f, "<g id=\"{}\">", Escaped(id))?;
                    write_wrapped(f, &self.wrappers, children)?;
                    f.write_str("</g>")?;
                    rest = tail;
                }
            }
        }
        f.write_str("</svg>")
    }
}

/// Write shapes, opening and closing wrapper groups as the chain changes
///
/// Neighbouring shapes under the same wrapper share one `<g>`, so group
/// opacity and filters apply to them together as in the source.
fn write_wrapped<'a>(
    f: &mut fmt::Formatter<'_>,
    wrappers: &[Wrapper],
    shapes: impl IntoIterator<Item = &'a ShapeRecord>,
) -> fmt::Result {
    let mut open: &[usize] = &[];
    for shape in shapes {
        let chain = shape.wrappers();
        let shared = open
            .iter()
            .zip(chain)
            .take_while(|(a, b)| a == b)
            .count();
        for _ in shared..open.len() {
            f.write_str("</g>")?;
        }
        for id in &chain[shared..] {
            f.write_str("<g")?;
            for (name, value) in wrappers.get(*id).map(Vec::as_slice).unwrap_or_default() {
                write!(f, " {}=\"{}\"", name, Escaped(value))?;
            }
            f.write_str(">")?;
        }
        write!(f, "{shape}")?;
        open = chain;
    }
    for _ in 0..open.len() {
        f.write_str("</g>")?;
    }
    Ok(())
}

/// The output of one layer derivation
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Draws nothing; serializes as [`EMPTY_MARKUP`]
    Empty,
    /// Source markup passed through untouched
    Raw(String),
    Svg(SvgFragment),
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_svg(&self) -> Option<&SvgFragment> {
        match self {
            Self::Svg(svg) => Some(svg),
            _ => None,
        }
    }

    /// Serialized markup, ready for embedding
    pub fn to_markup(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(EMPTY_MARKUP),
            Self::Raw(markup) => f.write_str(markup),
            Self::Svg(svg) => svg.fmt(f),
        }
    }
}

/// Attribute value escaping
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}
