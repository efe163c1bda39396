//! Graff assets: from characters to glyph files
//!
//! The catalog knows which drawings exist (standard, alternate, first- and
//! last-position variants) and picks one per character. Sources turn the
//! chosen file name into bytes.
//!
//! ```
//! use graff_assets::{AssetCatalog, ResolvedChar};
//! use graff_core::StyleMode;
//!
//! let catalog = AssetCatalog::builtin();
//! let chars: Vec<char> = "moo".chars().collect();
//! let resolved = catalog.resolve_text(&chars, &StyleMode::Straight).unwrap();
//! assert_eq!(resolved.len(), 3);
//! if let ResolvedChar::Asset(key) = resolved[2] {
//!     assert_eq!(catalog.file(&key), Some("o2.svg"));
//! }
//! ```

pub mod catalog;
pub mod source;

pub use catalog::{AssetCatalog, Placement, ResolvedChar};
pub use source::{DirectorySource, MemorySource};
