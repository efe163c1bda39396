//! Asset sources: a directory on disk, or bytes held in memory

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use graff_core::error::AssetError;
use graff_core::traits::AssetSource;

/// Reads asset files from a root directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn fetch(&self, file: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.root.join(file);
        log::debug!("Reading asset {}", path.display());
        std::fs::read(&path).map_err(|source| AssetError::AssetFetch {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Asset bytes held in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(file.into(), bytes.into());
    }

    pub fn with_file(mut self, file: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(file, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch(&self, file: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| AssetError::AssetFetch {
                path: file.to_string(),
                source: ErrorKind::NotFound.into(),
            })
    }
}
