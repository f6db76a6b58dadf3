//! Breed label catalog: the classifier's output vocabulary.
//!
//! Loaded once at startup from a flat text file with one breed name per line.
//! Line order is the contract linking a model output slot to its name, so
//! lines are never sorted, deduplicated, or skipped.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read label file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("label catalog is empty")]
    Empty,
}

/// Ordered, immutable list of breed names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCatalog {
    labels: Vec<String>,
}

impl LabelCatalog {
    /// Load the catalog from a text file.
    ///
    /// Fails if the file is missing, unreadable, or contains no lines.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_text(&text)?;
        info!(breeds = catalog.len(), path = %path.display(), "loaded label catalog");
        Ok(catalog)
    }

    /// Build a catalog from newline-separated names, trimming each line.
    pub fn from_text(text: &str) -> Result<Self, CatalogError> {
        let labels: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
        if labels.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Breed name for a class index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
