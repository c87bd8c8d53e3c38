//! The gallery dataset: an ordered, immutable list of items supplied at
//! startup by one of the loaders below.

use crate::core::file_manager::FileManager;
use crate::error::{GalleryError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    /// Full-resolution image: a file path or an `http(s)` URL.
    pub source: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub title: String,
}

impl Item {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            thumbnail: None,
            title: title.into(),
        }
    }

    /// Source used for the grid: the thumbnail when present, else the full image.
    pub fn thumbnail_source(&self) -> &str {
        self.thumbnail
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.source)
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    items: Vec<Item>,
}

impl Gallery {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Every image in `dir`, titled by file stem.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let items = FileManager::scan_directory(dir)?
            .into_iter()
            .map(|path| {
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Item::new(path.to_string_lossy().into_owned(), title)
            })
            .collect();
        Ok(Self::new(items))
    }

    /// Reads a TOML manifest made of `[[items]]` tables.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
        Self::parse_manifest(&content).map_err(|source| GalleryError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse_manifest(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(Self::new(manifest.items))
    }

    /// Built-in sample photos shown when nothing else is configured.
    pub fn samples() -> Self {
        const SAMPLES: [(&str, &str); 8] = [
            ("photo-1503023345310-bd7c1de61c7d", "Mountain sunrise"),
            ("photo-1501785888041-af3ef285b470", "Forest path"),
            ("photo-1507525428034-b723cf961d3e", "Ocean waves"),
            ("photo-1500530855697-b586d89ba3ee", "City skyline"),
            ("photo-1494438639946-1ebd1d20bf85", "Desert dunes"),
            ("photo-1470770903676-69b98201ea1c", "Coffee cup"),
            ("photo-1496307042754-b4aa456c4a2d", "Night stars"),
            ("photo-1453728013993-6d66e9c9123a", "Green leaves"),
        ];

        let items = SAMPLES
            .iter()
            .map(|(id, title)| {
                Item::new(
                    format!("https://images.unsplash.com/{id}?q=80&w=1600&auto=format&fit=crop"),
                    *title,
                )
            })
            .collect();
        Self::new(items)
    }
}
