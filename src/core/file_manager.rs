use std::path::{Path, PathBuf};
use std::fs;
use crate::core::image_format::ImageFormat;
use crate::error::{GalleryError, Result};

pub struct FileManager;

impl FileManager {
    /// Supported images directly inside `dir`, sorted by path.
    pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut image_paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| GalleryError::io(dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && ImageFormat::is_supported(p))
            .collect();

        image_paths.sort();
        Ok(image_paths)
    }
}
