use egui::ColorImage;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use crate::core::image_format::ImageFormat;

/// Where an item's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Remote(String),
}

impl ImageSource {
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Remote(source.to_string())
        } else {
            ImageSource::File(PathBuf::from(source))
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unsupported format")]
    UnsupportedFormat,
}

pub trait ImageLoader: Send + Sync {
    fn load(&self, source: &ImageSource, max_size: (u32, u32)) -> Result<ColorImage, LoadError>;
    fn supports(&self, source: &ImageSource) -> bool;
}

fn to_color_image(img: DynamicImage, (max_w, max_h): (u32, u32)) -> ColorImage {
    let img = if img.width() > max_w || img.height() > max_h {
        img.resize(max_w, max_h, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let rgba_img = img.to_rgba8();
    let size = [rgba_img.width() as usize, rgba_img.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, rgba_img.as_raw())
}

pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, source: &ImageSource, max_size: (u32, u32)) -> Result<ColorImage, LoadError> {
        let ImageSource::File(path) = source else {
            return Err(LoadError::UnsupportedFormat);
        };
        if !ImageFormat::is_supported(path) {
            return Err(LoadError::UnsupportedFormat);
        }

        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(to_color_image(img, max_size))
    }

    fn supports(&self, source: &ImageSource) -> bool {
        matches!(source, ImageSource::File(_))
    }
}

pub struct RemoteImageLoader {
    client: reqwest::blocking::Client,
}

impl RemoteImageLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ImageLoader for RemoteImageLoader {
    fn load(&self, source: &ImageSource, max_size: (u32, u32)) -> Result<ColorImage, LoadError> {
        let ImageSource::Remote(url) = source else {
            return Err(LoadError::UnsupportedFormat);
        };

        let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
        let img = image::load_from_memory(&bytes)?;
        Ok(to_color_image(img, max_size))
    }

    fn supports(&self, source: &ImageSource) -> bool {
        matches!(source, ImageSource::Remote(_))
    }
}

/// Picks the loader for a source. Cheap to clone across worker threads.
#[derive(Clone)]
pub struct ImageLoaderFactory {
    loaders: Arc<Vec<Box<dyn ImageLoader>>>,
}

impl ImageLoaderFactory {
    pub fn new() -> Self {
        Self {
            loaders: Arc::new(vec![
                Box::new(FileImageLoader),
                Box::new(RemoteImageLoader::new()),
            ]),
        }
    }

    pub fn load_image(&self, source: &str, max_size: (u32, u32)) -> Result<ColorImage, LoadError> {
        let source = ImageSource::parse(source);
        self.loaders
            .iter()
            .find(|loader| loader.supports(&source))
            .ok_or(LoadError::UnsupportedFormat)?
            .load(&source, max_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            ImageSource::parse("HTTPS://example.com/a.jpg"),
            ImageSource::Remote("HTTPS://example.com/a.jpg".into())
        );
        assert_eq!(
            ImageSource::parse("/photos/a.jpg"),
            ImageSource::File(PathBuf::from("/photos/a.jpg"))
        );
    }

    #[test]
    fn large_file_is_downscaled_to_fit() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("wide.png");
        RgbaImage::from_pixel(400, 100, Rgba([10, 20, 30, 255]))
            .save(&path)
            .expect("save failed");

        let image = ImageLoaderFactory::new()
            .load_image(&path.to_string_lossy(), (200, 200))
            .expect("load failed");

        assert_eq!(image.size, [200, 50]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("gone.png");

        let result = ImageLoaderFactory::new().load_image(&path.to_string_lossy(), (64, 64));

        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").expect("write failed");

        let result = ImageLoaderFactory::new().load_image(&path.to_string_lossy(), (64, 64));

        assert!(matches!(result, Err(LoadError::Decode(_))));
    }
}
