pub mod en;
pub mod es;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every piece of text the gallery shows.
#[derive(Debug)]
pub struct Strings {
    pub btn_open_folder: &'static str,
    pub btn_close: &'static str,
    pub btn_prev: &'static str,
    pub btn_next: &'static str,
    pub text_images: &'static str,
    pub text_empty_gallery: &'static str,
    pub text_loading: &'static str,
    pub text_image_fallback: &'static str,
    /// Caption and alt text shown when the displayed image fails to load.
    pub load_failed: &'static str,
}

impl Strings {
    /// Alt text for an item, falling back to "Image n" for untitled items.
    pub fn alt_text(&self, title: &str, index: usize) -> String {
        if title.is_empty() {
            format!("{} {}", self.text_image_fallback, index + 1)
        } else {
            title.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &en::STRINGS,
            Language::Es => &es::STRINGS,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}
