use super::Strings;

pub const STRINGS: Strings = Strings {
    btn_open_folder: "Open folder",
    btn_close: "Close",
    btn_prev: "Previous",
    btn_next: "Next",
    text_images: "images",
    text_empty_gallery: "No images to show. Open a folder to start.",
    text_loading: "Loading image...",
    text_image_fallback: "Image",
    load_failed: "Failed to load image",
};
