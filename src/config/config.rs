pub const APP_NAME: &str = "Image Gallery";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the platform config dir holding `settings.toml`.
pub const CONFIG_DIR_NAME: &str = "image-gallery";
pub const CONFIG_FILE: &str = "settings.toml";

pub const WINDOW_SIZE: [f32; 2] = [1024.0, 768.0];
pub const WINDOW_MIN_SIZE: [f32; 2] = [400.0, 300.0];

/// Minimal horizontal drag distance, in logical pixels, that counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 40.0;

/// How many images on each side of the current one are preloaded.
pub const PRELOAD_RADIUS: usize = 1;

pub const DEFAULT_CACHE_CAPACITY: usize = 8;
pub const MAX_LOADER_THREADS: usize = 4;

pub const DISPLAY_MAX_SIZE: (u32, u32) = (1920, 1080);
pub const THUMBNAIL_MAX_SIZE: (u32, u32) = (256, 256);
pub const THUMBNAIL_CELL_SIZE: f32 = 160.0;
