use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::config::*;
use crate::config::settings::{self, Settings};
use crate::core::gallery::Gallery;
use crate::i18n::Language;
use crate::ui::viewer::ImageViewerApp;

/// Command line: `image-gallery [--lang en|es] [--manifest FILE] [--swipe-threshold PX] [DIR]`
#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub lang: Option<Language>,
    pub manifest: Option<PathBuf>,
    pub swipe_threshold: Option<f32>,
    pub directory: Option<PathBuf>,
}

impl Args {
    pub fn parse(mut args: pico_args::Arguments) -> Result<Self, pico_args::Error> {
        let parsed = Self {
            lang: args.opt_value_from_str("--lang")?,
            manifest: args
                .opt_value_from_os_str("--manifest", |s| Ok::<_, String>(PathBuf::from(s)))?,
            swipe_threshold: args.opt_value_from_fn("--swipe-threshold", parse_threshold)?,
            directory: args.opt_free_from_os_str(|s| Ok::<_, String>(PathBuf::from(s)))?,
        };
        let rest = args.finish();
        if !rest.is_empty() {
            warn!(?rest, "ignoring extra arguments");
        }
        Ok(parsed)
    }

    /// Command line values win over the settings file.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(lang) = self.lang {
            settings.language = lang;
        }
        if let Some(threshold) = self.swipe_threshold {
            settings.swipe_threshold = threshold;
        }
        if let Some(manifest) = &self.manifest {
            settings.manifest = Some(manifest.clone());
        }
    }
}

fn parse_threshold(value: &str) -> Result<f32, String> {
    let threshold = value.parse::<f32>().map_err(|e| e.to_string())?;
    settings::check_swipe_threshold(threshold)
}

/// Directory first, then manifest, then the built-in samples. A source that
/// fails to load is logged and skipped.
pub fn resolve_gallery(args: &Args, settings: &Settings) -> Gallery {
    if let Some(dir) = &args.directory {
        match Gallery::from_directory(dir) {
            Ok(gallery) => return gallery,
            Err(e) => warn!(error = %e, "could not scan directory"),
        }
    }
    if let Some(manifest) = &settings.manifest {
        match Gallery::from_manifest(manifest) {
            Ok(gallery) => return gallery,
            Err(e) => warn!(error = %e, "could not read manifest"),
        }
    }
    Gallery::samples()
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("image_gallery=info"));
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run() {
    init_logging();

    let args = match Args::parse(pico_args::Arguments::from_env()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let mut settings = settings::load().unwrap_or_else(|e| {
        warn!(error = %e, "using default settings");
        Settings::default()
    });
    args.apply(&mut settings);

    let gallery = resolve_gallery(&args, &settings);
    info!(
        items = gallery.len(),
        language = ?settings.language,
        "starting {APP_NAME} v{APP_VERSION}"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(WINDOW_MIN_SIZE),
        ..Default::default()
    };

    type AppResult = Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>>;
    let result = eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| -> AppResult {
            let app = ImageViewerApp::new(&cc.egui_ctx, gallery, &settings)?;
            Ok(Box::new(app))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "failed to start the gallery window");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(list.iter().map(OsString::from).collect())
    }

    #[test]
    fn parses_all_options() {
        let parsed = Args::parse(args(&[
            "--lang",
            "es",
            "--swipe-threshold",
            "55",
            "--manifest",
            "g.toml",
            "photos",
        ]))
        .expect("valid arguments");

        assert_eq!(
            parsed,
            Args {
                lang: Some(Language::Es),
                manifest: Some(PathBuf::from("g.toml")),
                swipe_threshold: Some(55.0),
                directory: Some(PathBuf::from("photos")),
            }
        );
    }

    #[test]
    fn rejects_bad_threshold() {
        assert!(Args::parse(args(&["--swipe-threshold", "wide"])).is_err());
        assert!(Args::parse(args(&["--swipe-threshold", "-10"])).is_err());
    }

    #[test]
    fn zero_threshold_is_accepted() {
        let parsed = Args::parse(args(&["--swipe-threshold", "0"])).expect("valid arguments");
        assert_eq!(parsed.swipe_threshold, Some(0.0));
    }

    #[test]
    fn command_line_overrides_settings() {
        let mut settings = Settings::default();
        let parsed = Args {
            lang: Some(Language::Es),
            swipe_threshold: Some(12.0),
            ..Args::default()
        };

        parsed.apply(&mut settings);

        assert_eq!(settings.language, Language::Es);
        assert_eq!(settings.swipe_threshold, 12.0);
        assert_eq!(settings.manifest, None);
    }

    #[test]
    fn unreadable_sources_fall_back_to_samples() {
        let dir = tempdir().expect("failed to create temp dir");
        let parsed = Args {
            directory: Some(dir.path().join("missing")),
            ..Args::default()
        };
        let settings = Settings {
            manifest: Some(dir.path().join("missing.toml")),
            ..Settings::default()
        };

        assert_eq!(resolve_gallery(&parsed, &settings), Gallery::samples());
    }

    #[test]
    fn directory_wins_over_manifest() {
        let dir = tempdir().expect("failed to create temp dir");
        std::fs::write(dir.path().join("only.png"), b"fake").expect("write failed");
        let parsed = Args {
            directory: Some(dir.path().to_path_buf()),
            ..Args::default()
        };

        let gallery = resolve_gallery(&parsed, &Settings::default());

        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.get(0).map(|i| i.title.as_str()), Some("only"));
    }
}
