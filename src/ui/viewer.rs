use std::collections::HashMap;
use std::path::Path;

use egui::{Color32, Id, Order, Sense, TextureHandle, TextureOptions};
use rfd::FileDialog;
use tracing::{info, warn};

use crate::config::config::*;
use crate::config::settings::Settings;
use crate::core::gallery::{Gallery, Item};
use crate::core::image_cache::ImageCache;
use crate::core::preload_manager::{LoadOutcome, PreloadManager};
use crate::error::Result;
use crate::i18n::Strings;
use crate::ui::gesture::SwipeTracker;
use crate::ui::input::{key_event, LightboxEvent};
use crate::ui::lightbox::{LightboxController, LightboxOptions};
use crate::ui::surface::{DisplayOutcome, DisplayToken, RenderingSurface};

/// What a background load was for.
enum LoadTag {
    Display(DisplayToken),
    Preload,
    Thumbnail { epoch: u64, index: usize },
}

/// The image currently shown in the modal.
struct DisplaySlot {
    token: DisplayToken,
    caption: String,
    alt: String,
    texture: Option<TextureHandle>,
    failed: bool,
}

#[derive(Default)]
struct PanelButtons {
    close: Option<Id>,
    previous: Option<Id>,
    next: Option<Id>,
}

/// Rendering surface backed by egui: keeps everything the modal and the grid
/// draw, and turns loader results into textures on the UI thread.
pub struct EguiSurface {
    ctx: egui::Context,
    strings: &'static Strings,
    loader: PreloadManager<LoadTag>,
    cache: ImageCache,
    thumbnails: HashMap<usize, TextureHandle>,
    thumbnail_epoch: u64,
    slot: Option<DisplaySlot>,
    /// Display requests served from the cache, reported on the next drain.
    ready: Vec<DisplayToken>,
    visible: bool,
    background_scroll: bool,
    can_go_previous: bool,
    can_go_next: bool,
    panel_id: Id,
    buttons: PanelButtons,
}

impl EguiSurface {
    pub fn new(
        ctx: egui::Context,
        strings: &'static Strings,
        cache_capacity: usize,
    ) -> Result<Self> {
        let repaint = ctx.clone();
        let loader = PreloadManager::new(MAX_LOADER_THREADS)?
            .with_notifier(move || repaint.request_repaint());

        Ok(Self {
            ctx,
            strings,
            loader,
            cache: ImageCache::new(cache_capacity),
            thumbnails: HashMap::new(),
            thumbnail_epoch: 0,
            slot: None,
            ready: Vec::new(),
            visible: false,
            background_scroll: true,
            can_go_previous: false,
            can_go_next: false,
            panel_id: Id::new("lightbox_panel"),
            buttons: PanelButtons::default(),
        })
    }

    /// Forgets images of the previous gallery and starts loading thumbnails
    /// for `gallery`.
    pub fn reset_gallery(&mut self, gallery: &Gallery) {
        self.thumbnail_epoch += 1;
        self.thumbnails.clear();
        self.cache.clear();
        let epoch = self.thumbnail_epoch;
        let requests = gallery
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let tag = LoadTag::Thumbnail { epoch, index };
                (tag, item.thumbnail_source().to_string())
            })
            .collect();
        self.loader.preload_batch(requests, THUMBNAIL_MAX_SIZE);
    }

    /// Applies finished loads and returns the display notifications for the
    /// controller.
    pub fn drain_loads(&mut self) -> Vec<(DisplayToken, DisplayOutcome)> {
        let mut finished: Vec<_> = self
            .ready
            .drain(..)
            .map(|token| (token, DisplayOutcome::Loaded))
            .collect();

        for LoadOutcome { tag, source, result } in self.loader.drain() {
            let image = match result {
                Ok(image) => image,
                Err(e) => {
                    match tag {
                        LoadTag::Display(token) => {
                            warn!(%source, error = %e, "display load failed");
                            finished.push((token, DisplayOutcome::Failed));
                        }
                        LoadTag::Thumbnail { index, .. } => {
                            warn!(%source, index, error = %e, "thumbnail load failed");
                        }
                        LoadTag::Preload => {}
                    }
                    continue;
                }
            };

            let texture = self
                .ctx
                .load_texture(format!("image_{source}"), image, TextureOptions::LINEAR);
            match tag {
                LoadTag::Display(token) => {
                    self.cache.insert(source, texture.clone());
                    // Only the current request may fill the slot.
                    if let Some(slot) = self.slot.as_mut().filter(|s| s.token == token) {
                        slot.texture = Some(texture);
                    }
                    finished.push((token, DisplayOutcome::Loaded));
                }
                LoadTag::Preload => self.cache.insert(source, texture),
                LoadTag::Thumbnail { epoch, index } => {
                    if epoch == self.thumbnail_epoch {
                        self.thumbnails.insert(index, texture);
                    }
                }
            }
        }
        finished
    }

    pub fn background_scroll(&self) -> bool {
        self.background_scroll
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn thumbnail(&self, index: usize) -> Option<&TextureHandle> {
        self.thumbnails.get(&index)
    }
}

impl RenderingSurface for EguiSurface {
    type Focus = Id;

    fn display_item(&mut self, token: DisplayToken, item: &Item) {
        let cached = self.cache.get(&item.source);
        if cached.is_some() {
            self.ready.push(token);
        } else {
            self.loader.request(LoadTag::Display(token), &item.source, DISPLAY_MAX_SIZE);
        }

        self.slot = Some(DisplaySlot {
            token,
            caption: item.title.clone(),
            alt: self.strings.alt_text(&item.title, token.index),
            texture: cached,
            failed: false,
        });
    }

    fn clear_display(&mut self) {
        self.slot = None;
        self.ready.clear();
    }

    fn set_caption(&mut self, text: &str) {
        if let Some(slot) = self.slot.as_mut() {
            slot.caption = text.to_string();
            slot.alt = text.to_string();
            slot.failed = true;
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.buttons = PanelButtons::default();
        }
    }

    fn set_background_scroll(&mut self, enabled: bool) {
        self.background_scroll = enabled;
    }

    fn set_navigation_enabled(&mut self, can_go_previous: bool, can_go_next: bool) {
        self.can_go_previous = can_go_previous;
        self.can_go_next = can_go_next;
    }

    fn focus_panel(&mut self) {
        let id = self.panel_id;
        self.ctx.memory_mut(|m| m.request_focus(id));
    }

    fn preload(&mut self, source: &str) {
        if !self.cache.contains(source) && !self.loader.is_loading(source, DISPLAY_MAX_SIZE) {
            self.loader.preload(LoadTag::Preload, source, DISPLAY_MAX_SIZE);
        }
    }

    fn focused(&self) -> Option<Id> {
        self.ctx.memory(|m| m.focused())
    }

    fn focus(&mut self, target: &Id) {
        let id = *target;
        self.ctx.memory_mut(|m| m.request_focus(id));
    }

    fn restore_focus(&mut self, target: &Id) -> bool {
        // A widget that was not laid out last frame cannot take focus.
        if self.ctx.read_response(*target).is_none() {
            return false;
        }
        self.focus(target);
        true
    }

    fn panel_focusables(&self) -> Vec<Id> {
        let previous = self.buttons.previous.filter(|_| self.can_go_previous);
        let next = self.buttons.next.filter(|_| self.can_go_next);
        [self.buttons.close, previous, next].into_iter().flatten().collect()
    }
}

pub struct ImageViewerApp {
    controller: LightboxController<EguiSurface>,
    strings: &'static Strings,
    swipe: SwipeTracker,
}

impl ImageViewerApp {
    pub fn new(ctx: &egui::Context, gallery: Gallery, settings: &Settings) -> Result<Self> {
        let strings = settings.language.strings();
        let mut surface = EguiSurface::new(ctx.clone(), strings, settings.cache_capacity)?;
        surface.reset_gallery(&gallery);

        let options = LightboxOptions {
            swipe_threshold: settings.swipe_threshold,
            failure_text: strings.load_failed.to_string(),
        };
        info!(items = gallery.len(), "gallery ready");

        Ok(Self {
            controller: LightboxController::new(gallery, surface, options),
            strings,
            swipe: SwipeTracker::default(),
        })
    }

    fn load_folder(&mut self, dir: &Path) {
        match Gallery::from_directory(dir) {
            Ok(gallery) => {
                info!(dir = %dir.display(), items = gallery.len(), "opened folder");
                self.controller.surface_mut().reset_gallery(&gallery);
                self.controller.replace_gallery(gallery);
            }
            Err(e) => warn!(error = %e, "could not open folder"),
        }
    }

    fn apply_finished_loads(&mut self) {
        let finished = self.controller.surface_mut().drain_loads();
        for (token, outcome) in finished {
            self.controller.display_finished(token, outcome);
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(format!("📂 {}", self.strings.btn_open_folder)).clicked() {
                    if let Some(dir) = FileDialog::new().pick_folder() {
                        self.load_folder(&dir);
                    }
                }
                ui.separator();
                ui.label(format!(
                    "{} {}",
                    self.controller.gallery().len(),
                    self.strings.text_images
                ));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{APP_NAME} v{APP_VERSION}"));
                });
            });
        });
    }

    fn show_grid(&self, ctx: &egui::Context, events: &mut Vec<LightboxEvent>) {
        let surface = self.controller.surface();
        let gallery = self.controller.gallery();
        let cell = egui::vec2(THUMBNAIL_CELL_SIZE, THUMBNAIL_CELL_SIZE);

        egui::CentralPanel::default().show(ctx, |ui| {
            if gallery.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(self.strings.text_empty_gallery);
                });
                return;
            }

            egui::ScrollArea::vertical()
                .enable_scrolling(surface.background_scroll())
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for (index, item) in gallery.items().iter().enumerate() {
                            let button = match surface.thumbnail(index) {
                                Some(texture) => egui::Button::image_and_text(
                                    egui::Image::from_texture(texture).fit_to_exact_size(cell),
                                    item.title.as_str(),
                                ),
                                None => egui::Button::new(item.title.as_str()).min_size(cell),
                            };
                            let response = ui
                                .add(button)
                                .on_hover_text(self.strings.alt_text(&item.title, index));
                            if response.clicked() {
                                events.push(LightboxEvent::OpenRequested(index));
                            }
                        }
                    });
                });
        });
    }

    fn show_lightbox(&mut self, ctx: &egui::Context, events: &mut Vec<LightboxEvent>) {
        let strings = self.strings;
        let total = self.controller.gallery().len();
        let position = self.controller.current_index().map(|i| i + 1).unwrap_or_default();
        let swipe = &mut self.swipe;
        let surface = self.controller.surface_mut();
        let screen = ctx.screen_rect();

        egui::Area::new(Id::new("lightbox_overlay"))
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let backdrop = ui.interact(screen, Id::new("lightbox_backdrop"), Sense::click());
                ui.painter().rect_filled(screen, 0.0, Color32::from_black_alpha(220));
                if backdrop.clicked() {
                    events.push(LightboxEvent::CloseRequested);
                }

                let panel_rect = screen.shrink(32.0);
                let panel = ui.interact(panel_rect, surface.panel_id, Sense::click_and_drag());
                if panel.drag_started() {
                    if let Some(pos) = ui.input(|i| i.pointer.press_origin()) {
                        swipe.begin(pos.x);
                    }
                }
                if panel.drag_stopped() {
                    let delta = ui
                        .input(|i| i.pointer.latest_pos())
                        .and_then(|pos| swipe.end(pos.x));
                    if let Some(delta_x) = delta {
                        events.push(LightboxEvent::Swiped(delta_x));
                    }
                }

                ui.scope_builder(egui::UiBuilder::new().max_rect(panel_rect), |ui| {
                    ui.vertical_centered(|ui| {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                            let close = ui.button(format!("✖ {}", strings.btn_close));
                            surface.buttons.close = Some(close.id);
                            if close.clicked() {
                                events.push(LightboxEvent::CloseRequested);
                            }
                        });

                        let image_size =
                            (ui.available_size() - egui::vec2(0.0, 72.0)).max(egui::Vec2::ZERO);
                        match surface.slot.as_ref() {
                            Some(DisplaySlot { texture: Some(texture), alt, .. }) => {
                                ui.add(egui::Image::from_texture(texture).max_size(image_size))
                                    .on_hover_text(alt.as_str());
                            }
                            Some(DisplaySlot { failed: true, alt, .. }) => {
                                ui.add_sized(image_size, egui::Label::new(alt.as_str()));
                            }
                            _ => {
                                ui.add_sized(image_size, egui::Spinner::new())
                                    .on_hover_text(strings.text_loading);
                            }
                        }

                        if let Some(slot) = surface.slot.as_ref() {
                            let caption = format!("{}   {position} / {total}", slot.caption);
                            ui.label(egui::RichText::new(caption).color(Color32::WHITE).strong());
                        }

                        ui.horizontal(|ui| {
                            let previous = ui.add_enabled(
                                surface.can_go_previous,
                                egui::Button::new(format!("⬅ {}", strings.btn_prev)),
                            );
                            let next = ui.add_enabled(
                                surface.can_go_next,
                                egui::Button::new(format!("{} ➡", strings.btn_next)),
                            );
                            surface.buttons.previous = Some(previous.id);
                            surface.buttons.next = Some(next.id);
                            if previous.clicked() {
                                events.push(LightboxEvent::PreviousRequested);
                            }
                            if next.clicked() {
                                events.push(LightboxEvent::NextRequested);
                            }
                        });
                    });
                });
            });
    }
}

impl eframe::App for ImageViewerApp {
    /// Keys reach the lightbox before egui sees them, so a handled key (and a
    /// wrapped Tab) never triggers egui's own focus movement.
    fn raw_input_hook(&mut self, _ctx: &egui::Context, raw_input: &mut egui::RawInput) {
        if !self.controller.is_open() {
            return;
        }
        let controller = &mut self.controller;
        raw_input.events.retain(|event| match key_event(event) {
            Some(lightbox_event) => !controller.dispatch(lightbox_event).is_handled(),
            None => true,
        });
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_finished_loads();

        let mut events = Vec::new();
        self.show_toolbar(ctx);
        self.show_grid(ctx, &mut events);
        if self.controller.surface().is_visible() {
            self.show_lightbox(ctx, &mut events);
        } else {
            self.swipe.cancel();
        }

        // Events are applied after drawing, so show their effect next frame.
        if !events.is_empty() {
            ctx.request_repaint();
        }
        for event in events {
            self.controller.dispatch(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use image::{Rgba, RgbaImage};
    use std::time::{Duration, Instant};
    use tempfile::{tempdir, TempDir};

    fn surface() -> EguiSurface {
        EguiSurface::new(egui::Context::default(), Language::En.strings(), 4).expect("surface")
    }

    fn token(index: usize, generation: u64) -> DisplayToken {
        DisplayToken { index, generation }
    }

    fn png(dir: &TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
            .save(&path)
            .expect("save failed");
        path.to_string_lossy().into_owned()
    }

    /// Drains until `count` notifications arrived or the deadline passes.
    fn drain_until(
        surface: &mut EguiSurface,
        count: usize,
    ) -> Vec<(DisplayToken, DisplayOutcome)> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut finished = Vec::new();
        while finished.len() < count && Instant::now() < deadline {
            finished.extend(surface.drain_loads());
            std::thread::sleep(Duration::from_millis(10));
        }
        finished
    }

    #[test]
    fn disabled_navigation_buttons_are_not_focusable() {
        let mut surface = surface();
        surface.buttons = PanelButtons {
            close: Some(Id::new("close")),
            previous: Some(Id::new("prev")),
            next: Some(Id::new("next")),
        };

        surface.set_navigation_enabled(false, true);
        assert_eq!(surface.panel_focusables(), [Id::new("close"), Id::new("next")]);

        surface.set_navigation_enabled(true, true);
        assert_eq!(surface.panel_focusables().len(), 3);
    }

    #[test]
    fn hiding_forgets_panel_buttons() {
        let mut surface = surface();
        surface.buttons.close = Some(Id::new("close"));
        surface.set_visible(false);
        assert!(surface.panel_focusables().is_empty());
    }

    #[test]
    fn failed_display_is_reported_for_its_token() {
        let dir = tempdir().expect("failed to create temp dir");
        let mut surface = surface();
        let item = Item::new(dir.path().join("missing.png").to_string_lossy(), "Missing");

        surface.display_item(token(0, 1), &item);
        let finished = drain_until(&mut surface, 1);

        assert_eq!(finished, [(token(0, 1), DisplayOutcome::Failed)]);
        let slot = surface.slot.as_ref().expect("slot");
        assert!(slot.texture.is_none());
        assert!(!slot.failed);
        assert_eq!(slot.caption, "Missing");
    }

    #[test]
    fn only_the_current_request_fills_the_slot() {
        let dir = tempdir().expect("failed to create temp dir");
        let first = png(&dir, "first.png");
        let second = png(&dir, "second.png");
        let mut surface = surface();

        surface.display_item(token(0, 1), &Item::new(first, "First"));
        surface.display_item(token(1, 2), &Item::new(second.clone(), "Second"));
        let finished = drain_until(&mut surface, 2);

        assert_eq!(finished.len(), 2);
        let slot = surface.slot.as_ref().expect("slot");
        assert_eq!(slot.token, token(1, 2));
        let texture = slot.texture.as_ref().expect("texture");
        assert_eq!(texture.name(), format!("image_{second}"));
    }

    #[test]
    fn cached_source_completes_on_next_drain() {
        let dir = tempdir().expect("failed to create temp dir");
        let source = png(&dir, "cached.png");
        let mut surface = surface();
        surface.display_item(token(0, 1), &Item::new(source.clone(), "Cached"));
        drain_until(&mut surface, 1);

        surface.display_item(token(0, 2), &Item::new(source, "Cached"));

        assert!(surface.slot.as_ref().is_some_and(|s| s.texture.is_some()));
        assert_eq!(surface.drain_loads(), [(token(0, 2), DisplayOutcome::Loaded)]);
    }

    #[test]
    fn caption_override_marks_failure() {
        let mut surface = surface();
        surface.set_caption("ignored without a slot");
        assert!(surface.slot.is_none());

        surface.slot = Some(DisplaySlot {
            token: token(3, 1),
            caption: "Ocean waves".into(),
            alt: "Ocean waves".into(),
            texture: None,
            failed: false,
        });
        surface.set_caption("Failed to load image");

        let slot = surface.slot.as_ref().expect("slot");
        assert!(slot.failed);
        assert_eq!(slot.caption, "Failed to load image");
        assert_eq!(slot.alt, "Failed to load image");
    }

    #[test]
    fn clear_display_drops_pending_cache_hits() {
        let mut surface = surface();
        surface.ready.push(token(0, 1));
        surface.clear_display();
        assert!(surface.slot.is_none());
        assert!(surface.drain_loads().is_empty());
    }

    #[test]
    fn thumbnails_of_a_replaced_gallery_are_dropped() {
        let dir = tempdir().expect("failed to create temp dir");
        let old = Gallery::new(vec![Item::new(png(&dir, "old.png"), "Old")]);
        let new = Gallery::new(vec![Item::new(png(&dir, "new.png"), "New")]);
        let mut surface = surface();

        surface.reset_gallery(&old);
        surface.reset_gallery(&new);

        let deadline = Instant::now() + Duration::from_secs(10);
        while surface.thumbnail(0).is_none() && Instant::now() < deadline {
            surface.drain_loads();
            std::thread::sleep(Duration::from_millis(10));
        }
        // Let the stale load land too, if it has not yet.
        std::thread::sleep(Duration::from_millis(200));
        surface.drain_loads();

        let texture = surface.thumbnail(0).expect("thumbnail");
        assert!(texture.name().ends_with("new.png"));
    }

    #[test]
    fn unknown_widget_cannot_take_focus_back() {
        let mut surface = surface();
        assert!(!surface.restore_focus(&Id::new("never_drawn")));
    }

    fn viewer(len: usize) -> ImageViewerApp {
        let items = (0..len)
            .map(|i| Item::new(format!("missing-{i}.png"), format!("Item {i}")))
            .collect();
        let ctx = egui::Context::default();
        ImageViewerApp::new(&ctx, Gallery::new(items), &Settings::default()).expect("viewer")
    }

    fn key(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    /// Runs the input hook and returns what egui would still see.
    fn route(app: &mut ImageViewerApp, events: Vec<egui::Event>) -> Vec<egui::Event> {
        let ctx = app.controller.surface().ctx.clone();
        let mut raw_input = egui::RawInput {
            events,
            ..Default::default()
        };
        eframe::App::raw_input_hook(app, &ctx, &mut raw_input);
        raw_input.events
    }

    #[test]
    fn handled_keys_never_reach_egui() {
        let mut app = viewer(3);
        app.controller.open(1);

        let left = route(
            &mut app,
            vec![
                key(egui::Key::ArrowRight, egui::Modifiers::NONE),
                key(egui::Key::A, egui::Modifiers::NONE),
                key(egui::Key::Tab, egui::Modifiers::NONE),
            ],
        );

        assert_eq!(app.controller.current_index(), Some(2));
        // Nothing focusable was drawn yet, so Tab is swallowed too.
        assert_eq!(left, [key(egui::Key::A, egui::Modifiers::NONE)]);
    }

    #[test]
    fn keys_after_escape_pass_through() {
        let mut app = viewer(3);
        app.controller.open(1);

        let left = route(
            &mut app,
            vec![
                key(egui::Key::Escape, egui::Modifiers::NONE),
                key(egui::Key::ArrowRight, egui::Modifiers::NONE),
            ],
        );

        assert!(!app.controller.is_open());
        assert_eq!(left, [key(egui::Key::ArrowRight, egui::Modifiers::NONE)]);
    }

    #[test]
    fn closed_viewer_leaves_input_alone() {
        let mut app = viewer(3);
        let events = vec![
            key(egui::Key::Escape, egui::Modifiers::NONE),
            key(egui::Key::ArrowLeft, egui::Modifiers::NONE),
        ];

        assert_eq!(route(&mut app, events.clone()), events);
        assert!(!app.controller.is_open());
    }

    #[test]
    fn tab_inside_the_panel_is_left_to_egui_until_it_wraps() {
        let mut app = viewer(3);
        app.controller.open(1);
        let (close, previous, next) = (Id::new("close"), Id::new("prev"), Id::new("next"));
        app.controller.surface_mut().buttons = PanelButtons {
            close: Some(close),
            previous: Some(previous),
            next: Some(next),
        };

        app.controller.surface_mut().focus(&previous);
        let tab = key(egui::Key::Tab, egui::Modifiers::NONE);
        assert_eq!(route(&mut app, vec![tab.clone()]), [tab]);
        assert_eq!(app.controller.surface().focused(), Some(previous));

        app.controller.surface_mut().focus(&close);
        let shift_tab = key(egui::Key::Tab, egui::Modifiers::SHIFT);
        assert!(route(&mut app, vec![shift_tab]).is_empty());
        assert_eq!(app.controller.surface().focused(), Some(next));
    }
}
