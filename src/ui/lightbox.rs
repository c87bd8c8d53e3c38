//! The lightbox controller: the modal viewer's state machine.
//!
//! The controller owns [`ViewerState`] and is the only thing that changes it.
//! It never draws anything itself; every visible effect goes through the
//! [`RenderingSurface`] it drives. All operations run to completion on the
//! calling thread. Image loads finish later and come back through
//! [`LightboxController::display_finished`], which can only ever touch the
//! caption of the request that is still current.

use tracing::{debug, warn};

use crate::config::config::DEFAULT_SWIPE_THRESHOLD;
use crate::config::config::PRELOAD_RADIUS;
use crate::core::gallery::Gallery;
use crate::i18n::Language;
use crate::ui::focus_trap::{trap_tab, TabAction};
use crate::ui::input::{Key, KeyOutcome, LightboxEvent};
use crate::ui::navigation_manager::{NavigationAvailability, NavigationManager};
use crate::ui::surface::{DisplayOutcome, DisplayToken, RenderingSurface};

#[derive(Debug, Clone)]
pub struct LightboxOptions {
    pub swipe_threshold: f32,
    /// Caption shown when the current image fails to load.
    pub failure_text: String,
}

impl Default for LightboxOptions {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            failure_text: Language::default().strings().load_failed.to_string(),
        }
    }
}

/// Open/closed state, current index and focus-restore target.
///
/// The viewer is open exactly when an index is selected.
#[derive(Debug, Clone)]
pub struct ViewerState<F> {
    navigation: NavigationManager,
    last_focused: Option<F>,
}

impl<F> ViewerState<F> {
    fn new(total: usize) -> Self {
        Self {
            navigation: NavigationManager::new(total),
            last_focused: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.navigation.current_index().is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.navigation.current_index()
    }

    #[cfg(test)]
    pub fn last_focused(&self) -> Option<&F> {
        self.last_focused.as_ref()
    }
}

pub struct LightboxController<S: RenderingSurface> {
    gallery: Gallery,
    state: ViewerState<S::Focus>,
    surface: S,
    options: LightboxOptions,
    /// Bumped on every display request and on close.
    generation: u64,
}

impl<S: RenderingSurface> LightboxController<S> {
    pub fn new(gallery: Gallery, surface: S, options: LightboxOptions) -> Self {
        let state = ViewerState::new(gallery.len());
        Self {
            gallery,
            state,
            surface,
            options,
            generation: 0,
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[cfg(test)]
    pub fn state(&self) -> &ViewerState<S::Focus> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Token of the display request currently on screen, if open.
    pub fn current_token(&self) -> Option<DisplayToken> {
        self.current_index().map(|index| DisplayToken {
            index,
            generation: self.generation,
        })
    }

    /// Swaps the dataset, closing the viewer first.
    pub fn replace_gallery(&mut self, gallery: Gallery) {
        self.close();
        self.state = ViewerState::new(gallery.len());
        self.gallery = gallery;
    }

    /// Opens the viewer on `index`. Out-of-range indices are ignored.
    /// Opening while already open only navigates: the focus restored on close
    /// stays the one captured by the first open.
    pub fn open(&mut self, index: usize) {
        if index >= self.gallery.len() {
            let len = self.gallery.len();
            debug!(index, len, "ignoring open outside the gallery");
            return;
        }

        let was_open = self.is_open();
        if !was_open {
            self.state.last_focused = self.surface.focused();
        }
        self.state.navigation.select(index);
        debug!(index, "lightbox opened");

        if !was_open {
            self.surface.set_visible(true);
            self.surface.set_background_scroll(false);
        }
        self.show_current();
        self.surface.focus_panel();
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }

        self.state.navigation.clear();
        self.generation += 1;
        self.surface.set_visible(false);
        self.surface.set_background_scroll(true);
        self.surface.clear_display();
        debug!("lightbox closed");

        if let Some(target) = self.state.last_focused.take() {
            if !self.surface.restore_focus(&target) {
                debug!(?target, "previous focus target is gone; not restoring");
            }
        }
    }

    pub fn next(&mut self) {
        if self.state.navigation.next() {
            self.show_current();
        }
    }

    pub fn previous(&mut self) {
        if self.state.navigation.previous() {
            self.show_current();
        }
    }

    pub fn navigation_availability(&self) -> NavigationAvailability {
        self.state.navigation.availability()
    }

    /// Keyboard handling while open. `Handled` means the platform's default
    /// action for the key must not run.
    pub fn handle_key(&mut self, key: Key, shift: bool) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::Escape => self.close(),
            Key::ArrowRight => self.next(),
            Key::ArrowLeft => self.previous(),
            Key::Tab => return self.trap_focus(shift),
            Key::Other => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    pub fn handle_swipe(&mut self, delta_x: f32) {
        if !self.is_open() || delta_x.abs() <= self.options.swipe_threshold {
            return;
        }
        if delta_x < 0.0 {
            self.next();
        } else {
            self.previous();
        }
    }

    pub fn dispatch(&mut self, event: LightboxEvent) -> KeyOutcome {
        match event {
            LightboxEvent::OpenRequested(index) => self.open(index),
            LightboxEvent::CloseRequested => self.close(),
            LightboxEvent::NextRequested => self.next(),
            LightboxEvent::PreviousRequested => self.previous(),
            LightboxEvent::KeyPressed { key, shift } => return self.handle_key(key, shift),
            LightboxEvent::Swiped(delta_x) => self.handle_swipe(delta_x),
        }
        KeyOutcome::Handled
    }

    /// Load notification for a display request. Only a failure of the request
    /// that is still current changes anything, and then only the caption.
    pub fn display_finished(&mut self, token: DisplayToken, outcome: DisplayOutcome) {
        if self.current_token() != Some(token) {
            debug!(?token, ?outcome, "dropping stale display notification");
            return;
        }
        if outcome == DisplayOutcome::Failed {
            warn!(index = token.index, "image failed to load");
            self.surface.set_caption(&self.options.failure_text);
        }
    }

    fn show_current(&mut self) {
        let Some(index) = self.current_index() else {
            return;
        };
        let Some(item) = self.gallery.get(index) else {
            return;
        };

        self.generation += 1;
        let token = DisplayToken {
            index,
            generation: self.generation,
        };
        self.surface.display_item(token, item);

        let availability = self.navigation_availability();
        self.surface
            .set_navigation_enabled(availability.can_go_previous, availability.can_go_next);
        self.preload_neighbors(index);
    }

    fn preload_neighbors(&mut self, index: usize) {
        let start = index.saturating_sub(PRELOAD_RADIUS);
        let end = (index + PRELOAD_RADIUS).min(self.gallery.len().saturating_sub(1));
        for neighbor in (start..=end).filter(|&i| i != index) {
            if let Some(item) = self.gallery.get(neighbor) {
                self.surface.preload(&item.source);
            }
        }
    }

    fn trap_focus(&mut self, backward: bool) -> KeyOutcome {
        let focusables = self.surface.panel_focusables();
        let focused = self.surface.focused();

        match trap_tab(&focusables, focused.as_ref(), backward) {
            TabAction::Suppress => KeyOutcome::Handled,
            TabAction::Wrap(target) => {
                self.surface.focus(&target);
                KeyOutcome::Handled
            }
            TabAction::Default => KeyOutcome::Ignored,
        }
    }
}
